use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Rating Party Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::game::join,
        crate::routes::game::submit_guess,
        crate::routes::game::advance_round,
        crate::routes::admin::confirm_scoring,
        crate::routes::public::get_session,
        crate::routes::public::get_players,
        crate::routes::public::get_current_round,
        crate::routes::public::get_game_phase,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::JoinRequest,
            crate::dto::game::JoinResponse,
            crate::dto::game::GuessRequest,
            crate::dto::game::GuessResponse,
            crate::dto::game::GuessStatus,
            crate::dto::game::AdvanceResponse,
            crate::dto::game::ConfirmScoringResponse,
            crate::dto::common::PlayerSummary,
            crate::dto::common::RoundSummary,
            crate::dto::common::AwardSummary,
            crate::dto::common::RoundResultSummary,
            crate::dto::phase::VisibleGamePhase,
            crate::dto::phase::PhaseSnapshot,
            crate::dto::public::SessionResponse,
            crate::dto::public::PlayersResponse,
            crate::dto::public::CurrentRoundResponse,
            crate::dto::public::GamePhaseResponse,
            crate::dto::sse::Handshake,
            crate::dto::sse::PlayerJoinedEvent,
            crate::dto::sse::AnswerReceivedEvent,
            crate::dto::sse::PhaseChangedEvent,
            crate::dto::sse::RoundScoredEvent,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "game", description = "Player actions"),
        (name = "admin", description = "Moderator actions"),
        (name = "public", description = "Read-only game state"),
    )
)]
pub struct ApiDoc;
