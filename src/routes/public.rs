use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::public::{CurrentRoundResponse, GamePhaseResponse, PlayersResponse, SessionResponse},
    error::AppError,
    services::public_service,
    state::SharedState,
};

/// Public read-only endpoints that expose the current game state.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/public/session", get(get_session))
        .route("/public/players", get(get_players))
        .route("/public/round", get(get_current_round))
        .route("/public/phase", get(get_game_phase))
}

#[utoipa::path(
    get,
    path = "/public/session",
    tag = "public",
    responses((status = 200, description = "Whole session", body = SessionResponse))
)]
/// Return the whole session, hiding answers that are not revealed yet.
pub async fn get_session(State(state): State<SharedState>) -> Json<SessionResponse> {
    Json(public_service::get_session(&state).await)
}

#[utoipa::path(
    get,
    path = "/public/players",
    tag = "public",
    responses((status = 200, description = "Players with scores", body = PlayersResponse))
)]
/// Return the players in join order.
pub async fn get_players(State(state): State<SharedState>) -> Json<PlayersResponse> {
    Json(public_service::get_players(&state).await)
}

#[utoipa::path(
    get,
    path = "/public/round",
    tag = "public",
    responses(
        (status = 200, description = "Current round", body = CurrentRoundResponse),
        (status = 404, description = "No round opened yet")
    )
)]
/// Return the round currently in play.
pub async fn get_current_round(
    State(state): State<SharedState>,
) -> Result<Json<CurrentRoundResponse>, AppError> {
    let payload = public_service::get_current_round(&state).await?;
    Ok(Json(payload))
}

#[utoipa::path(
    get,
    path = "/public/phase",
    tag = "public",
    responses((status = 200, description = "Current game phase", body = GamePhaseResponse))
)]
/// Return the phase the game is currently in.
pub async fn get_game_phase(State(state): State<SharedState>) -> Json<GamePhaseResponse> {
    Json(public_service::get_game_phase(&state).await)
}
