use axum::{Json, Router, extract::State, routing::post};
use validator::Validate;

use crate::{
    dto::game::{AdvanceResponse, GuessRequest, GuessResponse, JoinRequest, JoinResponse},
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Routes driving the game from the players' side.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/players", post(join))
        .route("/guesses", post(submit_guess))
        .route("/rounds/next", post(advance_round))
}

/// Join the running session.
#[utoipa::path(
    post,
    path = "/players",
    tag = "game",
    request_body = JoinRequest,
    responses(
        (status = 200, description = "Player joined", body = JoinResponse),
        (status = 400, description = "Invalid player name"),
        (status = 409, description = "Name taken or roster already full")
    )
)]
pub async fn join(
    State(state): State<SharedState>,
    Json(payload): Json<JoinRequest>,
) -> Result<Json<JoinResponse>, AppError> {
    payload.validate()?;
    let response = game_service::join_player(&state, payload).await?;
    Ok(Json(response))
}

/// Submit an answer for the current round.
#[utoipa::path(
    post,
    path = "/guesses",
    tag = "game",
    request_body = GuessRequest,
    responses(
        (status = 200, description = "Answer recorded", body = GuessResponse),
        (status = 400, description = "Invalid guess or choice"),
        (status = 404, description = "Unknown player"),
        (status = 409, description = "Already answered or round closed")
    )
)]
pub async fn submit_guess(
    State(state): State<SharedState>,
    Json(payload): Json<GuessRequest>,
) -> Result<Json<GuessResponse>, AppError> {
    payload.validate()?;
    let response = game_service::submit_guess(&state, payload).await?;
    Ok(Json(response))
}

/// Open the next round once the current one was scored. Early requests are
/// acknowledged with `advanced = false`.
#[utoipa::path(
    post,
    path = "/rounds/next",
    tag = "game",
    responses((status = 200, description = "Advance processed", body = AdvanceResponse))
)]
pub async fn advance_round(State(state): State<SharedState>) -> Json<AdvanceResponse> {
    Json(game_service::advance_round(&state).await)
}
