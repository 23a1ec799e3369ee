use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::post,
};

use crate::{
    dto::game::ConfirmScoringResponse, error::AppError, services::game_service,
    state::SharedState,
};

const MODERATOR_TOKEN_HEADER: &str = "x-moderator-token";

/// Moderator-only endpoints.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/admin/rounds/confirm", post(confirm_scoring))
        .route_layer(middleware::from_fn_with_state(state, require_moderator_token))
}

/// Score a fully answered round that waits for confirmation.
#[utoipa::path(
    post,
    path = "/admin/rounds/confirm",
    tag = "admin",
    params(("X-Moderator-Token" = Option<String>, Header, description = "Moderator token, required when one is configured")),
    responses(
        (status = 200, description = "Round scored", body = ConfirmScoringResponse),
        (status = 401, description = "Missing or invalid moderator token"),
        (status = 409, description = "No round awaits confirmation")
    )
)]
pub async fn confirm_scoring(
    State(state): State<SharedState>,
) -> Result<Json<ConfirmScoringResponse>, AppError> {
    Ok(Json(game_service::confirm_scoring(&state).await?))
}

async fn require_moderator_token(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.moderator_token() else {
        return Ok(next.run(req).await);
    };

    let provided = req
        .headers()
        .get(MODERATOR_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            AppError::Unauthorized("missing moderator token header `X-Moderator-Token`".into())
        })?;

    if provided == expected {
        Ok(next.run(req).await)
    } else {
        Err(AppError::Unauthorized("invalid moderator token".into()))
    }
}
