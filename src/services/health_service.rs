use tracing::debug;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with a static health payload, checking that the game lock is reachable.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let phase = state.read_session(|game| game.phase()).await;
    debug!(?phase, "health check");
    HealthResponse::ok()
}
