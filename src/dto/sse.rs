use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::{
    common::{PlayerSummary, RoundResultSummary, RoundSummary},
    phase::PhaseSnapshot,
};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Build an event from an already serialised payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self::new(event.into(), serde_json::to_string(payload)?))
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Identifier of the SSE stream.
    pub stream: String,
    /// Human-readable message confirming the subscription.
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Event emitted when a player joined the roster.
pub struct PlayerJoinedEvent {
    pub player: PlayerSummary,
    pub joined: usize,
    pub expected: usize,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast whenever the round phase changes.
pub struct PhaseChangedEvent {
    #[serde(flatten)]
    pub phase: PhaseSnapshot,
    /// Round in play after the change, rating hidden until scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<RoundSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Event emitted once a round has been scored.
pub struct RoundScoredEvent {
    pub result: RoundResultSummary,
    /// Standings after the awards were applied.
    pub players: Vec<PlayerSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Event emitted when a player submitted an answer, without revealing it.
pub struct AnswerReceivedEvent {
    pub player: String,
    pub answered: usize,
    pub expected: usize,
}
