use serde::Serialize;
use utoipa::ToSchema;

use crate::state::state_machine::{RoundPhase, Snapshot};

/// Publicly visible game phase exposed to clients (REST/SSE).
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisibleGamePhase {
    /// Waiting for players to join.
    NotStarted,
    /// The current round accepts guesses.
    RoundOpen,
    /// Every answer is in; a moderator must confirm scoring.
    AwaitingScoreConfirmation,
    /// The current round has been scored and its rating revealed.
    RoundScored,
    /// Every round has been played.
    GameComplete,
}

impl VisibleGamePhase {
    /// Whether the current round's rating and answers may be shown.
    pub fn reveals_answers(self) -> bool {
        matches!(
            self,
            VisibleGamePhase::RoundScored | VisibleGamePhase::GameComplete
        )
    }
}

impl From<&RoundPhase> for VisibleGamePhase {
    fn from(value: &RoundPhase) -> Self {
        match value {
            RoundPhase::NotStarted => VisibleGamePhase::NotStarted,
            RoundPhase::RoundOpen => VisibleGamePhase::RoundOpen,
            RoundPhase::AwaitingScoreConfirmation => VisibleGamePhase::AwaitingScoreConfirmation,
            RoundPhase::RoundScored => VisibleGamePhase::RoundScored,
            RoundPhase::GameComplete => VisibleGamePhase::GameComplete,
        }
    }
}

/// Phase plus the state machine version, so clients can drop stale updates.
#[derive(Debug, Serialize, ToSchema, Clone, Copy)]
pub struct PhaseSnapshot {
    pub phase: VisibleGamePhase,
    pub version: usize,
}

impl From<&Snapshot> for PhaseSnapshot {
    fn from(value: &Snapshot) -> Self {
        Self {
            phase: VisibleGamePhase::from(&value.phase),
            version: value.version,
        }
    }
}
