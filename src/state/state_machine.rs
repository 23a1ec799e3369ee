use thiserror::Error;

/// High-level phases a game session moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Waiting for the roster to fill; no round has been opened yet.
    NotStarted,
    /// The current round accepts guesses.
    RoundOpen,
    /// Every player answered; scoring waits for a moderator confirmation.
    AwaitingScoreConfirmation,
    /// The current round has been scored; waiting for an advance.
    RoundScored,
    /// The last round has been played out.
    GameComplete,
}

/// Events that can be applied to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    /// The expected number of players joined; the first round opens.
    RosterFilled,
    /// All answers are in but scoring must be confirmed first.
    AnswersLocked,
    /// The round has been scored.
    Scored,
    /// The next catalog entry opens.
    NextRound,
    /// An advance was requested past the last catalog entry.
    CatalogExhausted,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: RoundPhase,
    /// The event that cannot be applied from this phase.
    pub event: RoundEvent,
}

/// Snapshot of the current state machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Current phase of the state machine.
    pub phase: RoundPhase,
    /// Version number of the state machine (increments on each transition).
    pub version: usize,
}

/// State machine implementing the round progression of a session.
#[derive(Debug, Clone)]
pub struct RoundStateMachine {
    phase: RoundPhase,
    version: usize,
}

impl Default for RoundStateMachine {
    fn default() -> Self {
        Self {
            phase: RoundPhase::NotStarted,
            version: 0,
        }
    }
}

impl RoundStateMachine {
    /// Create a new state machine waiting for players.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Create a snapshot of the current state machine state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            version: self.version,
        }
    }

    /// Validate `event` against the current phase without applying it.
    pub fn check(&self, event: RoundEvent) -> Result<RoundPhase, InvalidTransition> {
        self.compute_transition(event)
    }

    /// Apply `event`, moving to the next phase when the transition is legal.
    pub fn apply(&mut self, event: RoundEvent) -> Result<RoundPhase, InvalidTransition> {
        let next = self.compute_transition(event)?;
        self.phase = next;
        self.version += 1;
        Ok(next)
    }

    fn compute_transition(&self, event: RoundEvent) -> Result<RoundPhase, InvalidTransition> {
        let next = match (self.phase, event) {
            (RoundPhase::NotStarted, RoundEvent::RosterFilled) => RoundPhase::RoundOpen,
            (RoundPhase::RoundOpen, RoundEvent::AnswersLocked) => {
                RoundPhase::AwaitingScoreConfirmation
            }
            (RoundPhase::RoundOpen, RoundEvent::Scored)
            | (RoundPhase::AwaitingScoreConfirmation, RoundEvent::Scored) => {
                RoundPhase::RoundScored
            }
            (RoundPhase::RoundScored, RoundEvent::NextRound) => RoundPhase::RoundOpen,
            (RoundPhase::RoundScored, RoundEvent::CatalogExhausted) => RoundPhase::GameComplete,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}
