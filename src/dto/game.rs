use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::{
        common::{AnswerVisibility, PlayerSummary, RoundResultSummary, RoundSummary},
        phase::VisibleGamePhase,
        validation::validate_player_name,
    },
    state::{AdvanceIgnored, AdvanceOutcome, JoinOutcome, SubmitOutcome},
};

/// Payload used to register a player in the running session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinRequest {
    /// Display name, unique within the session.
    #[schema(max_length = 32)]
    pub name: String,
}

impl Validate for JoinRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_player_name(&self.name) {
            errors.add("name", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Response returned once a player joined.
#[derive(Debug, Serialize, ToSchema)]
pub struct JoinResponse {
    pub player: PlayerSummary,
    /// Players joined so far.
    pub joined: usize,
    /// Players required before the first round opens.
    pub expected: usize,
    /// Whether this join filled the roster and started the game.
    pub game_started: bool,
}

impl JoinResponse {
    pub fn from_outcome(outcome: &JoinOutcome, expected: usize) -> Self {
        Self {
            player: PlayerSummary::project(&outcome.player, AnswerVisibility::Hidden),
            joined: outcome.joined,
            expected,
            game_started: outcome.opened_round.is_some(),
        }
    }
}

/// Answer submitted by a player for the current round.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct GuessRequest {
    #[validate(length(min = 1, max = 32))]
    pub name: String,
    /// Numeric rating guess. Only the active player's guess (or every guess in
    /// the final round and in single-player mode) is scored. Required even for
    /// opponents, who send the value they saw.
    #[validate(range(min = 0.0, max = 10.0))]
    pub guess: f64,
    /// `higher`, `lower` or `exact`, relative to the active player's guess.
    /// Ignored for the active player.
    #[serde(default)]
    pub choice: Option<String>,
}

/// Status of a submitted answer.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GuessStatus {
    /// Recorded; other players still have to answer.
    Recorded,
    /// Every answer is in; scoring waits for a moderator.
    AwaitingConfirmation,
    /// Every answer is in and the round was scored.
    Scored,
}

/// Response to a submitted answer.
#[derive(Debug, Serialize, ToSchema)]
pub struct GuessResponse {
    pub status: GuessStatus,
    /// Answers collected for the round so far.
    pub answered: usize,
    pub expected: usize,
    /// Round breakdown, present when this answer completed and scored the round.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RoundResultSummary>,
}

impl GuessResponse {
    pub fn from_outcome(outcome: &SubmitOutcome, expected: usize) -> Self {
        match outcome {
            SubmitOutcome::Recorded { pending, expected } => Self {
                status: GuessStatus::Recorded,
                answered: *pending,
                expected: *expected,
                result: None,
            },
            SubmitOutcome::AwaitingConfirmation => Self {
                status: GuessStatus::AwaitingConfirmation,
                answered: expected,
                expected,
                result: None,
            },
            SubmitOutcome::Scored(result) => Self {
                status: GuessStatus::Scored,
                answered: expected,
                expected,
                result: Some(result.into()),
            },
        }
    }
}

/// Response to an advance request.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdvanceResponse {
    /// Whether the request moved the game forward.
    pub advanced: bool,
    pub phase: VisibleGamePhase,
    /// Round now open, when one was opened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<RoundSummary>,
    /// Why the request was ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored: Option<String>,
}

impl AdvanceResponse {
    pub fn new(
        outcome: &AdvanceOutcome,
        phase: VisibleGamePhase,
        round: Option<RoundSummary>,
    ) -> Self {
        match outcome {
            AdvanceOutcome::Advanced(_) => Self {
                advanced: true,
                phase,
                round,
                ignored: None,
            },
            AdvanceOutcome::GameComplete => Self {
                advanced: true,
                phase,
                round: None,
                ignored: None,
            },
            AdvanceOutcome::Ignored(reason) => Self {
                advanced: false,
                phase,
                round: None,
                ignored: Some(ignored_reason(*reason).to_string()),
            },
        }
    }
}

fn ignored_reason(reason: AdvanceIgnored) -> &'static str {
    match reason {
        AdvanceIgnored::NotStarted => "game has not started",
        AdvanceIgnored::RoundOpen => "current round is still open",
        AdvanceIgnored::AwaitingConfirmation => "current round awaits score confirmation",
        AdvanceIgnored::GameComplete => "game is over",
    }
}

/// Response returned once a moderator confirmed scoring.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmScoringResponse {
    pub result: RoundResultSummary,
    pub players: Vec<PlayerSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_request_rejects_bad_names() {
        assert!(JoinRequest { name: "alice".into() }.validate().is_ok());
        assert!(JoinRequest { name: String::new() }.validate().is_err());
        assert!(JoinRequest { name: " alice".into() }.validate().is_err());
        assert!(JoinRequest { name: "a".repeat(40) }.validate().is_err());
    }

    #[test]
    fn guess_request_bounds_rating() {
        let request = |guess| GuessRequest {
            name: "bob".into(),
            guess,
            choice: None,
        };
        assert!(request(0.0).validate().is_ok());
        assert!(request(10.0).validate().is_ok());
        assert!(request(10.5).validate().is_err());
        assert!(request(-0.1).validate().is_err());
    }

    #[test]
    fn guess_request_requires_a_guess() {
        assert!(serde_json::from_str::<GuessRequest>(r#"{"name": "bob"}"#).is_err());

        let request: GuessRequest =
            serde_json::from_str(r#"{"name": "bob", "guess": 6.5}"#).unwrap();
        assert_eq!(request.guess, 6.5);
        assert_eq!(request.choice, None);
    }

    #[test]
    fn ignored_advance_reports_reason() {
        let response = AdvanceResponse::new(
            &AdvanceOutcome::Ignored(AdvanceIgnored::RoundOpen),
            VisibleGamePhase::RoundOpen,
            None,
        );
        assert!(!response.advanced);
        assert_eq!(response.ignored.as_deref(), Some("current round is still open"));
    }
}
