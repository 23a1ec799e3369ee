use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dto::{
        common::{AnswerVisibility, PlayerSummary, RoundResultSummary, RoundSummary},
        format_system_time,
        phase::{PhaseSnapshot, VisibleGamePhase},
    },
    state::SessionView,
};

/// Full public view of the running session.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub phase: PhaseSnapshot,
    pub players: Vec<PlayerSummary>,
    pub expected_players: usize,
    pub round_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_round: Option<RoundSummary>,
    /// Answers collected for the current round.
    pub answered: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_result: Option<RoundResultSummary>,
    /// Every scored round, oldest first.
    pub history: Vec<RoundResultSummary>,
}

impl From<&SessionView> for SessionResponse {
    fn from(view: &SessionView) -> Self {
        let phase = PhaseSnapshot::from(&view.phase);
        Self {
            id: view.id.to_string(),
            name: view.name.clone(),
            created_at: format_system_time(view.created_at),
            phase,
            players: players_of(view),
            expected_players: view.expected_player_count,
            round_count: view.round_count,
            current_round: round_of(view),
            answered: view.pending_answers,
            last_result: view.last_result.as_ref().map(RoundResultSummary::from),
            history: view.history.iter().map(RoundResultSummary::from).collect(),
        }
    }
}

/// Response payload listing the players in join order.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayersResponse {
    pub players: Vec<PlayerSummary>,
}

impl From<&SessionView> for PlayersResponse {
    fn from(view: &SessionView) -> Self {
        Self {
            players: players_of(view),
        }
    }
}

/// Response describing the round currently in play.
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentRoundResponse {
    pub round: RoundSummary,
    pub round_open: bool,
    pub answered: usize,
    pub expected: usize,
    /// Name of the player holding the active role. Absent in single-player
    /// games and in the final round, where everyone guesses the rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_player: Option<String>,
}

impl CurrentRoundResponse {
    /// Build the response, or `None` when no round has been opened yet.
    pub fn from_view(view: &SessionView) -> Option<Self> {
        let round = round_of(view)?;
        let active_player = if round.final_round {
            None
        } else {
            view.players
                .iter()
                .find(|player| player.active)
                .map(|player| player.name.clone())
        };
        Some(Self {
            round,
            round_open: view.round_open,
            answered: view.pending_answers,
            expected: view.players.len(),
            active_player,
        })
    }
}

/// Response exposing the game's global phase as seen by the public.
#[derive(Debug, Serialize, ToSchema)]
pub struct GamePhaseResponse {
    pub phase: VisibleGamePhase,
    pub version: usize,
    pub started: bool,
}

impl From<&SessionView> for GamePhaseResponse {
    fn from(view: &SessionView) -> Self {
        Self {
            phase: VisibleGamePhase::from(&view.phase.phase),
            version: view.phase.version,
            started: view.started,
        }
    }
}

/// Answers the public may see in the current phase and round.
pub fn answer_visibility(view: &SessionView) -> AnswerVisibility {
    let final_round = view
        .current_round
        .as_ref()
        .is_some_and(|round| round.final_round);
    if VisibleGamePhase::from(&view.phase.phase).reveals_answers() {
        AnswerVisibility::Revealed
    } else if final_round {
        AnswerVisibility::Hidden
    } else {
        AnswerVisibility::ActiveGuess
    }
}

/// Players projected with the answer visibility of the current phase.
pub fn players_of(view: &SessionView) -> Vec<PlayerSummary> {
    let visibility = answer_visibility(view);
    view.players
        .iter()
        .map(|player| PlayerSummary::project(player, visibility))
        .collect()
}

/// Current round projected with the rating visibility of the current phase.
pub fn round_of(view: &SessionView) -> Option<RoundSummary> {
    let revealed = VisibleGamePhase::from(&view.phase.phase).reveals_answers();
    view.current_round
        .as_ref()
        .map(|round| RoundSummary::project(round, revealed))
}
