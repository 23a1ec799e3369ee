use std::{fmt, str::FromStr, sync::Arc};

use serde::Serialize;

/// How a player classifies the real rating against the active player's guess.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    /// The real rating is strictly greater than the active guess.
    Higher,
    /// The real rating is strictly lower than the active guess.
    Lower,
    /// The real rating matches the active guess.
    Exact,
    /// No choice submitted this round.
    #[default]
    Unset,
}

/// Returned when a choice string does not name a known classification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown choice `{0}` (expected higher, lower or exact)")]
pub struct UnknownChoice(pub String);

impl FromStr for Choice {
    type Err = UnknownChoice;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "higher" => Ok(Choice::Higher),
            "lower" => Ok(Choice::Lower),
            "exact" => Ok(Choice::Exact),
            "" => Ok(Choice::Unset),
            _ => Err(UnknownChoice(value.to_string())),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Choice::Higher => "higher",
            Choice::Lower => "lower",
            Choice::Exact => "exact",
            Choice::Unset => "unset",
        };
        f.write_str(label)
    }
}

/// Player info tracked during a game session.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Name chosen at join time; doubles as the player identifier.
    pub name: String,
    /// Accumulated score, never decreases.
    pub score: u32,
    /// Rating guessed for the current round.
    pub guess: f64,
    /// Classification submitted for the current round.
    pub choice: Choice,
    /// Whether the player already answered the current round.
    pub answered: bool,
    /// Whether the player holds the active role (multiplayer only).
    pub active: bool,
}

impl Player {
    /// Build a fresh player with an empty score.
    pub fn new(name: impl Into<String>, active: bool) -> Self {
        Self {
            name: name.into(),
            score: 0,
            guess: 0.0,
            choice: Choice::Unset,
            answered: false,
            active,
        }
    }

    /// Clear the per-round input before a new round opens.
    pub fn reset_round_input(&mut self) {
        self.guess = 0.0;
        self.choice = Choice::Unset;
        self.answered = false;
    }
}

/// A movie question merged with its round configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    /// Position of the round in the catalog.
    pub index: usize,
    /// Label shown to players (from the round configuration).
    pub round_number: u32,
    /// Movie title.
    pub title: String,
    /// Release year.
    pub year: i32,
    /// Main cast members.
    pub cast: Vec<String>,
    /// Short synopsis.
    pub description: String,
    /// Number of users who voted on the rating.
    pub user_count: u64,
    /// Rating players are guessing around.
    pub rating: f64,
    /// Points at stake this round.
    pub point_value: u32,
    /// Roster index of the player holding the active role this round.
    pub active_player_index: usize,
    /// Whether the round is scored as the final round.
    pub final_round: bool,
}

/// Immutable, ordered list of rounds produced once at load time.
#[derive(Debug, Clone)]
pub struct Catalog {
    name: String,
    rounds: Arc<[Round]>,
}

impl Catalog {
    /// Wrap already validated rounds. Indices are rewritten to match positions.
    pub fn new(name: impl Into<String>, rounds: Vec<Round>) -> Self {
        let rounds = rounds
            .into_iter()
            .enumerate()
            .map(|(index, round)| Round { index, ..round })
            .collect::<Vec<_>>();
        Self {
            name: name.into(),
            rounds: rounds.into(),
        }
    }

    /// Display name of the game.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rounds in the catalog.
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    /// Whether the catalog has no rounds at all.
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Round at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Round> {
        self.rounds.get(index)
    }

    /// All rounds in play order.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }
}
