//! Pure scoring rules. Nothing here mutates the roster: the session applies the
//! returned [`RoundResult`] while it holds the game lock.

use indexmap::IndexMap;
use serde::Serialize;

use crate::state::game::{Choice, Player, Round};

/// Flat bonus for an exact rating match.
pub const EXACT_BONUS: u32 = 5;
/// Maximum distance (exclusive) a solo guess may be off and still score.
pub const SOLO_TOLERANCE: f64 = 1.1;

/// Ratings carry one decimal; distances are compared in whole tenths.
fn tenths(value: f64) -> i64 {
    (value * 10.0).round() as i64
}

/// Where the real rating landed relative to the active player's guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    /// Rating strictly above the active guess.
    Higher,
    /// Rating strictly below the active guess.
    Lower,
    /// Rating equal to the active guess.
    Exact,
}

impl RoundOutcome {
    /// Whether a submitted choice matches this outcome.
    pub fn matches(self, choice: Choice) -> bool {
        matches!(
            (self, choice),
            (RoundOutcome::Higher, Choice::Higher)
                | (RoundOutcome::Lower, Choice::Lower)
                | (RoundOutcome::Exact, Choice::Exact)
        )
    }
}

/// Scoring rules applied to a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Single player guessing the rating directly.
    Solo,
    /// Opponents classify the real rating against the active player's guess.
    Classic,
    /// Every player guesses directly; the closest guess wins.
    Final,
}

impl ScoringMode {
    /// Pick the rules for `round` given whether the session is single-player.
    pub fn for_round(round: &Round, solo: bool) -> Self {
        if solo {
            ScoringMode::Solo
        } else if round.final_round {
            ScoringMode::Final
        } else {
            ScoringMode::Classic
        }
    }
}

/// Points earned by one player in one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Award {
    /// Player receiving the points.
    pub player: String,
    /// Regular points.
    pub points: u32,
    /// Exact-match bonus, either `0` or [`EXACT_BONUS`].
    pub bonus: u32,
}

impl Award {
    fn empty(player: &str) -> Self {
        Self {
            player: player.to_string(),
            points: 0,
            bonus: 0,
        }
    }

    /// Points plus bonus.
    pub fn total(&self) -> u32 {
        self.points.saturating_add(self.bonus)
    }
}

/// Breakdown of a scored round, one award per player in roster order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundResult {
    /// Catalog index of the scored round.
    pub round_index: usize,
    /// Rules used to score the round.
    pub mode: ScoringMode,
    /// Classic rounds only: where the rating landed against the active guess.
    pub outcome: Option<RoundOutcome>,
    /// Real rating revealed by scoring.
    pub rating: f64,
    /// Per-player awards.
    pub awards: Vec<Award>,
    /// Player who collected the exact-match bonus, if any.
    pub bonus_winner: Option<String>,
    /// Player who held the active role while the round was scored.
    pub active_player: Option<String>,
}

impl RoundResult {
    /// Sum of every award, bonus included.
    pub fn total_points(&self) -> u32 {
        self.awards
            .iter()
            .map(Award::total)
            .fold(0, u32::saturating_add)
    }

    /// Award for `player`, if present.
    pub fn award_for(&self, player: &str) -> Option<&Award> {
        self.awards.iter().find(|award| award.player == player)
    }
}

/// Classify `rating` against `target`. Distances within `tolerance` count as exact.
pub fn classify(rating: f64, target: f64, tolerance: f64) -> RoundOutcome {
    if (rating - target).abs() <= tolerance {
        RoundOutcome::Exact
    } else if rating > target {
        RoundOutcome::Higher
    } else {
        RoundOutcome::Lower
    }
}

/// Compute awards for `round` from the answers recorded in `players`.
pub fn score_round(
    round: &Round,
    players: &IndexMap<String, Player>,
    mode: ScoringMode,
    exact_tolerance: f64,
) -> RoundResult {
    match mode {
        ScoringMode::Solo => score_solo(round, players),
        ScoringMode::Classic => score_classic(round, players, exact_tolerance),
        ScoringMode::Final => score_final(round, players, exact_tolerance),
    }
}

fn score_classic(
    round: &Round,
    players: &IndexMap<String, Player>,
    exact_tolerance: f64,
) -> RoundResult {
    let active_index = players
        .values()
        .position(|player| player.active)
        .unwrap_or(round.active_player_index);
    let target = players
        .get_index(active_index)
        .map(|(_, player)| player.guess)
        .unwrap_or_default();
    let outcome = classify(round.rating, target, exact_tolerance);

    let mut awards: Vec<Award> = players.keys().map(|name| Award::empty(name)).collect();
    let mut pooled: u32 = 0;
    let mut bonus_winner = None;

    for (index, player) in players.values().enumerate() {
        if index == active_index {
            continue;
        }
        if outcome.matches(player.choice) {
            awards[index].points = awards[index].points.saturating_add(round.point_value);
            if outcome == RoundOutcome::Exact && bonus_winner.is_none() {
                awards[index].bonus = EXACT_BONUS;
                bonus_winner = Some(player.name.clone());
            }
        } else {
            pooled = pooled.saturating_add(round.point_value);
        }
    }

    let active_player = awards.get_mut(active_index).map(|award| {
        award.points = award.points.saturating_add(pooled);
        if outcome == RoundOutcome::Exact && bonus_winner.is_none() {
            award.bonus = EXACT_BONUS;
            bonus_winner = Some(award.player.clone());
        }
        award.player.clone()
    });

    RoundResult {
        round_index: round.index,
        mode: ScoringMode::Classic,
        outcome: Some(outcome),
        rating: round.rating,
        awards,
        bonus_winner,
        active_player,
    }
}

fn score_solo(round: &Round, players: &IndexMap<String, Player>) -> RoundResult {
    let mut awards: Vec<Award> = players.keys().map(|name| Award::empty(name)).collect();
    let mut bonus_winner = None;

    if let (Some(award), Some(player)) = (awards.first_mut(), players.values().next()) {
        let difference = tenths((round.rating - player.guess).abs());
        if difference < tenths(SOLO_TOLERANCE) {
            award.points = round.point_value;
            if difference == 0 {
                award.bonus = EXACT_BONUS;
                bonus_winner = Some(player.name.clone());
            }
        }
    }

    RoundResult {
        round_index: round.index,
        mode: ScoringMode::Solo,
        outcome: None,
        rating: round.rating,
        awards,
        bonus_winner,
        active_player: None,
    }
}

fn score_final(
    round: &Round,
    players: &IndexMap<String, Player>,
    exact_tolerance: f64,
) -> RoundResult {
    let mut awards: Vec<Award> = players.keys().map(|name| Award::empty(name)).collect();
    let mut bonus_winner = None;

    // Closest guess wins; on a tie a guess under the rating beats one over it.
    let winner = players
        .values()
        .enumerate()
        .map(|(index, player)| {
            let difference = (player.guess - round.rating).abs();
            let over = player.guess > round.rating;
            (index, difference, over)
        })
        .min_by(|a, b| {
            a.1.total_cmp(&b.1)
                .then_with(|| a.2.cmp(&b.2))
                .then_with(|| a.0.cmp(&b.0))
        });

    if let Some((index, difference, _)) = winner {
        let award = &mut awards[index];
        award.points = round.point_value;
        if difference <= exact_tolerance {
            award.bonus = EXACT_BONUS;
            bonus_winner = Some(award.player.clone());
        }
    }

    RoundResult {
        round_index: round.index,
        mode: ScoringMode::Final,
        outcome: None,
        rating: round.rating,
        awards,
        bonus_winner,
        active_player: None,
    }
}
