use serde::Serialize;
use utoipa::ToSchema;

use crate::state::{
    game::{Choice, Player, Round},
    scoring::{Award, RoundOutcome, RoundResult, ScoringMode},
};

/// Which submitted answers a player projection may show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerVisibility {
    /// Nothing submitted this round is shown.
    Hidden,
    /// Only the active player's guess, which opponents answer against.
    ActiveGuess,
    /// The round was scored; every guess and choice is shown.
    Revealed,
}

/// Public projection of a player.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct PlayerSummary {
    pub name: String,
    pub score: u32,
    pub active: bool,
    pub answered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guess: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub choice: Option<Choice>,
}

impl PlayerSummary {
    /// Project `player`, showing only the answers `visibility` allows.
    pub fn project(player: &Player, visibility: AnswerVisibility) -> Self {
        let revealed = visibility == AnswerVisibility::Revealed;
        let show_guess = player.answered
            && (revealed || (player.active && visibility == AnswerVisibility::ActiveGuess));
        let show_choice = player.answered && revealed && player.choice != Choice::Unset;
        Self {
            name: player.name.clone(),
            score: player.score,
            active: player.active,
            answered: player.answered,
            guess: show_guess.then_some(player.guess),
            choice: show_choice.then_some(player.choice),
        }
    }
}

/// Public projection of a round. The rating is only present once revealed.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct RoundSummary {
    pub index: usize,
    pub round_number: u32,
    pub title: String,
    pub year: i32,
    pub cast: Vec<String>,
    pub description: String,
    pub point_value: u32,
    pub final_round: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_count: Option<u64>,
}

impl RoundSummary {
    /// Project `round`, including the rating only when `revealed` is set.
    pub fn project(round: &Round, revealed: bool) -> Self {
        Self {
            index: round.index,
            round_number: round.round_number,
            title: round.title.clone(),
            year: round.year,
            cast: round.cast.clone(),
            description: round.description.clone(),
            point_value: round.point_value,
            final_round: round.final_round,
            rating: revealed.then_some(round.rating),
            user_count: revealed.then_some(round.user_count),
        }
    }
}

/// Points a player earned in a scored round.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct AwardSummary {
    pub player: String,
    pub points: u32,
    pub bonus: u32,
}

impl From<&Award> for AwardSummary {
    fn from(award: &Award) -> Self {
        Self {
            player: award.player.clone(),
            points: award.points,
            bonus: award.bonus,
        }
    }
}

/// Breakdown of a scored round.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct RoundResultSummary {
    pub round_index: usize,
    #[schema(value_type = String)]
    pub mode: ScoringMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub outcome: Option<RoundOutcome>,
    pub rating: f64,
    pub awards: Vec<AwardSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus_winner: Option<String>,
}

impl From<&RoundResult> for RoundResultSummary {
    fn from(result: &RoundResult) -> Self {
        Self {
            round_index: result.round_index,
            mode: result.mode,
            outcome: result.outcome,
            rating: result.rating,
            awards: result.awards.iter().map(AwardSummary::from).collect(),
            bonus_winner: result.bonus_winner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_hidden_until_revealed() {
        let mut opponent = Player::new("bob", false);
        opponent.guess = 6.0;
        opponent.choice = Choice::Lower;
        opponent.answered = true;

        let hidden = PlayerSummary::project(&opponent, AnswerVisibility::ActiveGuess);
        assert_eq!(hidden.guess, None);
        assert_eq!(hidden.choice, None);
        assert!(hidden.answered);

        let shown = PlayerSummary::project(&opponent, AnswerVisibility::Revealed);
        assert_eq!(shown.guess, Some(6.0));
        assert_eq!(shown.choice, Some(Choice::Lower));
    }

    #[test]
    fn active_guess_visible_once_answered() {
        let mut active = Player::new("alice", true);
        assert_eq!(
            PlayerSummary::project(&active, AnswerVisibility::ActiveGuess).guess,
            None
        );

        active.guess = 7.2;
        active.answered = true;
        assert_eq!(
            PlayerSummary::project(&active, AnswerVisibility::ActiveGuess).guess,
            Some(7.2)
        );
        assert_eq!(
            PlayerSummary::project(&active, AnswerVisibility::Hidden).guess,
            None
        );
    }

    #[test]
    fn rating_hidden_until_revealed() {
        let round = Round {
            index: 3,
            round_number: 4,
            title: "Up".into(),
            year: 2009,
            cast: vec![],
            description: String::new(),
            user_count: 1200,
            rating: 8.3,
            point_value: 2,
            active_player_index: 1,
            final_round: false,
        };
        assert_eq!(RoundSummary::project(&round, false).rating, None);
        assert_eq!(RoundSummary::project(&round, true).rating, Some(8.3));
        assert_eq!(RoundSummary::project(&round, true).user_count, Some(1200));
    }
}
