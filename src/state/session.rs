//! The round engine: roster management, guess collection, scoring and round
//! progression for one running game.
//!
//! Every method is synchronous and performs no I/O. Callers serialize access
//! through the lock held by [`crate::state::AppState`], so a single call (for
//! example the last submit that also scores the round and rotates the active
//! role) always runs to completion without interleaving.

use std::time::SystemTime;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::{
    game::{Catalog, Choice, Player, Round},
    scoring::{RoundResult, ScoringMode, score_round},
    state_machine::{RoundEvent, RoundPhase, RoundStateMachine, Snapshot},
};

/// Knobs that change how a session scores rounds.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    /// Number of players that must join before the first round opens.
    pub expected_player_count: usize,
    /// Park fully answered rounds until a moderator confirms scoring.
    pub require_score_confirmation: bool,
    /// Distance under which the active guess counts as an exact match.
    pub exact_tolerance: f64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            expected_player_count: 1,
            require_score_confirmation: false,
            exact_tolerance: 0.0,
        }
    }
}

/// Errors surfaced to callers of the round engine. None of them change state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// The name is already taken.
    #[error("player `{0}` already joined")]
    DuplicatePlayer(String),
    /// The roster already holds the expected number of players.
    #[error("roster is full ({expected} players)")]
    RosterFull {
        /// Expected roster size.
        expected: usize,
    },
    /// No player with that name joined.
    #[error("unknown player `{0}`")]
    UnknownPlayer(String),
    /// The player already answered the current round.
    #[error("player `{0}` already answered this round")]
    AlreadyAnswered(String),
    /// Guesses are only accepted while a round is open.
    #[error("no round is accepting guesses (phase {0:?})")]
    RoundClosed(RoundPhase),
    /// The guess is not a finite number.
    #[error("guess must be a finite number")]
    InvalidGuess,
    /// Scoring confirmation requested while nothing is awaiting it.
    #[error("no round is awaiting score confirmation (phase {0:?})")]
    NothingToConfirm(RoundPhase),
}

impl GameError {
    /// Whether this is a duplicate or late join.
    pub fn is_join_rejection(&self) -> bool {
        matches!(
            self,
            GameError::DuplicatePlayer(_) | GameError::RosterFull { .. }
        )
    }
}

/// Result of a successful join.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    /// Copy of the freshly joined player.
    pub player: Player,
    /// Players joined so far.
    pub joined: usize,
    /// Index of the round opened by this join, when it filled the roster.
    pub opened_round: Option<usize>,
}

/// Result of an accepted guess.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Guess recorded; other players still have to answer.
    Recorded {
        /// Answers collected so far.
        pending: usize,
        /// Roster size.
        expected: usize,
    },
    /// Last answer collected; scoring waits for a moderator.
    AwaitingConfirmation,
    /// Last answer collected and the round was scored.
    Scored(RoundResult),
}

/// Result of an advance request.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// The round at this index is now open.
    Advanced(usize),
    /// The last round was already played; the game is over.
    GameComplete,
    /// Nothing happened.
    Ignored(AdvanceIgnored),
}

/// Why an advance request was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceIgnored {
    /// The roster is not full yet.
    NotStarted,
    /// The current round still accepts guesses.
    RoundOpen,
    /// The current round waits for a scoring confirmation.
    AwaitingConfirmation,
    /// The game already ended.
    GameComplete,
}

/// Read-only copy of a session handed out for rendering.
#[derive(Debug, Clone)]
pub struct SessionView {
    /// Session identifier.
    pub id: Uuid,
    /// Display name of the game.
    pub name: String,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Players in join order.
    pub players: Vec<Player>,
    /// Roster size required to start.
    pub expected_player_count: usize,
    /// Number of rounds in the catalog.
    pub round_count: usize,
    /// Index of the current round, `None` before the first one opens.
    pub current_round_index: Option<usize>,
    /// Copy of the current round.
    pub current_round: Option<Round>,
    /// Answers collected for the current round.
    pub pending_answers: usize,
    /// Whether the current round accepts guesses.
    pub round_open: bool,
    /// Whether the roster filled and the game began.
    pub started: bool,
    /// State machine snapshot.
    pub phase: Snapshot,
    /// Breakdown of the most recently scored round.
    pub last_result: Option<RoundResult>,
    /// Breakdowns of every scored round, oldest first.
    pub history: Vec<RoundResult>,
}

/// One running game: roster, catalog and round progression.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: Uuid,
    created_at: SystemTime,
    settings: GameSettings,
    catalog: Catalog,
    players: IndexMap<String, Player>,
    current_round_index: Option<usize>,
    current_round: Option<Round>,
    pending_answers: usize,
    round_open: bool,
    machine: RoundStateMachine,
    history: Vec<RoundResult>,
}

impl GameSession {
    /// Build a session waiting for `settings.expected_player_count` players.
    pub fn new(catalog: Catalog, settings: GameSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: SystemTime::now(),
            settings,
            catalog,
            players: IndexMap::new(),
            current_round_index: None,
            current_round: None,
            pending_answers: 0,
            round_open: false,
            machine: RoundStateMachine::new(),
            history: Vec::new(),
        }
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Settings the session was created with.
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Whether the session runs in single-player mode.
    pub fn is_solo(&self) -> bool {
        self.settings.expected_player_count == 1
    }

    /// Current phase of the round state machine.
    pub fn phase(&self) -> RoundPhase {
        self.machine.phase()
    }

    /// Whether the roster filled and the first round opened.
    pub fn started(&self) -> bool {
        self.phase() != RoundPhase::NotStarted
    }

    /// Players in join order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Player currently holding the active role, if any.
    pub fn active_player(&self) -> Option<&Player> {
        self.players.values().find(|player| player.active)
    }

    /// Copy of the current round.
    pub fn current_round(&self) -> Option<&Round> {
        self.current_round.as_ref()
    }

    /// Answers collected for the current round.
    pub fn pending_answers(&self) -> usize {
        self.pending_answers
    }

    /// Look a player up by name.
    pub fn find_player(&self, name: &str) -> Result<&Player, GameError> {
        self.players
            .get(name)
            .ok_or_else(|| GameError::UnknownPlayer(name.to_string()))
    }

    /// Add a player to the roster. Filling the roster opens the first round.
    pub fn join(&mut self, name: &str) -> Result<JoinOutcome, GameError> {
        if self.players.contains_key(name) {
            return Err(GameError::DuplicatePlayer(name.to_string()));
        }
        let expected = self.settings.expected_player_count;
        if self.players.len() >= expected {
            return Err(GameError::RosterFull { expected });
        }

        let active = !self.is_solo() && self.players.is_empty();
        let player = Player::new(name, active);
        self.players.insert(name.to_string(), player.clone());
        let joined = self.players.len();
        info!(player = %name, joined, expected, "player joined");

        let opened_round = if joined == expected {
            info!("all players joined, starting game");
            self.start()
        } else {
            None
        };

        Ok(JoinOutcome {
            player,
            joined,
            opened_round,
        })
    }

    /// Record a player's answer for the current round. The answer that
    /// completes the round scores it (or parks it for confirmation) before
    /// returning.
    pub fn submit_guess(
        &mut self,
        name: &str,
        guess: f64,
        choice: Choice,
    ) -> Result<SubmitOutcome, GameError> {
        let phase = self.phase();
        let player = self
            .players
            .get_mut(name)
            .ok_or_else(|| GameError::UnknownPlayer(name.to_string()))?;
        if player.answered {
            debug!(player = %name, "duplicate submit ignored");
            return Err(GameError::AlreadyAnswered(name.to_string()));
        }
        if phase != RoundPhase::RoundOpen {
            return Err(GameError::RoundClosed(phase));
        }
        if !guess.is_finite() {
            return Err(GameError::InvalidGuess);
        }

        player.guess = guess;
        player.choice = choice;
        player.answered = true;
        self.pending_answers += 1;
        info!(player = %name, guess, %choice, "answer submitted");

        let expected = self.players.len();
        if self.pending_answers < expected {
            return Ok(SubmitOutcome::Recorded {
                pending: self.pending_answers,
                expected,
            });
        }

        self.round_open = false;
        if self.settings.require_score_confirmation {
            self.transition(RoundEvent::AnswersLocked);
            info!("all answers submitted, waiting for score confirmation");
            return Ok(SubmitOutcome::AwaitingConfirmation);
        }

        info!("all answers submitted, scoring round");
        Ok(self
            .score_current_round()
            .map_or(SubmitOutcome::AwaitingConfirmation, SubmitOutcome::Scored))
    }

    /// Score a round parked in [`RoundPhase::AwaitingScoreConfirmation`].
    pub fn confirm_scoring(&mut self) -> Result<RoundResult, GameError> {
        let phase = self.phase();
        if phase != RoundPhase::AwaitingScoreConfirmation {
            return Err(GameError::NothingToConfirm(phase));
        }
        info!("score confirmation received");
        self.score_current_round()
            .ok_or(GameError::NothingToConfirm(phase))
    }

    /// Open the next round. Requests that arrive while a round is still in
    /// play, before the game started or after it ended are dropped.
    pub fn advance_round(&mut self) -> AdvanceOutcome {
        let ignored = match self.phase() {
            RoundPhase::RoundScored => None,
            RoundPhase::NotStarted => Some(AdvanceIgnored::NotStarted),
            RoundPhase::RoundOpen => Some(AdvanceIgnored::RoundOpen),
            RoundPhase::AwaitingScoreConfirmation => Some(AdvanceIgnored::AwaitingConfirmation),
            RoundPhase::GameComplete => Some(AdvanceIgnored::GameComplete),
        };
        if let Some(reason) = ignored {
            info!(?reason, "advance request ignored");
            return AdvanceOutcome::Ignored(reason);
        }

        let next = self.current_round_index.map_or(0, |index| index + 1);
        if next >= self.catalog.len() {
            self.transition(RoundEvent::CatalogExhausted);
            info!("end of game");
            return AdvanceOutcome::GameComplete;
        }

        self.transition(RoundEvent::NextRound);
        self.open_round(next);
        AdvanceOutcome::Advanced(next)
    }

    /// Copy the whole session for rendering.
    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            name: self.catalog.name().to_string(),
            created_at: self.created_at,
            players: self.players.values().cloned().collect(),
            expected_player_count: self.settings.expected_player_count,
            round_count: self.catalog.len(),
            current_round_index: self.current_round_index,
            current_round: self.current_round.clone(),
            pending_answers: self.pending_answers,
            round_open: self.round_open,
            started: self.started(),
            phase: self.machine.snapshot(),
            last_result: self.history.last().cloned(),
            history: self.history.clone(),
        }
    }

    fn start(&mut self) -> Option<usize> {
        if self.catalog.is_empty() {
            warn!("catalog is empty; game cannot start");
            return None;
        }
        self.transition(RoundEvent::RosterFilled);
        self.open_round(0);
        if !self.is_solo() {
            if let Some(round) = self.catalog.get(0) {
                self.set_active_player(round.active_player_index);
            }
        }
        Some(0)
    }

    fn open_round(&mut self, index: usize) {
        self.current_round_index = Some(index);
        self.current_round = self.catalog.get(index).cloned();
        for player in self.players.values_mut() {
            player.reset_round_input();
        }
        self.pending_answers = 0;
        self.round_open = true;

        if let Some(round) = &self.current_round {
            info!(
                round = index,
                title = %round.title,
                year = round.year,
                points = round.point_value,
                final_round = round.final_round,
                "advanced to next round"
            );
        }
    }

    fn score_current_round(&mut self) -> Option<RoundResult> {
        let round = self.current_round.as_ref()?;
        let mode = ScoringMode::for_round(round, self.is_solo());
        let result = score_round(round, &self.players, mode, self.settings.exact_tolerance);

        for award in &result.awards {
            if let Some(player) = self.players.get_mut(&award.player) {
                player.score = player.score.saturating_add(award.total());
                if award.points > 0 {
                    info!(player = %award.player, points = award.points, "player scored");
                }
            }
        }
        match (&result.bonus_winner, &result.active_player) {
            (Some(winner), Some(active)) if winner != active => {
                info!(player = %winner, stolen_from = %active, "exact bonus stolen")
            }
            (Some(winner), _) => info!(player = %winner, "exact bonus awarded"),
            _ => {}
        }

        self.transition(RoundEvent::Scored);
        self.rotate_active_player();
        self.history.push(result.clone());
        Some(result)
    }

    /// Hand the active role to the player configured for the upcoming round.
    fn rotate_active_player(&mut self) {
        if self.is_solo() {
            return;
        }
        let upcoming = self.current_round_index.map_or(0, |index| index + 1);
        let Some(round) = self.catalog.get(upcoming) else {
            debug!("no upcoming round; active player unchanged");
            return;
        };
        self.set_active_player(round.active_player_index);
    }

    fn set_active_player(&mut self, index: usize) {
        if index >= self.players.len() {
            warn!(
                index,
                roster = self.players.len(),
                "configured active player outside roster; keeping current"
            );
            return;
        }
        for (position, player) in self.players.values_mut().enumerate() {
            player.active = position == index;
        }
        if let Some((name, _)) = self.players.get_index(index) {
            debug!(player = %name, "active player set");
        }
    }

    fn transition(&mut self, event: RoundEvent) {
        if let Err(err) = self.machine.apply(event) {
            warn!(error = %err, "round state machine rejected transition");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::scoring::{EXACT_BONUS, RoundOutcome};

    fn round(rating: f64, point_value: u32, active_player_index: usize) -> Round {
        Round {
            index: 0,
            round_number: 1,
            title: "The Thing".into(),
            year: 1982,
            cast: vec!["Kurt Russell".into()],
            description: "Antarctic paranoia.".into(),
            user_count: 500,
            rating,
            point_value,
            active_player_index,
            final_round: false,
        }
    }

    fn session(rounds: Vec<Round>, players: usize) -> GameSession {
        GameSession::new(
            Catalog::new("test night", rounds),
            GameSettings {
                expected_player_count: players,
                ..GameSettings::default()
            },
        )
    }

    fn three_player_session() -> GameSession {
        let mut game = session(
            vec![round(7.5, 10, 0), round(6.0, 10, 1), round(8.0, 10, 2)],
            3,
        );
        for name in ["alice", "bob", "carol"] {
            game.join(name).unwrap();
        }
        game
    }

    fn score(game: &GameSession, name: &str) -> u32 {
        game.find_player(name).unwrap().score
    }

    #[test]
    fn first_joiner_is_active_in_multiplayer() {
        let mut game = session(vec![round(7.0, 1, 0)], 3);
        let outcome = game.join("alice").unwrap();
        assert!(outcome.player.active);
        assert!(!game.join("bob").unwrap().player.active);
        assert_eq!(game.phase(), RoundPhase::NotStarted);
    }

    #[test]
    fn solo_player_is_never_active() {
        let mut game = session(vec![round(7.0, 1, 0)], 1);
        let outcome = game.join("solo").unwrap();
        assert!(!outcome.player.active);
        assert_eq!(outcome.opened_round, Some(0));
        assert!(game.active_player().is_none());
    }

    #[test]
    fn duplicate_and_late_joins_are_rejected() {
        let mut game = session(vec![round(7.0, 1, 0)], 2);
        game.join("alice").unwrap();
        assert_eq!(
            game.join("alice").unwrap_err(),
            GameError::DuplicatePlayer("alice".into())
        );
        game.join("bob").unwrap();
        let err = game.join("carol").unwrap_err();
        assert_eq!(err, GameError::RosterFull { expected: 2 });
        assert!(err.is_join_rejection());
        assert_eq!(game.players().count(), 2);
    }

    #[test]
    fn filling_roster_opens_first_round() {
        let game = three_player_session();
        let view = game.view();
        assert!(view.started);
        assert!(view.round_open);
        assert_eq!(view.current_round_index, Some(0));
        assert_eq!(view.phase.phase, RoundPhase::RoundOpen);
        assert_eq!(game.active_player().unwrap().name, "alice");
    }

    #[test]
    fn unknown_player_cannot_submit() {
        let mut game = three_player_session();
        assert_eq!(
            game.submit_guess("mallory", 5.0, Choice::Higher),
            Err(GameError::UnknownPlayer("mallory".into()))
        );
        assert_eq!(game.pending_answers(), 0);
    }

    #[test]
    fn guesses_rejected_before_start() {
        let mut game = session(vec![round(7.0, 1, 0)], 2);
        game.join("alice").unwrap();
        assert_eq!(
            game.submit_guess("alice", 5.0, Choice::Unset),
            Err(GameError::RoundClosed(RoundPhase::NotStarted))
        );
    }

    #[test]
    fn non_finite_guess_is_rejected() {
        let mut game = three_player_session();
        assert_eq!(
            game.submit_guess("alice", f64::NAN, Choice::Unset),
            Err(GameError::InvalidGuess)
        );
        assert!(!game.find_player("alice").unwrap().answered);
    }

    #[test]
    fn duplicate_submit_has_no_effect() {
        let mut game = three_player_session();
        game.submit_guess("bob", 0.0, Choice::Higher).unwrap();
        assert_eq!(
            game.submit_guess("bob", 0.0, Choice::Lower),
            Err(GameError::AlreadyAnswered("bob".into()))
        );
        assert_eq!(game.pending_answers(), 1);
        assert_eq!(game.find_player("bob").unwrap().choice, Choice::Higher);
    }

    #[test]
    fn worked_example_higher_outcome() {
        let mut game = three_player_session();
        game.submit_guess("alice", 7.0, Choice::Unset).unwrap();
        game.submit_guess("bob", 0.0, Choice::Higher).unwrap();
        let outcome = game.submit_guess("carol", 0.0, Choice::Lower).unwrap();

        let SubmitOutcome::Scored(result) = outcome else {
            panic!("expected the last answer to score the round, got {outcome:?}");
        };
        assert_eq!(result.outcome, Some(RoundOutcome::Higher));
        assert_eq!(score(&game, "alice"), 10);
        assert_eq!(score(&game, "bob"), 10);
        assert_eq!(score(&game, "carol"), 0);
        assert_eq!(game.phase(), RoundPhase::RoundScored);
        assert!(!game.view().round_open);
    }

    #[test]
    fn worked_example_exact_steal() {
        let mut game = session(vec![round(7.5, 10, 0), round(6.0, 10, 1)], 4);
        for name in ["alice", "bob", "carol", "dave"] {
            game.join(name).unwrap();
        }
        game.submit_guess("alice", 7.5, Choice::Unset).unwrap();
        game.submit_guess("bob", 0.0, Choice::Exact).unwrap();
        game.submit_guess("carol", 0.0, Choice::Higher).unwrap();
        game.submit_guess("dave", 0.0, Choice::Lower).unwrap();

        assert_eq!(score(&game, "bob"), 10 + EXACT_BONUS);
        assert_eq!(score(&game, "alice"), 20);
        assert_eq!(score(&game, "carol"), 0);
        assert_eq!(score(&game, "dave"), 0);
    }

    #[test]
    fn active_role_follows_next_round_configuration() {
        let mut game = session(
            vec![round(7.5, 1, 0), round(6.0, 1, 2), round(8.0, 1, 1)],
            3,
        );
        for name in ["alice", "bob", "carol"] {
            game.join(name).unwrap();
        }
        for name in ["alice", "bob", "carol"] {
            game.submit_guess(name, 7.0, Choice::Higher).unwrap();
        }
        assert_eq!(game.active_player().unwrap().name, "carol");

        assert_eq!(game.advance_round(), AdvanceOutcome::Advanced(1));
        for name in ["alice", "bob", "carol"] {
            game.submit_guess(name, 7.0, Choice::Lower).unwrap();
        }
        assert_eq!(game.active_player().unwrap().name, "bob");
        let active = game.players().filter(|player| player.active).count();
        assert_eq!(active, 1);
    }

    #[test]
    fn advance_is_ignored_while_round_open() {
        let mut game = three_player_session();
        assert_eq!(
            game.advance_round(),
            AdvanceOutcome::Ignored(AdvanceIgnored::RoundOpen)
        );
        assert_eq!(game.view().current_round_index, Some(0));
    }

    #[test]
    fn advance_is_ignored_before_start() {
        let mut game = session(vec![round(7.0, 1, 0)], 2);
        assert_eq!(
            game.advance_round(),
            AdvanceOutcome::Ignored(AdvanceIgnored::NotStarted)
        );
        assert_eq!(game.view().current_round_index, None);
    }

    #[test]
    fn advance_resets_round_input() {
        let mut game = three_player_session();
        for name in ["alice", "bob", "carol"] {
            game.submit_guess(name, 7.0, Choice::Higher).unwrap();
        }
        game.advance_round();

        assert_eq!(game.pending_answers(), 0);
        assert_eq!(game.current_round().unwrap().index, 1);
        for player in game.players() {
            assert!(!player.answered);
            assert_eq!(player.choice, Choice::Unset);
            assert_eq!(player.guess, 0.0);
        }
        assert!(game.view().round_open);
    }

    #[test]
    fn advance_never_passes_last_round() {
        let mut game = session(vec![round(6.0, 10, 0)], 1);
        game.join("solo").unwrap();
        game.submit_guess("solo", 5.2, Choice::Unset).unwrap();
        assert_eq!(score(&game, "solo"), 10);

        assert_eq!(game.advance_round(), AdvanceOutcome::GameComplete);
        assert_eq!(
            game.advance_round(),
            AdvanceOutcome::Ignored(AdvanceIgnored::GameComplete)
        );
        assert_eq!(game.view().current_round_index, Some(0));
        assert_eq!(game.phase(), RoundPhase::GameComplete);
    }

    #[test]
    fn confirmation_defers_scoring() {
        let mut game = GameSession::new(
            Catalog::new("test night", vec![round(7.5, 10, 0), round(6.0, 10, 1)]),
            GameSettings {
                expected_player_count: 2,
                require_score_confirmation: true,
                exact_tolerance: 0.0,
            },
        );
        game.join("alice").unwrap();
        game.join("bob").unwrap();
        game.submit_guess("alice", 7.0, Choice::Unset).unwrap();
        let outcome = game.submit_guess("bob", 0.0, Choice::Higher).unwrap();

        assert_eq!(outcome, SubmitOutcome::AwaitingConfirmation);
        assert_eq!(score(&game, "bob"), 0);
        assert_eq!(
            game.advance_round(),
            AdvanceOutcome::Ignored(AdvanceIgnored::AwaitingConfirmation)
        );

        let result = game.confirm_scoring().unwrap();
        assert_eq!(result.award_for("bob").unwrap().points, 10);
        assert_eq!(score(&game, "bob"), 10);
        assert_eq!(game.active_player().unwrap().name, "bob");
        assert_eq!(
            game.confirm_scoring(),
            Err(GameError::NothingToConfirm(RoundPhase::RoundScored))
        );
    }

    #[test]
    fn tolerance_widens_exact_outcome() {
        let mut game = GameSession::new(
            Catalog::new("test night", vec![round(7.5, 10, 0)]),
            GameSettings {
                expected_player_count: 2,
                require_score_confirmation: false,
                exact_tolerance: 0.05,
            },
        );
        game.join("alice").unwrap();
        game.join("bob").unwrap();
        game.submit_guess("alice", 7.46, Choice::Unset).unwrap();
        let outcome = game.submit_guess("bob", 0.0, Choice::Exact).unwrap();

        let SubmitOutcome::Scored(result) = outcome else {
            panic!("expected scored round, got {outcome:?}");
        };
        assert_eq!(result.outcome, Some(RoundOutcome::Exact));
        assert_eq!(score(&game, "bob"), 10 + EXACT_BONUS);
    }

    #[test]
    fn history_keeps_every_scored_round() {
        let mut game = three_player_session();
        for name in ["alice", "bob", "carol"] {
            game.submit_guess(name, 7.0, Choice::Higher).unwrap();
        }
        game.advance_round();
        for name in ["alice", "bob", "carol"] {
            game.submit_guess(name, 7.0, Choice::Lower).unwrap();
        }

        let view = game.view();
        let rounds: Vec<_> = view.history.iter().map(|result| result.round_index).collect();
        assert_eq!(rounds, [0, 1]);
        assert_eq!(view.last_result.map(|result| result.round_index), Some(1));
        assert_eq!(view.history[1].active_player.as_deref(), Some("bob"));
    }

    #[test]
    fn oversized_points_do_not_stall_the_round() {
        let mut game = session(vec![round(7.5, 3_000_000_000, 0), round(6.0, 1, 1)], 3);
        for name in ["alice", "bob", "carol"] {
            game.join(name).unwrap();
        }
        game.submit_guess("alice", 7.0, Choice::Unset).unwrap();
        game.submit_guess("bob", 0.0, Choice::Lower).unwrap();
        let outcome = game.submit_guess("carol", 0.0, Choice::Lower).unwrap();

        assert!(matches!(outcome, SubmitOutcome::Scored(_)));
        assert_eq!(score(&game, "alice"), u32::MAX);
        assert_eq!(game.phase(), RoundPhase::RoundScored);
        assert_eq!(game.advance_round(), AdvanceOutcome::Advanced(1));
    }

    #[test]
    fn final_round_uses_closest_guess() {
        let mut last = round(7.0, 20, 0);
        last.final_round = true;
        let mut game = session(vec![last], 2);
        game.join("alice").unwrap();
        game.join("bob").unwrap();
        game.submit_guess("alice", 9.0, Choice::Unset).unwrap();
        game.submit_guess("bob", 6.8, Choice::Unset).unwrap();

        assert_eq!(score(&game, "bob"), 20);
        assert_eq!(score(&game, "alice"), 0);
    }
}
