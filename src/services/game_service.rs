//! Gameplay operations: each one runs a single critical section against the
//! session and broadcasts the resulting events once the lock is released.

use tracing::{info, warn};

use crate::{
    dto::{
        common::RoundResultSummary,
        game::{
            AdvanceResponse, ConfirmScoringResponse, GuessRequest, GuessResponse, JoinRequest,
            JoinResponse,
        },
        phase::VisibleGamePhase,
        public::{players_of, round_of},
    },
    error::ServiceError,
    services::sse_events,
    state::{AdvanceOutcome, SharedState, SubmitOutcome, game::Choice},
};

/// Register a player. Filling the roster opens the first round.
pub async fn join_player(
    state: &SharedState,
    request: JoinRequest,
) -> Result<JoinResponse, ServiceError> {
    let JoinRequest { name } = request;
    let (outcome, view) = state
        .write_session(|game| game.join(&name).map(|outcome| (outcome, game.view())))
        .await
        .inspect_err(|err| {
            if err.is_join_rejection() {
                warn!(player = %name, error = %err, "join rejected");
            }
        })?;

    let expected = view.expected_player_count;
    sse_events::broadcast_player_joined(state, &outcome, expected);
    if outcome.opened_round.is_some() {
        sse_events::broadcast_phase_changed(state, &view);
    }

    Ok(JoinResponse::from_outcome(&outcome, expected))
}

/// Record a player's answer for the current round.
pub async fn submit_guess(
    state: &SharedState,
    request: GuessRequest,
) -> Result<GuessResponse, ServiceError> {
    let GuessRequest {
        name,
        guess,
        choice,
    } = request;
    let choice: Choice = choice.as_deref().unwrap_or_default().parse()?;

    let (outcome, view) = state
        .write_session(|game| {
            game.submit_guess(&name, guess, choice)
                .map(|outcome| (outcome, game.view()))
        })
        .await?;

    sse_events::broadcast_answer_received(state, &name, &view);
    match &outcome {
        SubmitOutcome::Recorded { .. } => {}
        SubmitOutcome::AwaitingConfirmation => sse_events::broadcast_phase_changed(state, &view),
        SubmitOutcome::Scored(result) => {
            sse_events::broadcast_round_scored(state, result, &view);
            sse_events::broadcast_phase_changed(state, &view);
        }
    }

    Ok(GuessResponse::from_outcome(&outcome, view.players.len()))
}

/// Move to the next round once the current one has been scored.
///
/// Requests arriving at any other time are acknowledged but change nothing.
pub async fn advance_round(state: &SharedState) -> AdvanceResponse {
    let (outcome, view) = state
        .write_session(|game| (game.advance_round(), game.view()))
        .await;

    let phase = VisibleGamePhase::from(&view.phase.phase);
    match outcome {
        AdvanceOutcome::Advanced(index) => {
            info!(round = index, "round opened");
            sse_events::broadcast_phase_changed(state, &view);
            AdvanceResponse::new(&outcome, phase, round_of(&view))
        }
        AdvanceOutcome::GameComplete => {
            sse_events::broadcast_phase_changed(state, &view);
            AdvanceResponse::new(&outcome, phase, None)
        }
        AdvanceOutcome::Ignored(_) => AdvanceResponse::new(&outcome, phase, None),
    }
}

/// Score a round that waits for moderator confirmation.
pub async fn confirm_scoring(state: &SharedState) -> Result<ConfirmScoringResponse, ServiceError> {
    let (result, view) = state
        .write_session(|game| game.confirm_scoring().map(|result| (result, game.view())))
        .await?;

    sse_events::broadcast_round_scored(state, &result, &view);
    sse_events::broadcast_phase_changed(state, &view);

    Ok(ConfirmScoringResponse {
        result: RoundResultSummary::from(&result),
        players: players_of(&view),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dto::game::GuessStatus,
        state::{
            AppState, GameSession, GameSettings,
            game::{Catalog, Round},
        },
    };

    fn round(rating: f64, active_player_index: usize) -> Round {
        Round {
            index: 0,
            round_number: 1,
            title: "Heat".into(),
            year: 1995,
            cast: vec!["Al Pacino".into(), "Robert De Niro".into()],
            description: "Cops and robbers.".into(),
            user_count: 700_000,
            rating,
            point_value: 3,
            active_player_index,
            final_round: false,
        }
    }

    fn shared(players: usize, require_score_confirmation: bool) -> SharedState {
        let session = GameSession::new(
            Catalog::new("movie night", vec![round(8.3, 0), round(6.1, 1)]),
            GameSettings {
                expected_player_count: players,
                require_score_confirmation,
                exact_tolerance: 0.0,
            },
        );
        AppState::new(session, None)
    }

    fn join(name: &str) -> JoinRequest {
        JoinRequest { name: name.into() }
    }

    fn guess(name: &str, guess: f64, choice: Option<&str>) -> GuessRequest {
        GuessRequest {
            name: name.into(),
            guess,
            choice: choice.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn join_broadcasts_and_starts_game() {
        let state = shared(2, false);
        let mut events = state.public_sse().subscribe();

        let first = join_player(&state, join("alice")).await.unwrap();
        assert!(!first.game_started);
        let second = join_player(&state, join("bob")).await.unwrap();
        assert!(second.game_started);
        assert_eq!(second.joined, 2);

        let names: Vec<_> = (0..3)
            .map(|_| events.try_recv().unwrap().event.unwrap())
            .collect();
        assert_eq!(names, ["player.joined", "player.joined", "phase_changed"]);
    }

    #[tokio::test]
    async fn duplicate_join_is_conflict() {
        let state = shared(2, false);
        join_player(&state, join("alice")).await.unwrap();
        let err = join_player(&state, join("alice")).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn unknown_choice_is_invalid_input() {
        let state = shared(2, false);
        join_player(&state, join("alice")).await.unwrap();
        join_player(&state, join("bob")).await.unwrap();
        let err = submit_guess(&state, guess("bob", 0.0, Some("sideways")))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn last_answer_scores_round() {
        let state = shared(2, false);
        join_player(&state, join("alice")).await.unwrap();
        join_player(&state, join("bob")).await.unwrap();

        let recorded = submit_guess(&state, guess("alice", 7.9, None)).await.unwrap();
        assert_eq!(recorded.status, GuessStatus::Recorded);
        assert_eq!(recorded.answered, 1);

        let mut events = state.public_sse().subscribe();
        let scored = submit_guess(&state, guess("bob", 0.0, Some("higher")))
            .await
            .unwrap();
        assert_eq!(scored.status, GuessStatus::Scored);
        let result = scored.result.unwrap();
        assert_eq!(result.awards.len(), 2);

        let names: Vec<_> = (0..3)
            .map(|_| events.try_recv().unwrap().event.unwrap())
            .collect();
        assert_eq!(names, ["answer.received", "round.scored", "phase_changed"]);

        let bob = state
            .read_session(|game| game.find_player("bob").map(|player| player.score))
            .await
            .unwrap();
        assert_eq!(bob, 3);
    }

    #[tokio::test]
    async fn advance_only_after_scoring() {
        let state = shared(1, false);
        join_player(&state, join("solo")).await.unwrap();

        let ignored = advance_round(&state).await;
        assert!(!ignored.advanced);
        assert_eq!(ignored.phase, VisibleGamePhase::RoundOpen);

        submit_guess(&state, guess("solo", 8.0, None)).await.unwrap();
        let advanced = advance_round(&state).await;
        assert!(advanced.advanced);
        let round = advanced.round.unwrap();
        assert_eq!(round.index, 1);
        assert_eq!(round.rating, None);

        submit_guess(&state, guess("solo", 6.0, None)).await.unwrap();
        let complete = advance_round(&state).await;
        assert!(complete.advanced);
        assert_eq!(complete.phase, VisibleGamePhase::GameComplete);
    }

    #[tokio::test]
    async fn confirmation_flow() {
        let state = shared(2, true);
        join_player(&state, join("alice")).await.unwrap();
        join_player(&state, join("bob")).await.unwrap();
        assert!(matches!(
            confirm_scoring(&state).await,
            Err(ServiceError::InvalidState(_))
        ));

        submit_guess(&state, guess("alice", 8.0, None)).await.unwrap();
        let parked = submit_guess(&state, guess("bob", 0.0, Some("HIGHER")))
            .await
            .unwrap();
        assert_eq!(parked.status, GuessStatus::AwaitingConfirmation);

        let confirmed = confirm_scoring(&state).await.unwrap();
        assert_eq!(confirmed.result.round_index, 0);
        let bob = confirmed
            .players
            .iter()
            .find(|player| player.name == "bob")
            .unwrap();
        assert_eq!(bob.score, 3);
        assert_eq!(bob.guess, Some(0.0));
    }
}
