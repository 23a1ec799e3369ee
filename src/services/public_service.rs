//! Service helpers that expose read-only public projections of the current game.

use crate::{
    dto::public::{CurrentRoundResponse, GamePhaseResponse, PlayersResponse, SessionResponse},
    error::ServiceError,
    state::SharedState,
};

/// Return the whole session as seen by the public.
pub async fn get_session(state: &SharedState) -> SessionResponse {
    let view = state.snapshot().await;
    SessionResponse::from(&view)
}

/// Return the players in join order with their scores.
pub async fn get_players(state: &SharedState) -> PlayersResponse {
    let view = state.snapshot().await;
    PlayersResponse::from(&view)
}

/// Return the round currently in play.
pub async fn get_current_round(state: &SharedState) -> Result<CurrentRoundResponse, ServiceError> {
    let view = state.snapshot().await;
    CurrentRoundResponse::from_view(&view)
        .ok_or_else(|| ServiceError::NotFound("no round has been opened yet".into()))
}

/// Return the current round phase.
pub async fn get_game_phase(state: &SharedState) -> GamePhaseResponse {
    let view = state.snapshot().await;
    GamePhaseResponse::from(&view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dto::phase::VisibleGamePhase,
        state::{
            AppState, GameError, GameSession, GameSettings,
            game::{Catalog, Choice, Round},
        },
    };

    fn round(index: usize, rating: f64, final_round: bool) -> Round {
        Round {
            index,
            round_number: index as u32 + 1,
            title: "Alien".into(),
            year: 1979,
            cast: vec!["Sigourney Weaver".into()],
            description: "In space no one can hear you scream.".into(),
            user_count: 900_000,
            rating,
            point_value: 2,
            active_player_index: index % 2,
            final_round,
        }
    }

    fn shared_with(rounds: Vec<Round>) -> SharedState {
        let session = GameSession::new(
            Catalog::new("sci-fi", rounds),
            GameSettings {
                expected_player_count: 2,
                ..GameSettings::default()
            },
        );
        AppState::new(session, None)
    }

    fn shared() -> SharedState {
        shared_with(vec![round(0, 8.5, false)])
    }

    #[tokio::test]
    async fn current_round_missing_before_start() {
        let state = shared();
        assert!(matches!(
            get_current_round(&state).await,
            Err(ServiceError::NotFound(_))
        ));
        assert_eq!(get_game_phase(&state).await.phase, VisibleGamePhase::NotStarted);
    }

    #[tokio::test]
    async fn rating_and_answers_hidden_while_open() {
        let state = shared();
        state
            .write_session(|game| -> Result<_, GameError> {
                game.join("alice")?;
                game.join("bob")?;
                game.submit_guess("alice", 8.0, Choice::Unset)
            })
            .await
            .unwrap();

        let round = get_current_round(&state).await.unwrap();
        assert_eq!(round.round.rating, None);
        assert_eq!(round.active_player.as_deref(), Some("alice"));
        assert_eq!(round.answered, 1);

        let session = get_session(&state).await;
        assert_eq!(session.players[0].guess, Some(8.0));
        assert_eq!(session.players[1].guess, None);
    }

    #[tokio::test]
    async fn rating_revealed_once_scored() {
        let state = shared();
        state
            .write_session(|game| -> Result<_, GameError> {
                game.join("alice")?;
                game.join("bob")?;
                game.submit_guess("alice", 8.0, Choice::Unset)?;
                game.submit_guess("bob", 0.0, Choice::Higher)
            })
            .await
            .unwrap();

        let round = get_current_round(&state).await.unwrap();
        assert_eq!(round.round.rating, Some(8.5));
        let players = get_players(&state).await.players;
        assert_eq!(players[1].score, 2);
        assert_eq!(players[1].choice, Some(Choice::Higher));
        let session = get_session(&state).await;
        assert!(session.last_result.is_some());
    }

    #[tokio::test]
    async fn final_round_keeps_every_guess_hidden() {
        let state = shared_with(vec![round(0, 6.5, true)]);
        state
            .write_session(|game| -> Result<_, GameError> {
                game.join("alice")?;
                game.join("bob")?;
                game.submit_guess("alice", 6.9, Choice::Unset)
            })
            .await
            .unwrap();

        let session = get_session(&state).await;
        assert_eq!(session.players[0].name, "alice");
        assert!(session.players[0].answered);
        assert_eq!(session.players[0].guess, None);
        let players = get_players(&state).await.players;
        assert_eq!(players[0].guess, None);

        let current = get_current_round(&state).await.unwrap();
        assert!(current.round.final_round);
        assert_eq!(current.active_player, None);

        state
            .write_session(|game| game.submit_guess("bob", 6.0, Choice::Unset))
            .await
            .unwrap();
        let session = get_session(&state).await;
        assert_eq!(session.players[0].guess, Some(6.9));
        assert_eq!(session.players[1].guess, Some(6.0));
    }

    #[tokio::test]
    async fn session_lists_every_scored_round() {
        let state = shared_with(vec![round(0, 8.5, false), round(1, 5.0, false)]);
        state
            .write_session(|game| -> Result<_, GameError> {
                game.join("alice")?;
                game.join("bob")?;
                game.submit_guess("alice", 8.0, Choice::Unset)?;
                game.submit_guess("bob", 0.0, Choice::Higher)?;
                game.advance_round();
                game.submit_guess("bob", 4.0, Choice::Unset)?;
                game.submit_guess("alice", 0.0, Choice::Higher)
            })
            .await
            .unwrap();

        let session = get_session(&state).await;
        let rounds: Vec<_> = session
            .history
            .iter()
            .map(|result| result.round_index)
            .collect();
        assert_eq!(rounds, [0, 1]);
        assert_eq!(
            session.last_result.map(|result| result.round_index),
            Some(1)
        );
        let json = serde_json::to_value(get_session(&state).await).unwrap();
        assert_eq!(json["history"].as_array().map(Vec::len), Some(2));
    }
}
