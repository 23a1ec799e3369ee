use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        common::{AnswerVisibility, PlayerSummary},
        phase::PhaseSnapshot,
        public::{players_of, round_of},
        sse::{
            AnswerReceivedEvent, PhaseChangedEvent, PlayerJoinedEvent, RoundScoredEvent,
            ServerEvent,
        },
    },
    state::{JoinOutcome, SessionView, SharedState, scoring::RoundResult},
};

const EVENT_PLAYER_JOINED: &str = "player.joined";
const EVENT_ANSWER_RECEIVED: &str = "answer.received";
const EVENT_PHASE_CHANGED: &str = "phase_changed";
const EVENT_ROUND_SCORED: &str = "round.scored";

/// Broadcast that a player joined the roster.
pub fn broadcast_player_joined(state: &SharedState, outcome: &JoinOutcome, expected: usize) {
    let payload = PlayerJoinedEvent {
        player: PlayerSummary::project(&outcome.player, AnswerVisibility::Hidden),
        joined: outcome.joined,
        expected,
    };
    send_public_event(state, EVENT_PLAYER_JOINED, &payload);
}

/// Broadcast that a player answered, without disclosing the answer.
pub fn broadcast_answer_received(state: &SharedState, player: &str, view: &SessionView) {
    let payload = AnswerReceivedEvent {
        player: player.to_string(),
        answered: view.pending_answers,
        expected: view.players.len(),
    };
    send_public_event(state, EVENT_ANSWER_RECEIVED, &payload);
}

/// Broadcast a phase change using the session copy taken when it happened.
pub fn broadcast_phase_changed(state: &SharedState, view: &SessionView) {
    let payload = PhaseChangedEvent {
        phase: PhaseSnapshot::from(&view.phase),
        round: round_of(view),
    };
    send_public_event(state, EVENT_PHASE_CHANGED, &payload);
}

/// Broadcast a round breakdown together with the updated standings.
pub fn broadcast_round_scored(state: &SharedState, result: &RoundResult, view: &SessionView) {
    let payload = RoundScoredEvent {
        result: result.into(),
        players: players_of(view),
    };
    send_public_event(state, EVENT_ROUND_SCORED, &payload);
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}
