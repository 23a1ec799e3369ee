pub mod game;
pub mod scoring;
pub mod session;
mod sse;
pub mod state_machine;

use std::sync::Arc;

use tokio::sync::Mutex;

pub use self::session::{
    AdvanceIgnored, AdvanceOutcome, GameError, GameSession, GameSettings, JoinOutcome,
    SessionView, SubmitOutcome,
};
pub use self::sse::SseHub;

pub type SharedState = Arc<AppState>;

/// Capacity of the public SSE broadcast channel.
const PUBLIC_SSE_CAPACITY: usize = 32;

/// Central application state: the running game behind its lock, plus the
/// broadcast hub used to push updates to connected screens.
pub struct AppState {
    session: Mutex<GameSession>,
    public_sse: SseHub,
    moderator_token: Option<String>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(session: GameSession, moderator_token: Option<String>) -> SharedState {
        Arc::new(Self {
            session: Mutex::new(session),
            public_sse: SseHub::new(PUBLIC_SSE_CAPACITY),
            moderator_token,
        })
    }

    /// Run a read-only closure against the session while holding the game lock.
    pub async fn read_session<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&GameSession) -> T,
    {
        let guard = self.session.lock().await;
        f(&*guard)
    }

    /// Run a mutation against the session while holding the game lock.
    ///
    /// The closure is synchronous so the lock is never held across an await
    /// point; everything it does happens in one critical section.
    pub async fn write_session<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut GameSession) -> T,
    {
        let mut guard = self.session.lock().await;
        f(&mut *guard)
    }

    /// Consistent copy of the whole session for rendering.
    pub async fn snapshot(&self) -> SessionView {
        self.read_session(GameSession::view).await
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.public_sse
    }

    /// Token moderators must present, when one is configured.
    pub fn moderator_token(&self) -> Option<&str> {
        self.moderator_token.as_deref()
    }
}
