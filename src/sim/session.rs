//! Session lifecycle shared by every game
//!
//! A session moves Idle -> Playing -> GameOver and is replaced on replay.
//! Each replacement gets a fresh [`SessionToken`], which deferred work
//! captures at schedule time and checks again when it fires.

use serde::{Deserialize, Serialize};

/// Current phase of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start input
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Run ended, no further updates until reset
    GameOver,
}

/// Generation counter identifying one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken(u64);

impl SessionToken {
    pub const FIRST: SessionToken = SessionToken(1);

    pub fn next(self) -> SessionToken {
        SessionToken(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Status, score and start time of one game instance
#[derive(Debug, Clone)]
pub struct GameSession {
    pub phase: GamePhase,
    pub score: u64,
    /// Unix timestamp (ms) of the Idle -> Playing transition
    pub started_at: Option<f64>,
    token: SessionToken,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self::with_token(SessionToken::FIRST)
    }

    fn with_token(token: SessionToken) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            started_at: None,
            token,
        }
    }

    /// Fresh Idle session with a token that invalidates this one
    pub fn successor(&self) -> Self {
        Self::with_token(self.token.next())
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn is_idle(&self) -> bool {
        self.phase == GamePhase::Idle
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Start keys only work from idle. After game over the restart button
    /// is the only way into a new run.
    pub fn accepts_key_start(&self) -> bool {
        self.is_idle()
    }

    /// Idle -> Playing. Returns false if the session was not idle.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.phase != GamePhase::Idle {
            return false;
        }
        self.phase = GamePhase::Playing;
        self.started_at = Some(now_ms);
        log::info!("Session {} started", self.token.value());
        true
    }

    /// Playing -> GameOver. Returns false if the session was not playing.
    pub fn finish(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::GameOver;
        log::info!(
            "Session {} over with score {}",
            self.token.value(),
            self.score
        );
        true
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }
}

/// A piece of work scheduled to run at `due_ms` on behalf of a session
#[derive(Debug, Clone, PartialEq)]
pub struct Deferred<A> {
    pub due_ms: f64,
    pub token: SessionToken,
    pub action: A,
}

impl<A> Deferred<A> {
    pub fn new(token: SessionToken, due_ms: f64, action: A) -> Self {
        Self {
            due_ms,
            token,
            action,
        }
    }

    /// Whether this work still belongs to `session`
    pub fn is_current(&self, session: &GameSession) -> bool {
        self.token == session.token()
    }
}

/// Timer queue polled by the driver, independent of the tick loop
#[derive(Debug, Clone)]
pub struct DeferredQueue<A> {
    pending: Vec<Deferred<A>>,
}

impl<A> Default for DeferredQueue<A> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<A> DeferredQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, deferred: Deferred<A>) {
        self.pending.push(deferred);
    }

    /// Remove and return every entry due at `now_ms`, earliest first.
    /// Entries due at the same time keep their scheduling order.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<Deferred<A>> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|d| d.due_ms <= now_ms);
        self.pending = rest;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_transitions() {
        let mut session = GameSession::new();
        assert!(session.is_idle());
        assert!(!session.finish());

        assert!(session.start(1000.0));
        assert_eq!(session.started_at, Some(1000.0));
        assert!(!session.start(2000.0));

        session.add_score(7);
        assert!(session.finish());
        assert!(session.is_over());
        assert_eq!(session.score, 7);
    }

    #[test]
    fn test_key_start_only_from_idle() {
        let mut session = GameSession::new();
        assert!(session.accepts_key_start());
        session.start(0.0);
        assert!(!session.accepts_key_start());
        session.add_score(30);
        session.finish();
        // Held keys at game over must not skip the save prompt
        assert!(!session.accepts_key_start());
        assert!(session.successor().accepts_key_start());
    }

    #[test]
    fn test_successor_invalidates_token() {
        let mut session = GameSession::new();
        session.start(0.0);
        session.add_score(10);

        let next = session.successor();
        assert!(next.is_idle());
        assert_eq!(next.score, 0);
        assert_ne!(next.token(), session.token());

        let stale = Deferred::new(session.token(), 0.0, ());
        assert!(stale.is_current(&session));
        assert!(!stale.is_current(&next));
    }

    #[test]
    fn test_queue_drains_in_due_order() {
        let token = SessionToken::FIRST;
        let mut queue = DeferredQueue::new();
        queue.push(Deferred::new(token, 300.0, "c"));
        queue.push(Deferred::new(token, 100.0, "a"));
        queue.push(Deferred::new(token, 200.0, "b"));

        assert!(queue.drain_due(50.0).is_empty());

        let due: Vec<_> = queue.drain_due(250.0).into_iter().map(|d| d.action).collect();
        assert_eq!(due, vec!["a", "b"]);
        assert_eq!(queue.len(), 1);

        queue.clear();
        assert!(queue.is_empty());
    }
}
