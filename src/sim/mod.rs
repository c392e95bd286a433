//! Deterministic simulation module
//!
//! All gameplay logic lives here. Each game keeps one owned state struct that
//! its `tick` mutates; input handlers only record intents.
//! - Seeded RNG only
//! - Time enters as explicit `now_ms` / `dt_ms` arguments
//! - No platform dependencies (rendering goes through `renderer::surface`)

pub mod flappy;
pub mod memory;
pub mod session;
pub mod snake;
pub mod tetris;

pub use flappy::{FlappyInput, FlappyState, Theme};
pub use memory::{ClickOutcome, Difficulty, MemoryState, MemoryTimer};
pub use session::{Deferred, DeferredQueue, GamePhase, GameSession, SessionToken};
pub use snake::{Direction, SnakeState, StepOutcome};
pub use tetris::{TetrisAction, TetrisInput, TetrisState};
