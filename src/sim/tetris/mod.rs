//! Tetris: a 10x20 well with gravity, line clears and levels

pub mod board;
pub mod piece;
pub mod tick;

pub use board::{BOARD_HEIGHT, BOARD_WIDTH, Board, Position};
pub use piece::{Piece, Tetromino};
pub use tick::{LockOutcome, TetrisAction, TetrisInput, hard_drop, lock, rotate, shift, tick};

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::session::GameSession;

/// Cell edge in canvas pixels
pub const CELL_SIZE: f32 = 30.0;
/// Gravity interval at level 1
pub const BASE_INTERVAL_MS: f64 = 500.0;
/// Interval reduction per level above 1
pub const LEVEL_STEP_MS: f64 = 50.0;
pub const MIN_INTERVAL_MS: f64 = 100.0;
pub const LINES_PER_LEVEL: u32 = 10;
/// Points for clearing 0..=4 lines at once, before the level multiplier
pub const LINE_POINTS: [u64; 5] = [0, 40, 100, 300, 1200];

pub fn level_for_lines(lines: u32) -> u32 {
    lines / LINES_PER_LEVEL + 1
}

pub fn interval_for_level(level: u32) -> f64 {
    (BASE_INTERVAL_MS - (level.saturating_sub(1)) as f64 * LEVEL_STEP_MS).max(MIN_INTERVAL_MS)
}

/// Where a fresh piece enters the well
pub fn spawn_position(piece: &Piece) -> Position {
    Position::new((BOARD_WIDTH / 2) as i32 - (piece.width() / 2) as i32, 0)
}

#[derive(Debug, Clone)]
pub struct TetrisState {
    pub session: GameSession,
    pub board: Board,
    pub current: Piece,
    pub position: Position,
    /// Lookahead shown in the preview box
    pub next: Piece,
    pub lines: u32,
    pub level: u32,
    pub drop_interval_ms: f64,
    /// Elapsed time since the last gravity step
    pub drop_counter_ms: f64,
    rng: Pcg32,
}

impl TetrisState {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let current = Piece::new(Tetromino::random(&mut rng));
        let next = Piece::new(Tetromino::random(&mut rng));
        Self {
            session: GameSession::new(),
            board: Board::new(),
            position: spawn_position(&current),
            current,
            next,
            lines: 0,
            level: 1,
            drop_interval_ms: BASE_INTERVAL_MS,
            drop_counter_ms: 0.0,
            rng,
        }
    }

    pub fn reset(&mut self, seed: u64) {
        let session = self.session.successor();
        *self = Self {
            session,
            ..Self::new(seed)
        };
    }

    /// Promote the lookahead and draw a new one
    pub(crate) fn advance_piece(&mut self) {
        let upcoming = Piece::new(Tetromino::random(&mut self.rng));
        self.current = std::mem::replace(&mut self.next, upcoming);
        self.position = spawn_position(&self.current);
    }

    /// Board cells covered by the active piece
    pub fn active_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let at = self.position;
        self.current.cells().map(move |(dx, dy)| (at.x + dx, at.y + dy))
    }
}
