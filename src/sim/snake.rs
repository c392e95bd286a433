//! Snake on a fixed grid, stepped by a variable-interval timer

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::session::GameSession;

pub const GRID_WIDTH: i32 = 20;
pub const GRID_HEIGHT: i32 = 20;
/// Cell edge in canvas pixels
pub const CELL_SIZE: f32 = 20.0;

/// Delay between steps at the start of a run
pub const INITIAL_INTERVAL_MS: u32 = 150;
/// Speed-up per food eaten
pub const INTERVAL_STEP_MS: u32 = 5;
pub const MIN_INTERVAL_MS: u32 = 50;
pub const FOOD_POINTS: u64 = 10;

pub const START_CELL: Cell = Cell::new(10, 10);
pub const START_FOOD: Cell = Cell::new(15, 15);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    pub fn in_bounds(self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.x < width && self.y >= 0 && self.y < height
    }
}

/// What a single step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Not playing, nothing changed
    Skipped,
    Moved,
    Ate,
    Crashed,
}

#[derive(Debug, Clone)]
pub struct SnakeState {
    pub session: GameSession,
    /// Head first
    pub segments: VecDeque<Cell>,
    pub food: Cell,
    /// Direction used by the most recent step
    pub direction: Direction,
    /// Queued by input, committed at the start of the next step
    pub next_direction: Direction,
    pub interval_ms: u32,
    pub width: i32,
    pub height: i32,
    rng: Pcg32,
}

impl SnakeState {
    pub fn new(seed: u64) -> Self {
        Self {
            session: GameSession::new(),
            segments: VecDeque::from([START_CELL]),
            food: START_FOOD,
            direction: Direction::Right,
            next_direction: Direction::Right,
            interval_ms: INITIAL_INTERVAL_MS,
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn reset(&mut self, seed: u64) {
        let session = self.session.successor();
        *self = Self {
            session,
            ..Self::new(seed)
        };
    }

    pub fn head(&self) -> Cell {
        self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.segments.contains(&cell)
    }

    /// Queue a turn. Reversing onto the committed direction is refused.
    pub fn queue_turn(&mut self, direction: Direction) -> bool {
        if !self.session.is_playing() || direction == self.direction.opposite() {
            return false;
        }
        self.next_direction = direction;
        true
    }

    /// Whether `cell` would kill the snake this step. The tail is excluded
    /// because it moves out of the way unless food is eaten.
    pub fn is_fatal(&self, cell: Cell) -> bool {
        if !cell.in_bounds(self.width, self.height) {
            return true;
        }
        let body = self.segments.len().saturating_sub(1);
        self.segments.iter().take(body).any(|s| *s == cell)
    }

    /// Move food to a uniformly random free cell. Returns false when the
    /// snake covers the whole grid.
    pub fn place_food(&mut self) -> bool {
        let cells = (self.width * self.height) as usize;
        if self.segments.len() >= cells {
            return false;
        }
        loop {
            let candidate = Cell::new(
                self.rng.random_range(0..self.width),
                self.rng.random_range(0..self.height),
            );
            if !self.occupies(candidate) {
                self.food = candidate;
                return true;
            }
        }
    }
}

/// Advance the snake one cell
pub fn tick(state: &mut SnakeState) -> StepOutcome {
    if !state.session.is_playing() {
        return StepOutcome::Skipped;
    }

    state.direction = state.next_direction;
    let new_head = state.head().step(state.direction);

    if state.is_fatal(new_head) {
        state.session.finish();
        return StepOutcome::Crashed;
    }

    state.segments.push_front(new_head);

    if new_head != state.food {
        state.segments.pop_back();
        return StepOutcome::Moved;
    }

    state.session.add_score(FOOD_POINTS);
    state.interval_ms = state
        .interval_ms
        .saturating_sub(INTERVAL_STEP_MS)
        .max(MIN_INTERVAL_MS);
    log::debug!(
        "Snake ate at ({}, {}), length {}",
        new_head.x,
        new_head.y,
        state.len()
    );

    if !state.place_food() {
        // Board full: nowhere left to go
        state.session.finish();
    }
    StepOutcome::Ate
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn playing(seed: u64) -> SnakeState {
        let mut state = SnakeState::new(seed);
        state.session.start(0.0);
        state
    }

    #[test]
    fn test_moves_right_from_start() {
        let mut state = playing(1);
        assert_eq!(tick(&mut state), StepOutcome::Moved);
        assert_eq!(state.head(), Cell::new(11, 10));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_idle_does_not_move() {
        let mut state = SnakeState::new(1);
        assert_eq!(tick(&mut state), StepOutcome::Skipped);
        assert!(!state.queue_turn(Direction::Up));
        assert_eq!(state.head(), START_CELL);
    }

    #[test]
    fn test_eating_scores_and_speeds_up() {
        let mut state = playing(2);
        state.food = Cell::new(11, 10);
        assert_eq!(tick(&mut state), StepOutcome::Ate);
        assert_eq!(state.session.score, 10);
        assert_eq!(state.interval_ms, 145);
        assert_eq!(state.len(), 2);
        assert!(!state.occupies(state.food));
    }

    #[test]
    fn test_interval_floor() {
        let mut state = playing(3);
        state.interval_ms = 52;
        state.food = Cell::new(11, 10);
        tick(&mut state);
        assert_eq!(state.interval_ms, MIN_INTERVAL_MS);
    }

    #[test]
    fn test_reversal_rejected_against_committed_direction() {
        let mut state = playing(4);
        assert!(!state.queue_turn(Direction::Left));
        assert!(state.queue_turn(Direction::Up));
        // Left is still a reversal until Up has been committed
        assert!(!state.queue_turn(Direction::Left));
        tick(&mut state);
        assert_eq!(state.direction, Direction::Up);
        assert!(state.queue_turn(Direction::Left));
    }

    #[test]
    fn test_wall_crash() {
        let mut state = playing(5);
        state.segments = VecDeque::from([Cell::new(GRID_WIDTH - 1, 3)]);
        assert_eq!(tick(&mut state), StepOutcome::Crashed);
        assert!(state.session.is_over());
        assert_eq!(tick(&mut state), StepOutcome::Skipped);
    }

    #[test]
    fn test_moving_into_tail_is_legal() {
        // A 2x2 loop: head at (5,5) heading down into the tail's cell
        let mut state = playing(6);
        state.segments = VecDeque::from([
            Cell::new(5, 5),
            Cell::new(6, 5),
            Cell::new(6, 6),
            Cell::new(5, 6),
        ]);
        state.direction = Direction::Down;
        state.next_direction = Direction::Down;
        state.food = Cell::new(0, 0);
        assert_eq!(tick(&mut state), StepOutcome::Moved);
        assert_eq!(state.head(), Cell::new(5, 6));
        assert_eq!(state.len(), 4);
    }

    #[test]
    fn test_body_crash() {
        let mut state = playing(7);
        state.segments = VecDeque::from([
            Cell::new(5, 5),
            Cell::new(6, 5),
            Cell::new(6, 6),
            Cell::new(5, 6),
            Cell::new(4, 6),
        ]);
        state.direction = Direction::Down;
        state.next_direction = Direction::Down;
        assert_eq!(tick(&mut state), StepOutcome::Crashed);
    }

    #[test]
    fn test_reset_bumps_token() {
        let mut state = playing(8);
        let token = state.session.token();
        tick(&mut state);
        state.reset(9);
        assert!(state.session.is_idle());
        assert_eq!(state.head(), START_CELL);
        assert_ne!(state.session.token(), token);
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        #[test]
        fn prop_length_grows_only_when_eating(
            seed in any::<u64>(),
            turns in proptest::collection::vec(direction(), 1..200),
        ) {
            let mut state = playing(seed);
            for turn in turns {
                state.queue_turn(turn);
                let before = state.len();
                let outcome = tick(&mut state);
                match outcome {
                    StepOutcome::Ate => prop_assert_eq!(state.len(), before + 1),
                    StepOutcome::Moved | StepOutcome::Crashed => prop_assert_eq!(state.len(), before),
                    StepOutcome::Skipped => break,
                }
                if state.session.is_playing() {
                    prop_assert!(!state.occupies(state.food));
                }
            }
        }
    }
}
