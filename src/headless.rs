//! Scripted autoplay for every game
//!
//! Drives each simulation with a simple bot, no browser needed, and records
//! the result through the normal leaderboard path. The native binary runs
//! this as a smoke test.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::highscores::{GameKey, record_score};
use crate::persistence::KeyValueStore;
use crate::sim::flappy::consts::{CHARACTER_HEIGHT, CHARACTER_X, PIPE_GAP, PIPE_WIDTH};
use crate::sim::flappy::{self, FlappyInput, FlappyState, Theme};
use crate::sim::memory::{self, ClickOutcome, Difficulty, MemoryState};
use crate::sim::snake::{self, Direction, SnakeState};
use crate::sim::tetris::{self, BOARD_HEIGHT, BOARD_WIDTH, TetrisState};

/// Frame cap for flappy, about five minutes at 60 fps
pub const MAX_FLAPPY_FRAMES: u64 = 18_000;
pub const MAX_SNAKE_STEPS: u64 = 5_000;
pub const MAX_TETRIS_PIECES: u64 = 500;

/// Player name used for autoplay scores
pub const BOT_NAME: &str = "autoplay";

/// Simulated think time between memory moves
const MEMORY_MOVE_MS: f64 = 1_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub game: GameKey,
    pub score: u64,
    /// Frames, steps, pieces or moves, depending on the game
    pub steps: u64,
    /// Whether the game reached game over before the step cap
    pub finished: bool,
}

/// Keep the character's center near the middle of the next gap
pub fn play_flappy(seed: u64, theme: Theme) -> RunSummary {
    let mut state = FlappyState::new(seed, theme);
    let mut steps = 0;
    let mut input = FlappyInput { jump: true };

    while !state.session.is_over() && steps < MAX_FLAPPY_FRAMES {
        flappy::tick(&mut state, &input, steps as f64 * 1000.0 / 60.0);
        steps += 1;

        let target = state
            .pipes
            .iter()
            .find(|p| p.x + PIPE_WIDTH > CHARACTER_X)
            .map(|p| p.top_height + PIPE_GAP * 0.65)
            .unwrap_or(state.canvas_height / 2.0);
        let center = state.bird.y + CHARACTER_HEIGHT / 2.0;
        input.jump = center > target && state.bird.velocity > 0.0;
    }

    RunSummary {
        game: GameKey::Flappy,
        score: state.session.score,
        steps,
        finished: state.session.is_over(),
    }
}

/// Greedy toward the food, avoiding immediate death
pub fn play_snake(seed: u64) -> RunSummary {
    let mut state = SnakeState::new(seed);
    state.session.start(0.0);
    let mut steps = 0;

    while state.session.is_playing() && steps < MAX_SNAKE_STEPS {
        let head = state.head();
        let food = state.food;
        let choice = [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
            .into_iter()
            .filter(|d| *d != state.direction.opposite())
            .filter(|d| !state.is_fatal(head.step(*d)))
            .min_by_key(|d| {
                let next = head.step(*d);
                (next.x - food.x).abs() + (next.y - food.y).abs()
            });
        if let Some(direction) = choice {
            state.queue_turn(direction);
        }
        snake::tick(&mut state);
        steps += 1;
    }

    RunSummary {
        game: GameKey::Snake,
        score: state.session.score,
        steps,
        finished: state.session.is_over(),
    }
}

/// Lower is better: stack height, buried holes and bumpiness
fn board_cost(state: &TetrisState) -> i64 {
    let board = &state.board;
    let mut heights = [0i64; BOARD_WIDTH];
    let mut holes = 0;
    for (x, height) in heights.iter_mut().enumerate() {
        let mut seen_block = false;
        for y in 0..BOARD_HEIGHT {
            let filled = board.cell(x as i32, y as i32).is_some();
            if filled && !seen_block {
                seen_block = true;
                *height = (BOARD_HEIGHT - y) as i64;
            } else if !filled && seen_block {
                holes += 1;
            }
        }
    }
    let total: i64 = heights.iter().sum();
    let bumpiness: i64 = heights.windows(2).map(|w| (w[0] - w[1]).abs()).sum();
    total * 5 + holes * 35 + bumpiness * 2
}

/// Place the active piece: `rotations` turns, then slide to column `x`
fn place(state: &mut TetrisState, rotations: usize, x: i32) -> Option<tetris::LockOutcome> {
    for _ in 0..rotations {
        if !tetris::rotate(state) {
            return None;
        }
    }
    let dx = x - state.position.x;
    for _ in 0..dx.abs() {
        if !tetris::shift(state, dx.signum(), 0) {
            return None;
        }
    }
    Some(tetris::hard_drop(state))
}

/// Try every rotation and column on a copy, play the cheapest
pub fn play_tetris(seed: u64) -> RunSummary {
    let mut state = TetrisState::new(seed);
    state.session.start(0.0);
    let mut steps = 0;

    while state.session.is_playing() && steps < MAX_TETRIS_PIECES {
        let mut best: Option<(i64, usize, i32)> = None;
        for rotations in 0..4 {
            for x in -2..BOARD_WIDTH as i32 {
                let mut trial = state.clone();
                let Some(outcome) = place(&mut trial, rotations, x) else {
                    continue;
                };
                let cost = if outcome.game_over {
                    i64::MAX
                } else {
                    board_cost(&trial) - outcome.cleared as i64 * 100
                };
                if best.is_none_or(|(c, _, _)| cost < c) {
                    best = Some((cost, rotations, x));
                }
            }
        }

        let (rotations, x) = best.map_or((0, state.position.x), |(_, r, x)| (r, x));
        if place(&mut state, rotations, x).is_none() {
            tetris::hard_drop(&mut state);
        }
        steps += 1;
    }

    RunSummary {
        game: GameKey::Tetris,
        score: state.session.score,
        steps,
        finished: state.session.is_over(),
    }
}

/// Click a card and remember its face
fn flip(state: &mut MemoryState, seen: &mut HashMap<u8, Vec<usize>>, id: usize, now: f64) -> ClickOutcome {
    let outcome = state.click(id, now);
    let ids = seen.entry(state.cards[id].symbol).or_default();
    if !ids.contains(&id) {
        ids.push(id);
    }
    outcome
}

fn unseen(state: &MemoryState, seen: &HashMap<u8, Vec<usize>>, skip: Option<usize>) -> Option<usize> {
    (0..state.cards.len()).find(|id| {
        Some(*id) != skip && !state.cards[*id].matched && !seen.values().any(|ids| ids.contains(id))
    })
}

/// Flip cards in order, remembering every face seen
pub fn play_memory(seed: u64, difficulty: Difficulty) -> RunSummary {
    let mut state = MemoryState::new(seed, difficulty);
    let mut now = 0.0;
    state.start(now);
    let mut seen: HashMap<u8, Vec<usize>> = HashMap::new();
    let mut steps = 0;

    while state.session.is_playing() {
        memory::tick(&mut state, MEMORY_MOVE_MS);
        now += MEMORY_MOVE_MS;
        steps += 1;

        let known_pair = seen
            .values()
            .find(|ids| ids.len() == 2 && !state.cards[ids[0]].matched)
            .map(|ids| (ids[0], ids[1]));
        let (first, second) = match known_pair {
            Some(pair) => pair,
            None => {
                let Some(first) = unseen(&state, &seen, None) else { break };
                flip(&mut state, &mut seen, first, now);
                let symbol = state.cards[first].symbol;
                let partner = seen[&symbol].iter().copied().find(|id| *id != first);
                match partner.or_else(|| unseen(&state, &seen, Some(first))) {
                    Some(second) => {
                        let outcome = flip(&mut state, &mut seen, second, now);
                        if let ClickOutcome::Mismatched(deferred) = outcome {
                            state.fire(&deferred);
                        }
                        continue;
                    }
                    None => break,
                }
            }
        };
        flip(&mut state, &mut seen, first, now);
        flip(&mut state, &mut seen, second, now);
    }

    RunSummary {
        game: GameKey::Memory,
        score: state.session.score,
        steps,
        finished: state.session.is_over(),
    }
}

/// Play every game once and record each non-zero score
pub fn run_all(seed: u64, store: &mut dyn KeyValueStore, now: DateTime<Utc>) -> Vec<RunSummary> {
    let runs = vec![
        play_flappy(seed, Theme::default()),
        play_snake(seed),
        play_tetris(seed),
        play_memory(seed, Difficulty::default()),
    ];
    for run in &runs {
        log::info!(
            "{}: score {} after {} steps{}",
            run.game.title(),
            run.score,
            run.steps,
            if run.finished { "" } else { " (capped)" }
        );
        if run.score > 0 {
            record_score(store, run.game, BOT_NAME, run.score, now);
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::list_scores;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_runs_are_deterministic() {
        assert_eq!(play_snake(9), play_snake(9));
        assert_eq!(play_tetris(9), play_tetris(9));
        assert_eq!(play_memory(9, Difficulty::Medium), play_memory(9, Difficulty::Medium));
    }

    #[test]
    fn test_snake_bot_eats() {
        let run = play_snake(3);
        assert!(run.score >= snake::FOOD_POINTS);
        assert_eq!(run.score % snake::FOOD_POINTS, 0);
    }

    #[test]
    fn test_memory_bot_clears_every_difficulty() {
        for difficulty in Difficulty::ALL {
            let run = play_memory(21, difficulty);
            assert!(run.finished, "{:?}", difficulty);
            assert!(run.score > 0);
        }
    }

    #[test]
    fn test_tetris_bot_scores_lines() {
        let run = play_tetris(5);
        assert!(run.steps > 20);
        assert!(run.score > 0);
    }

    #[test]
    fn test_flappy_bot_stops() {
        let run = play_flappy(2, Theme::Ufo);
        assert!(run.finished || run.steps == MAX_FLAPPY_FRAMES);
    }

    #[test]
    fn test_run_all_records_scores() {
        let mut store = MemoryStore::new();
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let runs = run_all(4, &mut store, now);
        assert_eq!(runs.len(), GameKey::ALL.len());
        for run in &runs {
            let stored = list_scores(&store, run.game);
            if run.score > 0 {
                assert_eq!(stored.len(), 1);
                assert_eq!(stored[0].name, BOT_NAME);
                assert_eq!(stored[0].score, run.score);
                assert_eq!(stored[0].date, now);
            } else {
                assert!(stored.is_empty());
            }
        }
    }
}
