//! Tetris moves, locking and gravity

use super::{LINE_POINTS, TetrisState, interval_for_level, level_for_lines};

/// Player intents, consumed in order at the start of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TetrisAction {
    Start,
    Left,
    Right,
    SoftDrop,
    Rotate,
    HardDrop,
}

#[derive(Debug, Clone, Default)]
pub struct TetrisInput {
    pub actions: Vec<TetrisAction>,
}

/// Result of locking the active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOutcome {
    pub cleared: u32,
    pub points: u64,
    pub game_over: bool,
}

/// Move the active piece by one cell if it fits
pub fn shift(state: &mut TetrisState, dx: i32, dy: i32) -> bool {
    let target = state.position.offset(dx, dy);
    if !state.board.fits(&state.current, target) {
        return false;
    }
    state.position = target;
    true
}

/// Rotate clockwise in place; no wall kick
pub fn rotate(state: &mut TetrisState) -> bool {
    let rotated = state.current.rotated();
    if !state.board.fits(&rotated, state.position) {
        return false;
    }
    state.current = rotated;
    true
}

/// Drop until blocked, then lock
pub fn hard_drop(state: &mut TetrisState) -> LockOutcome {
    while shift(state, 0, 1) {}
    lock(state)
}

/// Stamp the active piece, clear lines, score, then bring in the next piece
pub fn lock(state: &mut TetrisState) -> LockOutcome {
    if state.board.stamp(&state.current, state.position).is_err() {
        log::info!("Tetris piece locked above the board");
        state.session.finish();
        return LockOutcome {
            cleared: 0,
            points: 0,
            game_over: true,
        };
    }

    let cleared = state.board.clear_lines();
    let points = LINE_POINTS[cleared as usize] * state.level as u64;
    if cleared > 0 {
        state.session.add_score(points);
        state.lines += cleared;
        let level = level_for_lines(state.lines);
        if level > state.level {
            state.level = level;
            state.drop_interval_ms = interval_for_level(level);
            log::info!(
                "Tetris level {} ({} ms per row)",
                level,
                state.drop_interval_ms
            );
        }
    }

    state.advance_piece();
    let game_over = !state.board.fits(&state.current, state.position);
    if game_over {
        state.session.finish();
    }
    LockOutcome {
        cleared,
        points,
        game_over,
    }
}

fn apply(state: &mut TetrisState, action: TetrisAction, now_ms: f64) {
    match action {
        TetrisAction::Start => {
            state.session.start(now_ms);
        }
        _ if !state.session.is_playing() => {}
        TetrisAction::Left => {
            shift(state, -1, 0);
        }
        TetrisAction::Right => {
            shift(state, 1, 0);
        }
        TetrisAction::SoftDrop => {
            shift(state, 0, 1);
        }
        TetrisAction::Rotate => {
            rotate(state);
        }
        TetrisAction::HardDrop => {
            hard_drop(state);
        }
    }
}

/// Apply queued input, then run gravity for `dt_ms` of elapsed time
pub fn tick(state: &mut TetrisState, input: &TetrisInput, dt_ms: f64, now_ms: f64) {
    for &action in &input.actions {
        apply(state, action, now_ms);
    }
    if !state.session.is_playing() {
        return;
    }

    state.drop_counter_ms += dt_ms;
    if state.drop_counter_ms > state.drop_interval_ms {
        state.drop_counter_ms = 0.0;
        if !shift(state, 0, 1) {
            lock(state);
        }
    }
}
