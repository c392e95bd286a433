//! Per-frame flappy update

use super::collision::out_of_bounds;
use super::consts::PIPE_SPEED;
use super::state::FlappyState;

/// Input intents gathered since the previous frame
#[derive(Debug, Clone, Default)]
pub struct FlappyInput {
    /// Click or space
    pub jump: bool,
}

/// What a flap key or click does in the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlapResponse {
    /// Queue a jump; the first one starts the run
    Jump,
    /// Bring the game-over panel back up
    ShowGameOver,
    Ignore,
}

/// After game over keys do nothing and a click re-shows the game-over
/// panel. Only the restart button begins a new run.
pub fn flap_response(state: &FlappyState, from_click: bool) -> FlapResponse {
    match (state.session.is_over(), from_click) {
        (false, _) => FlapResponse::Jump,
        (true, true) => FlapResponse::ShowGameOver,
        (true, false) => FlapResponse::Ignore,
    }
}

/// Advance the game by one frame
pub fn tick(state: &mut FlappyState, input: &FlappyInput, now_ms: f64) {
    if state.session.is_over() {
        return;
    }

    if input.jump {
        // The first jump also starts the run
        if state.session.is_idle() {
            state.session.start(now_ms);
        }
        state.bird.jump();
    }

    if !state.session.is_playing() {
        return;
    }

    state.frames += 1;
    state.bird.fall();

    for pipe in &mut state.pipes {
        pipe.x -= PIPE_SPEED;
    }
    state.pipes.retain(|p| !p.is_offscreen());

    if state.should_spawn() {
        state.spawn_pipe();
    }

    let character = state.bird.hitbox();
    if out_of_bounds(&character, state.canvas_height) {
        state.session.finish();
        return;
    }

    let obstacle = state.theme.obstacle();
    let mut passed = 0;
    for pipe in &mut state.pipes {
        if obstacle.collides(&character, pipe, state.canvas_height) {
            state.session.finish();
            return;
        }
        if !pipe.scored && pipe.center_x() < character.x {
            pipe.scored = true;
            passed += 1;
        }
    }
    state.session.add_score(passed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;
    use crate::sim::flappy::consts::*;
    use crate::sim::flappy::state::Pipe;
    use crate::sim::flappy::theme::Theme;
    use proptest::prelude::*;

    fn jump() -> FlappyInput {
        FlappyInput { jump: true }
    }

    #[test]
    fn test_idle_until_first_jump() {
        let mut state = FlappyState::new(1, Theme::Ufo);
        tick(&mut state, &FlappyInput::default(), 0.0);
        assert_eq!(state.session.phase, GamePhase::Idle);
        assert_eq!(state.bird.y, START_Y);

        tick(&mut state, &jump(), 16.0);
        assert_eq!(state.session.phase, GamePhase::Playing);
        // Jump then one gravity step
        assert!((state.bird.velocity - (JUMP_FORCE + GRAVITY)).abs() < 1e-4);
        assert!((state.bird.y - (START_Y + JUMP_FORCE + GRAVITY)).abs() < 1e-4);
        assert_eq!(state.pipes.len(), 1);
    }

    #[test]
    fn test_falls_to_the_ground() {
        let mut state = FlappyState::new(3, Theme::Ufo);
        tick(&mut state, &jump(), 0.0);
        for _ in 0..500 {
            tick(&mut state, &FlappyInput::default(), 0.0);
            if state.session.is_over() {
                break;
            }
        }
        assert!(state.session.is_over());
        let frozen = state.bird.clone();
        tick(&mut state, &jump(), 0.0);
        assert_eq!(state.bird, frozen);
    }

    #[test]
    fn test_flap_after_game_over_keeps_the_run() {
        let mut state = FlappyState::new(3, Theme::Ufo);
        assert_eq!(flap_response(&state, false), FlapResponse::Jump);
        assert_eq!(flap_response(&state, true), FlapResponse::Jump);

        state.session.start(0.0);
        state.session.add_score(4);
        state.session.finish();
        assert_eq!(flap_response(&state, false), FlapResponse::Ignore);
        assert_eq!(flap_response(&state, true), FlapResponse::ShowGameOver);

        // A stray jump cannot reset the finished run either
        tick(&mut state, &jump(), 0.0);
        assert!(state.session.is_over());
        assert_eq!(state.session.score, 4);
    }

    #[test]
    fn test_spawn_gap() {
        let mut state = FlappyState::new(5, Theme::Ufo);
        state.session.start(0.0);
        // Keep the bird hovering in the middle of the screen
        state.pipes.push(Pipe::new(CANVAS_WIDTH, 200.0));
        for _ in 0..(PIPE_SPAWN_DISTANCE / PIPE_SPEED) as usize {
            state.bird.y = 260.0;
            state.bird.velocity = 0.0;
            tick(&mut state, &FlappyInput::default(), 0.0);
        }
        assert_eq!(state.pipes.len(), 1);
        state.bird.y = 260.0;
        state.bird.velocity = 0.0;
        tick(&mut state, &FlappyInput::default(), 0.0);
        assert_eq!(state.pipes.len(), 2);
        assert!(state.pipes[0].x < state.pipes[1].x);
    }

    #[test]
    fn test_scores_once_per_pipe() {
        let mut state = FlappyState::new(9, Theme::Ufo);
        state.session.start(0.0);
        // Gap centred on the bird, pipe just about to pass
        state
            .pipes
            .push(Pipe::new(CHARACTER_X - PIPE_WIDTH / 2.0 + PIPE_SPEED, 180.0));

        state.bird.y = 240.0;
        state.bird.velocity = -GRAVITY;
        tick(&mut state, &FlappyInput::default(), 0.0);
        assert!(!state.pipes[0].scored);
        assert_eq!(state.session.score, 0);

        state.bird.y = 240.0;
        state.bird.velocity = -GRAVITY;
        tick(&mut state, &FlappyInput::default(), 0.0);
        assert!(state.pipes[0].scored);
        assert_eq!(state.session.score, 1);

        state.bird.y = 240.0;
        state.bird.velocity = -GRAVITY;
        tick(&mut state, &FlappyInput::default(), 0.0);
        assert_eq!(state.session.score, 1);
    }

    #[test]
    fn test_collision_ends_run() {
        let mut state = FlappyState::new(11, Theme::Robot);
        state.session.start(0.0);
        // Column directly over the bird with no gap nearby
        state.pipes.push(Pipe::new(CHARACTER_X, 400.0));
        state.bird.y = 250.0;
        state.bird.velocity = -GRAVITY;
        tick(&mut state, &FlappyInput::default(), 0.0);
        assert!(state.session.is_over());
    }

    proptest! {
        #[test]
        fn prop_scored_tracks_pipe_position(
            seed in 0u64..500,
            jumps in proptest::collection::vec(any::<bool>(), 1..400),
        ) {
            let mut state = FlappyState::new(seed, Theme::Ufo);
            tick(&mut state, &jump(), 0.0);
            for j in jumps {
                let score_before = state.session.score;
                let jump = j && state.bird.y > 200.0;
                tick(&mut state, &FlappyInput { jump }, 0.0);
                if state.session.is_over() {
                    break;
                }
                // Pipes are spaced far apart, so at most one passes per frame
                prop_assert!(state.session.score - score_before <= 1);
                for pipe in &state.pipes {
                    prop_assert_eq!(pipe.scored, pipe.center_x() < CHARACTER_X);
                }
            }
        }
    }
}
