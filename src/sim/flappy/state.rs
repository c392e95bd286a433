//! Flappy game state and entities

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::consts::*;
use super::theme::Theme;
use crate::Rect;
use crate::sim::session::GameSession;

/// The player character (drawn per theme: UFO, rocket, dragon, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    /// Top edge of the hitbox
    pub y: f32,
    pub velocity: f32,
    /// Animation phase in [0, π), render only
    pub wing_flap: f32,
}

impl Default for Bird {
    fn default() -> Self {
        Self {
            y: START_Y,
            velocity: 0.0,
            wing_flap: 0.0,
        }
    }
}

impl Bird {
    pub fn hitbox(&self) -> Rect {
        Rect::new(CHARACTER_X, self.y, CHARACTER_WIDTH, CHARACTER_HEIGHT)
    }

    /// Jumping replaces the current velocity rather than adding to it
    pub fn jump(&mut self) {
        self.velocity = JUMP_FORCE;
    }

    /// Apply gravity then integrate position
    pub fn fall(&mut self) {
        self.velocity += GRAVITY;
        self.y += self.velocity;
        self.wing_flap = (self.wing_flap + WING_FLAP_STEP) % std::f32::consts::PI;
    }

    /// Render tilt in radians, nose down while falling
    pub fn tilt(&self) -> f32 {
        (self.velocity * 0.1).clamp(-0.5, 0.5)
    }
}

/// A pair of obstacles (top and bottom) sharing one column
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub x: f32,
    /// Height of the top obstacle; the gap starts here
    pub top_height: f32,
    pub scored: bool,
}

impl Pipe {
    pub fn new(x: f32, top_height: f32) -> Self {
        Self {
            x,
            top_height,
            scored: false,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.x + PIPE_WIDTH / 2.0
    }

    /// Bottom edge of the gap
    pub fn gap_bottom(&self) -> f32 {
        self.top_height + PIPE_GAP
    }

    pub fn top_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, PIPE_WIDTH, self.top_height)
    }

    pub fn bottom_rect(&self, canvas_height: f32) -> Rect {
        Rect::new(
            self.x,
            self.gap_bottom(),
            PIPE_WIDTH,
            canvas_height - self.gap_bottom(),
        )
    }

    /// Fully past the left edge
    pub fn is_offscreen(&self) -> bool {
        self.x + PIPE_WIDTH <= 0.0
    }
}

/// Complete flappy state for one session
#[derive(Debug, Clone)]
pub struct FlappyState {
    pub session: GameSession,
    pub bird: Bird,
    /// Ordered by insertion, which is also ascending x
    pub pipes: Vec<Pipe>,
    pub theme: Theme,
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Frames simulated while playing
    pub frames: u64,
    rng: Pcg32,
}

impl FlappyState {
    pub fn new(seed: u64, theme: Theme) -> Self {
        Self {
            session: GameSession::new(),
            bird: Bird::default(),
            pipes: Vec::new(),
            theme,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            frames: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Replace this session with a fresh idle one, keeping the theme
    pub fn reset(&mut self, seed: u64) {
        let session = self.session.successor();
        *self = Self {
            session,
            ..Self::new(seed, self.theme)
        };
    }

    /// Theme changes are cosmetic but swap the collision predicate, so they
    /// are only accepted outside of play
    pub fn set_theme(&mut self, theme: Theme) -> bool {
        if self.session.is_playing() {
            return false;
        }
        if self.theme != theme {
            log::info!("Flappy theme: {}", theme.id());
            self.theme = theme;
        }
        true
    }

    /// Whether the spawn gap has opened behind the newest pipe
    pub fn should_spawn(&self) -> bool {
        match self.pipes.last() {
            None => true,
            Some(last) => self.canvas_width - last.x > PIPE_SPAWN_DISTANCE,
        }
    }

    /// Push a new pipe at the right edge with a random gap position that
    /// keeps `PIPE_MARGIN` above and below
    pub fn spawn_pipe(&mut self) {
        let span = (self.canvas_height - PIPE_GAP - 2.0 * PIPE_MARGIN).max(0.0);
        let top_height = self.rng.random::<f32>() * span + PIPE_MARGIN;
        self.pipes.push(Pipe::new(self.canvas_width, top_height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_overrides_velocity() {
        let mut bird = Bird::default();
        bird.velocity = 12.0;
        bird.jump();
        assert_eq!(bird.velocity, JUMP_FORCE);
        bird.velocity = -20.0;
        bird.jump();
        assert_eq!(bird.velocity, JUMP_FORCE);
    }

    #[test]
    fn test_spawned_gap_respects_margins() {
        let mut state = FlappyState::new(7, Theme::Ufo);
        for _ in 0..200 {
            state.spawn_pipe();
        }
        for pipe in &state.pipes {
            assert!(pipe.top_height >= PIPE_MARGIN);
            assert!(pipe.gap_bottom() <= state.canvas_height - PIPE_MARGIN);
            assert_eq!(pipe.x, state.canvas_width);
        }
    }

    #[test]
    fn test_reset_keeps_theme_and_bumps_token() {
        let mut state = FlappyState::new(1, Theme::Dragon);
        let old = state.session.token();
        state.session.start(0.0);
        state.spawn_pipe();
        state.reset(2);
        assert_eq!(state.theme, Theme::Dragon);
        assert!(state.pipes.is_empty());
        assert!(state.session.is_idle());
        assert_ne!(state.session.token(), old);
    }

    #[test]
    fn test_theme_locked_while_playing() {
        let mut state = FlappyState::new(1, Theme::Ufo);
        state.session.start(0.0);
        assert!(!state.set_theme(Theme::Rocket));
        assert_eq!(state.theme, Theme::Ufo);
    }
}
