//! Flappy: steer a themed character through scrolling obstacle gaps

pub mod collision;
pub mod obstacles;
pub mod state;
pub mod theme;
pub mod tick;

pub use state::{Bird, FlappyState, Pipe};
pub use theme::{ObstacleShape, Palette, Theme};
pub use tick::{FlapResponse, FlappyInput, flap_response, tick};

/// Tunables, in canvas pixels and frames
pub mod consts {
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 500.0;

    /// Added to velocity every frame
    pub const GRAVITY: f32 = 0.3;
    /// Velocity set by a jump
    pub const JUMP_FORCE: f32 = -8.0;

    pub const PIPE_SPEED: f32 = 2.0;
    pub const PIPE_WIDTH: f32 = 50.0;
    pub const PIPE_GAP: f32 = 150.0;
    /// Distance the newest pipe travels before the next one spawns
    pub const PIPE_SPAWN_DISTANCE: f32 = 300.0;
    /// Minimum obstacle height above and below the gap
    pub const PIPE_MARGIN: f32 = 50.0;

    pub const CHARACTER_X: f32 = 50.0;
    pub const CHARACTER_WIDTH: f32 = 40.0;
    pub const CHARACTER_HEIGHT: f32 = 20.0;
    pub const START_Y: f32 = 250.0;

    pub const WING_FLAP_STEP: f32 = 0.2;
}
