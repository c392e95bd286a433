//! Pixel Arcade - four small browser arcade games
//!
//! Core modules:
//! - `sim`: Simulation for each game (flappy, snake, tetris, memory)
//! - `renderer`: Immediate-mode 2D surface batched onto WebGPU
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Key-value store (LocalStorage on web)
//! - `highscores`: Per-game score lists and leaderboard views
//! - `settings`: Player preferences

pub mod headless;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::{GameKey, HighScores, ScoreRecord};
pub use persistence::{KeyValueStore, MemoryStore, StoreError};
pub use settings::Settings;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in canvas pixels (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Touching edges
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 20.0, 5.0, 5.0)));
    }

    #[test]
    fn test_rect_contains_and_center() {
        let r = Rect::new(10.0, 20.0, 40.0, 20.0);
        assert_eq!(r.center(), Vec2::new(30.0, 30.0));
        assert!(r.contains(Vec2::new(10.0, 20.0)));
        assert!(!r.contains(Vec2::new(50.0, 30.0)));
    }
}
