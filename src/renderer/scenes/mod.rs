//! Per-game render steps
//!
//! Each scene paints a whole frame from read-only game state onto a
//! [`Surface`](super::Surface). Text (scores, labels, overlays) lives in the
//! page around the canvas, not here.

pub mod flappy;
pub mod memory;
pub mod snake;
pub mod tetris;
