//! Collision predicates for the flappy game
//!
//! The default test is box-vs-box against the two columns of a pipe. Themes
//! with round obstacles swap in [`circle_hits_pipe`] through their
//! [`ObstacleShape`](super::theme::ObstacleShape).

use glam::Vec2;

use super::consts::{CHARACTER_HEIGHT, CHARACTER_WIDTH, PIPE_WIDTH};
use super::state::Pipe;
use crate::Rect;

/// Hitbox radius of a round obstacle
pub const ROUND_OBSTACLE_RADIUS: f32 = PIPE_WIDTH * 0.4;

/// Character left the playable band (touching the edge counts)
pub fn out_of_bounds(character: &Rect, canvas_height: f32) -> bool {
    character.y <= 0.0 || character.bottom() >= canvas_height
}

/// Box overlap with either the top or the bottom column
pub fn aabb_hits_pipe(character: &Rect, pipe: &Pipe, canvas_height: f32) -> bool {
    character.overlaps(&pipe.top_rect()) || character.overlaps(&pipe.bottom_rect(canvas_height))
}

/// Centers of the round obstacles drawn in the top and bottom columns
pub fn round_obstacle_centers(pipe: &Pipe, canvas_height: f32) -> (Vec2, Vec2) {
    let top = Vec2::new(pipe.center_x(), pipe.top_height / 2.0);
    let bottom = Vec2::new(
        pipe.center_x(),
        pipe.gap_bottom() + (canvas_height - pipe.gap_bottom()) / 2.0,
    );
    (top, bottom)
}

/// Player radius as a fraction of the larger hitbox side
pub fn player_radius(divisor: f32) -> f32 {
    CHARACTER_WIDTH.max(CHARACTER_HEIGHT) / divisor
}

/// Center-distance test against round obstacles.
///
/// A hit also requires the character box to reach past the matching gap
/// edge, so grazing an obstacle from inside the gap is forgiven.
pub fn circle_hits_pipe(
    character: &Rect,
    pipe: &Pipe,
    canvas_height: f32,
    player_radius: f32,
) -> bool {
    let (top, bottom) = round_obstacle_centers(pipe, canvas_height);
    let center = character.center();
    let reach = ROUND_OBSTACLE_RADIUS + player_radius;

    let hits_top = center.distance(top) < reach && character.y < pipe.top_height;
    let hits_bottom = center.distance(bottom) < reach && character.bottom() > pipe.gap_bottom();
    hits_top || hits_bottom
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::flappy::consts::{CANVAS_HEIGHT, CHARACTER_X};

    fn character_at(y: f32) -> Rect {
        Rect::new(CHARACTER_X, y, CHARACTER_WIDTH, CHARACTER_HEIGHT)
    }

    #[test]
    fn test_out_of_bounds() {
        assert!(out_of_bounds(&character_at(0.0), CANVAS_HEIGHT));
        assert!(out_of_bounds(&character_at(-3.0), CANVAS_HEIGHT));
        assert!(out_of_bounds(
            &character_at(CANVAS_HEIGHT - CHARACTER_HEIGHT),
            CANVAS_HEIGHT
        ));
        assert!(!out_of_bounds(&character_at(250.0), CANVAS_HEIGHT));
    }

    #[test]
    fn test_aabb_gap_is_safe() {
        let pipe = Pipe::new(60.0, 200.0);
        // Inside the gap
        assert!(!aabb_hits_pipe(&character_at(250.0), &pipe, CANVAS_HEIGHT));
        // Clipping the top column
        assert!(aabb_hits_pipe(&character_at(190.0), &pipe, CANVAS_HEIGHT));
        // Clipping the bottom column
        assert!(aabb_hits_pipe(&character_at(340.0), &pipe, CANVAS_HEIGHT));
        // The bottom column ends at the canvas edge
        assert!(!aabb_hits_pipe(&character_at(340.0), &pipe, 340.0));
    }

    #[test]
    fn test_aabb_requires_horizontal_overlap() {
        let far = Pipe::new(300.0, 200.0);
        assert!(!aabb_hits_pipe(&character_at(10.0), &far, CANVAS_HEIGHT));
    }

    #[test]
    fn test_circle_corner_is_forgiven() {
        // Character clips the top column's box at its corner but stays far from
        // the asteroid drawn in the middle of a tall column
        let pipe = Pipe::new(CHARACTER_X + CHARACTER_WIDTH - 5.0, 300.0);
        let character = character_at(290.0);
        assert!(aabb_hits_pipe(&character, &pipe, CANVAS_HEIGHT));
        assert!(!circle_hits_pipe(
            &character,
            &pipe,
            CANVAS_HEIGHT,
            player_radius(3.0)
        ));
    }

    #[test]
    fn test_circle_hits_near_center() {
        // Top column 60 px tall: its obstacle sits at y = 30
        let pipe = Pipe::new(CHARACTER_X - 5.0, 60.0);
        let character = character_at(25.0);
        assert!(circle_hits_pipe(
            &character,
            &pipe,
            CANVAS_HEIGHT,
            player_radius(2.0)
        ));
    }

    #[test]
    fn test_player_radius_divisors() {
        assert_eq!(player_radius(2.0), 20.0);
        assert!((player_radius(3.0) - 40.0 / 3.0).abs() < 1e-5);
    }
}
