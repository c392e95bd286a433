use glam::Vec2;

use crate::Rect;
use crate::renderer::surface::{Surface, rgb};
use crate::sim::snake::{CELL_SIZE, Cell, Direction, SnakeState};

const BACKGROUND: u32 = 0xf0f0f0;
const GRID_LINE: u32 = 0xdddddd;
const FOOD: u32 = 0xff0000;
const HEAD: u32 = 0x006400;
const BODY: u32 = 0x00a000;

pub fn canvas_size(state: &SnakeState) -> Vec2 {
    Vec2::new(state.width as f32, state.height as f32) * CELL_SIZE
}

fn cell_rect(cell: Cell) -> Rect {
    Rect::new(
        cell.x as f32 * CELL_SIZE,
        cell.y as f32 * CELL_SIZE,
        CELL_SIZE,
        CELL_SIZE,
    )
}

/// Eye positions for a head cell facing `direction`
fn eyes(head: Rect, direction: Direction) -> [Vec2; 2] {
    let offset = CELL_SIZE / 3.0;
    let (x, y) = (head.x, head.y);
    let (r, b) = (head.right(), head.bottom());
    match direction {
        Direction::Right => [Vec2::new(r - offset, y + offset), Vec2::new(r - offset, b - offset)],
        Direction::Left => [Vec2::new(x + offset, y + offset), Vec2::new(x + offset, b - offset)],
        Direction::Up => [Vec2::new(x + offset, y + offset), Vec2::new(r - offset, y + offset)],
        Direction::Down => [Vec2::new(x + offset, b - offset), Vec2::new(r - offset, b - offset)],
    }
}

pub fn render(state: &SnakeState, surface: &mut dyn Surface) {
    let size = canvas_size(state);
    surface.clear(rgb(BACKGROUND));

    for x in 0..=state.width {
        let px = (x as f32 * CELL_SIZE).min(size.x - 1.0);
        surface.fill_rect(Rect::new(px, 0.0, 1.0, size.y), rgb(GRID_LINE));
    }
    for y in 0..=state.height {
        let py = (y as f32 * CELL_SIZE).min(size.y - 1.0);
        surface.fill_rect(Rect::new(0.0, py, size.x, 1.0), rgb(GRID_LINE));
    }

    let food = cell_rect(state.food);
    surface.fill_circle(food.center(), CELL_SIZE / 2.0 - 1.0, rgb(FOOD));

    // Tail first so the head ends on top
    for (i, &cell) in state.segments.iter().enumerate().rev() {
        let color = if i == 0 { HEAD } else { BODY };
        let rect = cell_rect(cell);
        surface.fill_rect(Rect::new(rect.x + 1.0, rect.y + 1.0, rect.w - 2.0, rect.h - 2.0), rgb(color));
    }

    if !state.is_empty() {
        let head = cell_rect(state.head());
        let size = CELL_SIZE / 5.0;
        for eye in eyes(head, state.direction) {
            let rect = Rect::new(eye.x - size / 2.0, eye.y - size / 2.0, size, size);
            surface.fill_rect(rect, rgb(0xffffff));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::shapes::ShapeBatch;

    #[test]
    fn test_canvas_matches_grid() {
        let state = SnakeState::new(1);
        assert_eq!(canvas_size(&state), Vec2::new(400.0, 400.0));
    }

    #[test]
    fn test_eyes_follow_direction() {
        let head = cell_rect(Cell::new(2, 2));
        let [a, b] = eyes(head, Direction::Right);
        assert!(a.x > head.center().x && b.x > head.center().x);
        let [a, b] = eyes(head, Direction::Up);
        assert!(a.y < head.center().y && b.y < head.center().y);
        assert!(head.contains(a) && head.contains(b));
    }

    #[test]
    fn test_render_paints_background() {
        let state = SnakeState::new(7);
        let mut batch = ShapeBatch::new(400.0, 400.0);
        render(&state, &mut batch);
        assert_eq!(batch.clear_color(), rgb(BACKGROUND));
        assert!(!batch.vertices().is_empty());
    }
}
