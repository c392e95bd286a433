use glam::Vec2;

use crate::Rect;
use crate::renderer::surface::{Color, Surface, rgb};
use crate::sim::tetris::board::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::sim::tetris::{CELL_SIZE, Piece, TetrisState};

const BOARD_PX_WIDTH: f32 = BOARD_WIDTH as f32 * CELL_SIZE;
const BOARD_PX_HEIGHT: f32 = BOARD_HEIGHT as f32 * CELL_SIZE;
const PANEL_X: f32 = BOARD_PX_WIDTH + 20.0;

/// Board plus the side panel
pub const CANVAS_SIZE: Vec2 = Vec2::new(BOARD_PX_WIDTH + 200.0, BOARD_PX_HEIGHT);

/// Next-piece preview; the page overlays its caption
pub const PREVIEW_BOX: Rect = Rect::new(PANEL_X, 0.0, 150.0, 150.0);
/// Score, level and lines readout
pub const INFO_BOX: Rect = Rect::new(PANEL_X, 170.0, 150.0, 150.0);
/// Key reference
pub const CONTROLS_BOX: Rect = Rect::new(PANEL_X, 340.0, 150.0, 180.0);

/// Top-left of `piece`'s shape matrix, centered in the preview box
fn preview_origin(piece: &Piece) -> Vec2 {
    let span = Vec2::new(piece.width() as f32, piece.shape.len() as f32) * CELL_SIZE;
    PREVIEW_BOX.center() - span / 2.0
}

const BACKGROUND: u32 = 0xf0f0f0;
const GRID_LINE: u32 = 0xdddddd;

fn block(surface: &mut dyn Surface, at: Vec2, color: Color) {
    let rect = Rect::new(at.x, at.y, CELL_SIZE, CELL_SIZE);
    surface.fill_rect(rect, color);
    surface.stroke_rect(rect, 1.0, rgb(0x000000));
}

fn panel(surface: &mut dyn Surface, rect: Rect) {
    surface.fill_rect(rect, rgb(0xffffff));
    surface.stroke_rect(rect, 1.0, rgb(0x000000));
}

pub fn render(state: &TetrisState, surface: &mut dyn Surface) {
    surface.clear(rgb(BACKGROUND));

    for x in 0..=BOARD_WIDTH {
        let px = x as f32 * CELL_SIZE;
        surface.fill_rect(Rect::new(px - 0.25, 0.0, 0.5, BOARD_PX_HEIGHT), rgb(GRID_LINE));
    }
    for y in 0..=BOARD_HEIGHT {
        let py = y as f32 * CELL_SIZE;
        surface.fill_rect(Rect::new(0.0, py - 0.25, BOARD_PX_WIDTH, 0.5), rgb(GRID_LINE));
    }

    for (y, row) in state.board.rows().iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            if let Some(kind) = cell {
                block(surface, Vec2::new(x as f32, y as f32) * CELL_SIZE, kind.color());
            }
        }
    }

    let color = state.current.kind.color();
    for (x, y) in state.active_cells() {
        // Cells above the board are hidden
        if y >= 0 {
            block(surface, Vec2::new(x as f32, y as f32) * CELL_SIZE, color);
        }
    }

    panel(surface, PREVIEW_BOX);
    let color = state.next.kind.color();
    let origin = preview_origin(&state.next);
    for (x, y) in state.next.cells() {
        block(surface, origin + Vec2::new(x as f32, y as f32) * CELL_SIZE, color);
    }

    panel(surface, INFO_BOX);
    panel(surface, CONTROLS_BOX);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::shapes::ShapeBatch;
    use crate::sim::tetris::Tetromino;

    #[test]
    fn test_panels_sit_right_of_board() {
        assert_eq!(CANVAS_SIZE, Vec2::new(500.0, 600.0));
        for rect in [PREVIEW_BOX, INFO_BOX, CONTROLS_BOX] {
            assert!(rect.x >= BOARD_PX_WIDTH);
            assert!(rect.right() <= CANVAS_SIZE.x);
        }
        assert!(!PREVIEW_BOX.overlaps(&INFO_BOX));
        assert!(!INFO_BOX.overlaps(&CONTROLS_BOX));
    }

    #[test]
    fn test_preview_fits_in_box() {
        for kind in Tetromino::ALL {
            let piece = Piece::new(kind);
            let origin = preview_origin(&piece);
            for (x, y) in piece.cells() {
                let at = origin + Vec2::new(x as f32, y as f32) * CELL_SIZE;
                let cell = Rect::new(at.x, at.y, CELL_SIZE, CELL_SIZE);
                assert!(cell.x >= PREVIEW_BOX.x && cell.y >= PREVIEW_BOX.y, "{:?}", kind);
                assert!(cell.right() <= PREVIEW_BOX.right(), "{:?}", kind);
                assert!(cell.bottom() <= PREVIEW_BOX.bottom(), "{:?}", kind);
            }
        }
    }

    #[test]
    fn test_render_board() {
        let state = TetrisState::new(11);
        let mut batch = ShapeBatch::new(CANVAS_SIZE.x, CANVAS_SIZE.y);
        render(&state, &mut batch);
        assert_eq!(batch.clear_color(), rgb(BACKGROUND));
        assert!(batch.vertices().len() > 6 * (BOARD_WIDTH + BOARD_HEIGHT));
    }
}
