//! Memory card grid
//!
//! Emoji cannot be drawn through the shape pipeline, so each symbol gets a
//! distinct glyph: one of six colors times one of four shapes covers all 24.

use glam::Vec2;

use crate::Rect;
use crate::renderer::surface::{Color, Surface, rgb};
use crate::sim::memory::{Card, Difficulty, MemoryState};

/// Space between cards and around the grid
pub const GAP: f32 = 16.0;

const BACKGROUND: u32 = 0xf3f4f6;
const FACE_DOWN: u32 = 0x3b82f6;
const FACE_UP: u32 = 0xffffff;
const MATCHED: u32 = 0xdcfce7;

const GLYPH_COLORS: [u32; 6] = [0xef4444, 0xf97316, 0xeab308, 0x22c55e, 0x8b5cf6, 0xec4899];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GlyphShape {
    Circle,
    Square,
    Triangle,
    Diamond,
}

impl GlyphShape {
    const ALL: [GlyphShape; 4] = [
        GlyphShape::Circle,
        GlyphShape::Square,
        GlyphShape::Triangle,
        GlyphShape::Diamond,
    ];
}

fn glyph(symbol: u8) -> (GlyphShape, Color) {
    let symbol = symbol as usize;
    let color = GLYPH_COLORS[symbol % GLYPH_COLORS.len()];
    let shape = GlyphShape::ALL[(symbol / GLYPH_COLORS.len()) % GlyphShape::ALL.len()];
    (shape, rgb(color))
}

fn rows(difficulty: Difficulty) -> usize {
    (difficulty.pairs() * 2).div_ceil(difficulty.columns())
}

/// Canvas size needed for a full deck
pub fn board_size(difficulty: Difficulty) -> Vec2 {
    let card = difficulty.card_size();
    let cols = difficulty.columns() as f32;
    let rows = rows(difficulty) as f32;
    Vec2::new(
        cols * card + (cols + 1.0) * GAP,
        rows * card + (rows + 1.0) * GAP,
    )
}

/// Where the card dealt at `index` sits
pub fn card_rect(difficulty: Difficulty, index: usize) -> Rect {
    let card = difficulty.card_size();
    let col = (index % difficulty.columns()) as f32;
    let row = (index / difficulty.columns()) as f32;
    Rect::new(
        GAP + col * (card + GAP),
        GAP + row * (card + GAP),
        card,
        card,
    )
}

/// Card under a canvas point, if any (gaps hit nothing)
pub fn card_at(difficulty: Difficulty, count: usize, point: Vec2) -> Option<usize> {
    let pitch = difficulty.card_size() + GAP;
    let local = point - Vec2::splat(GAP);
    if local.x < 0.0 || local.y < 0.0 {
        return None;
    }
    let col = (local.x / pitch) as usize;
    let row = (local.y / pitch) as usize;
    if col >= difficulty.columns() {
        return None;
    }
    let index = row * difficulty.columns() + col;
    (index < count && card_rect(difficulty, index).contains(point)).then_some(index)
}

fn draw_glyph(surface: &mut dyn Surface, rect: Rect, symbol: u8) {
    let (shape, color) = glyph(symbol);
    let c = rect.center();
    let r = rect.w * 0.3;
    match shape {
        GlyphShape::Circle => surface.fill_circle(c, r, color),
        GlyphShape::Square => surface.fill_rect(Rect::new(c.x - r, c.y - r, 2.0 * r, 2.0 * r), color),
        GlyphShape::Triangle => surface.fill_triangle(
            Vec2::new(c.x, c.y - r),
            Vec2::new(c.x + r, c.y + r),
            Vec2::new(c.x - r, c.y + r),
            color,
        ),
        GlyphShape::Diamond => {
            let (top, bottom) = (Vec2::new(c.x, c.y - r), Vec2::new(c.x, c.y + r));
            let (left, right) = (Vec2::new(c.x - r, c.y), Vec2::new(c.x + r, c.y));
            surface.fill_triangle(top, right, bottom, color);
            surface.fill_triangle(top, bottom, left, color);
        }
    }
}

fn draw_card(surface: &mut dyn Surface, rect: Rect, card: &Card) {
    let face = if card.matched {
        MATCHED
    } else if card.flipped {
        FACE_UP
    } else {
        FACE_DOWN
    };
    surface.fill_rect(rect, rgb(face));
    surface.stroke_rect(rect, 2.0, rgb(0xd1d5db));
    if card.is_face_up() {
        draw_glyph(surface, rect, card.symbol);
    } else {
        surface.stroke_circle(rect.center(), rect.w * 0.2, 3.0, rgb(0x93c5fd));
    }
}

pub fn render(state: &MemoryState, surface: &mut dyn Surface) {
    surface.clear(rgb(BACKGROUND));
    for (index, card) in state.cards.iter().enumerate() {
        draw_card(surface, card_rect(state.difficulty, index), card);
    }
}
