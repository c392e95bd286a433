//! Immediate-mode 2D drawing surface
//!
//! Render steps only ever see this trait. Coordinates are canvas pixels with
//! the origin at the top-left corner and y growing downward.

use glam::Vec2;

use crate::Rect;

/// RGBA color, components in 0..=1, written to the target unconverted
pub type Color = [f32; 4];

/// Build a color from a `0xRRGGBB` literal
pub const fn rgb(hex: u32) -> Color {
    rgba(hex, 1.0)
}

/// Build a color from a `0xRRGGBB` literal with alpha
pub const fn rgba(hex: u32, alpha: f32) -> Color {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        alpha,
    ]
}

/// Linear blend between two colors (t = 0 gives `a`)
pub fn mix(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

pub trait Surface {
    /// Logical size of the surface in pixels
    fn size(&self) -> Vec2;

    /// Discard everything drawn so far and fill with `color`
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Circle outline of `width` pixels, drawn inside `radius`
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color);

    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color);

    /// Outline drawn inside the rectangle bounds
    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) {
        let w = width.min(rect.w / 2.0).min(rect.h / 2.0);
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, w), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - w, rect.w, w), color);
        self.fill_rect(Rect::new(rect.x, rect.y + w, w, rect.h - 2.0 * w), color);
        self.fill_rect(
            Rect::new(rect.right() - w, rect.y + w, w, rect.h - 2.0 * w),
            color,
        );
    }

    /// Vertical gradient approximated with horizontal bands
    fn fill_vertical_gradient(&mut self, rect: Rect, top: Color, bottom: Color, bands: u32) {
        let bands = bands.max(1);
        let band_h = rect.h / bands as f32;
        for i in 0..bands {
            let t = i as f32 / (bands - 1).max(1) as f32;
            self.fill_rect(
                Rect::new(rect.x, rect.y + i as f32 * band_h, rect.w, band_h + 0.5),
                mix(top, bottom, t),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_decodes_hex() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0, 1.0]);
        let c = rgba(0x0000ff, 0.5);
        assert_eq!(c, [0.0, 0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_mix_clamps() {
        let black = rgb(0x000000);
        let white = rgb(0xffffff);
        assert_eq!(mix(black, white, 2.0), white);
        assert_eq!(mix(black, white, 0.5)[0], 0.5);
    }
}
