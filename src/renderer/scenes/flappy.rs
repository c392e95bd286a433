//! Flappy scene: themed sky, obstacles and character

use glam::Vec2;

use crate::Rect;
use crate::renderer::surface::{Color, Surface, mix, rgb, rgba};
use crate::sim::flappy::consts::{CHARACTER_HEIGHT, CHARACTER_WIDTH};
use crate::sim::flappy::{Bird, FlappyState, Palette, Theme};

/// Frames per second the simulation is paced at, for animation time
const FRAME_RATE: f32 = 60.0;

/// Draw shapes in a frame rotated about `origin`
struct Tilted<'a> {
    surface: &'a mut dyn Surface,
    origin: Vec2,
    rotation: Vec2,
}

impl<'a> Tilted<'a> {
    fn new(surface: &'a mut dyn Surface, origin: Vec2, angle: f32) -> Self {
        Self {
            surface,
            origin,
            rotation: Vec2::from_angle(angle),
        }
    }

    fn map(&self, local: Vec2) -> Vec2 {
        self.origin + self.rotation.rotate(local)
    }

    fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        let (a, b, c) = (self.map(a), self.map(b), self.map(c));
        self.surface.fill_triangle(a, b, c, color);
    }

    /// Rectangle given by its local top-left corner and size
    fn rect(&mut self, min: Vec2, size: Vec2, color: Color) {
        let tl = min;
        let tr = min + Vec2::new(size.x, 0.0);
        let bl = min + Vec2::new(0.0, size.y);
        let br = min + size;
        self.triangle(tl, tr, bl, color);
        self.triangle(bl, tr, br, color);
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let center = self.map(center);
        self.surface.fill_circle(center, radius, color);
    }
}

/// Cheap deterministic scatter in [0, 1)^2
fn scatter(i: u32) -> Vec2 {
    let h = |n: u32| {
        let mut x = n.wrapping_mul(0x9e37_79b9) ^ 0x85eb_ca6b;
        x ^= x >> 15;
        x = x.wrapping_mul(0x2c1b_3c6d);
        x ^= x >> 12;
        (x & 0xffff) as f32 / 65536.0
    };
    Vec2::new(h(i * 2), h(i * 2 + 1))
}

fn sky(surface: &mut dyn Surface, theme: Theme, palette: &Palette, time: f32) {
    let size = surface.size();
    surface.clear(palette.sky_top);
    surface.fill_vertical_gradient(
        Rect::new(0.0, 0.0, size.x, size.y),
        palette.sky_top,
        palette.sky_bottom,
        16,
    );

    match theme {
        Theme::Ufo | Theme::Rocket => {
            for i in 0..40 {
                let p = scatter(i) * size;
                let twinkle = 0.5 + 0.5 * (time * 2.0 + i as f32).sin();
                surface.fill_circle(p, 1.0 + twinkle, rgba(0xffffff, 0.3 + 0.5 * twinkle));
            }
        }
        Theme::Butterfly | Theme::Balloon | Theme::PaperPlane => {
            for i in 0..5 {
                let base = scatter(i + 100) * size;
                let x = (base.x - time * 15.0).rem_euclid(size.x + 120.0) - 60.0;
                let y = base.y * 0.5;
                for (dx, r) in [(-18.0, 14.0), (0.0, 20.0), (20.0, 15.0)] {
                    surface.fill_circle(Vec2::new(x + dx, y), r, rgba(0xffffff, 0.7));
                }
            }
            for i in 0..12 {
                let p = scatter(i + 200) * size;
                let drift = Vec2::new(-time * 20.0, (time + i as f32).sin() * 6.0);
                let q = Vec2::new((p.x + drift.x).rem_euclid(size.x), p.y + drift.y);
                let [r, g, b, _] = palette.detail;
                surface.fill_circle(q, 2.5, [r, g, b, 0.4]);
            }
        }
        Theme::Dragon => {
            for i in 0..25 {
                let p = scatter(i + 300) * size;
                let y = (p.y - time * 40.0).rem_euclid(size.y);
                let glow = mix(rgb(0xff4500), rgb(0xffd700), scatter(i + 400).x);
                surface.fill_circle(Vec2::new(p.x, y), 1.5, glow);
            }
        }
        Theme::Ghost => {
            for i in 0..6 {
                let p = scatter(i + 500) * size;
                let x = (p.x + (time * 0.3 + i as f32).sin() * 30.0).rem_euclid(size.x);
                surface.fill_circle(Vec2::new(x, p.y), 40.0, rgba(0xffffff, 0.04));
            }
            surface.fill_circle(Vec2::new(size.x * 0.8, 60.0), 30.0, rgba(0xfffacd, 0.9));
        }
        Theme::Robot => {
            let grid = rgba(0x00ffff, 0.08);
            let offset = (time * 30.0).rem_euclid(40.0);
            let mut x = -offset;
            while x < size.x {
                surface.fill_rect(Rect::new(x, 0.0, 1.0, size.y), grid);
                x += 40.0;
            }
            let mut y = 0.0;
            while y < size.y {
                surface.fill_rect(Rect::new(0.0, y, size.x, 1.0), grid);
                y += 40.0;
            }
        }
    }
}

fn character(surface: &mut dyn Surface, bird: &Bird, theme: Theme, palette: &Palette, time: f32) {
    let hitbox = bird.hitbox();
    let mut pen = Tilted::new(surface, hitbox.center(), bird.tilt());
    let (w, h) = (CHARACTER_WIDTH, CHARACTER_HEIGHT);
    let (hw, hh) = (w / 2.0, h / 2.0);
    let flap = bird.wing_flap.sin();

    match theme {
        Theme::Ufo => {
            pen.circle(Vec2::new(0.0, -hh * 0.4), hh * 0.8, rgba(0x87ceeb, 0.8));
            pen.rect(Vec2::new(-hw, -hh * 0.3), Vec2::new(w, hh * 0.9), palette.character);
            pen.circle(Vec2::new(-hw, hh * 0.15), hh * 0.45, palette.character);
            pen.circle(Vec2::new(hw, hh * 0.15), hh * 0.45, palette.character);
            for i in 0..5 {
                let on = ((time * 4.0) as i32 + i) % 2 == 0;
                let color = if on { palette.accent } else { rgba(0x40c4ff, 0.3) };
                pen.circle(Vec2::new(-hw + 4.0 + i as f32 * (w - 8.0) / 4.0, hh * 0.3), 2.0, color);
            }
        }
        Theme::Rocket => {
            let flame = 6.0 + 4.0 * (time * 20.0).sin().abs();
            pen.triangle(
                Vec2::new(-hw, -hh * 0.5),
                Vec2::new(-hw, hh * 0.5),
                Vec2::new(-hw - flame, 0.0),
                rgb(0xffa500),
            );
            pen.rect(Vec2::new(-hw, -hh * 0.6), Vec2::new(w * 0.75, h * 0.6), palette.character);
            pen.triangle(
                Vec2::new(hw * 0.5, -hh * 0.6),
                Vec2::new(hw * 0.5, hh * 0.6),
                Vec2::new(hw, 0.0),
                palette.accent,
            );
            pen.triangle(Vec2::new(-hw, -hh * 0.6), Vec2::new(-hw * 0.5, -hh * 0.6), Vec2::new(-hw, -hh), palette.accent);
            pen.triangle(Vec2::new(-hw, hh * 0.6), Vec2::new(-hw * 0.5, hh * 0.6), Vec2::new(-hw, hh), palette.accent);
            pen.circle(Vec2::new(hw * 0.1, 0.0), hh * 0.25, rgb(0x87ceeb));
        }
        Theme::Butterfly => {
            let spread = 0.6 + 0.4 * flap;
            pen.circle(Vec2::new(-hw * 0.35, -hh * spread), hh * 0.9, palette.character);
            pen.circle(Vec2::new(-hw * 0.35, hh * spread), hh * 0.7, palette.accent);
            pen.circle(Vec2::new(hw * 0.1, -hh * spread), hh * 0.7, palette.character);
            pen.circle(Vec2::new(hw * 0.1, hh * spread), hh * 0.5, palette.accent);
            pen.rect(Vec2::new(-hw * 0.8, -2.0), Vec2::new(w * 0.8, 4.0), rgb(0x000000));
            pen.circle(Vec2::new(hw * 0.05, 0.0), 3.0, rgb(0x000000));
        }
        Theme::Dragon => {
            let wing = hh * (0.4 + 0.8 * flap);
            pen.triangle(
                Vec2::new(-hw * 0.3, -hh * 0.2),
                Vec2::new(hw * 0.3, -hh * 0.2),
                Vec2::new(0.0, -hh - wing),
                rgb(0xb22222),
            );
            pen.rect(Vec2::new(-hw * 0.8, -hh * 0.5), Vec2::new(w * 0.65, h * 0.6), palette.character);
            pen.triangle(
                Vec2::new(-hw * 0.8, -hh * 0.3),
                Vec2::new(-hw * 0.8, hh * 0.1),
                Vec2::new(-hw * 1.1, hh * 0.4),
                palette.character,
            );
            pen.circle(Vec2::new(hw * 0.6, -hh * 0.2), hh * 0.6, palette.character);
            pen.circle(Vec2::new(hw * 0.75, -hh * 0.35), 2.0, rgb(0xffd700));
            if (time * 3.0).sin() > 0.6 {
                pen.triangle(
                    Vec2::new(hw * 1.1, -hh * 0.3),
                    Vec2::new(hw * 1.1, hh * 0.1),
                    Vec2::new(hw * 1.8, -hh * 0.1),
                    palette.accent,
                );
            }
        }
        Theme::Ghost => {
            let body = rgba(0xe6e6fa, 0.75);
            pen.circle(Vec2::new(0.0, -hh * 0.1), hh * 0.9, body);
            pen.rect(Vec2::new(-hh * 0.9, -hh * 0.1), Vec2::new(h * 0.9, hh * 0.9), body);
            for i in 0..3 {
                let x = -hh * 0.9 + i as f32 * h * 0.3;
                let sway = (time * 6.0 + i as f32).sin() * 2.0;
                pen.triangle(
                    Vec2::new(x, hh * 0.8),
                    Vec2::new(x + h * 0.3, hh * 0.8),
                    Vec2::new(x + h * 0.15 + sway, hh * 1.3),
                    body,
                );
            }
            pen.circle(Vec2::new(-hh * 0.35, -hh * 0.2), 2.5, palette.accent);
            pen.circle(Vec2::new(hh * 0.35, -hh * 0.2), 2.5, palette.accent);
        }
        Theme::PaperPlane => {
            let fold = hh * (0.2 + 0.2 * flap);
            pen.triangle(Vec2::new(-hw, -hh), Vec2::new(hw, 0.0), Vec2::new(-hw * 0.4, fold), palette.character);
            pen.triangle(Vec2::new(-hw, hh * 0.6), Vec2::new(hw, 0.0), Vec2::new(-hw * 0.4, fold), rgb(0xdcdcdc));
            pen.rect(Vec2::new(-hw * 0.4, fold - 0.5), Vec2::new(w * 0.7, 1.0), palette.accent);
        }
        Theme::Balloon => {
            let breathe = 1.0 + 0.05 * (time * 3.0).sin();
            pen.rect(Vec2::new(-0.5, hh * 0.6), Vec2::new(1.0, h * 0.9), rgb(0x696969));
            pen.circle(Vec2::ZERO, hh * 1.1 * breathe, palette.character);
            pen.circle(Vec2::new(-hh * 0.4, -hh * 0.4), hh * 0.25, rgba(0xffffff, 0.6));
            pen.triangle(
                Vec2::new(-3.0, hh * 1.2),
                Vec2::new(3.0, hh * 1.2),
                Vec2::new(0.0, hh * 0.9),
                palette.character,
            );
        }
        Theme::Robot => {
            pen.rect(Vec2::new(-hw * 0.6, -hh * 0.2), Vec2::new(w * 0.6, h * 0.6), palette.character);
            pen.rect(Vec2::new(-hw * 0.4, -hh), Vec2::new(w * 0.4, h * 0.4), rgb(0x5f9ea0));
            pen.rect(Vec2::new(-0.5, -hh * 1.5), Vec2::new(1.0, hh * 0.5), rgb(0x808080));
            let blink = (time * 2.0).fract() < 0.85;
            pen.circle(Vec2::new(0.0, -hh * 1.5), 2.0, if blink { palette.accent } else { rgb(0x550000) });
            let eye = if blink { palette.accent } else { rgb(0x333333) };
            pen.circle(Vec2::new(-hw * 0.15, -hh * 0.6), 2.0, eye);
            pen.circle(Vec2::new(hw * 0.15, -hh * 0.6), 2.0, eye);
            let arm = hh * 0.5 * flap;
            pen.rect(Vec2::new(-hw * 0.9, -arm), Vec2::new(hw * 0.3, 3.0), rgb(0x808080));
            pen.rect(Vec2::new(hw * 0.6, arm), Vec2::new(hw * 0.3, 3.0), rgb(0x808080));
        }
    }
}

/// Paint one frame of the flappy game
pub fn render(state: &FlappyState, surface: &mut dyn Surface) {
    let time = state.frames as f32 / FRAME_RATE;
    let palette = state.theme.palette();

    sky(surface, state.theme, &palette, time);

    let obstacle = state.theme.obstacle();
    for pipe in &state.pipes {
        obstacle.render(pipe, state.canvas_height, time, surface);
    }

    character(surface, &state.bird, state.theme, &palette, time);

    if state.session.is_over() {
        let size = surface.size();
        surface.fill_rect(Rect::new(0.0, 0.0, size.x, size.y), rgba(0x000000, 0.5));
    }
}
