//! Obstacle artwork and hitboxes, one type per theme

use glam::Vec2;

use super::collision::{ROUND_OBSTACLE_RADIUS, circle_hits_pipe, player_radius, round_obstacle_centers};
use super::consts::PIPE_WIDTH;
use super::state::Pipe;
use super::theme::ObstacleShape;
use crate::Rect;
use crate::renderer::surface::{Color, Surface, mix, rgb, rgba};

/// Both columns of a pipe, top first
fn columns(pipe: &Pipe, canvas_height: f32) -> [Rect; 2] {
    [pipe.top_rect(), pipe.bottom_rect(canvas_height)]
}

/// Small repeating detail positions down a column
fn rungs(column: &Rect, spacing: f32) -> impl Iterator<Item = f32> + '_ {
    let count = (column.h / spacing).floor().max(0.0) as usize;
    (0..count).map(move |i| column.y + (i as f32 + 0.5) * (column.h / (count as f32 + 1.0)))
}

/// UFO theme: blue alien towers with glowing rings
pub struct AlienStructure;

impl ObstacleShape for AlienStructure {
    fn render(&self, pipe: &Pipe, canvas_height: f32, time: f32, surface: &mut dyn Surface) {
        let glow = rgba(0x40c4ff, 0.8);
        for column in columns(pipe, canvas_height) {
            surface.fill_vertical_gradient(column, rgb(0x1a237e), rgb(0x3949ab), 6);
            for (i, y) in rungs(&column, 60.0).take(3).enumerate() {
                let center = Vec2::new(column.center().x, y);
                surface.stroke_circle(center, column.w * 0.3, 1.0, rgba(0x40c4ff, 0.7));
                surface.stroke_circle(center, column.w * 0.15, 1.0, rgba(0x40c4ff, 0.7));
                let pulse = 3.0 + (time * 3.3 + i as f32).sin();
                surface.fill_circle(Vec2::new(column.x + column.w * 0.2, y), pulse, glow);
            }
        }
    }
}

/// Rocket theme: round asteroids with a circular hitbox
pub struct Asteroid;

impl ObstacleShape for Asteroid {
    fn collides(&self, character: &Rect, pipe: &Pipe, canvas_height: f32) -> bool {
        circle_hits_pipe(character, pipe, canvas_height, player_radius(3.0))
    }

    fn render(&self, pipe: &Pipe, canvas_height: f32, _time: f32, surface: &mut dyn Surface) {
        let (top, bottom) = round_obstacle_centers(pipe, canvas_height);
        for center in [top, bottom] {
            let radius = PIPE_WIDTH * 0.8;
            surface.fill_circle(center, radius, rgb(0xa0522d));
            surface.fill_circle(center + Vec2::new(-4.0, -4.0), radius * 0.8, rgb(0xb5653a));
            for i in 0..4 {
                let angle = i as f32 * 1.7 + pipe.top_height * 0.01;
                let crater = center + Vec2::new(angle.cos(), angle.sin()) * radius * 0.5;
                surface.fill_circle(crater, 3.0 + i as f32, rgb(0x8b4513));
            }
            // Hitbox hint
            surface.stroke_circle(center, ROUND_OBSTACLE_RADIUS, 1.0, rgba(0xffffff, 0.1));
        }
    }
}

/// Butterfly theme: trees with layered foliage
pub struct Tree;

impl ObstacleShape for Tree {
    fn render(&self, pipe: &Pipe, canvas_height: f32, _time: f32, surface: &mut dyn Surface) {
        let [top, bottom] = columns(pipe, canvas_height);
        for (column, grows_down) in [(top, true), (bottom, false)] {
            let trunk = Rect::new(column.x + column.w * 0.3, column.y, column.w * 0.4, column.h);
            surface.fill_rect(trunk, rgb(0x8b4513));
            for layer in 0..3 {
                let t = layer as f32 * 0.25 + 0.25;
                let width = column.w * (0.5 + layer as f32 * 0.25);
                let y = if grows_down {
                    column.bottom() - column.h * t
                } else {
                    column.y + column.h * t
                };
                let tip = if grows_down { y + 30.0 } else { y - 30.0 };
                let cx = column.center().x;
                surface.fill_triangle(
                    Vec2::new(cx - width, y),
                    Vec2::new(cx + width, y),
                    Vec2::new(cx, tip),
                    rgb(0x228b22),
                );
            }
        }
    }
}

/// Dragon theme: fire pillars with a circular hitbox
pub struct FirePillar;

impl ObstacleShape for FirePillar {
    fn collides(&self, character: &Rect, pipe: &Pipe, canvas_height: f32) -> bool {
        circle_hits_pipe(character, pipe, canvas_height, player_radius(2.0))
    }

    fn render(&self, pipe: &Pipe, canvas_height: f32, time: f32, surface: &mut dyn Surface) {
        let [top, bottom] = columns(pipe, canvas_height);
        surface.fill_vertical_gradient(top, rgb(0xff4500), rgb(0xffd700), 8);
        surface.fill_vertical_gradient(bottom, rgb(0xffd700), rgb(0xff4500), 8);
        for i in 0..6 {
            let flicker = ((time * 5.0) + i as f32 * 1.3).sin() * 0.5 + 0.5;
            let x = pipe.x + (i as f32 + 0.5) * PIPE_WIDTH / 6.0;
            let ember: Color = mix(rgb(0xffa500), rgb(0xffff00), flicker);
            surface.fill_circle(Vec2::new(x, top.bottom() - 4.0 * flicker), 2.0, ember);
            surface.fill_circle(Vec2::new(x, bottom.y + 4.0 * flicker), 2.0, ember);
        }
    }
}

/// Ghost theme: haunted towers with lit windows
pub struct HauntedTower;

impl ObstacleShape for HauntedTower {
    fn render(&self, pipe: &Pipe, canvas_height: f32, time: f32, surface: &mut dyn Surface) {
        for column in columns(pipe, canvas_height) {
            surface.fill_rect(column, rgb(0x2f2f4f));
            for y in rungs(&column, 30.0) {
                let window = Rect::new(column.x + column.w * 0.35, y - 5.0, column.w * 0.3, 10.0);
                surface.fill_rect(window, rgb(0xffd700));
            }
            let drift = (time + pipe.x * 0.01).sin() * column.w * 0.3;
            surface.fill_circle(
                Vec2::new(column.center().x + drift, column.center().y),
                column.w * 0.4,
                rgba(0xffffff, 0.15),
            );
        }
    }
}

/// Paper plane theme: shredders with teeth facing the gap
pub struct PaperShredder;

impl ObstacleShape for PaperShredder {
    fn render(&self, pipe: &Pipe, canvas_height: f32, _time: f32, surface: &mut dyn Surface) {
        let [top, bottom] = columns(pipe, canvas_height);
        surface.fill_rect(top, rgb(0x696969));
        surface.fill_rect(bottom, rgb(0x696969));

        let teeth = 5;
        let tooth_w = PIPE_WIDTH / teeth as f32;
        for i in 0..teeth {
            let x = pipe.x + i as f32 * tooth_w;
            let depth = if i % 2 == 0 { 10.0 } else { 6.0 };
            surface.fill_triangle(
                Vec2::new(x, top.bottom()),
                Vec2::new(x + tooth_w, top.bottom()),
                Vec2::new(x + tooth_w / 2.0, top.bottom() + depth),
                rgb(0xc0c0c0),
            );
            surface.fill_triangle(
                Vec2::new(x, bottom.y),
                Vec2::new(x + tooth_w, bottom.y),
                Vec2::new(x + tooth_w / 2.0, bottom.y - depth),
                rgb(0xc0c0c0),
            );
        }
    }
}

/// Balloon theme: giant pins pointing into the gap
pub struct Pin;

impl ObstacleShape for Pin {
    fn render(&self, pipe: &Pipe, canvas_height: f32, _time: f32, surface: &mut dyn Surface) {
        let [top, bottom] = columns(pipe, canvas_height);
        let cx = pipe.center_x();
        let shaft = PIPE_WIDTH * 0.2;

        surface.fill_rect(Rect::new(cx - shaft / 2.0, top.y, shaft, top.h - 15.0), rgb(0xc0c0c0));
        surface.fill_triangle(
            Vec2::new(cx - shaft / 2.0, top.bottom() - 15.0),
            Vec2::new(cx + shaft / 2.0, top.bottom() - 15.0),
            Vec2::new(cx, top.bottom()),
            rgb(0x808080),
        );
        surface.fill_circle(Vec2::new(cx, top.y + 10.0), PIPE_WIDTH * 0.4, rgb(0xff0000));

        surface.fill_rect(
            Rect::new(cx - shaft / 2.0, bottom.y + 15.0, shaft, bottom.h - 15.0),
            rgb(0xc0c0c0),
        );
        surface.fill_triangle(
            Vec2::new(cx - shaft / 2.0, bottom.y + 15.0),
            Vec2::new(cx + shaft / 2.0, bottom.y + 15.0),
            Vec2::new(cx, bottom.y),
            rgb(0x808080),
        );
        surface.fill_circle(Vec2::new(cx, bottom.bottom() - 10.0), PIPE_WIDTH * 0.4, rgb(0x0000ff));
    }
}

/// Robot theme: electric barriers with sparks
pub struct ElectricBarrier;

impl ObstacleShape for ElectricBarrier {
    fn render(&self, pipe: &Pipe, canvas_height: f32, time: f32, surface: &mut dyn Surface) {
        for column in columns(pipe, canvas_height) {
            surface.fill_rect(column, rgb(0x333333));
            surface.stroke_rect(column, 2.0, rgb(0x666666));
            for (i, y) in rungs(&column, 20.0).enumerate() {
                let on = ((time * 10.0) as usize + i) % 3 != 0;
                let color = if on { rgba(0x00ffff, 0.8) } else { rgba(0x00ffff, 0.2) };
                surface.fill_rect(Rect::new(column.x + 4.0, y - 1.0, column.w - 8.0, 2.0), color);
            }
        }
    }
}
