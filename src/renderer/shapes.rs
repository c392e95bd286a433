//! Shape generation for 2D primitives
//!
//! [`ShapeBatch`] is the CPU side of the renderer: render steps draw into it
//! through [`Surface`], and the GPU pipeline uploads its triangle list once
//! per frame.

use glam::Vec2;
use std::f32::consts::PI;

use super::surface::{Color, Surface};
use super::vertex::Vertex;
use crate::Rect;

/// Segments used for circles of radius <= 4 px; larger circles scale up
const MIN_CIRCLE_SEGMENTS: u32 = 8;
const MAX_CIRCLE_SEGMENTS: u32 = 48;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(
            center + radius * Vec2::new(theta1.cos(), theta1.sin()),
            color,
        ));
        vertices.push(Vertex::at(
            center + radius * Vec2::new(theta2.cos(), theta2.sin()),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: Color,
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        vertices.push(Vertex::at(inner1, color));
        vertices.push(Vertex::at(outer1, color));
        vertices.push(Vertex::at(inner2, color));

        vertices.push(Vertex::at(inner2, color));
        vertices.push(Vertex::at(outer1, color));
        vertices.push(Vertex::at(outer2, color));
    }

    vertices
}

/// Two triangles covering `rect`
pub fn quad(rect: Rect, color: Color) -> [Vertex; 6] {
    let (l, t, r, b) = (rect.x, rect.y, rect.right(), rect.bottom());
    [
        Vertex::new(l, t, color),
        Vertex::new(r, t, color),
        Vertex::new(l, b, color),
        Vertex::new(l, b, color),
        Vertex::new(r, t, color),
        Vertex::new(r, b, color),
    ]
}

fn segments_for(radius: f32) -> u32 {
    ((radius * 2.0) as u32).clamp(MIN_CIRCLE_SEGMENTS, MAX_CIRCLE_SEGMENTS)
}

/// Triangle list recorded for one frame
#[derive(Debug, Clone)]
pub struct ShapeBatch {
    size: Vec2,
    clear_color: Color,
    vertices: Vec<Vertex>,
}

impl ShapeBatch {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            vertices: Vec::with_capacity(4096),
        }
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }
}

impl Surface for ShapeBatch {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.vertices.clear();
        self.clear_color = color;
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.w <= 0.0 || rect.h <= 0.0 {
            return;
        }
        self.vertices.extend_from_slice(&quad(rect, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        self.vertices
            .extend(circle(center, radius, color, segments_for(radius)));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        let inner = (radius - width).max(0.0);
        self.vertices
            .extend(ring(center, inner, radius, color, segments_for(radius)));
    }

    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        self.vertices.push(Vertex::at(a, color));
        self.vertices.push(Vertex::at(b, color));
        self.vertices.push(Vertex::at(c, color));
    }
}
