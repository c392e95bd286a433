//! Vertex type shared by the shape batch and the GPU pipeline

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::surface::Color;

/// 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn at(point: Vec2, color: Color) -> Self {
        Self::new(point.x, point.y, color)
    }

    /// Map from canvas pixels (origin top-left, y down) to clip space
    pub fn to_ndc(self, surface_size: Vec2) -> Self {
        let x = self.position[0] / surface_size.x * 2.0 - 1.0;
        let y = 1.0 - self.position[1] / surface_size.y * 2.0;
        Self::new(x, y, self.color)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_ndc_corners() {
        let size = Vec2::new(400.0, 500.0);
        let top_left = Vertex::new(0.0, 0.0, [1.0; 4]).to_ndc(size);
        assert_eq!(top_left.position, [-1.0, 1.0]);

        let bottom_right = Vertex::new(400.0, 500.0, [1.0; 4]).to_ndc(size);
        assert_eq!(bottom_right.position, [1.0, -1.0]);

        let center = Vertex::new(200.0, 250.0, [1.0; 4]).to_ndc(size);
        assert_eq!(center.position, [0.0, 0.0]);
    }
}
