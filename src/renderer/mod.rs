//! 2D rendering
//!
//! Render steps paint through [`Surface`]. [`ShapeBatch`] records the
//! triangles; on the web [`RenderState`] uploads and draws them with WebGPU.

pub mod pipeline;
pub mod scenes;
pub mod shapes;
pub mod surface;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::ShapeBatch;
pub use surface::{Color, Surface};
