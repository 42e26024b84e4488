//! WebGPU rendering module
//!
//! Sprites are procedural colored-triangle shapes, projected through the
//! orthographic camera and drawn in a single pass.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::SpriteRenderer;
pub use shapes::SpriteShape;
pub use vertex::Vertex;
