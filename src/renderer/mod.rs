//! WebGPU rendering module
//!
//! `scene` builds a flat triangle list from the world in field coordinates;
//! `pipeline` maps it to clip space and draws it in one pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::scene_vertices;
pub use vertex::Vertex;
