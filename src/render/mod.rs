//! Live mesh ownership and publishing
//!
//! The renderer owns the current mesh, routes builds and patches to a mesh
//! builder, and hands the result to a display surface.

/// Mesh ownership and build/refresh routing
pub mod renderer;
/// Display surface abstraction and the in-memory mesh slot
pub mod surface;

pub use renderer::TilemapRenderer;
pub use surface::{DisplaySurface, MeshSlot, SharedMesh};
