//! Sparse tile maps on a parallelogram grid with incremental quad meshes
//!
//! The grid maps integer cells to world space through two arbitrary axes.
//! Occupied cells become textured quads in a flat mesh; replacing one cell's
//! tile patches its quad in place, while adding or removing cells rebuilds.

#![forbid(unsafe_code)]

/// Input/output operations and error handling
pub mod io;
/// Quad mesh buffers and builders
pub mod mesh;
/// Mesh ownership and display surfaces
pub mod render;
/// Grid coordinates, transforms and tile storage
pub mod spatial;
/// Runtime tile map tying the grid to its renderer
pub mod tilemap;

pub use io::error::{Result, TilemapError};
