//! Mesh generation for occupied grid cells
//!
//! This module contains mesh-related functionality including:
//! - Flat vertex, UV and index buffers with a cell-to-slot map
//! - Full rebuilds and single-cell patches

/// Vertex, UV and index buffers with slot bookkeeping
pub mod buffers;
/// Full rebuild and single-cell refresh of quad meshes
pub mod builder;

pub use buffers::MeshBuffers;
pub use builder::{MeshBuilder, QuadMeshBuilder};
