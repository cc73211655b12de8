//! Spatial data structures and coordinate mapping
//!
//! This module contains spatial-related functionality including:
//! - Cell coordinates and world-space vectors
//! - The world/grid affine transform
//! - Sparse grid storage
//! - Tile catalogs and sprite regions

/// Cell coordinates and vector types
pub mod coords;
/// Sparse parallelogram grid storage
pub mod grid;
/// Tile catalog and sprite regions
pub mod tiles;
/// Affine world/grid coordinate transform
pub mod transform;

pub use coords::{CellCoord, Vec2, Vec3};
pub use grid::{CellBounds, ParallelogramGrid, TileData};
pub use tiles::{Sprite, TileAsset, TileCatalog};
