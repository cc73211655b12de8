//! Quad mesh generation from occupied grid cells
//!
//! A full build reserves one quad slot per occupied cell in row-major
//! order. Cells whose tile has no sprite keep a zeroed,
//! triangle-less slot so that slot numbering never depends on sprite
//! presence. A single-cell refresh rewrites one slot's vertices and UVs in
//! place and never touches topology.

use log::{debug, warn};

use crate::io::error::{Result, TilemapError};
use crate::mesh::buffers::MeshBuffers;
use crate::spatial::coords::{CellCoord, Vec3};
use crate::spatial::grid::ParallelogramGrid;
use crate::spatial::tiles::{Sprite, TileAsset, TileCatalog};

/// Converts grid contents into mesh buffers
pub trait MeshBuilder {
    /// Regenerate buffers for every occupied cell
    ///
    /// Slots follow row-major cell order, which costs a sorted snapshot of
    /// the grid (`O(n log n)` in the cell count) on every build.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTileIndex` if any cell references a sprite index past
    /// the end of the catalog; no buffers are produced in that case
    fn build_mesh(&self, grid: &ParallelogramGrid, catalog: &TileCatalog) -> Result<MeshBuffers>;

    /// Recompute the quad of one cell that already owns a slot
    ///
    /// Assets without a sprite leave the buffers untouched.
    ///
    /// # Errors
    ///
    /// Returns `StaleMesh` if the grid gained or lost cells since `mesh` was
    /// built (the mesh is marked stale), and `CellNotInMesh` if the cell owns
    /// no slot
    fn refresh_cell(
        &self,
        mesh: &mut MeshBuffers,
        grid: &ParallelogramGrid,
        asset: &TileAsset,
        cell: CellCoord,
    ) -> Result<()>;
}

/// Builds one axis-aligned, sprite-sized quad centered on each cell
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadMeshBuilder;

impl QuadMeshBuilder {
    /// Create a quad mesh builder
    pub const fn new() -> Self {
        Self
    }
}

/// Corner positions and texture coordinates for a sprite centered at `center`
///
/// Corners follow the winding bottom-left, top-left, top-right, bottom-right.
pub fn quad_geometry(center: Vec3, sprite: &Sprite) -> ([[f32; 3]; 4], [[f32; 2]; 4]) {
    let [half_width, half_height] = sprite.half_extents();
    let offsets = [
        (-half_width, -half_height),
        (-half_width, half_height),
        (half_width, half_height),
        (half_width, -half_height),
    ];
    let vertices = offsets.map(|(dx, dy)| (center + Vec3::new(dx, dy, 0.0)).to_array());
    let uvs = sprite.uv_rect().corners().map(|corner| corner.to_array());
    (vertices, uvs)
}

impl MeshBuilder for QuadMeshBuilder {
    fn build_mesh(&self, grid: &ParallelogramGrid, catalog: &TileCatalog) -> Result<MeshBuffers> {
        let mut mesh = MeshBuffers::with_quad_count(
            grid.cell_count(),
            grid.id(),
            grid.membership_revision(),
        );

        for (slot, tile) in grid.tiles_sorted().iter().enumerate() {
            mesh.assign_slot(tile.position, slot);

            let asset = catalog.get(tile.sprite_index)?;
            if let Some(sprite) = &asset.sprite {
                let (vertices, uvs) = quad_geometry(grid.cell_to_world(tile.position), sprite);
                mesh.write_quad(slot, &vertices, &uvs);
                mesh.write_triangles(slot);
            }
        }

        mesh.recalculate_bounds();
        debug!(
            "Built mesh with {} quads ({} visible) at grid revision {}",
            mesh.quad_count(),
            mesh.visible_quad_count(),
            grid.membership_revision()
        );
        Ok(mesh)
    }

    fn refresh_cell(
        &self,
        mesh: &mut MeshBuffers,
        grid: &ParallelogramGrid,
        asset: &TileAsset,
        cell: CellCoord,
    ) -> Result<()> {
        if let Some(reason) = mesh.validate_against(grid.id(), grid.membership_revision()) {
            warn!("Refusing to patch cell {cell}: {reason}");
            return Err(TilemapError::StaleMesh { cell, reason });
        }

        let slot = mesh
            .slot_of(cell)
            .ok_or(TilemapError::CellNotInMesh { cell })?;

        let Some(sprite) = &asset.sprite else {
            debug!("Tile '{}' has no sprite; cell {cell} left unchanged", asset.name);
            return Ok(());
        };

        let (vertices, uvs) = quad_geometry(grid.cell_to_world(cell), sprite);
        mesh.write_quad(slot, &vertices, &uvs);
        mesh.recalculate_bounds();
        debug!("Patched slot {slot} for cell {cell}");
        Ok(())
    }
}
