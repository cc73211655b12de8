//! Live mesh ownership with full-build and single-tile refresh routing

use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

use crate::io::error::{Result, TilemapError};
use crate::mesh::builder::{MeshBuilder, QuadMeshBuilder};
use crate::render::surface::{DisplaySurface, SharedMesh};
use crate::spatial::coords::CellCoord;
use crate::spatial::grid::ParallelogramGrid;
use crate::spatial::tiles::{TileAsset, TileCatalog};

/// Owns the live mesh for one grid and publishes it to a display surface
pub struct TilemapRenderer<S: DisplaySurface> {
    builder: Box<dyn MeshBuilder>,
    surface: S,
    mesh: Option<SharedMesh>,
}

impl<S: DisplaySurface> TilemapRenderer<S> {
    /// Create a renderer using the quad mesh builder
    pub fn new(surface: S) -> Self {
        Self::with_builder(surface, Box::new(QuadMeshBuilder::new()))
    }

    /// Create a renderer with a custom mesh builder
    pub fn with_builder(surface: S, builder: Box<dyn MeshBuilder>) -> Self {
        Self {
            builder,
            surface,
            mesh: None,
        }
    }

    /// Rebuild the whole mesh and publish it, replacing any previous mesh
    ///
    /// # Errors
    ///
    /// Returns an error if the build fails; the previous mesh (if any) stays
    /// live and nothing new is published
    pub fn build(&mut self, grid: &ParallelogramGrid, catalog: &TileCatalog) -> Result<()> {
        let mesh = self.builder.build_mesh(grid, catalog)?;
        let shared = Rc::new(RefCell::new(mesh));
        self.surface.present(&shared);
        self.mesh = Some(shared);
        Ok(())
    }

    /// Patch one cell's quad and republish the mesh
    ///
    /// Does nothing if no mesh has been built yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh is stale, the cell owns no slot, or the
    /// mesh is currently borrowed elsewhere
    pub fn refresh_tile(
        &mut self,
        grid: &ParallelogramGrid,
        asset: &TileAsset,
        cell: CellCoord,
    ) -> Result<()> {
        let Some(mesh) = &self.mesh else {
            debug!("No mesh built yet; refresh of cell {cell} skipped");
            return Ok(());
        };

        {
            let mut buffers = mesh
                .try_borrow_mut()
                .map_err(|err| TilemapError::MeshBusy {
                    operation: "refresh tile",
                    detail: err.to_string(),
                })?;
            self.builder.refresh_cell(&mut buffers, grid, asset, cell)?;
        }

        self.surface.present(mesh);
        Ok(())
    }

    /// The live mesh, if one has been built
    pub const fn mesh(&self) -> Option<&SharedMesh> {
        self.mesh.as_ref()
    }

    /// Check whether a live mesh exists and its slot map matches `grid`
    pub fn is_current(&self, grid: &ParallelogramGrid) -> bool {
        self.mesh.as_ref().is_some_and(|mesh| {
            mesh.try_borrow()
                .is_ok_and(|buffers| buffers.built_from(grid.id(), grid.membership_revision()))
        })
    }

    /// The display surface
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Drop the live mesh and builder, returning the surface with its binding cleared
    pub fn release(self) -> S {
        let Self { mut surface, .. } = self;
        surface.clear();
        debug!("Renderer released");
        surface
    }
}
