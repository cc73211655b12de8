//! Runtime tile map: grid, shared catalog and renderer kept in sync
//!
//! Edits choose the cheapest update that keeps the mesh correct. Replacing
//! one drawn tile with another patches that cell's quad in place. Adding or
//! removing a cell changes slot assignment, and switching a cell between a
//! tile with a sprite and one without changes its triangles; both trigger a
//! full rebuild.

use log::debug;
use std::sync::Arc;

use crate::io::error::{Result, invalid_parameter};
use crate::io::persistence::{GridSettings, TilemapDocument};
use crate::render::renderer::TilemapRenderer;
use crate::render::surface::{DisplaySurface, SharedMesh};
use crate::spatial::coords::{CellCoord, Vec3};
use crate::spatial::grid::{CellBounds, ParallelogramGrid, TileData};
use crate::spatial::tiles::TileCatalog;

/// Painting action applied to the cell under a world position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brush {
    /// Place the catalog tile with this index
    Tile(usize),
    /// Remove whatever occupies the cell
    Eraser,
}

/// How an edit reached the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// One quad was rewritten in place
    Patched,
    /// The whole mesh was rebuilt
    Rebuilt,
    /// Nothing changed
    Unchanged,
}

/// Grid plus renderer for one tile map instance
pub struct Tilemap<S: DisplaySurface> {
    grid: ParallelogramGrid,
    catalog: Arc<TileCatalog>,
    renderer: TilemapRenderer<S>,
}

impl<S: DisplaySurface> Tilemap<S> {
    /// Create an empty tile map; nothing is published until the first build
    pub fn new(settings: &GridSettings, catalog: Arc<TileCatalog>, surface: S) -> Self {
        Self {
            grid: settings.to_grid(),
            catalog,
            renderer: TilemapRenderer::new(surface),
        }
    }

    /// Create a tile map from a persisted document and build its mesh
    ///
    /// # Errors
    ///
    /// Returns an error if any cell references a tile outside the catalog
    pub fn from_document(
        document: &TilemapDocument,
        catalog: Arc<TileCatalog>,
        surface: S,
    ) -> Result<Self> {
        let mut tilemap = Self::new(&document.settings, catalog, surface);
        tilemap.load_cells(document.cells.iter().copied())?;
        Ok(tilemap)
    }

    /// Replay a persisted cell list through `set_tile`, then rebuild
    ///
    /// # Errors
    ///
    /// Returns an error if any cell references a tile outside the catalog
    pub fn load_cells<I>(&mut self, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = TileData>,
    {
        for cell in cells {
            self.grid.set_tile(cell);
        }
        self.rebuild()
    }

    /// Regenerate and publish the whole mesh
    ///
    /// # Errors
    ///
    /// Returns an error if any cell references a tile outside the catalog
    pub fn rebuild(&mut self) -> Result<()> {
        self.renderer.build(&self.grid, &self.catalog)
    }

    /// Place or replace a tile
    ///
    /// # Errors
    ///
    /// Returns an error if the sprite index is outside the catalog (the grid
    /// is left untouched) or the mesh update fails
    pub fn set_tile(&mut self, data: TileData) -> Result<EditOutcome> {
        let asset = self.catalog.get(data.sprite_index)?;
        let can_patch = self.renderer.is_current(&self.grid);

        match self.grid.set_tile(data) {
            Some(previous) if previous == data => Ok(EditOutcome::Unchanged),
            // Patches cannot change a slot's visibility, so sprite toggles rebuild
            Some(previous)
                if can_patch
                    && asset.sprite.is_some()
                    && self
                        .catalog
                        .get(previous.sprite_index)
                        .is_ok_and(|old| old.sprite.is_some()) =>
            {
                self.renderer
                    .refresh_tile(&self.grid, asset, data.position)?;
                Ok(EditOutcome::Patched)
            }
            _ => {
                self.renderer.build(&self.grid, &self.catalog)?;
                Ok(EditOutcome::Rebuilt)
            }
        }
    }

    /// Remove the tile at a cell
    ///
    /// # Errors
    ///
    /// Returns an error if the rebuild fails
    pub fn remove_tile(&mut self, cell: CellCoord) -> Result<EditOutcome> {
        if self.grid.remove_tile(cell).is_none() {
            return Ok(EditOutcome::Unchanged);
        }
        self.rebuild()?;
        Ok(EditOutcome::Rebuilt)
    }

    /// Apply a brush to the cell under a world position
    ///
    /// # Errors
    ///
    /// Returns an error if the position maps to no cell (degenerate basis or
    /// out of range) or the edit fails
    pub fn paint(&mut self, world: Vec3, brush: Brush) -> Result<EditOutcome> {
        let cell = self.grid.world_to_cell(world).ok_or_else(|| {
            invalid_parameter(
                "world_position",
                &format!("{world:?}"),
                &"position does not map to a grid cell",
            )
        })?;
        debug!("Painting {brush:?} at cell {cell}");

        match brush {
            Brush::Tile(sprite_index) => self.set_tile(TileData::new(cell, sprite_index)),
            Brush::Eraser => self.remove_tile(cell),
        }
    }

    /// Reset geometry, drop every cell and publish the empty mesh
    ///
    /// # Errors
    ///
    /// Returns an error if the rebuild fails
    pub fn reinitialize(&mut self, settings: &GridSettings) -> Result<()> {
        settings.apply(&mut self.grid);
        self.rebuild()
    }

    /// Check whether a cell is occupied
    pub fn has_tile(&self, cell: CellCoord) -> bool {
        self.grid.has_tile(cell)
    }

    /// Tile stored at a cell
    pub fn tile(&self, cell: CellCoord) -> Option<&TileData> {
        self.grid.tile(cell)
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.grid.cell_count()
    }

    /// World-space center of a cell
    pub fn cell_to_world(&self, cell: CellCoord) -> Vec3 {
        self.grid.cell_to_world(cell)
    }

    /// Cell nearest to a world position
    pub fn world_to_cell(&self, world: Vec3) -> Option<CellCoord> {
        self.grid.world_to_cell(world)
    }

    /// Bounding rectangle of occupied cells
    pub fn tile_bounds(&self) -> CellBounds {
        self.grid.bounds()
    }

    /// Cell extent along each axis
    pub fn cell_size(&self) -> Vec3 {
        self.grid.cell_size()
    }

    /// Persisted form of the current state
    pub fn snapshot(&self) -> TilemapDocument {
        TilemapDocument::from_grid(&self.grid)
    }

    /// The underlying grid
    pub const fn grid(&self) -> &ParallelogramGrid {
        &self.grid
    }

    /// The shared tile catalog
    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    /// The live mesh, if built
    pub const fn mesh(&self) -> Option<&SharedMesh> {
        self.renderer.mesh()
    }

    /// The renderer
    pub const fn renderer(&self) -> &TilemapRenderer<S> {
        &self.renderer
    }

    /// End the session, returning the surface with its binding cleared
    pub fn release(self) -> S {
        self.renderer.release()
    }
}
