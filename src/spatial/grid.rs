//! Sparse parallelogram grid with world/cell coordinate mapping
//!
//! Cells are addressed by integer `(row, col)` pairs on a lattice spanned by
//! two arbitrary, not necessarily orthogonal, basis vectors. Only occupied
//! cells are stored. Every change in membership (a new cell, a removed cell,
//! or a reinitialization) advances the membership revision so that meshes
//! built from an earlier revision can detect that their slot map is stale.

use log::warn;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::spatial::coords::{CellCoord, Vec3};
use crate::spatial::transform::GridTransform;

static NEXT_GRID_ID: AtomicU64 = AtomicU64::new(1);

/// Contents of one occupied cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileData {
    /// Cell the tile occupies
    pub position: CellCoord,
    /// Index into the tile catalog
    pub sprite_index: usize,
}

impl TileData {
    /// Create tile data for a cell
    pub const fn new(position: CellCoord, sprite_index: usize) -> Self {
        Self {
            position,
            sprite_index,
        }
    }
}

/// Inclusive integer rectangle covering occupied cells
///
/// The empty grid produces [`CellBounds::EMPTY`], which has zero size and a
/// meaningless minimum; check `is_empty` before trusting `min`. Sizes are
/// `u64` so that a span over the full `i32` range still fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellBounds {
    /// Smallest row and column (inclusive)
    pub min: CellCoord,
    /// Extent as `[rows, cols]`
    pub size: [u64; 2],
}

impl CellBounds {
    /// Sentinel returned for a grid with no cells
    pub const EMPTY: Self = Self {
        min: CellCoord::new(0, 0),
        size: [0, 0],
    };

    /// Bounds spanning `min..=max` on both axes
    pub const fn from_corners(min: CellCoord, max: CellCoord) -> Self {
        Self {
            min,
            size: [
                max.row.abs_diff(min.row) as u64 + 1,
                max.col.abs_diff(min.col) as u64 + 1,
            ],
        }
    }

    /// Check whether the bounds cover no cells
    pub const fn is_empty(&self) -> bool {
        self.size[0] == 0 || self.size[1] == 0
    }

    /// Number of rows covered
    pub const fn rows(&self) -> u64 {
        self.size[0]
    }

    /// Number of columns covered
    pub const fn cols(&self) -> u64 {
        self.size[1]
    }

    /// Largest row and column (inclusive), or `None` when empty
    pub fn max(&self) -> Option<CellCoord> {
        if self.is_empty() {
            return None;
        }
        let last = |start: i32, extent: u64| {
            i32::try_from(i64::from(start) + i64::try_from(extent).ok()? - 1).ok()
        };
        Some(CellCoord::new(
            last(self.min.row, self.size[0])?,
            last(self.min.col, self.size[1])?,
        ))
    }

    /// Check if a cell is within the bounds
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.max().is_some_and(|max| {
            cell.row >= self.min.row
                && cell.row <= max.row
                && cell.col >= self.min.col
                && cell.col <= max.col
        })
    }
}

/// Sparse cell storage on a parallelogram lattice
#[derive(Debug)]
pub struct ParallelogramGrid {
    id: u64,
    origin: Vec3,
    axis_row: Vec3,
    axis_col: Vec3,
    transform: GridTransform,
    cells: HashMap<CellCoord, TileData>,
    membership_revision: u64,
}

impl Default for ParallelogramGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ParallelogramGrid {
    // A clone is a distinct grid; meshes built from the original must not
    // accept patches against it.
    fn clone(&self) -> Self {
        Self {
            id: next_grid_id(),
            origin: self.origin,
            axis_row: self.axis_row,
            axis_col: self.axis_col,
            transform: self.transform.clone(),
            cells: self.cells.clone(),
            membership_revision: self.membership_revision,
        }
    }
}

fn next_grid_id() -> u64 {
    NEXT_GRID_ID.fetch_add(1, Ordering::Relaxed)
}

impl ParallelogramGrid {
    /// Create an empty grid with an axis-aligned unit basis at the origin
    pub fn new() -> Self {
        let axis_row = Vec3::new(1.0, 0.0, 0.0);
        let axis_col = Vec3::new(0.0, 1.0, 0.0);
        Self {
            id: next_grid_id(),
            origin: Vec3::ZERO,
            axis_row,
            axis_col,
            transform: GridTransform::new(Vec3::ZERO, axis_row, axis_col),
            cells: HashMap::new(),
            membership_revision: 0,
        }
    }

    /// Create an empty grid with the given geometry
    pub fn with_basis(origin: Vec3, axis_row: Vec3, axis_col: Vec3) -> Self {
        let mut grid = Self::new();
        grid.initialize(origin, axis_row, axis_col);
        grid
    }

    /// Reset geometry and remove every cell
    ///
    /// This is a hard reset, not a resize. Degenerate bases are accepted;
    /// `world_to_cell` then returns `None` for most inputs.
    pub fn initialize(&mut self, origin: Vec3, axis_row: Vec3, axis_col: Vec3) {
        self.origin = origin;
        self.axis_row = axis_row;
        self.axis_col = axis_col;
        self.transform = GridTransform::new(origin, axis_row, axis_col);
        self.cells.clear();
        self.membership_revision += 1;

        if self.transform.is_degenerate() {
            warn!(
                "Grid basis is degenerate (determinant {}); world-to-cell mapping is undefined",
                self.transform.determinant()
            );
        }
    }

    /// Insert or overwrite the tile at `data.position`
    ///
    /// Returns the tile previously stored there. Only an insertion into a
    /// previously empty cell changes membership.
    pub fn set_tile(&mut self, data: TileData) -> Option<TileData> {
        let previous = self.cells.insert(data.position, data);
        if previous.is_none() {
            self.membership_revision += 1;
        }
        previous
    }

    /// Check whether a cell is occupied
    pub fn has_tile(&self, cell: CellCoord) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Look up the tile stored at a cell
    pub fn tile(&self, cell: CellCoord) -> Option<&TileData> {
        self.cells.get(&cell)
    }

    /// Remove the tile at a cell, if any
    pub fn remove_tile(&mut self, cell: CellCoord) -> Option<TileData> {
        let removed = self.cells.remove(&cell);
        if removed.is_some() {
            self.membership_revision += 1;
        }
        removed
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Iterate over stored tiles
    ///
    /// Order is unspecified but stable while the grid is not mutated.
    pub fn tiles(&self) -> impl Iterator<Item = &TileData> {
        self.cells.values()
    }

    /// Snapshot of all tiles in row-major order
    pub fn tiles_sorted(&self) -> Vec<TileData> {
        let mut tiles: Vec<TileData> = self.cells.values().copied().collect();
        tiles.sort_by_key(|tile| tile.position);
        tiles
    }

    /// World-space center of a cell
    pub fn cell_to_world(&self, cell: CellCoord) -> Vec3 {
        self.origin + self.axis_row * cell.row as f32 + self.axis_col * cell.col as f32
    }

    /// Cell whose center is nearest to a world position
    ///
    /// Local coordinates are rounded half-up. Returns `None` when the basis is
    /// degenerate or the position lies outside the `i32` cell range.
    pub fn world_to_cell(&self, world: Vec3) -> Option<CellCoord> {
        let [row, col, _] = self.transform.to_local(world);
        let row = (row + 0.5).floor().to_i32()?;
        let col = (col + 0.5).floor().to_i32()?;
        Some(CellCoord::new(row, col))
    }

    /// Inclusive bounding rectangle of occupied cells
    pub fn bounds(&self) -> CellBounds {
        let mut keys = self.cells.keys();
        let Some(first) = keys.next() else {
            return CellBounds::EMPTY;
        };

        let (min, max) = keys.fold((*first, *first), |(min, max), cell| {
            (
                CellCoord::new(min.row.min(cell.row), min.col.min(cell.col)),
                CellCoord::new(max.row.max(cell.row), max.col.max(cell.col)),
            )
        });

        CellBounds::from_corners(min, max)
    }

    /// Identity of this grid instance
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Counter advanced by every change in membership
    pub const fn membership_revision(&self) -> u64 {
        self.membership_revision
    }

    /// World position of cell `(0, 0)`
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    /// World-space step along the row axis
    pub const fn axis_row(&self) -> Vec3 {
        self.axis_row
    }

    /// World-space step along the column axis
    pub const fn axis_col(&self) -> Vec3 {
        self.axis_col
    }

    /// Cell extent as `(row axis length, column axis length, 1)`
    pub fn cell_size(&self) -> Vec3 {
        Vec3::new(self.axis_row.length(), self.axis_col.length(), 1.0)
    }

    /// Check whether the basis vectors fail to span a plane
    pub fn is_degenerate(&self) -> bool {
        self.transform.is_degenerate()
    }

    /// The coordinate transform backing `world_to_cell`
    pub const fn transform(&self) -> &GridTransform {
        &self.transform
    }
}
