//! Flat vertex, UV and index buffers for a batch of cell quads
//!
//! Each occupied cell owns one quad slot: four consecutive vertices and UVs
//! and six consecutive triangle indices. The cell-to-slot map is only valid
//! for the grid membership the buffers were built from, so the buffers carry
//! a state tag recording whether that is still the case.

use bitvec::vec::BitVec;
use std::collections::HashMap;
use std::fmt;

use crate::io::configuration::{QUAD_INDEX_COUNT, QUAD_TRIANGLES, QUAD_VERTEX_COUNT};
use crate::spatial::coords::{CellCoord, Vec3};

/// Axis-aligned bounding box of a vertex buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Smallest box enclosing every point, or `None` for no points
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(
            Self {
                min: first,
                max: first,
            },
            |bounds, point| Self {
                min: bounds.min.min(point),
                max: bounds.max.max(point),
            },
        ))
    }

    /// Center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Why a slot map no longer describes the grid it is patched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// Cells were added or removed since the last full build
    MembershipChanged {
        /// Grid revision the buffers were built from
        built_revision: u64,
        /// Grid revision at the time of the refresh
        grid_revision: u64,
    },
    /// The refresh targeted a different grid than the one built from
    ForeignGrid {
        /// Grid the buffers were built from
        built_grid: u64,
        /// Grid passed to the refresh
        grid: u64,
    },
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MembershipChanged {
                built_revision,
                grid_revision,
            } => write!(
                f,
                "grid membership changed from revision {built_revision} to {grid_revision}"
            ),
            Self::ForeignGrid { built_grid, grid } => {
                write!(f, "built from grid #{built_grid} but refreshed against grid #{grid}")
            }
        }
    }
}

/// Validity of the cell-to-slot map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Slot map matches the recorded grid revision
    Fresh {
        /// Grid the buffers were built from
        grid: u64,
        /// Membership revision at build time
        revision: u64,
    },
    /// Slot map is outdated; only a full rebuild recovers
    Stale(StaleReason),
}

/// Vertex, UV and index buffers plus the cell-to-slot map
#[derive(Debug, Clone)]
pub struct MeshBuffers {
    vertices: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    triangle_indices: Vec<u32>,
    cell_slots: HashMap<CellCoord, usize>,
    visible: BitVec,
    bounds: Option<Aabb>,
    state: SlotState,
}

impl MeshBuffers {
    /// Zeroed buffers for `quad_count` slots built from a grid revision
    pub(crate) fn with_quad_count(quad_count: usize, grid: u64, revision: u64) -> Self {
        Self {
            vertices: vec![[0.0; 3]; quad_count * QUAD_VERTEX_COUNT],
            uvs: vec![[0.0; 2]; quad_count * QUAD_VERTEX_COUNT],
            triangle_indices: vec![0; quad_count * QUAD_INDEX_COUNT],
            cell_slots: HashMap::with_capacity(quad_count),
            visible: BitVec::repeat(false, quad_count),
            bounds: None,
            state: SlotState::Fresh { grid, revision },
        }
    }

    /// Record which slot a cell owns
    pub(crate) fn assign_slot(&mut self, cell: CellCoord, slot: usize) {
        self.cell_slots.insert(cell, slot);
    }

    /// Overwrite the four vertices and UVs of a slot
    pub(crate) fn write_quad(&mut self, slot: usize, vertices: &[[f32; 3]; 4], uvs: &[[f32; 2]; 4]) {
        let start = slot * QUAD_VERTEX_COUNT;
        let range = start..start + QUAD_VERTEX_COUNT;
        if let Some(target) = self.vertices.get_mut(range.clone()) {
            target.copy_from_slice(vertices);
        }
        if let Some(target) = self.uvs.get_mut(range) {
            target.copy_from_slice(uvs);
        }
    }

    /// Emit the two triangles of a slot and mark it visible
    pub(crate) fn write_triangles(&mut self, slot: usize) {
        let vertex_start = (slot * QUAD_VERTEX_COUNT) as u32;
        let start = slot * QUAD_INDEX_COUNT;
        if let Some(target) = self.triangle_indices.get_mut(start..start + QUAD_INDEX_COUNT) {
            for (index, offset) in target.iter_mut().zip(QUAD_TRIANGLES) {
                *index = vertex_start + offset;
            }
            self.visible.set(slot, true);
        }
    }

    /// Recompute the bounding box from the full vertex buffer
    pub(crate) fn recalculate_bounds(&mut self) {
        self.bounds = Aabb::from_points(self.vertices.iter().copied().map(Vec3::from));
    }

    /// Mark the slot map outdated
    pub fn mark_stale(&mut self, reason: StaleReason) {
        self.state = SlotState::Stale(reason);
    }

    /// Compare the recorded build against a grid, marking the buffers stale on mismatch
    ///
    /// Returns the reason when the slot map no longer applies.
    pub fn validate_against(&mut self, grid: u64, revision: u64) -> Option<StaleReason> {
        match self.state {
            SlotState::Stale(reason) => Some(reason),
            SlotState::Fresh {
                grid: built_grid,
                revision: built_revision,
            } => {
                let reason = if built_grid != grid {
                    StaleReason::ForeignGrid { built_grid, grid }
                } else if built_revision != revision {
                    StaleReason::MembershipChanged {
                        built_revision,
                        grid_revision: revision,
                    }
                } else {
                    return None;
                };
                self.mark_stale(reason);
                Some(reason)
            }
        }
    }

    /// Check whether the slot map is fresh for exactly this grid and revision
    pub const fn built_from(&self, grid: u64, revision: u64) -> bool {
        matches!(
            self.state,
            SlotState::Fresh { grid: built_grid, revision: built_revision }
                if built_grid == grid && built_revision == revision
        )
    }

    /// Current slot map state
    pub const fn state(&self) -> SlotState {
        self.state
    }

    /// Check whether the slot map is still valid
    pub const fn is_fresh(&self) -> bool {
        matches!(self.state, SlotState::Fresh { .. })
    }

    /// Number of reserved quad slots
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / QUAD_VERTEX_COUNT
    }

    /// Number of slots that emit triangles
    pub fn visible_quad_count(&self) -> usize {
        self.visible.count_ones()
    }

    /// Check whether a slot emits triangles
    pub fn is_quad_visible(&self, slot: usize) -> bool {
        self.visible.get(slot).as_deref() == Some(&true)
    }

    /// Slot owned by a cell
    pub fn slot_of(&self, cell: CellCoord) -> Option<usize> {
        self.cell_slots.get(&cell).copied()
    }

    /// Vertex positions, four per slot
    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    /// Texture coordinates, four per slot
    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    /// Triangle indices, six per slot
    pub fn triangle_indices(&self) -> &[u32] {
        &self.triangle_indices
    }

    /// Vertices of one slot
    pub fn quad_vertices(&self, slot: usize) -> Option<&[[f32; 3]]> {
        let start = slot * QUAD_VERTEX_COUNT;
        self.vertices.get(start..start + QUAD_VERTEX_COUNT)
    }

    /// Texture coordinates of one slot
    pub fn quad_uvs(&self, slot: usize) -> Option<&[[f32; 2]]> {
        let start = slot * QUAD_VERTEX_COUNT;
        self.uvs.get(start..start + QUAD_VERTEX_COUNT)
    }

    /// Bounding box of the vertex buffer, `None` when there are no slots
    pub const fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    /// Vertex buffer as raw bytes for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// UV buffer as raw bytes for upload
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Index buffer as raw bytes for upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangle_indices)
    }
}
