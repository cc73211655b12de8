//! Grid defaults, mesh layout constants and runtime configuration defaults

use crate::spatial::coords::Vec3;

// Default skew matches the isometric-style board the tile art is drawn for
/// Default world-space direction of one step along the row axis
pub const DEFAULT_AXIS_ROW: Vec3 = Vec3::new(0.965, 0.282, 0.0);
/// Default world-space direction of one step along the column axis
pub const DEFAULT_AXIS_COL: Vec3 = Vec3::new(-0.484, 0.593, 0.0);

/// Bases whose determinant magnitude falls below this are treated as degenerate
pub const DEGENERATE_DETERMINANT_EPSILON: f64 = 1e-9;

// Quad layout shared by full builds and single-cell patches
/// Vertices owned by one quad slot
pub const QUAD_VERTEX_COUNT: usize = 4;
/// Triangle indices owned by one quad slot
pub const QUAD_INDEX_COUNT: usize = 6;
/// Triangle indices relative to the slot's first vertex (bottom-left, top-left, top-right, bottom-right)
pub const QUAD_TRIANGLES: [u32; QUAD_INDEX_COUNT] = [0, 1, 2, 2, 3, 0];

// Random tile map generation
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;
/// Default probability that a generated cell is occupied
pub const DEFAULT_DENSITY: f64 = 0.5;
// Safety limit to prevent excessive memory allocation
/// Maximum allowed rows or columns for generated tile maps
pub const MAX_GENERATED_DIMENSION: usize = 10_000;

// Output settings
/// Extension of tile map documents picked up in directory mode
pub const TILEMAP_EXTENSION: &str = "json";
/// Suffix added to exported mesh filenames
pub const MESH_SUFFIX: &str = "_mesh";
/// Suffix added to exported preview filenames
pub const PREVIEW_SUFFIX: &str = "_preview";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

// Safety limit to prevent excessive memory allocation
/// Maximum rows or columns covered by a PNG preview (one pixel per cell)
pub const MAX_PREVIEW_DIMENSION: u64 = 8192;

/// Preview colors cycled by sprite index
pub const PREVIEW_PALETTE: [[u8; 4]; 8] = [
    [230, 25, 75, 255],
    [60, 180, 75, 255],
    [255, 225, 25, 255],
    [0, 130, 200, 255],
    [245, 130, 48, 255],
    [145, 30, 180, 255],
    [70, 240, 240, 255],
    [240, 50, 230, 255],
];
