//! PNG preview of occupied cells with automatic cropping and transparency

use image::{ImageBuffer, Rgba};
use ndarray::Array2;
use std::path::Path;

use crate::io::configuration::{MAX_PREVIEW_DIMENSION, PREVIEW_PALETTE};
use crate::io::error::{Result, TilemapError, invalid_parameter};
use crate::spatial::coords::CellCoord;
use crate::spatial::grid::{CellBounds, ParallelogramGrid};

/// Rasterize occupied cells over the grid bounds
///
/// Entry `[row, col]` (relative to `bounds.min`) holds 0 for an empty cell
/// and `sprite_index + 1` for an occupied one. Returns `None` for an empty grid.
/// The raster covers the whole bounding box, so callers should check
/// `grid.bounds()` before rasterizing sparse grids.
pub fn rasterize_cells(grid: &ParallelogramGrid) -> Option<(CellBounds, Array2<u32>)> {
    let bounds = grid.bounds();
    if bounds.is_empty() {
        return None;
    }

    let mut raster = Array2::<u32>::zeros((bounds.rows() as usize, bounds.cols() as usize));
    for tile in grid.tiles() {
        let CellCoord { row, col } = tile.position;
        let offset = [
            row.abs_diff(bounds.min.row) as usize,
            col.abs_diff(bounds.min.col) as usize,
        ];
        if let Some(entry) = raster.get_mut(offset) {
            *entry = tile.sprite_index as u32 + 1;
        }
    }
    Some((bounds, raster))
}

/// Export the grid's occupied cells as a PNG, one pixel per cell
///
/// Rows map to image rows and columns to image columns; empty cells are
/// transparent and occupied cells take a palette color by sprite index.
///
/// # Errors
///
/// Returns an error if:
/// - The grid has no cells
/// - The bounds exceed `MAX_PREVIEW_DIMENSION` rows or columns
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_grid_as_png(grid: &ParallelogramGrid, output_path: &Path) -> Result<()> {
    let bounds = grid.bounds();
    if bounds.rows() > MAX_PREVIEW_DIMENSION || bounds.cols() > MAX_PREVIEW_DIMENSION {
        return Err(invalid_parameter(
            "preview_size",
            &format!("{}x{}", bounds.rows(), bounds.cols()),
            &format!("preview is limited to {MAX_PREVIEW_DIMENSION} cells per side"),
        ));
    }

    let (_, raster) = rasterize_cells(grid).ok_or(TilemapError::InvalidSourceData {
        reason: "No tiles have been placed in the grid".to_string(),
    })?;

    let (rows, cols) = raster.dim();
    let mut img = ImageBuffer::new(cols as u32, rows as u32);

    for ((row, col), &value) in raster.indexed_iter() {
        let color = if value > 0 {
            let palette_index = (value as usize - 1) % PREVIEW_PALETTE.len();
            Rgba(
                PREVIEW_PALETTE
                    .get(palette_index)
                    .copied()
                    .unwrap_or([0, 0, 0, 255]),
            )
        } else {
            Rgba([0, 0, 0, 0])
        };
        img.put_pixel(col as u32, row as u32, color);
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| TilemapError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }
    }

    img.save(output_path)
        .map_err(|e| TilemapError::ImageExport {
            path: output_path.into(),
            source: e,
        })?;

    Ok(())
}
