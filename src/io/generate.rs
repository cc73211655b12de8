//! Reproducible random tile map generation

use log::info;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::io::configuration::MAX_GENERATED_DIMENSION;
use crate::io::error::{Result, invalid_parameter};
use crate::io::persistence::{GridSettings, TilemapDocument};
use crate::spatial::coords::CellCoord;
use crate::spatial::grid::TileData;

/// Parameters for scattering tiles over a rectangular block of cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    /// Rows in the block, starting at row 0
    pub rows: usize,
    /// Columns in the block, starting at column 0
    pub cols: usize,
    /// Number of catalog entries to draw sprite indices from
    pub tile_count: usize,
    /// Probability that a cell is occupied
    pub density: f64,
    /// Seed for the random number generator
    pub seed: u64,
}

impl GenerationConfig {
    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero or too large, the tile count
    /// is zero, or the density lies outside `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        for (parameter, value) in [("rows", self.rows), ("cols", self.cols)] {
            if value == 0 || value > MAX_GENERATED_DIMENSION {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &format!("must be between 1 and {MAX_GENERATED_DIMENSION}"),
                ));
            }
        }
        if self.tile_count == 0 {
            return Err(invalid_parameter(
                "tile_count",
                &self.tile_count,
                &"at least one tile is required",
            ));
        }
        if !(0.0..=1.0).contains(&self.density) {
            return Err(invalid_parameter(
                "density",
                &self.density,
                &"must be between 0 and 1",
            ));
        }
        Ok(())
    }
}

/// Generate a tile map document with randomly occupied cells
///
/// The same configuration and seed always produce the same document.
///
/// # Errors
///
/// Returns an error if the configuration is invalid
pub fn generate_document(settings: GridSettings, config: &GenerationConfig) -> Result<TilemapDocument> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut cells = Vec::new();
    for row in 0..config.rows {
        for col in 0..config.cols {
            if rng.random_bool(config.density) {
                let sprite_index = rng.random_range(0..config.tile_count);
                cells.push(TileData::new(
                    CellCoord::new(row as i32, col as i32),
                    sprite_index,
                ));
            }
        }
    }

    info!(
        "Generated {} of {} cells (seed {})",
        cells.len(),
        config.rows * config.cols,
        config.seed
    );
    Ok(TilemapDocument { settings, cells })
}
