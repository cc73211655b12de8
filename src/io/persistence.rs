//! JSON documents for tile maps and tile catalogs
//!
//! A tile map document stores the grid geometry and the occupied cell list.
//! Cell order carries no meaning; loading replays every entry through
//! `set_tile`, so duplicate positions resolve last-write-wins. Catalog
//! documents describe each tile's sprite either with explicit texture
//! dimensions or with a texture file whose header supplies them.

use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::io::configuration::{DEFAULT_AXIS_COL, DEFAULT_AXIS_ROW};
use crate::io::error::{Result, WithPath};
use crate::spatial::coords::Vec3;
use crate::spatial::grid::{ParallelogramGrid, TileData};
use crate::spatial::tiles::{PixelRect, Sprite, TileAsset, TileCatalog};

const fn default_axis_row() -> Vec3 {
    DEFAULT_AXIS_ROW
}

const fn default_axis_col() -> Vec3 {
    DEFAULT_AXIS_COL
}

/// Grid geometry: origin and basis vectors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    /// World position of cell `(0, 0)`
    #[serde(default)]
    pub origin: Vec3,
    /// World-space step along the row axis
    #[serde(default = "default_axis_row")]
    pub axis_row: Vec3,
    /// World-space step along the column axis
    #[serde(default = "default_axis_col")]
    pub axis_col: Vec3,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            axis_row: DEFAULT_AXIS_ROW,
            axis_col: DEFAULT_AXIS_COL,
        }
    }
}

impl GridSettings {
    /// Reinitialize a grid with these settings, clearing its cells
    pub fn apply(&self, grid: &mut ParallelogramGrid) {
        grid.initialize(self.origin, self.axis_row, self.axis_col);
    }

    /// Create an empty grid with these settings
    pub fn to_grid(&self) -> ParallelogramGrid {
        ParallelogramGrid::with_basis(self.origin, self.axis_row, self.axis_col)
    }
}

/// Persisted tile map: geometry plus occupied cells
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TilemapDocument {
    /// Grid geometry
    #[serde(default)]
    pub settings: GridSettings,
    /// Occupied cells
    #[serde(default)]
    pub cells: Vec<TileData>,
}

impl TilemapDocument {
    /// Capture a grid's geometry and cells in row-major order
    pub fn from_grid(grid: &ParallelogramGrid) -> Self {
        Self {
            settings: GridSettings {
                origin: grid.origin(),
                axis_row: grid.axis_row(),
                axis_col: grid.axis_col(),
            },
            cells: grid.tiles_sorted(),
        }
    }

    /// Reconstruct the grid by replaying every cell through `set_tile`
    pub fn to_grid(&self) -> ParallelogramGrid {
        let mut grid = self.settings.to_grid();
        for cell in &self.cells {
            grid.set_tile(*cell);
        }
        grid
    }
}

/// Parse a tile map document from JSON text
///
/// # Errors
///
/// Returns a parse error if the text is not a valid document
pub fn parse_document(json: &str) -> Result<TilemapDocument> {
    Ok(serde_json::from_str(json)?)
}

/// Load a tile map document from disk
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed
pub fn load_document(path: &Path) -> Result<TilemapDocument> {
    let content = std::fs::read_to_string(path).with_path(path, "read tilemap")?;
    let document = parse_document(&content).with_path(path, "parse tilemap")?;
    debug!(
        "Loaded {} cells from {}",
        document.cells.len(),
        path.display()
    );
    Ok(document)
}

/// Write a tile map document to disk as pretty-printed JSON
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written
pub fn save_document(path: &Path, document: &TilemapDocument) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_path(parent, "create directory")?;
        }
    }
    let json = serde_json::to_string_pretty(document).with_path(path, "serialize tilemap")?;
    std::fs::write(path, json).with_path(path, "write tilemap")?;
    Ok(())
}

/// Where a sprite's texture dimensions come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextureSource {
    /// Dimensions given inline
    Size {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
    /// Dimensions read from an image file, relative to the catalog file
    File {
        /// Path to the texture image
        path: PathBuf,
    },
}

/// Catalog entry sprite description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteDefinition {
    /// Parent texture
    pub texture: TextureSource,
    /// Region of the texture in pixels
    pub rect: PixelRect,
    /// Pixels per world unit used to size the quad
    pub pixels_per_unit: f32,
}

/// Catalog entry description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDefinition {
    /// Display name
    pub name: String,
    /// Sprite, absent for invisible tiles
    #[serde(default)]
    pub sprite: Option<SpriteDefinition>,
}

/// Persisted tile catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Tiles in index order
    pub tiles: Vec<TileDefinition>,
}

impl CatalogDocument {
    /// Resolve texture sources and build the catalog
    ///
    /// Texture file paths are resolved relative to `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a texture file cannot be read or a sprite is invalid
    pub fn resolve(&self, base_dir: &Path) -> Result<TileCatalog> {
        let mut catalog = TileCatalog::default();
        for definition in &self.tiles {
            let sprite = definition
                .sprite
                .as_ref()
                .map(|sprite| resolve_sprite(sprite, base_dir))
                .transpose()?;
            catalog.push(TileAsset::new(definition.name.clone(), sprite));
        }
        Ok(catalog)
    }
}

fn resolve_sprite(definition: &SpriteDefinition, base_dir: &Path) -> Result<Sprite> {
    let texture_size = match &definition.texture {
        TextureSource::Size { width, height } => [*width, *height],
        TextureSource::File { path } => {
            let full_path = base_dir.join(path);
            let (width, height) =
                image::image_dimensions(&full_path).with_path(&full_path, "read texture")?;
            [width, height]
        }
    };
    Sprite::from_pixels(texture_size, definition.rect, definition.pixels_per_unit)
}

/// Parse a catalog from JSON text, resolving texture files against `base_dir`
///
/// # Errors
///
/// Returns an error if the text is not a valid catalog or a sprite is invalid
pub fn parse_catalog(json: &str, base_dir: &Path) -> Result<TileCatalog> {
    let document: CatalogDocument = serde_json::from_str(json)?;
    document.resolve(base_dir)
}

/// Load a catalog from disk
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or a sprite is invalid
pub fn load_catalog(path: &Path) -> Result<TileCatalog> {
    let content = std::fs::read_to_string(path).with_path(path, "read catalog")?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let catalog = parse_catalog(&content, base_dir).with_path(path, "parse catalog")?;
    debug!("Loaded {} tiles from {}", catalog.len(), path.display());
    Ok(catalog)
}
