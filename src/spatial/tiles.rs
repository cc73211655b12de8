//! Tile catalog with per-tile sprite regions
//!
//! A catalog is an ordered list of tile assets addressed by the
//! `sprite_index` stored in each cell. Each asset may carry a sprite: a
//! pixel rectangle inside a texture plus the world-space footprint of the
//! quad it is drawn on. Catalogs are read-only while meshes are built and
//! are shared between grids.

use serde::{Deserialize, Serialize};

use crate::io::error::{Result, TilemapError, invalid_parameter};
use crate::spatial::coords::Vec2;

/// Rectangle in texture pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left edge in pixels
    pub x: f32,
    /// Bottom edge in pixels
    pub y: f32,
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl PixelRect {
    /// Create a pixel rectangle
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Texture rectangle normalized to `[0, 1]` texture coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    /// Bottom-left texture coordinate
    pub min: Vec2,
    /// Top-right texture coordinate
    pub max: Vec2,
}

impl UvRect {
    /// Corner coordinates in quad winding order: bottom-left, top-left, top-right, bottom-right
    pub const fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.min.x, self.min.y),
            Vec2::new(self.min.x, self.max.y),
            Vec2::new(self.max.x, self.max.y),
            Vec2::new(self.max.x, self.min.y),
        ]
    }
}

/// Region of a texture drawn on a cell's quad
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    texture_size: [u32; 2],
    texture_rect: PixelRect,
    bounds_size: [f32; 2],
    uv_rect: UvRect,
}

impl Sprite {
    /// Create a sprite from its texture region and world-space footprint
    ///
    /// # Errors
    ///
    /// Returns an error if either texture dimension is zero or the footprint
    /// is negative or not finite
    pub fn new(texture_size: [u32; 2], texture_rect: PixelRect, bounds_size: [f32; 2]) -> Result<Self> {
        let [texture_width, texture_height] = texture_size;
        if texture_width == 0 || texture_height == 0 {
            return Err(invalid_parameter(
                "texture_size",
                &format!("{texture_width}x{texture_height}"),
                &"texture dimensions must be positive",
            ));
        }
        if !bounds_size.iter().all(|extent| extent.is_finite() && *extent >= 0.0) {
            return Err(invalid_parameter(
                "bounds_size",
                &format!("{bounds_size:?}"),
                &"sprite footprint must be finite and non-negative",
            ));
        }

        let width = texture_width as f32;
        let height = texture_height as f32;
        let uv_rect = UvRect {
            min: Vec2::new(texture_rect.x / width, texture_rect.y / height),
            max: Vec2::new(
                (texture_rect.x + texture_rect.width) / width,
                (texture_rect.y + texture_rect.height) / height,
            ),
        };

        Ok(Self {
            texture_size,
            texture_rect,
            bounds_size,
            uv_rect,
        })
    }

    /// Create a sprite whose footprint is its pixel size divided by `pixels_per_unit`
    ///
    /// # Errors
    ///
    /// Returns an error if `pixels_per_unit` is not positive or the texture is empty
    pub fn from_pixels(
        texture_size: [u32; 2],
        texture_rect: PixelRect,
        pixels_per_unit: f32,
    ) -> Result<Self> {
        if !(pixels_per_unit > 0.0 && pixels_per_unit.is_finite()) {
            return Err(invalid_parameter(
                "pixels_per_unit",
                &pixels_per_unit,
                &"must be a positive number",
            ));
        }
        Self::new(
            texture_size,
            texture_rect,
            [
                texture_rect.width / pixels_per_unit,
                texture_rect.height / pixels_per_unit,
            ],
        )
    }

    /// Dimensions of the parent texture in pixels
    pub const fn texture_size(&self) -> [u32; 2] {
        self.texture_size
    }

    /// Pixel rectangle inside the parent texture
    pub const fn texture_rect(&self) -> PixelRect {
        self.texture_rect
    }

    /// World-space width and height of the quad
    pub const fn bounds_size(&self) -> [f32; 2] {
        self.bounds_size
    }

    /// Half of the world-space width and height
    pub fn half_extents(&self) -> [f32; 2] {
        let [width, height] = self.bounds_size;
        [width / 2.0, height / 2.0]
    }

    /// Normalized texture rectangle
    pub const fn uv_rect(&self) -> UvRect {
        self.uv_rect
    }
}

/// One entry of the tile catalog
#[derive(Debug, Clone, PartialEq)]
pub struct TileAsset {
    /// Display name
    pub name: String,
    /// Sprite drawn for this tile; cells without one render as invisible quads
    pub sprite: Option<Sprite>,
}

impl TileAsset {
    /// Create a tile asset
    pub fn new(name: impl Into<String>, sprite: Option<Sprite>) -> Self {
        Self {
            name: name.into(),
            sprite,
        }
    }
}

/// Ordered, index-addressable list of tile assets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileCatalog {
    tiles: Vec<TileAsset>,
}

impl TileCatalog {
    /// Create a catalog from assets in index order
    pub const fn new(tiles: Vec<TileAsset>) -> Self {
        Self { tiles }
    }

    /// Number of assets
    pub const fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Check whether the catalog is empty
    pub const fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Look up the asset for a sprite index
    ///
    /// # Errors
    ///
    /// Returns `InvalidTileIndex` if the index is past the end of the catalog
    pub fn get(&self, index: usize) -> Result<&TileAsset> {
        self.tiles.get(index).ok_or(TilemapError::InvalidTileIndex {
            index,
            max_tiles: self.tiles.len(),
        })
    }

    /// Iterate over assets in index order
    pub fn iter(&self) -> impl Iterator<Item = &TileAsset> {
        self.tiles.iter()
    }

    /// Append an asset, returning its index
    pub fn push(&mut self, asset: TileAsset) -> usize {
        self.tiles.push(asset);
        self.tiles.len() - 1
    }
}
