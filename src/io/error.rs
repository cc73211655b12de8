//! Error types and context management for grid, mesh and file operations

use std::fmt;
use std::path::{Path, PathBuf};

use crate::mesh::buffers::StaleReason;
use crate::spatial::coords::CellCoord;

/// Main error type for all tile map operations
#[derive(Debug)]
pub enum TilemapError {
    /// Tile references a catalog entry that does not exist
    InvalidTileIndex {
        /// The invalid sprite index
        index: usize,
        /// Number of entries in the catalog
        max_tiles: usize,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Input data doesn't meet the operation's requirements
    InvalidSourceData {
        /// Description of what's wrong with the data
        reason: String,
    },

    /// Single-cell refresh targeted a cell that owns no quad slot
    CellNotInMesh {
        /// Cell that was requested
        cell: CellCoord,
    },

    /// Single-cell refresh attempted against an outdated slot map
    ///
    /// Structural edits (new or removed cells) require a full rebuild before
    /// any further patching.
    StaleMesh {
        /// Cell that was requested
        cell: CellCoord,
        /// Why the slot map no longer matches the grid
        reason: StaleReason,
    },

    /// The live mesh is already borrowed elsewhere
    MeshBusy {
        /// Operation that needed exclusive access
        operation: &'static str,
        /// Borrow failure description
        detail: String,
    },

    /// Failed to parse a JSON document
    Parse {
        /// Path of the document
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// Failed to read a texture image header
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a preview image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for TilemapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileIndex { index, max_tiles } => {
                write!(
                    f,
                    "Tile index {index} is out of bounds (catalog holds {max_tiles} tiles)"
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::CellNotInMesh { cell } => {
                write!(f, "Cell {cell} has no quad slot in the current mesh")
            }
            Self::StaleMesh { cell, reason } => {
                write!(f, "Cannot refresh cell {cell}: mesh is stale ({reason})")
            }
            Self::MeshBusy { operation, detail } => {
                write!(f, "Mesh is busy during {operation}: {detail}")
            }
            Self::Parse { path, source } => {
                write!(f, "Failed to parse '{}': {source}", path.display())
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for TilemapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for tile map results
pub type Result<T> = std::result::Result<T, TilemapError>;

const UNKNOWN_PATH: &str = "<unknown>";

/// Attaches the file being processed to path-less errors
pub trait WithPath<T> {
    /// Replace an unknown path with `path` and record the operation
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path applied
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T, E> WithPath<T> for std::result::Result<T, E>
where
    E: Into<TilemapError>,
{
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            match &mut error {
                TilemapError::FileSystem {
                    path: error_path,
                    operation: error_operation,
                    ..
                } => {
                    if error_path.as_os_str() == UNKNOWN_PATH {
                        *error_path = path.to_path_buf();
                    }
                    *error_operation = operation;
                }
                TilemapError::Parse {
                    path: error_path, ..
                }
                | TilemapError::ImageLoad {
                    path: error_path, ..
                } => {
                    if error_path.as_os_str() == UNKNOWN_PATH {
                        *error_path = path.to_path_buf();
                    }
                }
                _ => {}
            }
            error
        })
    }
}

impl From<image::ImageError> for TilemapError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from(UNKNOWN_PATH),
            source: err,
        }
    }
}

impl From<std::io::Error> for TilemapError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from(UNKNOWN_PATH),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<serde_json::Error> for TilemapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            path: PathBuf::from(UNKNOWN_PATH),
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> TilemapError {
    TilemapError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
