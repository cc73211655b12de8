//! Input/output operations and error handling
//!
//! This module contains the file-facing side of the crate including:
//! - Tile map and catalog documents
//! - OBJ and PNG exports
//! - The command-line front end

/// Command-line argument parsing and batch processing
pub mod cli;
/// Shared constants and defaults
pub mod configuration;
/// Error types and path context
pub mod error;
/// Seeded random tile map generation
pub mod generate;
/// PNG preview export
pub mod image;
/// Wavefront OBJ mesh export
pub mod obj;
/// JSON tile map and catalog documents
pub mod persistence;
/// Batch progress display
pub mod progress;
