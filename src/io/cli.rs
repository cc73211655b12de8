//! Command-line interface for building, generating and probing tile maps

use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::io::configuration::{
    DEFAULT_DENSITY, DEFAULT_SEED, MESH_SUFFIX, PREVIEW_SUFFIX, TILEMAP_EXTENSION,
};
use crate::io::error::{Result, TilemapError, invalid_parameter};
use crate::io::generate::{GenerationConfig, generate_document};
use crate::io::image::export_grid_as_png;
use crate::io::obj::export_obj_to_file;
use crate::io::persistence::{GridSettings, load_catalog, load_document, save_document};
use crate::io::progress::ProgressManager;
use crate::render::surface::MeshSlot;
use crate::spatial::coords::Vec3;
use crate::spatial::tiles::TileCatalog;
use crate::tilemap::Tilemap;

#[derive(Parser)]
#[command(name = "paratile")]
#[command(
    author,
    version,
    about = "Build meshes for sparse parallelogram tile maps"
)]
/// Command-line arguments for the tile map tool
pub struct Cli {
    /// Only report warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available operations
#[derive(Subcommand)]
pub enum Command {
    /// Build OBJ meshes (and optional PNG previews) from tile map documents
    Build(BuildArgs),
    /// Write a randomly populated tile map document
    Generate(GenerateArgs),
    /// Report the cell under a world position
    Locate(LocateArgs),
}

/// Arguments for `build`
#[derive(Args)]
pub struct BuildArgs {
    /// Tile map JSON file or directory of tile maps
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Tile catalog JSON file
    #[arg(short, long)]
    pub catalog: PathBuf,

    /// Also export a PNG preview of occupied cells
    #[arg(short, long)]
    pub png: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

/// Arguments for `generate`
#[derive(Args)]
pub struct GenerateArgs {
    /// Output tile map JSON file
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Rows in the generated block
    #[arg(short, long)]
    pub rows: usize,

    /// Columns in the generated block
    #[arg(short, long)]
    pub cols: usize,

    /// Number of catalog tiles to draw from
    #[arg(short, long)]
    pub tiles: usize,

    /// Probability that a cell is occupied
    #[arg(short, long, default_value_t = DEFAULT_DENSITY)]
    pub density: f64,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

/// Arguments for `locate`
#[derive(Args)]
pub struct LocateArgs {
    /// Tile map JSON file
    #[arg(value_name = "TILEMAP")]
    pub tilemap: PathBuf,

    /// World X coordinate
    #[arg(allow_negative_numbers = true)]
    pub x: f32,

    /// World Y coordinate
    #[arg(allow_negative_numbers = true)]
    pub y: f32,

    /// World Z coordinate
    #[arg(allow_negative_numbers = true, default_value_t = 0.0)]
    pub z: f32,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Run the selected operation
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails
    pub fn run(self) -> Result<()> {
        let show_progress = self.should_show_progress();
        match self.command {
            Command::Build(args) => FileProcessor::new(args, show_progress).process(),
            Command::Generate(args) => run_generate(&args),
            Command::Locate(args) => run_locate(&args),
        }
    }
}

fn run_generate(args: &GenerateArgs) -> Result<()> {
    let config = GenerationConfig {
        rows: args.rows,
        cols: args.cols,
        tile_count: args.tiles,
        density: args.density,
        seed: args.seed,
    };
    let document = generate_document(GridSettings::default(), &config)?;
    save_document(&args.output, &document)?;
    info!("Wrote {}", args.output.display());
    Ok(())
}

// Allow print for the command's actual output
#[allow(clippy::print_stdout)]
fn run_locate(args: &LocateArgs) -> Result<()> {
    let document = load_document(&args.tilemap)?;
    let grid = document.to_grid();
    let world = Vec3::new(args.x, args.y, args.z);

    let cell = grid.world_to_cell(world).ok_or_else(|| {
        invalid_parameter(
            "world_position",
            &format!("({}, {}, {})", args.x, args.y, args.z),
            &"position does not map to a grid cell",
        )
    })?;

    match grid.tile(cell) {
        Some(tile) => println!("{cell} tile {}", tile.sprite_index),
        None => println!("{cell} empty"),
    }
    Ok(())
}

/// Orchestrates batch mesh builds with progress tracking
pub struct FileProcessor {
    args: BuildArgs,
    progress_manager: Option<ProgressManager>,
    show_progress: bool,
}

impl FileProcessor {
    /// Create a new file processor for the given build arguments
    pub const fn new(args: BuildArgs, show_progress: bool) -> Self {
        Self {
            args,
            progress_manager: None,
            show_progress,
        }
    }

    /// Build meshes for every selected tile map
    ///
    /// # Errors
    ///
    /// Returns an error if target validation, catalog loading or file processing fails
    pub fn process(&mut self) -> Result<()> {
        let files = self.collect_files()?;

        if files.is_empty() {
            info!("Nothing to build");
            return Ok(());
        }

        let catalog = Arc::new(load_catalog(&self.args.catalog)?);

        if self.show_progress {
            self.progress_manager = Some(ProgressManager::new(files.len()));
        }

        for file in &files {
            self.process_file(file, &catalog)?;
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.args.target;
        if target.is_file() {
            if self.should_process_file(target) {
                Ok(vec![target.clone()])
            } else {
                Ok(vec![])
            }
        } else if target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(target)? {
                let path = entry?.path();
                if path.extension().and_then(|s| s.to_str()) == Some(TILEMAP_EXTENSION)
                    && path != self.args.catalog
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(TilemapError::InvalidParameter {
                parameter: "target",
                value: target.display().to_string(),
                reason: "Target must be a tile map file or directory".to_string(),
            })
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if self.args.no_skip {
            return true;
        }

        let output_path = Self::get_mesh_path(input_path);
        if output_path.exists() {
            warn!("Skipping: {} (output exists)", input_path.display());
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path, catalog: &Arc<TileCatalog>) -> Result<()> {
        let start_time = Instant::now();

        if let Some(ref pm) = self.progress_manager {
            pm.start_file(input_path);
        }

        let document = load_document(input_path)?;
        let tilemap = Tilemap::from_document(&document, Arc::clone(catalog), MeshSlot::new())?;

        let quad_count = if let Some(mesh) = tilemap.mesh() {
            let buffers = mesh.try_borrow().map_err(|err| TilemapError::MeshBusy {
                operation: "export mesh",
                detail: err.to_string(),
            })?;
            let stats = export_obj_to_file(&buffers, &Self::get_mesh_path(input_path))?;
            stats.quad_count
        } else {
            0
        };

        if self.args.png && tilemap.cell_count() > 0 {
            export_grid_as_png(tilemap.grid(), &Self::get_preview_path(input_path))?;
        }

        tilemap.release();

        info!(
            "Built {} quads from {} in {:.2?}",
            quad_count,
            input_path.display(),
            start_time.elapsed()
        );

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(quad_count);
        }

        Ok(())
    }

    fn sibling_path(input_path: &Path, suffix: &str, extension: &str) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let name = format!("{}{suffix}.{extension}", stem.to_string_lossy());

        if let Some(parent) = input_path.parent() {
            parent.join(name)
        } else {
            PathBuf::from(name)
        }
    }

    /// Path of the OBJ mesh written for a tile map
    pub fn get_mesh_path(input_path: &Path) -> PathBuf {
        Self::sibling_path(input_path, MESH_SUFFIX, "obj")
    }

    /// Path of the PNG preview written for a tile map
    pub fn get_preview_path(input_path: &Path) -> PathBuf {
        Self::sibling_path(input_path, PREVIEW_SUFFIX, "png")
    }
}
