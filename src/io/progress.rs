//! Batch progress tracking for multi-file mesh builds

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

use crate::io::configuration::PROGRESS_BAR_WIDTH;

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Files: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Single progress bar over a batch of tile map files
pub struct ProgressManager {
    bar: ProgressBar,
    quads_built: usize,
}

impl ProgressManager {
    /// Create a progress bar for `file_count` files
    pub fn new(file_count: usize) -> Self {
        let bar = ProgressBar::new(file_count as u64);
        bar.set_style(BATCH_STYLE.clone());
        Self {
            bar,
            quads_built: 0,
        }
    }

    /// Show the file currently being processed
    pub fn start_file(&self, path: &Path) {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        self.bar.set_message(display_name);
    }

    /// Mark a file as done and accumulate its quad count
    pub fn complete_file(&mut self, quad_count: usize) {
        self.quads_built += quad_count;
        self.bar.inc(1);
    }

    /// Total quads built so far
    pub const fn quads_built(&self) -> usize {
        self.quads_built
    }

    /// Number of files completed
    pub fn files_completed(&self) -> u64 {
        self.bar.position()
    }

    /// Finish the bar with a summary message
    pub fn finish(&self) {
        self.bar
            .finish_with_message(format!("{} quads built", self.quads_built));
    }
}
