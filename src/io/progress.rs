//! Terminal progress display for corpus builds

use crate::algorithm::corpus::BuildProgress;
use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static BUILD_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Mazes: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Progress bar tracking distinct mazes accepted against the requested count
///
/// The message shows how many candidates were generated and how many of them
/// collapsed as duplicates.
pub struct BuildProgressBar {
    bar: ProgressBar,
}

impl BuildProgressBar {
    /// Create a visible progress bar for `requested` mazes
    pub fn new(requested: usize) -> Self {
        let bar = ProgressBar::new(requested as u64);
        bar.set_style(BUILD_STYLE.clone());
        Self { bar }
    }

    /// Create a bar that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Reflect a build snapshot
    pub fn update(&self, progress: BuildProgress) {
        self.bar.set_length(progress.requested as u64);
        self.bar.set_position(progress.accepted as u64);
        self.bar.set_message(format!(
            "{} generated, {} duplicates",
            progress.attempts, progress.duplicates
        ));
    }

    /// Distinct mazes currently shown as accepted
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Finish and clear the display
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
