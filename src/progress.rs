use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use smbpix_pipeline::Summary;
use std::path::Path;
use std::time::{Duration, Instant};

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";
const TICK: Duration = Duration::from_millis(80);

/// Terminal progress for one batch.
///
/// Starts as a spinner. A batch that knows its size up front (conversion)
/// switches to a bar with [`set_length`](Self::set_length); the rename walk
/// stays a spinner and counts entries as it goes.
pub struct BatchProgress {
    bar: ProgressBar,
    label: &'static str,
    started: Instant,
}

impl BatchProgress {
    pub fn new(multi: &MultiProgress, label: &'static str) -> Self {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {pos} entries {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars(TICK_CHARS),
        );
        bar.set_message("listing...");
        bar.enable_steady_tick(TICK);
        Self {
            bar,
            label,
            started: Instant::now(),
        }
    }

    pub fn set_length(&self, length: u64) {
        self.bar.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} [{bar:30.cyan/dim}] {pos}/{len} ({eta} remaining) {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("━╸─")
                .tick_chars(TICK_CHARS),
        );
        self.bar.set_length(length);
        self.bar.set_message("");
    }

    /// The walk moved into `directory`.
    pub fn descend(&self, directory: &Path) {
        self.bar.set_message(directory.display().to_string());
    }

    pub fn advance(&self, path: &Path) {
        self.bar.inc(1);
        if self.bar.length().is_some() {
            self.bar.set_message(path.display().to_string());
        }
    }

    pub fn finish(self, summary: &Summary) {
        self.bar.finish_and_clear();
        let mark = if summary.failed == 0 { "\x1b[32m✓\x1b[0m" } else { "\x1b[33m!\x1b[0m" };
        eprintln!(
            "  {mark} {} complete: {summary} in {:.2}s",
            self.label,
            self.started.elapsed().as_secs_f64()
        );
    }

    /// Remove the bar without printing a summary.
    pub fn abandon(self) {
        self.bar.finish_and_clear();
    }
}
