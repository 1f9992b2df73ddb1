use indicatif::MultiProgress;
use std::io::{self, Write};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Writes to stderr with any visible progress bars hidden, so log lines never
/// tear through a bar that is being redrawn.
struct SuspendingWriter(MultiProgress);
impl Write for SuspendingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.suspend(|| io::stderr().write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.suspend(|| io::stderr().flush())
    }
}

/// Install the global subscriber and return the progress container that
/// every bar must be added to.
///
/// `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` with
/// `--verbose`.
pub fn init(verbose: bool) -> MultiProgress {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let progress = MultiProgress::new();
    let writer = progress.clone();
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .without_time()
                .with_target(false)
                .with_writer(move || SuspendingWriter(writer.clone())),
        )
        .with(filter)
        .init();
    progress
}
