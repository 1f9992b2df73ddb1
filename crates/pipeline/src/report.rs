//! Per-entry reports and batch summaries shared by both pipelines.

use smbpix_share::ShareEntry;
use std::error::Error as StdError;
use std::fmt;

/// Why an entry was passed over without being processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    /// Directories are not converted.
    Directory,
    /// The name contains this exclusion pattern.
    Excluded(String),
    /// The name already carries the image's dimensions.
    AlreadyNamed,
}
impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory => f.write_str("directory"),
            Self::Excluded(pattern) => write!(f, "name contains excluded pattern {pattern:?}"),
            Self::AlreadyNamed => f.write_str("already named with its dimensions"),
        }
    }
}

/// How a report counts towards the [`Summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tally {
    Succeeded,
    Skipped,
    Failed,
}

/// A successful per-entry action.
pub trait Outcome {
    /// Short label logged as the `outcome` field.
    fn label(&self) -> &'static str;
    fn tally(&self) -> Tally;
    fn detail(&self) -> String;
}

/// The typed result of processing a single share entry.
///
/// A `warning` never changes the tally: an entry whose staging file could not
/// be released still counts as succeeded.
#[derive(Debug)]
pub struct Report<A, K: StdError + Send + Sync + 'static> {
    pub entry: ShareEntry,
    pub result: Result<A, exn::Exn<K>>,
    pub warning: Option<exn::Exn<K>>,
}
impl<A: Outcome, K: StdError + Send + Sync + 'static> Report<A, K> {
    pub fn tally(&self) -> Tally {
        match &self.result {
            Ok(action) => action.tally(),
            Err(_) => Tally::Failed,
        }
    }

    pub(crate) fn log(&self) {
        let path = self.entry.path.display();
        match &self.result {
            Ok(action) if action.tally() == Tally::Skipped => {
                tracing::info!(%path, outcome = action.label(), detail = %action.detail(), "Skipped entry");
            },
            Ok(action) => tracing::info!(%path, outcome = action.label(), detail = %action.detail(), "Processed entry"),
            Err(err) => tracing::warn!(%path, outcome = "failed", detail = %err, "Entry failed; continuing with next entry"),
        }
        if let Some(warning) = &self.warning {
            tracing::warn!(%path, outcome = "warning", detail = %warning, "Entry processed with warning");
        }
    }
}

/// Final counts of a batch, emitted once when the stream completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub visited: u64,
    pub succeeded: u64,
    pub skipped: u64,
    pub failed: u64,
    pub warnings: u64,
}
impl Summary {
    pub(crate) fn record<A: Outcome, K: StdError + Send + Sync + 'static>(&mut self, report: &Report<A, K>) {
        self.visited += 1;
        match report.tally() {
            Tally::Succeeded => self.succeeded += 1,
            Tally::Skipped => self.skipped += 1,
            Tally::Failed => self.failed += 1,
        }
        if report.warning.is_some() {
            self.warnings += 1;
        }
    }
}
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} visited: {} succeeded, {} skipped, {} failed ({} warnings)",
            self.visited, self.succeeded, self.skipped, self.failed, self.warnings
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use derive_more::{Display, Error};

    #[derive(Debug, Display, Error)]
    enum TestKind {
        Broken,
    }

    struct Done(Tally);
    impl Outcome for Done {
        fn label(&self) -> &'static str {
            "done"
        }
        fn tally(&self) -> Tally {
            self.0
        }
        fn detail(&self) -> String {
            String::new()
        }
    }

    fn report(result: Result<Done, exn::Exn<TestKind>>, warned: bool) -> Report<Done, TestKind> {
        Report {
            entry: ShareEntry::file("Conversion/a.psd"),
            result,
            warning: warned.then(|| exn::Exn::from(TestKind::Broken)),
        }
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = Summary::default();
        summary.record(&report(Ok(Done(Tally::Succeeded)), false));
        summary.record(&report(Ok(Done(Tally::Succeeded)), true));
        summary.record(&report(Ok(Done(Tally::Skipped)), false));
        summary.record(&report(Err(exn::Exn::from(TestKind::Broken)), false));
        assert_eq!(
            summary,
            Summary {
                visited: 4,
                succeeded: 2,
                skipped: 1,
                failed: 1,
                warnings: 1,
            }
        );
        assert_eq!(summary.to_string(), "4 visited: 2 succeeded, 1 skipped, 1 failed (1 warnings)");
    }

    #[test]
    fn test_skip_display() {
        assert_eq!(Skip::Excluded("insitu".into()).to_string(), "name contains excluded pattern \"insitu\"");
    }
}
