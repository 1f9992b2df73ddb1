use crate::convert::Context;
use crate::convert::error::{ErrorKind, Result};
use crate::report::{Outcome, Skip, Tally};
use crate::conversion_name;
use exn::ResultExt;
use smbpix_share::ShareEntry;
use std::path::PathBuf;

/// The outcome of (successfully) handling a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The converted image was uploaded to this path.
    Converted(PathBuf),
    /// The entry was left alone; no share I/O happened for it.
    Skipped(Skip),
}
impl Outcome for Action {
    fn label(&self) -> &'static str {
        match self {
            Self::Converted(_) => "converted",
            Self::Skipped(_) => "skipped",
        }
    }

    fn tally(&self) -> Tally {
        match self {
            Self::Converted(_) => Tally::Succeeded,
            Self::Skipped(_) => Tally::Skipped,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Converted(target) => target.display().to_string(),
            Self::Skipped(skip) => skip.to_string(),
        }
    }
}

/// Result of converting one entry.
pub type Report = crate::Report<Action, ErrorKind>;

/// Converts a single entry of the source directory.
///
/// Runs the fetch, transform, publish and cleanup steps in order. The first
/// failing step ends the sequence and becomes the report's error. The staging
/// file is released on every path; failing to delete it after a successful
/// upload only adds a warning.
pub async fn convert_entry(ctx: &Context, entry: ShareEntry) -> Report {
    let mut warning = None;
    let result = convert_entry_inner(ctx, &entry, &mut warning).await;
    Report { entry, result, warning }
}

async fn convert_entry_inner(
    ctx: &Context,
    entry: &ShareEntry,
    warning: &mut Option<crate::convert::error::Error>,
) -> Result<Action> {
    if entry.is_directory {
        return Ok(Action::Skipped(Skip::Directory));
    }
    if let Some(pattern) = ctx.settings.skip.matches(&entry.name) {
        return Ok(Action::Skipped(Skip::Excluded(pattern.to_string())));
    }
    let target = ctx.settings.destination.join(conversion_name(&entry.name, ctx.settings.format));

    // Fetch
    let staged = ctx.staging.stage(&entry.name).or_raise(|| ErrorKind::Transfer(entry.path.clone()))?;
    ctx.share.download(&entry.path, staged.path()).await.or_raise(|| ErrorKind::Transfer(entry.path.clone()))?;
    tracing::debug!(path = %entry.path.display(), staged = %staged.path().display(), "Fetched entry");

    // Transform
    let inspector = ctx.inspector.clone();
    let local = staged.path().to_path_buf();
    let (format, quality) = (ctx.settings.format, ctx.settings.effective_quality());
    let encoded = tokio::task::spawn_blocking(move || {
        let image = inspector.decode(&local).or_raise(|| ErrorKind::Decode)?;
        inspector.encode(&image, format, quality).or_raise(|| ErrorKind::Encode)
    })
    .await
    // A decoder panicking on a malformed file ends up here.
    .or_raise(|| ErrorKind::Decode)??;

    // Publish
    ctx.share.upload(&encoded, &target).await.or_raise(|| ErrorKind::Transfer(target.clone()))?;

    // Cleanup
    let local = staged.path().to_path_buf();
    if let Err(err) = staged.close().or_raise(|| ErrorKind::Cleanup(local)) {
        *warning = Some(err);
    }
    Ok(Action::Converted(target))
}
