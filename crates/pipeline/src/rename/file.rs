use crate::naming::has_dimensions;
use crate::rename::error::{Error, ErrorKind, Result};
use crate::rename::{Context, Destination};
use crate::report::{Outcome, Skip, Tally};
use crate::dimension_name;
use exn::ResultExt;
use smbpix_share::ShareEntry;
use std::path::{Path, PathBuf};

/// The outcome of (successfully) handling a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The file now lives at this path.
    Renamed(PathBuf),
    Skipped(Skip),
}
impl Outcome for Action {
    fn label(&self) -> &'static str {
        match self {
            Self::Renamed(_) => "renamed",
            Self::Skipped(_) => "skipped",
        }
    }

    fn tally(&self) -> Tally {
        match self {
            Self::Renamed(_) => Tally::Succeeded,
            Self::Skipped(_) => Tally::Skipped,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Renamed(target) => target.display().to_string(),
            Self::Skipped(skip) => skip.to_string(),
        }
    }
}

/// Result of renaming one entry.
pub type Report = crate::Report<Action, ErrorKind>;

/// Directory a file at `path` is moved into.
///
/// ```
/// use std::path::Path;
/// use smbpix_pipeline::rename::{Destination, destination_dir};
///
/// let path = Path::new("to_be_renamed/Spring/raw/photo.psd");
/// assert_eq!(destination_dir(path, Destination::Parent), Path::new("to_be_renamed/Spring/raw"));
/// assert_eq!(destination_dir(path, Destination::TopTwo), Path::new("to_be_renamed/Spring"));
/// ```
pub fn destination_dir(path: &Path, destination: Destination) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
    match destination {
        Destination::Parent => parent,
        Destination::TopTwo if path.components().count() >= 3 => path.components().take(2).collect(),
        Destination::TopTwo => parent,
    }
}

/// Renames a single file to carry its pixel dimensions.
///
/// The file is downloaded to a staging file only to read its dimensions; the
/// staging file is released before the rename is attempted. Excluded entries
/// and directories are skipped without any share I/O.
pub async fn rename_entry(ctx: &Context, entry: ShareEntry) -> Report {
    let mut warning = None;
    let result = if entry.is_directory {
        Ok(Action::Skipped(Skip::Directory))
    } else if let Some(pattern) = ctx.settings.exclusions.matches(&entry.name) {
        Ok(Action::Skipped(Skip::Excluded(pattern.to_string())))
    } else {
        rename_file(ctx, &entry, &mut warning).await
    };
    Report { entry, result, warning }
}

pub(crate) async fn rename_file(ctx: &Context, entry: &ShareEntry, warning: &mut Option<Error>) -> Result<Action> {
    let staged = ctx.staging.stage(&entry.name).or_raise(|| ErrorKind::Transfer(entry.path.clone()))?;
    ctx.share.download(&entry.path, staged.path()).await.or_raise(|| ErrorKind::Transfer(entry.path.clone()))?;

    let inspector = ctx.inspector.clone();
    let local = staged.path().to_path_buf();
    let (width, height) = tokio::task::spawn_blocking(move || {
        let image = inspector.decode(&local).or_raise(|| ErrorKind::Decode)?;
        Ok::<_, Error>(inspector.dimensions(&image))
    })
    .await
    .or_raise(|| ErrorKind::Decode)??;

    let local = staged.path().to_path_buf();
    if let Err(err) = staged.close().or_raise(|| ErrorKind::Cleanup(local)) {
        *warning = Some(err);
    }

    if ctx.settings.skip_already_named && has_dimensions(&entry.name, width, height) {
        return Ok(Action::Skipped(Skip::AlreadyNamed));
    }
    let target = destination_dir(&entry.path, ctx.settings.destination).join(dimension_name(&entry.name, width, height));
    ctx.share.rename(entry, &target).await.or_raise(|| ErrorKind::Rename(target.clone()))?;
    Ok(Action::Renamed(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("to_be_renamed/photo.psd", Destination::Parent, "to_be_renamed")]
    #[case("to_be_renamed/photo.psd", Destination::TopTwo, "to_be_renamed")]
    #[case("to_be_renamed/set/photo.psd", Destination::TopTwo, "to_be_renamed/set")]
    #[case("to_be_renamed/set/a/b/photo.psd", Destination::TopTwo, "to_be_renamed/set")]
    #[case("to_be_renamed/set/a/b/photo.psd", Destination::Parent, "to_be_renamed/set/a/b")]
    #[case("photo.psd", Destination::TopTwo, "")]
    fn test_destination_dir(#[case] path: &str, #[case] destination: Destination, #[case] expected: &str) {
        assert_eq!(destination_dir(Path::new(path), destination), Path::new(expected));
    }
}
