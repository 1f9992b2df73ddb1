use crate::Summary;
use crate::error::{ErrorKind, Result};
use crate::rename::error::ErrorKind as RenameErrorKind;
use crate::rename::file::rename_file;
use crate::rename::{Action, Context, Report};
use crate::report::Skip;
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use smbpix_share::ShareEntry;
use std::collections::VecDeque;
use std::path::PathBuf;

/// Progress events emitted by [`rename`] as it walks the tree.
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started): exactly once.
/// 2. [`Descended`](Self::Descended) and [`Processed`](Self::Processed):
///    interleaved in walk order.
/// 3. [`Complete`](Self::Complete): exactly once, with the walk totals.
///
/// A failure to list the root terminates the stream early with an `Err` item,
/// in which case [`Complete`](Self::Complete) is never emitted.
#[derive(Debug)]
pub enum RenameEvent {
    Started,
    /// A directory was listed and its entries are up next.
    Descended(PathBuf),
    Processed(Box<Report>),
    Complete(Summary),
}

/// Streams [`RenameEvent`]s for every entry below the root.
///
/// The walk is depth-first pre-order, following each listing's order: a
/// directory's entries are all handled before its next sibling. It keeps an
/// explicit stack of pending listings instead of recursing. Excluded entries
/// are reported as skipped and never descended into; a directory that cannot
/// be listed is reported as failed and the walk continues with its siblings.
pub fn rename(ctx: &Context) -> impl Stream<Item = Result<RenameEvent>> + '_ {
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        yield Ok(RenameEvent::Started);
        let root = &ctx.settings.root;
        tracing::info!(share = ctx.share.name(), path = %root.display(), "Walking rename root");
        let entries = match ctx.share.list(root).await.or_raise(|| ErrorKind::ShareUnavailable(root.clone())) {
            Ok(entries) => entries,
            Err(e) => {
                yield Err(e);
                return;
            },
        };

        let mut pending: Vec<VecDeque<ShareEntry>> = vec![entries.into()];
        let mut summary = Summary::default();
        while let Some(listing) = pending.last_mut() {
            let Some(entry) = listing.pop_front() else {
                pending.pop();
                continue;
            };
            let mut warning = None;
            let result = if let Some(pattern) = ctx.settings.exclusions.matches(&entry.name) {
                Ok(Action::Skipped(Skip::Excluded(pattern.to_string())))
            } else if entry.is_directory {
                match ctx.share.list(&entry.path).await {
                    Ok(children) => {
                        tracing::debug!(path = %entry.path.display(), entries = children.len(), "Descending");
                        yield Ok(RenameEvent::Descended(entry.path.clone()));
                        pending.push(children.into());
                        continue;
                    },
                    Err(e) => Err(e).or_raise(|| RenameErrorKind::Listing(entry.path.clone())),
                }
            } else {
                rename_file(ctx, &entry, &mut warning).await
            };
            let report = Report { entry, result, warning };
            report.log();
            summary.record(&report);
            yield Ok(RenameEvent::Processed(Box::new(report)));
        }

        tracing::info!(%summary, "Rename walk complete");
        yield Ok(RenameEvent::Complete(summary));
    })
}
