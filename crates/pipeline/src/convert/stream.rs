use crate::Summary;
use crate::convert::{Context, Report, convert_entry};
use crate::error::{ErrorKind, Result};
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;

/// Progress events emitted by [`convert`] as it works through the source
/// directory.
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started): exactly once.
/// 2. [`DiscoveryComplete`](Self::DiscoveryComplete): exactly once, with the
///    number of listed entries.
/// 3. [`Processed`](Self::Processed): once per listed entry, in listing
///    order.
/// 4. [`Complete`](Self::Complete): exactly once, with the batch totals.
///
/// A failure to list the source directory terminates the stream early with an
/// `Err` item, in which case [`Complete`](Self::Complete) is never emitted.
#[derive(Debug)]
pub enum ConvertEvent {
    Started,
    DiscoveryComplete(u64),
    Processed(Box<Report>),
    Complete(Summary),
}

/// Streams [`ConvertEvent`]s for every entry in the source directory.
///
/// Entries are converted strictly one after another: an entry's full
/// sequence completes before the next one starts. Individual entry failures
/// are carried in their [`Report`] without terminating the stream.
pub fn convert(ctx: &Context) -> impl Stream<Item = Result<ConvertEvent>> + '_ {
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        yield Ok(ConvertEvent::Started);
        let source = &ctx.settings.source;
        tracing::info!(share = ctx.share.name(), path = %source.display(), "Listing conversion source");
        let entries = match ctx.share.list(source).await.or_raise(|| ErrorKind::ShareUnavailable(source.clone())) {
            Ok(entries) => entries,
            Err(e) => {
                yield Err(e);
                return;
            },
        };
        // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
        yield Ok(ConvertEvent::DiscoveryComplete(u64::try_from(entries.len()).unwrap_or(0)));

        let mut summary = Summary::default();
        for entry in entries {
            let report = convert_entry(ctx, entry).await;
            report.log();
            summary.record(&report);
            yield Ok(ConvertEvent::Processed(Box::new(report)));
        }

        tracing::info!(%summary, "Conversion complete");
        yield Ok(ConvertEvent::Complete(summary));
    })
}
