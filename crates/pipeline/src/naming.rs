//! File name derivation for both pipelines.
//!
//! Names are split on their last `.`; everything after it is the extension.
//! A name without a `.` has no extension.

use smbpix_inspect::OutputFormat;

/// The token removed from the front of a conversion source's stem.
const INPUT_TOKEN: &str = "input";

fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, extension)) => (stem, Some(extension)),
        None => (name, None),
    }
}

/// Output file name for a converted entry.
///
/// Drops the final extension, removes a literal leading `input` token from the
/// stem and appends the output format's extension.
///
/// ```
/// use smbpix_inspect::OutputFormat;
/// use smbpix_pipeline::conversion_name;
///
/// assert_eq!(conversion_name("input_foo.psd", OutputFormat::Png), "_foo.png");
/// ```
pub fn conversion_name(name: &str, format: OutputFormat) -> String {
    let (stem, _) = split_extension(name);
    let stem = stem.strip_prefix(INPUT_TOKEN).unwrap_or(stem);
    format!("{stem}.{}", format.extension())
}

/// New file name carrying the pixel dimensions, as `<stem>_<w>x<h>.<ext>`.
///
/// ```
/// use smbpix_pipeline::dimension_name;
///
/// assert_eq!(dimension_name("photo.psd", 800, 600), "photo_800x600.psd");
/// ```
pub fn dimension_name(name: &str, width: u32, height: u32) -> String {
    match split_extension(name) {
        (stem, Some(extension)) => format!("{stem}_{width}x{height}.{extension}"),
        (stem, None) => format!("{stem}_{width}x{height}"),
    }
}

/// Whether the stem already ends in `_<w>x<h>` for these dimensions.
pub(crate) fn has_dimensions(name: &str, width: u32, height: u32) -> bool {
    let (stem, _) = split_extension(name);
    stem.ends_with(&format!("_{width}x{height}"))
}
