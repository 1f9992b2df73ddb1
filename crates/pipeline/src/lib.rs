//! The two batch pipelines run against a remote share.
//!
//! - [`convert`] re-encodes every image in a flat source directory and
//!   publishes the results to a destination directory.
//! - [`rename`] walks a directory tree and appends each image's pixel
//!   dimensions to its file name.
//!
//! Both pipelines are streams of events. Only pre-flight and batch-start
//! failures surface as `Err` items; everything that goes wrong with a single
//! entry is carried inside that entry's [`Report`] and the batch carries on.

pub mod convert;
pub mod error;
mod filter;
mod naming;
pub mod rename;
mod report;
mod staging;

pub use crate::filter::Exclusions;
pub use crate::naming::{conversion_name, dimension_name};
pub use crate::report::{Outcome, Report, Skip, Summary, Tally};
pub use crate::staging::Staging;
