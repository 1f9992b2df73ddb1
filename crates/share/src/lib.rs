pub mod backend;
mod entry;
pub mod error;
mod path;

pub use crate::backend::RemoteShare;
pub use crate::entry::ShareEntry;
pub use crate::path::validate as validate_path;
use std::sync::Arc;

pub type ShareHandle = Arc<dyn RemoteShare + Send + Sync>;
