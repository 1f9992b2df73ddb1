//! In-memory share backend for testing.

use crate::error::{ErrorKind, Result};
use crate::path::validate as validate_path;
use crate::{RemoteShare, ShareEntry};
use async_trait::async_trait;
use exn::ResultExt;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A share operation, as recorded by [`MockShare::operations`] and targeted
/// by [`MockShare::with_fault`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    List(PathBuf),
    Download(PathBuf),
    Upload(PathBuf),
    /// Keyed on the source path when used as a fault.
    Rename(PathBuf, PathBuf),
}
impl Operation {
    fn fault_key(&self) -> (u8, &Path) {
        match self {
            Self::List(p) => (0, p),
            Self::Download(p) => (1, p),
            Self::Upload(p) => (2, p),
            Self::Rename(from, _) => (3, from),
        }
    }
}

#[derive(Default)]
struct State {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    faults: HashSet<(u8, PathBuf)>,
    log: Vec<Operation>,
}

/// In-memory share backend for testing.
///
/// Directories are implied by the files placed in them (plus any added with
/// [`with_directory`](Self::with_directory)). Listings come back sorted by
/// name. Every attempted operation is recorded, and any operation can be made
/// to fail for a given path.
///
/// # Examples
///
/// ```
/// use smbpix_share::backend::{MockShare, Operation};
///
/// let share = MockShare::with_files([
///     ("Conversion/input_a.psd", b"not really a psd".to_vec()),
/// ])
/// .with_directory("Converted")
/// .with_fault(Operation::Download("Conversion/input_a.psd".into()));
/// assert!(share.contains("Conversion/input_a.psd"));
/// ```
pub struct MockShare {
    name: String,
    state: Mutex<State>,
}

impl MockShare {
    /// Create a mock share pre-populated with files.
    ///
    /// Panics if any path fails validation. If test setup is wrong, then test
    /// should not pass.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>) -> Self {
        let mut state = State::default();
        for (path, data) in files {
            let path = Self::valid(path.into());
            Self::register_ancestors(&mut state.directories, &path);
            state.files.insert(path, data.into());
        }
        Self {
            name: "mock".to_string(),
            state: Mutex::new(state),
        }
    }

    /// Add an (empty) directory and its ancestors.
    pub fn with_directory(self, path: impl Into<PathBuf>) -> Self {
        let path = Self::valid(path.into());
        {
            let mut state = self.state();
            Self::register_ancestors(&mut state.directories, &path);
            state.directories.insert(path);
        }
        self
    }

    /// Make an operation fail. Rename faults match on the source path only.
    pub fn with_fault(self, operation: Operation) -> Self {
        {
            let (kind, path) = operation.fault_key();
            let key = (kind, Self::valid(path.to_path_buf()));
            self.state().faults.insert(key);
        }
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// All operations attempted so far, in order.
    pub fn operations(&self) -> Vec<Operation> {
        self.state().log.clone()
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.state().files.contains_key(path.as_ref())
    }

    pub fn read(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.state().files.get(path.as_ref()).cloned()
    }

    /// Paths of every file currently on the share.
    pub fn files(&self) -> Vec<PathBuf> {
        self.state().files.keys().cloned().collect()
    }

    fn valid(path: PathBuf) -> PathBuf {
        match validate_path(&path) {
            Ok(validated) => validated,
            // The panic here is DELIBERATE. MockShare is intended to be used
            // in tests; panics are expected. There is no error result.
            Err(_) => panic!("MockShare: invalid path {}", path.display()),
        }
    }

    fn register_ancestors(directories: &mut BTreeSet<PathBuf>, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if !ancestor.as_os_str().is_empty() {
                directories.insert(ancestor.to_path_buf());
            }
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the operation and reports whether a fault was injected for it.
    fn attempt(&self, operation: Operation) -> bool {
        let mut state = self.state();
        let (kind, path) = operation.fault_key();
        let faulted = state.faults.contains(&(kind, path.to_path_buf()));
        state.log.push(operation);
        faulted
    }
}
impl Default for MockShare {
    fn default() -> Self {
        let files: [(&str, Vec<u8>); 0] = [];
        Self::with_files(files)
    }
}

#[async_trait]
impl RemoteShare for MockShare {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list(&self, path: &Path) -> Result<Vec<ShareEntry>> {
        let path = validate_path(path).or_raise(|| ErrorKind::Unavailable(path.to_path_buf()))?;
        if self.attempt(Operation::List(path.clone())) {
            exn::bail!(ErrorKind::Unavailable(path));
        }
        let state = self.state();
        if !state.directories.contains(&path) {
            exn::bail!(ErrorKind::Unavailable(path));
        }
        let directories = state.directories.iter().filter(|d| d.parent() == Some(path.as_path())).cloned().map(ShareEntry::directory);
        let files = state.files.keys().filter(|f| f.parent() == Some(path.as_path())).cloned().map(ShareEntry::file);
        let mut entries: Vec<_> = directories.chain(files).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn download(&self, path: &Path, local: &Path) -> Result<()> {
        let transfer = || ErrorKind::Transfer(path.to_path_buf());
        let path = validate_path(path).or_raise(transfer)?;
        if self.attempt(Operation::Download(path.clone())) {
            exn::bail!(ErrorKind::Transfer(path));
        }
        let data = self.state().files.get(&path).cloned().ok_or_else(|| exn::Exn::from(transfer()))?;
        tokio::fs::write(local, data).await.or_raise(transfer)?;
        Ok(())
    }

    async fn upload(&self, data: &[u8], path: &Path) -> Result<()> {
        let transfer = || ErrorKind::Transfer(path.to_path_buf());
        let path = validate_path(path).or_raise(transfer)?;
        if self.attempt(Operation::Upload(path.clone())) {
            exn::bail!(ErrorKind::Transfer(path));
        }
        let mut state = self.state();
        let parent_exists = path.parent().is_none_or(|p| p.as_os_str().is_empty() || state.directories.contains(p));
        if !parent_exists || state.directories.contains(&path) {
            exn::bail!(ErrorKind::Transfer(path));
        }
        state.files.insert(path, data.to_vec());
        Ok(())
    }

    async fn rename(&self, entry: &ShareEntry, to: &Path) -> Result<()> {
        let rejected = || ErrorKind::Rename(to.to_path_buf());
        let from = validate_path(&entry.path).or_raise(rejected)?;
        let target = validate_path(to).or_raise(rejected)?;
        if self.attempt(Operation::Rename(from.clone(), target.clone())) {
            exn::bail!(ErrorKind::Rename(target));
        }
        let mut state = self.state();
        let parent_exists = target.parent().is_none_or(|p| p.as_os_str().is_empty() || state.directories.contains(p));
        if !parent_exists || state.files.contains_key(&target) || state.directories.contains(&target) {
            exn::bail!(ErrorKind::Rename(target));
        }
        let data = state.files.remove(&from).ok_or_else(|| exn::Exn::from(ErrorKind::Rename(target.clone())))?;
        state.files.insert(target, data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share() -> MockShare {
        MockShare::with_files([
            ("to_be_renamed/b.psd", b"b".to_vec()),
            ("to_be_renamed/a_set/a.psd", b"a".to_vec()),
            ("Conversion/input_x.psd", b"x".to_vec()),
        ])
        .with_directory("Converted")
    }

    #[tokio::test]
    async fn test_list_mixes_files_and_directories_by_name() {
        let entries = share().list(Path::new("to_be_renamed")).await.unwrap();
        assert_eq!(entries, vec![ShareEntry::directory("to_be_renamed/a_set"), ShareEntry::file("to_be_renamed/b.psd")]);
    }

    #[tokio::test]
    async fn test_list_unknown_directory() {
        let err = share().list(Path::new("nowhere")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Unavailable(_)));
        assert!(share().list(Path::new("Converted")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_download_writes_local_copy() {
        let staging = tempfile::tempdir().unwrap();
        let local = staging.path().join("x.psd");
        share().download(Path::new("Conversion/input_x.psd"), &local).await.unwrap();
        assert_eq!(std::fs::read(local).unwrap(), b"x");
    }

    #[tokio::test]
    async fn test_upload_requires_parent_directory() {
        let share = share();
        share.upload(b"png", Path::new("Converted/_x.png")).await.unwrap();
        assert_eq!(share.read("Converted/_x.png").unwrap(), b"png");
        let err = share.upload(b"png", Path::new("Missing/_x.png")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Transfer(_)));
    }

    #[tokio::test]
    async fn test_rename_moves_file() {
        let share = share();
        let entry = ShareEntry::file("to_be_renamed/a_set/a.psd");
        share.rename(&entry, Path::new("to_be_renamed/a_set/a_1x1.psd")).await.unwrap();
        assert!(share.contains("to_be_renamed/a_set/a_1x1.psd"));
        assert!(!share.contains("to_be_renamed/a_set/a.psd"));
        let err = share.rename(&entry, Path::new("to_be_renamed/a_set/again.psd")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Rename(_)));
    }

    #[tokio::test]
    async fn test_rename_onto_existing_file_is_rejected() {
        let share = share();
        let entry = ShareEntry::file("to_be_renamed/a_set/a.psd");
        let err = share.rename(&entry, Path::new("to_be_renamed/b.psd")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Rename(_)));
        assert_eq!(share.read("to_be_renamed/b.psd").unwrap(), b"b");
        assert!(share.contains("to_be_renamed/a_set/a.psd"));
    }

    #[tokio::test]
    async fn test_faults_and_operation_log() {
        let share = share()
            .with_fault(Operation::Download("Conversion/input_x.psd".into()))
            .with_fault(Operation::Rename("to_be_renamed/b.psd".into(), PathBuf::new()));
        let staging = tempfile::tempdir().unwrap();

        let err = share.download(Path::new("Conversion/input_x.psd"), &staging.path().join("x")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Transfer(_)));
        let err = share.rename(&ShareEntry::file("to_be_renamed/b.psd"), Path::new("to_be_renamed/c.psd")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Rename(_)));
        assert!(share.contains("to_be_renamed/b.psd"));

        assert_eq!(
            share.operations(),
            vec![
                Operation::Download("Conversion/input_x.psd".into()),
                Operation::Rename("to_be_renamed/b.psd".into(), "to_be_renamed/c.psd".into()),
            ]
        );
    }

    #[test]
    #[should_panic(expected = "invalid path")]
    fn test_with_files_panics_on_bad_path() {
        MockShare::with_files([("../escape", b"bad".to_vec())]);
    }
}
