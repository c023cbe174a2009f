//! In-memory filesystem adapter.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ports::filesystem::FileSystem;

#[derive(Default)]
struct MemoryState {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    unreadable: BTreeSet<PathBuf>,
    read_only: bool,
    writes: usize,
}

/// Filesystem held entirely in memory.
///
/// Cloning shares the underlying tree, so a caller can hand one clone to a
/// [`crate::context::ServiceContext`] and inspect the results through another.
#[derive(Clone, Default)]
pub struct MemoryFileSystem {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryFileSystem {
    /// Creates an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given contents.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.lock().files.insert(path.into(), contents.to_string());
        self
    }

    /// Adds an (empty) directory.
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.lock().dirs.insert(path.into());
        self
    }

    /// Marks an existing path as unreadable: it still exists, reads fail.
    #[must_use]
    pub fn with_unreadable(self, path: impl Into<PathBuf>) -> Self {
        self.lock().unreadable.insert(path.into());
        self
    }

    /// Makes every subsequent write fail.
    #[must_use]
    pub fn read_only(self) -> Self {
        self.lock().read_only = true;
        self
    }

    /// Returns the contents of a file, if present.
    #[must_use]
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.lock().files.get(path).cloned()
    }

    /// Returns every file path currently stored.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.lock().files.keys().cloned().collect()
    }

    /// Number of successful writes performed so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MemoryState {
    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
            || self.dirs.iter().any(|d| d.starts_with(path) && d != path)
            || self.files.keys().any(|f| f.starts_with(path) && f != path)
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let state = self.lock();
        if state.unreadable.contains(path) {
            return Err(format!("permission denied: {}", path.display()).into());
        }
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| format!("file not found: {}", path.display()).into())
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut state = self.lock();
        if state.read_only {
            return Err(format!("read-only filesystem: {}", path.display()).into());
        }
        state.unreadable.remove(path);
        state.files.insert(path.to_path_buf(), contents.to_string());
        state.writes += 1;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.lock();
        state.files.contains_key(path) || state.unreadable.contains(path) || state.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.lock().is_dir(path)
    }

    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let state = self.lock();
        if !state.is_dir(path) {
            return Err(format!("not a directory: {}", path.display()).into());
        }
        let names: BTreeSet<String> = state
            .files
            .keys()
            .chain(state.dirs.iter())
            .filter_map(|entry| entry.strip_prefix(path).ok())
            .filter_map(|rest| rest.components().next())
            .map(|first| first.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(names.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_are_implied_by_files() {
        let fs = MemoryFileSystem::new()
            .with_file("/proj/Source/Game/Game.Build.cs", "")
            .with_dir("/proj/Saved");

        assert!(fs.is_dir(Path::new("/proj")));
        assert!(fs.is_dir(Path::new("/proj/Source/Game")));
        assert!(!fs.is_dir(Path::new("/proj/Source/Game/Game.Build.cs")));
        assert_eq!(fs.list_dir(Path::new("/proj")).unwrap(), vec!["Saved", "Source"]);
    }

    #[test]
    fn clones_share_state_and_count_writes() {
        let fs = MemoryFileSystem::new();
        let handle = fs.clone();
        fs.write(Path::new("/out/a.txt"), "a").unwrap();

        assert_eq!(handle.contents(Path::new("/out/a.txt")).as_deref(), Some("a"));
        assert_eq!(handle.write_count(), 1);
    }

    #[test]
    fn read_only_rejects_writes() {
        let fs = MemoryFileSystem::new().read_only();
        assert!(fs.write(Path::new("/out/a.txt"), "a").is_err());
        assert_eq!(fs.write_count(), 0);
    }

    #[test]
    fn unreadable_path_exists_but_fails_to_read() {
        let fs = MemoryFileSystem::new().with_unreadable("/out/locked.txt");
        assert!(fs.exists(Path::new("/out/locked.txt")));
        assert!(fs.read_to_string(Path::new("/out/locked.txt")).is_err());
    }

    #[test]
    fn list_dir_on_missing_path_fails() {
        let fs = MemoryFileSystem::new();
        assert!(fs.list_dir(Path::new("/nowhere")).is_err());
    }
}
