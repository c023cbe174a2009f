//! Dry-run adapter for the `FileSystem` port.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::ports::FileSystem;

/// Delegates reads to an inner filesystem and swallows every write.
///
/// Swallowed writes are remembered so the caller can report what a real
/// run would have touched. Clones share the inner filesystem and the record.
#[derive(Clone)]
pub struct DryRunFileSystem {
    inner: Arc<dyn FileSystem>,
    skipped: Arc<Mutex<Vec<PathBuf>>>,
}

impl DryRunFileSystem {
    /// Creates a dry-run filesystem wrapping the given implementation.
    pub fn new(inner: Box<dyn FileSystem>) -> Self {
        Self { inner: Arc::from(inner), skipped: Arc::new(Mutex::new(Vec::new())) }
    }

    /// Paths whose writes were swallowed, in write order.
    #[must_use]
    pub fn skipped_writes(&self) -> Vec<PathBuf> {
        self.skipped.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl FileSystem for DryRunFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.inner.read_to_string(path)
    }

    fn write(
        &self,
        path: &Path,
        _contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        log::debug!("Dry run: not writing {}", path.display());
        self.skipped.lock().unwrap_or_else(PoisonError::into_inner).push(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner.is_dir(path)
    }

    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        self.inner.list_dir(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryFileSystem;

    #[test]
    fn writes_are_swallowed_and_recorded() {
        let inner = MemoryFileSystem::new().with_file("/proj/UE4.workspace", "old");
        let handle = inner.clone();
        let fs = DryRunFileSystem::new(Box::new(inner));

        fs.write(Path::new("/proj/UE4.workspace"), "new").unwrap();

        assert_eq!(fs.read_to_string(Path::new("/proj/UE4.workspace")).unwrap(), "old");
        assert_eq!(handle.write_count(), 0);
        assert_eq!(fs.skipped_writes(), vec![PathBuf::from("/proj/UE4.workspace")]);
    }
}
