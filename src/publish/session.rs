//! Persisted browser session store.
//!
//! The publish driver keeps its login state (cookies, local storage) in a
//! profile directory that outlives the process: created on first run, reused
//! on every subsequent run, invalidated by deleting it. The store is an
//! explicitly passed handle rather than an implicit global so tests can
//! inject a throwaway directory.
//!
//! Running two processes against the same store concurrently is unsupported;
//! this type adds no locking.

use std::path::{Path, PathBuf};

use tracing::info;

use super::PublishError;

/// Handle to the persisted browser profile directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    /// Wraps a profile directory path. Nothing is touched on disk yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The profile directory path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Whether the profile directory already exists on disk.
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Creates the profile directory if needed.
    ///
    /// Returns `true` when the directory was just created, i.e. a first run,
    /// for which the driver will require a manual login.
    pub fn ensure(&self) -> Result<bool, PublishError> {
        if self.exists() {
            return Ok(false);
        }
        std::fs::create_dir_all(&self.root).map_err(|source| PublishError::Session {
            path: self.root.clone(),
            source,
        })?;
        info!(path = %self.root.display(), "created browser session store");
        Ok(true)
    }

    /// Deletes the profile directory, invalidating the persisted login.
    pub fn reset(&self) -> Result<(), PublishError> {
        if !self.exists() {
            return Ok(());
        }
        std::fs::remove_dir_all(&self.root).map_err(|source| PublishError::Session {
            path: self.root.clone(),
            source,
        })?;
        info!(path = %self.root.display(), "removed browser session store");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_creates_directory_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("profile"));

        assert!(!store.exists());
        assert!(store.ensure().unwrap(), "first ensure reports creation");
        assert!(store.exists());
        assert!(!store.ensure().unwrap(), "second ensure reports reuse");
    }

    #[test]
    fn test_ensure_creates_nested_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("a/b/profile"));

        assert!(store.ensure().unwrap());
        assert!(store.path().is_dir());
    }

    #[test]
    fn test_reset_removes_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("profile"));

        store.ensure().unwrap();
        std::fs::write(store.path().join("cookie"), b"session").unwrap();

        store.reset().unwrap();
        assert!(!store.exists());
    }

    #[test]
    fn test_reset_missing_directory_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("never-created"));
        assert!(store.reset().is_ok());
    }
}
