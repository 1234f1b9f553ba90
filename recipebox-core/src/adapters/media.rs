//! Local filesystem media storage

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::domain::result::{Error, Result};
use crate::ports::MediaStorage;

/// Stores media files under a root directory
#[derive(Debug, Clone)]
pub struct LocalMediaStorage {
    root: PathBuf,
}

impl LocalMediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative media path under the root
    ///
    /// Absolute paths and `..` components are rejected.
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        if path.is_empty() {
            return Err(Error::validation("Media path cannot be empty"));
        }
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => {
                    return Err(Error::validation(format!(
                        "Media path must be relative and stay under the media root: {}",
                        path
                    )))
                }
            }
        }
        Ok(self.root.join(relative))
    }
}

impl MediaStorage for LocalMediaStorage {
    fn save(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(&target, bytes)
            .map_err(|e| Error::storage(format!("Failed to write {}: {}", target.display(), e)))
    }

    fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.resolve(path)?.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_creates_directories() {
        let dir = tempdir().unwrap();
        let storage = LocalMediaStorage::new(dir.path());

        storage.save("uploads/recipe/abc.jpg", b"jpeg").unwrap();

        let written = dir.path().join("uploads/recipe/abc.jpg");
        assert_eq!(fs::read(written).unwrap(), b"jpeg");
        assert!(storage.exists("uploads/recipe/abc.jpg").unwrap());
        assert!(!storage.exists("uploads/recipe/missing.jpg").unwrap());
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let dir = tempdir().unwrap();
        let storage = LocalMediaStorage::new(dir.path());

        assert!(storage.save("../evil.jpg", b"x").unwrap_err().is_validation());
        assert!(storage.save("/etc/passwd", b"x").unwrap_err().is_validation());
        assert!(storage.save("uploads/../../x", b"x").unwrap_err().is_validation());
        assert!(storage.save("", b"x").unwrap_err().is_validation());
    }
}
