//! Media storage port - uploaded file bytes

use crate::domain::result::Result;

/// Storage for uploaded media files
///
/// Paths are relative, `/`-separated (e.g. `uploads/recipe/<id>.jpg`).
pub trait MediaStorage: Send + Sync {
    /// Write the bytes at `path`, replacing any existing file
    fn save(&self, path: &str, bytes: &[u8]) -> Result<()>;

    /// Whether a file exists at `path`
    fn exists(&self, path: &str) -> Result<bool>;
}
