//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "media": { "root": "media" },
//!   "logging": { "enabled": true }
//! }
//! ```
//! Keys this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const SETTINGS_FILE: &str = "settings.json";
const DEFAULT_MEDIA_DIR: &str = "media";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    media: MediaSettings,
    #[serde(default)]
    logging: LoggingSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MediaSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    root: Option<PathBuf>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoggingSettings {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            other: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Parse a boolean environment override
fn parse_env_flag(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true" | "1" | "yes" | "TRUE" | "YES") => Some(true),
        Some("false" | "0" | "no" | "FALSE" | "NO") => Some(false),
        _ => None,
    }
}

/// Recipebox configuration (resolved view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute (or data-dir relative) directory holding uploaded media
    pub media_root: PathBuf,
    pub logging_enabled: bool,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Config {
    /// Load config from the data directory
    ///
    /// Environment overrides: `RECIPEBOX_MEDIA_ROOT`, `RECIPEBOX_LOGGING`.
    /// A relative media root resolves against `data_dir`.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join(SETTINGS_FILE);

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("Failed to read {}", settings_path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid settings file {}", settings_path.display()))?
        } else {
            SettingsFile::default()
        };

        let media_root = std::env::var_os("RECIPEBOX_MEDIA_ROOT")
            .map(PathBuf::from)
            .or_else(|| raw.media.root.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_DIR));
        let media_root = if media_root.is_absolute() {
            media_root
        } else {
            data_dir.join(media_root)
        };

        let logging_enabled =
            parse_env_flag(std::env::var("RECIPEBOX_LOGGING").ok().as_deref())
                .unwrap_or(raw.logging.enabled);

        Ok(Self {
            media_root,
            logging_enabled,
            _raw_settings: raw,
        })
    }

    /// Save config to the data directory, preserving unmanaged settings
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join(SETTINGS_FILE);

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_else(|_| self._raw_settings.clone())
        } else {
            self._raw_settings.clone()
        };

        // Store the media root relative to the data dir when it lives inside it
        let root = self
            .media_root
            .strip_prefix(data_dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| self.media_root.clone());
        settings.media.root = Some(root);
        settings.logging.enabled = self.logging_enabled;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {}", settings_path.display()))?;
        Ok(())
    }

    /// Point the media root at a new directory
    pub fn set_media_root(&mut self, data_dir: &Path, root: impl Into<PathBuf>) {
        let root = root.into();
        self.media_root = if root.is_absolute() {
            root
        } else {
            data_dir.join(root)
        };
    }
}
