//! Storage configuration module.
//!
//! Tells the resource engine where the site lives on disk, which public URL
//! prefix that directory is served under, and where the upload transport
//! leaves incoming temp files.
//!
//! ## Config File Location
//!
//! Place `image-resource.toml` in the host application's config directory and
//! load it with [`load_config`]. The file is optional; every key has a default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! filesystem_root = "/var/www/site"   # Absolute path served as the site root
//! public_root = "/"                   # URL prefix for filesystem_root
//! upload_dir = "/tmp"                 # Where the upload transport stores temp files
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! public_root = "https://cdn.example.com/"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name [`load_config`] looks for inside the given directory.
pub const CONFIG_FILENAME: &str = "image-resource.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Storage configuration loaded from `image-resource.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Absolute directory that maps to [`public_root`](Self::public_root).
    /// Intermediate directories for uploads are created below it.
    pub filesystem_root: PathBuf,
    /// Public URL prefix for `filesystem_root`, e.g. `https://example.com/`.
    pub public_root: String,
    /// Directory the upload transport writes temp files into. Only files
    /// inside it are accepted as genuine uploads.
    pub upload_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            filesystem_root: PathBuf::from("/var/www/site"),
            public_root: "/".to_string(),
            upload_dir: std::env::temp_dir(),
        }
    }
}

impl StorageConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.filesystem_root.is_absolute() {
            return Err(ConfigError::Validation(
                "filesystem_root must be an absolute path".into(),
            ));
        }
        if self.public_root.trim().is_empty() {
            return Err(ConfigError::Validation(
                "public_root must not be empty".into(),
            ));
        }
        if self.upload_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "upload_dir must not be empty".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(StorageConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `image-resource.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<StorageConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: StorageConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `image-resource.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<StorageConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `image-resource.toml`.
pub fn stock_config_toml() -> &'static str {
    r##"# Image Resource Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Unknown keys will cause an error.

# Absolute directory served as the public site root. Image URLs are built by
# replacing this prefix with public_root, and missing directories for uploaded
# files are created below it.
filesystem_root = "/var/www/site"

# Public URL prefix that filesystem_root is served under.
public_root = "/"

# Directory the upload transport writes incoming temp files into.
# Only files inside this directory are accepted as uploads.
# Defaults to the system temp directory.
# upload_dir = "/tmp"
"##
}
