//! File-based config discovery for CLI use
//!
//! Handles finding and loading bale configuration files from the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::RawConfig;
use crate::error::{ConfigError, Result};

/// Conventional file names, in lookup order.
pub const CONFIG_FILES: [&str; 2] = ["bale.toml", "bale.config.json"];

/// Field read from `package.json` when no dedicated file exists.
pub const PACKAGE_JSON_FIELD: &str = "bale";

/// File-based configuration discovery
///
/// This is primarily for CLI use. Library users should build a
/// [`RawConfig`] with `RawConfig::from_value()` directly.
///
/// # Example
///
/// ```no_run
/// use bale_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. bale.toml
    /// 2. bale.config.json
    /// 3. package.json (`bale` field)
    pub fn find(&self) -> Option<PathBuf> {
        for name in CONFIG_FILES {
            let path = self.root.join(name);
            if path.is_file() {
                return Some(path);
            }
        }

        let pkg_path = self.root.join("package.json");
        let content = fs::read_to_string(&pkg_path).ok()?;
        let parsed = serde_json::from_str::<Value>(&content).ok()?;
        match parsed.get(PACKAGE_JSON_FIELD) {
            Some(value) if !value.is_null() => Some(pkg_path),
            _ => None,
        }
    }

    /// Load config from the discovered file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<RawConfig> {
        let path = self
            .find()
            .ok_or_else(|| ConfigError::NotFound(self.root.clone()))?;
        load_path(&path)
    }
}

/// Load a configuration file by path. `package.json` is read through its
/// `bale` field; other files are dispatched on their extension.
pub fn load_path(path: &Path) -> Result<RawConfig> {
    if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
        return load_from_package_json(path);
    }
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    RawConfig::from_file(path)
}

fn load_from_package_json(path: &Path) -> Result<RawConfig> {
    let content = fs::read_to_string(path)?;
    let parsed: Value =
        serde_json::from_str(&content).map_err(|e| ConfigError::parse("package.json", e))?;

    match parsed.get(PACKAGE_JSON_FIELD) {
        Some(value) if !value.is_null() => RawConfig::from_value(value.clone()),
        _ => Err(ConfigError::missing(
            PACKAGE_JSON_FIELD,
            "Add a `bale` field to package.json or create bale.toml",
        )),
    }
}

/// Discover and load config from the current directory
///
/// # Example
///
/// ```no_run
/// use bale_config::discover;
///
/// let config = discover().unwrap();
/// ```
pub fn discover() -> Result<RawConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}
