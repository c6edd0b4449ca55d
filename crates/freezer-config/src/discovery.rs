//! File-based config discovery.
//!
//! Handles finding and loading freezer configuration files from the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::FreezerConfig;
use crate::error::{ConfigError, Result};

const CONFIG_FILES: [&str; 2] = ["freezer.toml", "freezer.json"];

/// File-based configuration discovery
///
/// Searches for freezer configuration files in conventional locations and loads them.
/// Library users should prefer `FreezerConfig::from_value()` or building the config
/// directly.
///
/// # Example
///
/// ```no_run
/// use freezer_config::ConfigDiscovery;
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
    /// 1. freezer.toml
    /// 2. freezer.json
    /// 3. package.json (freezer field)
    pub fn find(&self) -> Option<PathBuf> {
        for name in CONFIG_FILES {
            let path = self.root.join(name);
            if path.exists() {
                return Some(path);
            }
        }

        let pkg_path = self.root.join("package.json");
        let content = fs::read_to_string(&pkg_path).ok()?;
        let parsed: Value = serde_json::from_str(&content).ok()?;
        parsed
            .get("freezer")
            .filter(|value| !value.is_null())
            .map(|_| pkg_path)
    }

    /// Load config from discovered file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<FreezerConfig> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
            return self.load_from_package_json(&path);
        }
        FreezerConfig::load(&path)
    }

    fn load_from_package_json(&self, path: &Path) -> Result<FreezerConfig> {
        let content = fs::read_to_string(path)?;

        let parsed: Value =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
                field: "package.json".to_string(),
                hint: Some(format!("Invalid JSON: {e}")),
            })?;

        let value = parsed
            .get("freezer")
            .cloned()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "freezer".to_string(),
                hint: Some("Add a 'freezer' field to your package.json".to_string()),
            })?;

        FreezerConfig::from_value(value)
    }
}

/// Discover and load config from the current directory.
pub fn discover() -> Result<FreezerConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}
