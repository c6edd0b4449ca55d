//! Top-level configuration structure.
//!
//! For file discovery, see the `discovery` module.

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized, Toml},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::package::{PackageSpec, StandaloneSpec};
use crate::settings::Settings;

/// Environment variable prefix; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "FREEZER_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreezerConfig {
    /// Known packages, in declaration order. Declaration order is the
    /// scheduler's tie-break order.
    #[serde(default)]
    pub packages: IndexMap<String, PackageSpec>,

    /// Metadata for standalone scripts, keyed by module id.
    #[serde(default)]
    pub standalone: IndexMap<String, StandaloneSpec>,

    #[serde(default)]
    pub settings: Settings,
}

impl FreezerConfig {
    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use freezer_config::FreezerConfig;
    /// use serde_json::json;
    ///
    /// let config = FreezerConfig::from_value(json!({
    ///     "packages": {
    ///         "lively.lang": { "version": "1.0.0", "main": "./index.js" }
    ///     },
    ///     "settings": { "max_attempts": 3 }
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(config.settings.max_attempts, 3);
    /// assert!(config.package("lively.lang").is_some());
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Load configuration from a file, layered as:
    /// defaults < file (`.toml` or `.json`) < `FREEZER_*` environment variables.
    pub fn load(path: &Path) -> Result<Self> {
        let figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => figment.merge(Toml::file(path)),
            Some("json") => figment.merge(Json::file(path)),
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };

        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Figment(Box::new(e)))?;

        tracing::debug!(
            path = %path.display(),
            packages = config.packages.len(),
            "loaded freezer config"
        );

        Ok(config)
    }

    pub fn package(&self, name: &str) -> Option<&PackageSpec> {
        self.packages.get(name)
    }

    pub fn with_package(mut self, name: impl Into<String>, spec: PackageSpec) -> Self {
        self.packages.insert(name.into(), spec);
        self
    }

    pub fn with_standalone(mut self, id: impl Into<String>, spec: StandaloneSpec) -> Self {
        self.standalone.insert(id.into(), spec);
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::AliasTarget;
    use serde_json::json;

    #[test]
    fn from_value_keeps_package_declaration_order() {
        let config = FreezerConfig::from_value(json!({
            "packages": {
                "zeta": { "version": "1.0.0" },
                "alpha": { "version": "2.0.0" },
                "mid": { "version": "3.0.0" }
            }
        }))
        .unwrap();

        let names: Vec<_> = config.packages.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn from_value_rejects_bad_types() {
        let result = FreezerConfig::from_value(json!({ "settings": { "max_attempts": "many" } }));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn to_value_round_trips_aliases() {
        let config = FreezerConfig::default().with_package(
            "app",
            PackageSpec::new("1.0.0").with_alias("fs", AliasTarget::Specifier("@empty".into())),
        );

        let value = config.to_value().unwrap();
        assert_eq!(value["packages"]["app"]["map"]["fs"], json!("@empty"));
        assert_eq!(FreezerConfig::from_value(value).unwrap(), config);
    }
}
