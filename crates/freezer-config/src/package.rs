//! Package specifications and specifier remapping.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Specifier that maps a dependency to the shared empty module.
pub const EMPTY_SENTINEL: &str = "@empty";

/// Entry module used when a package declares no `main`.
pub const DEFAULT_MAIN: &str = "/index.js";

/// Static description of a package the resolver may encounter.
///
/// A package becomes "known" to the resolver by appearing in
/// [`FreezerConfig::packages`](crate::FreezerConfig::packages); bare specifiers
/// whose first segment names it resolve into the package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageSpec {
    #[serde(default)]
    pub version: Option<String>,

    /// Location the package is served from. Relative alias targets are joined
    /// onto it. Defaults to the package name.
    #[serde(default)]
    pub root_url: Option<String>,

    #[serde(default)]
    pub main: Option<String>,

    /// Bare specifier remapping, consulted for packages the resolver doesn't know.
    #[serde(default)]
    pub map: IndexMap<String, AliasTarget>,

    /// Modules of an excluded package are kept out of emitted bundles.
    #[serde(default)]
    pub excluded: bool,

    /// SystemJS-style block found in lively-flavoured `package.json` files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub systemjs: Option<SystemJsSpec>,
}

/// The `systemjs` block of a `package.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemJsSpec {
    #[serde(default)]
    pub main: Option<String>,

    #[serde(default)]
    pub map: IndexMap<String, AliasTarget>,
}

/// Right-hand side of an alias map entry.
///
/// Either a plain replacement specifier or an environment-conditional object
/// such as `{"~node": "@empty"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AliasTarget {
    Conditional {
        #[serde(rename = "~node")]
        node: String,
    },
    Specifier(String),
}

/// What an alias target asks the resolver to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasResolution<'a> {
    /// Resolve to the shared empty module.
    Exclude,
    /// Path relative to the referencing package's root.
    Relative(&'a str),
    /// Specifier handed to the host's own normalization.
    Specifier(&'a str),
}

impl AliasTarget {
    pub fn target(&self) -> &str {
        match self {
            AliasTarget::Conditional { node } => node,
            AliasTarget::Specifier(target) => target,
        }
    }

    pub fn classify(&self) -> AliasResolution<'_> {
        let target = self.target();
        if target == EMPTY_SENTINEL {
            AliasResolution::Exclude
        } else if target.starts_with('.') {
            AliasResolution::Relative(target)
        } else {
            AliasResolution::Specifier(target)
        }
    }
}

impl PackageSpec {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            ..Self::default()
        }
    }

    pub fn with_main(mut self, main: impl Into<String>) -> Self {
        self.main = Some(main.into());
        self
    }

    pub fn with_root_url(mut self, root_url: impl Into<String>) -> Self {
        self.root_url = Some(root_url.into());
        self
    }

    pub fn with_alias(mut self, specifier: impl Into<String>, target: AliasTarget) -> Self {
        self.map.insert(specifier.into(), target);
        self
    }

    pub fn excluded(mut self, excluded: bool) -> Self {
        self.excluded = excluded;
        self
    }

    /// Version string used in qualified module ids.
    pub fn version_or_default(&self) -> &str {
        self.version.as_deref().unwrap_or("0.0.0")
    }

    /// Path of the package's entry module, always starting with `/`.
    ///
    /// `main` wins over `systemjs.main`; without either the entry is
    /// `/index.js`. A leading `./` is rewritten to `/`.
    pub fn entry_path(&self) -> String {
        let main = self
            .main
            .as_deref()
            .or_else(|| self.systemjs.as_ref().and_then(|s| s.main.as_deref()))
            .unwrap_or(DEFAULT_MAIN);

        let main = main.replacen("./", "/", 1);
        if main.starts_with('/') {
            main
        } else {
            format!("/{main}")
        }
    }

    /// Look up an alias, preferring the top-level map over the systemjs block.
    pub fn alias(&self, specifier: &str) -> Option<&AliasTarget> {
        self.map.get(specifier).or_else(|| {
            self.systemjs
                .as_ref()
                .and_then(|systemjs| systemjs.map.get(specifier))
        })
    }

    /// Build a spec from a parsed `package.json`, returning it with the package name.
    pub fn from_package_json(value: &Value) -> Result<(String, Self)> {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "name".to_string(),
                hint: Some("package.json has no package name".to_string()),
            })?
            .to_string();

        let spec: PackageSpec =
            serde_json::from_value(value.clone()).map_err(|e| ConfigError::InvalidValue {
                field: format!("packages.{name}"),
                hint: Some(e.to_string()),
            })?;

        Ok((name, spec))
    }
}

/// Extra dependencies of an opaque standalone script.
///
/// Paths are relative to the script's own location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandaloneSpec {
    #[serde(default)]
    pub deps: Vec<String>,
}
