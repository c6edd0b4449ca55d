use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Scheme prefix of every id the freezer qualifies itself.
pub const LOCAL_SCHEME: &str = "local://";

/// Id of the shared module that stands in for excluded dependencies.
pub const EMPTY_MODULE_ID: &str = "@empty";

/// Qualified, globally unique identifier of a module.
///
/// Package modules look like `local://pkg@1.0.0/lib/file.js`. Standalone
/// scripts keep their absolute URL (`https://cdn/x.js`) or get the `local://`
/// prefix (`local://vendor/lib.js`). The shared empty module is `@empty`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(String);

impl ModuleId {
    /// Wrap an already-qualified id.
    pub fn new(id: impl Into<String>) -> Result<Self, ModuleIdError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ModuleIdError::Empty);
        }
        Ok(Self(id))
    }

    /// Id of `path` inside package `name` at `version`.
    pub fn in_package(name: &str, version: &str, path: &str) -> Self {
        if path.starts_with('/') {
            Self(format!("{LOCAL_SCHEME}{name}@{version}{path}"))
        } else {
            Self(format!("{LOCAL_SCHEME}{name}@{version}/{path}"))
        }
    }

    /// Id of an opaque script given its host-canonical name.
    ///
    /// Absolute URLs and host registry names (`@lively-env`, `@empty`) are
    /// kept as they are; anything else is placed under `local://`.
    pub fn standalone(canonical: &str) -> Self {
        if canonical.starts_with('@') || canonical.contains("://") {
            Self(canonical.to_string())
        } else {
            Self(format!(
                "{LOCAL_SCHEME}{}",
                canonical.trim_start_matches("./").trim_start_matches('/')
            ))
        }
    }

    pub fn empty() -> Self {
        Self(EMPTY_MODULE_ID.to_string())
    }

    pub fn is_empty_module(&self) -> bool {
        self.0 == EMPTY_MODULE_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Split a package-qualified id into `(package, version, path)`.
    ///
    /// Returns `None` for standalone ids and `@empty`.
    pub fn package_parts(&self) -> Option<(&str, &str, &str)> {
        let rest = self.0.strip_prefix(LOCAL_SCHEME)?;
        // skip the first byte so scoped names (`@scope/pkg@1.0.0/...`) work
        let at = rest.get(1..)?.find('@')? + 1;
        if rest[..at].matches('/').count() > usize::from(rest.starts_with('@')) {
            return None;
        }
        let slash = rest[at..].find('/')? + at;
        Some((&rest[..at], &rest[at + 1..slash], &rest[slash..]))
    }

    /// Location of the module with the scheme and package prefix removed.
    pub fn location(&self) -> &str {
        match self.package_parts() {
            Some((_, _, path)) => path,
            None => self.0.strip_prefix(LOCAL_SCHEME).unwrap_or(&self.0),
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModuleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for ModuleId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ModuleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        ModuleId::new(value).map_err(serde::de::Error::custom)
    }
}

/// Error type for `ModuleId` construction failures.
#[derive(Debug, Error)]
pub enum ModuleIdError {
    #[error("module id is empty")]
    Empty,
}
