//! Host module-id normalization for specifiers no package claims.

use std::fmt;

/// Maps a specifier the resolver can't place in a package onto the host's
/// canonical name for it. The result is turned into a standalone
/// [`ModuleId`](crate::ModuleId).
pub trait HostNormalizer: Send + Sync + fmt::Debug {
    fn normalize(&self, specifier: &str) -> String;
}

/// Strips a configured base URL so that scripts served by the host itself get
/// `local://` ids, while foreign URLs are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseUrlNormalizer {
    base_url: String,
}

impl BaseUrlNormalizer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl HostNormalizer for BaseUrlNormalizer {
    fn normalize(&self, specifier: &str) -> String {
        if self.base_url.is_empty() {
            return specifier.to_string();
        }
        specifier
            .strip_prefix(&self.base_url)
            .map(|rest| rest.trim_start_matches('/').to_string())
            .unwrap_or_else(|| specifier.to_string())
    }
}
