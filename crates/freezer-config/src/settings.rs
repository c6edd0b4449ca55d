//! Loader settings shared by the resolver and the runtime.

use serde::{Deserialize, Serialize};

/// Number of passes the runtime loader makes before giving up on a module.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Prefix stripped from canonical ids during host normalization.
    #[serde(default)]
    pub base_url: String,

    /// Module ids the host provides itself; they count as already executed.
    #[serde(default = "default_globals")]
    pub globals: Vec<String>,

    #[serde(default)]
    pub log_level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_url: String::new(),
            globals: default_globals(),
            log_level: None,
        }
    }
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_globals() -> Vec<String> {
    vec!["@lively-env".to_string(), "@system-env".to_string()]
}
