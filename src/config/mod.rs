//! # Loader Configuration
//!
//! Loader settings read from environment variables.
//!
//! The secrets root defaults to the orchestrator's conventional mount point
//! and can be overridden with `SECRETS_ROOT` (typically set on the pod spec).

use crate::constants::{DEFAULT_SECRETS_ROOT, SECRETS_ROOT_ENV};
use std::path::PathBuf;

/// Where to load mounted secrets from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Directory the secret volumes are mounted under
    pub root: PathBuf,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_SECRETS_ROOT),
        }
    }
}

impl LoaderConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            root: env_var_or_default(SECRETS_ROOT_ENV, PathBuf::from(DEFAULT_SECRETS_ROOT)),
        }
    }

    /// Replace the root when one was given explicitly (e.g. a CLI flag)
    #[must_use]
    pub fn with_root_override(mut self, root: Option<PathBuf>) -> Self {
        if let Some(root) = root {
            self.root = root;
        }
        self
    }
}

/// Read environment variable or return default value
///
/// Empty and unparseable values fall back to the default.
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T
where
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
