//! # Constants
//!
//! Naming conventions of the orchestrator's volume layout and loader defaults.

/// Prefix that marks an entry as hidden.
///
/// The kubelet's atomic writer keeps the real payload in a timestamped
/// `..2024_01_01_00_00_00.000000000` directory, points `..data` at it, and
/// exposes each key as a `key -> ..data/key` symlink. All of the bookkeeping
/// names start with this prefix.
pub const HIDDEN_PREFIX: &str = ".";

/// Conventional mount point for secret volumes
pub const DEFAULT_SECRETS_ROOT: &str = "/etc/secrets";

/// Environment variable that overrides the secrets root
pub const SECRETS_ROOT_ENV: &str = "SECRETS_ROOT";

/// Root of every virtual filesystem walk
pub const VIRTUAL_ROOT: &str = ".";

/// Default tracing filter for the CLI
pub const DEFAULT_LOG_FILTER: &str = "mounted_secrets=info";

/// Tracing filter for the CLI when `--verbose` is given
pub const VERBOSE_LOG_FILTER: &str = "mounted_secrets=trace";
