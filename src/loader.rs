//! # Loader
//!
//! Entry points that walk a volume into a [`Secrets`] store.
//!
//! The free functions start from an empty store. The `Secrets::walk*` methods
//! merge into an existing one, overwriting values the walk finds again and
//! leaving everything else untouched.

use crate::config::LoaderConfig;
use crate::error::LoadError;
use crate::resolver::WalkSummary;
use crate::source::{load_into, LocalVolume, VirtualFs, VirtualVolume};
use crate::store::Secrets;
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};

impl Secrets {
    /// Walk a local directory into this store.
    ///
    /// On error the store keeps whatever was applied before the failure and
    /// should be treated as incomplete.
    ///
    /// # Errors
    ///
    /// Returns the first walk or read error.
    pub fn walk(&mut self, root: impl AsRef<Path>) -> Result<WalkSummary, LoadError> {
        let root = root.as_ref();
        let _span = info_span!("secrets.walk", root = %root.display()).entered();
        let summary = load_into(&LocalVolume::new(root), self)?;
        debug!(?summary, secrets = self.len(), "Loaded mounted secrets");
        Ok(summary)
    }

    /// Walk a virtual filesystem into this store, starting at `.`.
    ///
    /// # Errors
    ///
    /// Returns the first listing or read error.
    pub fn walk_fs<F: VirtualFs>(&mut self, fs: F) -> Result<WalkSummary, LoadError> {
        let _span = info_span!("secrets.walk_fs").entered();
        let summary = load_into(&VirtualVolume::new(fs), self)?;
        debug!(?summary, secrets = self.len(), "Loaded mounted secrets");
        Ok(summary)
    }
}

/// Load every secret under a local directory.
///
/// # Errors
///
/// Returns the first walk or read error.
pub fn walk(root: impl AsRef<Path>) -> Result<Secrets, LoadError> {
    let mut secrets = Secrets::new();
    secrets.walk(root)?;
    Ok(secrets)
}

/// Load every secret in a virtual filesystem.
///
/// # Errors
///
/// Returns the first listing or read error.
pub fn walk_fs<F: VirtualFs>(fs: F) -> Result<Secrets, LoadError> {
    let mut secrets = Secrets::new();
    secrets.walk_fs(fs)?;
    Ok(secrets)
}

/// Load secrets from the root configured by `SECRETS_ROOT`, or
/// `/etc/secrets` when it is unset.
///
/// # Errors
///
/// Returns the first walk or read error.
pub fn walk_from_env() -> Result<Secrets, LoadError> {
    walk(LoaderConfig::from_env().root)
}

/// Walk a local directory on tokio's blocking pool.
///
/// The walk itself cannot be cancelled; dropping the future only detaches it.
///
/// # Errors
///
/// Returns the first walk or read error, or [`LoadError::Task`] if the
/// blocking task panicked or the runtime shut down under it.
pub async fn spawn_walk(root: impl Into<PathBuf>) -> Result<Secrets, LoadError> {
    let root = root.into();
    let task_root = root.clone();
    tokio::task::spawn_blocking(move || walk(task_root))
        .await
        .map_err(|source| LoadError::Task { path: root, source })?
}
