//! # Load Error Types
//!
//! Errors that abort a volume walk. Every variant is terminal: the walk stops
//! at the first failure and whatever was stored before it is left in place.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while walking a secret volume
#[derive(Debug, Error)]
pub enum LoadError {
    /// The local root could not be resolved to a named directory
    #[error("failed to resolve secrets root {}: {source}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The local walk could not enumerate an entry
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A virtual filesystem could not list a directory
    #[error("failed to list directory {}: {source}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A key's contents could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The blocking walk task did not complete
    #[error("secrets walk task for {} failed: {source}", path.display())]
    Task {
        path: PathBuf,
        #[source]
        source: tokio::task::JoinError,
    },
}

impl LoadError {
    pub(crate) fn walk(root: &Path, source: walkdir::Error) -> Self {
        let path = source
            .path()
            .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
        Self::Walk { path, source }
    }

    /// Path of the entry that failed
    pub fn path(&self) -> &Path {
        match self {
            Self::Root { path, .. }
            | Self::Walk { path, .. }
            | Self::ListDir { path, .. }
            | Self::Read { path, .. }
            | Self::Task { path, .. } => path,
        }
    }
}
