//! # Volume Entry Resolver
//!
//! Streaming reducer that turns depth-first walk entries into secrets.
//!
//! Both traversal sources feed [`WalkEntry`] values into a [`Resolver`] one at
//! a time, in walk order. For each entry:
//!
//! - hidden entries (leading `.`) are never stored, but their children are
//!   still visited
//! - a visible directory declares a secret named after it
//! - a visible file is read and stored under the secret resolved by
//!   [`resolve_secret_name`]
//!
//! The resolver does not buffer or reorder; a failed read stops the walk.

mod naming;

pub use naming::{is_hidden, resolve_secret_name};

use crate::error::LoadError;
use crate::store::{Secrets, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// One entry reported by a traversal source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Path as reported by the source (rooted at the walk root)
    pub path: PathBuf,
    /// Base name of the entry
    pub name: String,
    /// Whether the entry is a directory. Symlinks are never directories,
    /// even when they point at one.
    pub is_dir: bool,
}

impl WalkEntry {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>, is_dir: bool) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            is_dir,
        }
    }
}

/// Counts from a completed walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Visible directories seen (each declares a secret)
    pub directories: usize,
    /// Values stored, including overwrites
    pub keys: usize,
    /// Hidden entries ignored
    pub hidden: usize,
    /// Files whose secret name could not be resolved
    pub unresolved: usize,
}

/// Applies walk entries to a [`Secrets`] store
#[derive(Debug)]
pub struct Resolver<'a> {
    store: &'a mut Secrets,
    summary: WalkSummary,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a mut Secrets) -> Self {
        Self {
            store,
            summary: WalkSummary::default(),
        }
    }

    /// Apply one entry.
    ///
    /// `read` is only called for files that will be stored, so hidden
    /// bookkeeping files are never opened.
    ///
    /// # Errors
    ///
    /// Returns the error from `read`; the store keeps everything applied
    /// before it.
    pub fn visit<F>(&mut self, entry: &WalkEntry, read: F) -> Result<(), LoadError>
    where
        F: FnOnce(&Path) -> Result<Value, LoadError>,
    {
        if is_hidden(&entry.name) {
            trace!(
                path = %entry.path.display(),
                name = %entry.name,
                directory = entry.is_dir,
                "Skipping hidden entry"
            );
            self.summary.hidden += 1;
            return Ok(());
        }

        trace!(
            path = %entry.path.display(),
            name = %entry.name,
            directory = entry.is_dir,
            "Secrets walk"
        );

        if entry.is_dir {
            self.store.declare_secret(entry.name.as_str());
            self.summary.directories += 1;
            return Ok(());
        }

        let Some(secret) = resolve_secret_name(&entry.path) else {
            debug!(
                path = %entry.path.display(),
                "No secret directory for key file, skipping"
            );
            self.summary.unresolved += 1;
            return Ok(());
        };

        let value = read(&entry.path)?;
        self.store.insert_value(secret, entry.name.as_str(), value);
        self.summary.keys += 1;
        Ok(())
    }

    pub fn finish(self) -> WalkSummary {
        self.summary
    }
}
