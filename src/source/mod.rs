//! # Traversal Sources
//!
//! Where walk entries and key contents come from.
//!
//! - `local.rs` - a directory on the local filesystem, walked with `walkdir`
//! - `virtual_fs.rs` - any [`VirtualFs`] implementation, walked from `.`
//!
//! Both report entries depth-first with siblings in lexical order and leave
//! the root entry itself out, so the same tree yields the same store from
//! either source.

mod local;
mod virtual_fs;

pub use local::LocalVolume;
pub use virtual_fs::{DirFs, MemoryFs, VirtualEntry, VirtualFs, VirtualVolume};

use crate::error::LoadError;
use crate::resolver::{Resolver, WalkEntry, WalkSummary};
use crate::store::{Secrets, Value};
use std::path::Path;
use tracing::warn;

/// A walkable secret volume
pub trait EntrySource {
    /// Entries in depth-first order, siblings sorted by name
    fn entries(&self) -> Box<dyn Iterator<Item = Result<WalkEntry, LoadError>> + '_>;

    /// Read a key file's full contents
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Read`] when the contents cannot be read.
    fn read(&self, path: &Path) -> Result<Value, LoadError>;
}

/// Walk `source` and apply every entry to `store`.
///
/// # Errors
///
/// Returns the first traversal or read error. Entries applied before it stay
/// in `store`, which should then be treated as incomplete.
pub fn load_into<S>(source: &S, store: &mut Secrets) -> Result<WalkSummary, LoadError>
where
    S: EntrySource + ?Sized,
{
    let mut resolver = Resolver::new(store);
    for entry in source.entries() {
        let applied = entry.and_then(|entry| resolver.visit(&entry, |path| source.read(path)));
        if let Err(e) = applied {
            warn!(path = %e.path().display(), error = %e, "Error walking secrets volume");
            return Err(e);
        }
    }
    Ok(resolver.finish())
}
