//! # Local Volume
//!
//! Walks a secret volume mounted on the local filesystem.

use super::EntrySource;
use crate::error::LoadError;
use crate::resolver::WalkEntry;
use crate::store::Value;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Secret volume rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalVolume {
    root: PathBuf,
}

impl LocalVolume {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Absolute form of `root` that ends in a name.
///
/// Keys directly under the root belong to the secret named after it, so
/// `.` and `..`-terminated roots must be turned into their real directory.
fn named_root(root: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(root)?;
    if absolute.file_name().is_some() {
        return Ok(absolute);
    }
    std::fs::canonicalize(root)
}

impl EntrySource for LocalVolume {
    fn entries(&self) -> Box<dyn Iterator<Item = Result<WalkEntry, LoadError>> + '_> {
        let root = match named_root(&self.root) {
            Ok(root) => root,
            Err(source) => {
                return Box::new(std::iter::once(Err(LoadError::Root {
                    path: self.root.clone(),
                    source,
                })));
            }
        };

        // Symlinks are not followed: `key -> ..data/key` is reported as a file
        // and `..data -> ..2024_...` as a hidden non-directory.
        let walker = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .map(move |entry| {
                let entry = entry.map_err(|e| LoadError::walk(&root, e))?;
                Ok(WalkEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    is_dir: entry.file_type().is_dir(),
                    path: entry.into_path(),
                })
            });
        Box::new(walker)
    }

    fn read(&self, path: &Path) -> Result<Value, LoadError> {
        std::fs::read(path)
            .map(Value::from)
            .map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })
    }
}
