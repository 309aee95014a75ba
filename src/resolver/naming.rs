//! # Secret Name Resolution
//!
//! Infers which secret a key file belongs to from its path.
//!
//! Kubelet-managed volumes keep the real files under a hidden directory:
//!
//! ```text
//! service/
//! ├── ..2024_01_01_00_00_00.000000000/
//! │   ├── hostname
//! │   └── port
//! ├── ..data -> ..2024_01_01_00_00_00.000000000
//! ├── hostname -> ..data/hostname
//! └── port -> ..data/port
//! ```
//!
//! A file's secret is its parent directory, unless the parent is hidden, in
//! which case it is the grandparent. Only one hidden level is looked through.

use crate::constants::HIDDEN_PREFIX;
use std::path::Path;

/// Whether an entry name carries the hidden prefix
pub fn is_hidden(name: &str) -> bool {
    name.starts_with(HIDDEN_PREFIX)
}

/// Resolve the secret a key file at `path` belongs to.
///
/// Returns `None` when the file has no named parent (it sits directly at a
/// virtual root) or when the name found is itself hidden, which happens when
/// two hidden directories are nested.
pub fn resolve_secret_name(path: &Path) -> Option<String> {
    let parent = path.parent()?;
    let candidate = base_name(parent)?;
    if !is_hidden(&candidate) {
        return Some(candidate);
    }

    // --> look through ..data and timestamped ..YYYY_MM_DD directories
    let grandparent = parent.parent()?;
    base_name(grandparent).filter(|name| !is_hidden(name))
}

fn base_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}
