//! # Virtual Volume
//!
//! Walks a secret volume through the [`VirtualFs`] abstraction instead of the
//! local filesystem: embedded fixtures, in-memory trees, or a directory viewed
//! relative to its own root.
//!
//! Paths are relative to the root, which is `.`. A file directly at the root
//! has no secret directory and is skipped by the resolver.

use super::EntrySource;
use crate::constants::VIRTUAL_ROOT;
use crate::error::LoadError;
use crate::resolver::WalkEntry;
use crate::store::Value;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Child of a virtual directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEntry {
    /// Raw base name; child paths are built from it, so it need not be UTF-8
    pub name: OsString,
    pub is_dir: bool,
}

/// Read-only filesystem rooted at `.`
pub trait VirtualFs {
    /// List the children of a directory, in any order
    ///
    /// # Errors
    ///
    /// Fails when `path` is not a readable directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<VirtualEntry>>;

    /// Read a file's full contents
    ///
    /// # Errors
    ///
    /// Fails when `path` is not a readable file.
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
}

impl<T: VirtualFs + ?Sized> VirtualFs for &T {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<VirtualEntry>> {
        (**self).read_dir(path)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read_file(path)
    }
}

/// Secret volume backed by a [`VirtualFs`]
#[derive(Debug, Clone)]
pub struct VirtualVolume<F> {
    fs: F,
}

impl<F: VirtualFs> VirtualVolume<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }
}

impl<F: VirtualFs> EntrySource for VirtualVolume<F> {
    fn entries(&self) -> Box<dyn Iterator<Item = Result<WalkEntry, LoadError>> + '_> {
        Box::new(VirtualWalk {
            fs: &self.fs,
            stack: Vec::new(),
            expand: Some(PathBuf::from(VIRTUAL_ROOT)),
            done: false,
        })
    }

    fn read(&self, path: &Path) -> Result<Value, LoadError> {
        self.fs
            .read_file(path)
            .map(Value::from)
            .map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Depth-first walk over a virtual filesystem.
///
/// A directory's children are listed when the iterator is advanced past it,
/// so the directory itself is always reported before a listing failure.
struct VirtualWalk<'a, F> {
    fs: &'a F,
    /// Pending entries, next one last
    stack: Vec<WalkEntry>,
    /// Directory to list before popping the next entry
    expand: Option<PathBuf>,
    done: bool,
}

impl<F: VirtualFs> VirtualWalk<'_, F> {
    fn push_children(&mut self, dir: &Path) -> Result<(), LoadError> {
        let mut children = self
            .fs
            .read_dir(dir)
            .map_err(|source| LoadError::ListDir {
                path: dir.to_path_buf(),
                source,
            })?;
        children.sort_by(|a, b| a.name.cmp(&b.name));

        // Reverse so the lexically first child is popped first
        self.stack.extend(children.into_iter().rev().map(|child| WalkEntry {
            path: child_path(dir, &child.name),
            name: child.name.to_string_lossy().into_owned(),
            is_dir: child.is_dir,
        }));
        Ok(())
    }
}

impl<F: VirtualFs> Iterator for VirtualWalk<'_, F> {
    type Item = Result<WalkEntry, LoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Some(dir) = self.expand.take() {
            if let Err(e) = self.push_children(&dir) {
                self.done = true;
                return Some(Err(e));
            }
        }

        let entry = self.stack.pop()?;
        if entry.is_dir {
            self.expand = Some(entry.path.clone());
        }
        Some(Ok(entry))
    }
}

fn child_path(dir: &Path, name: &OsStr) -> PathBuf {
    if dir == Path::new(VIRTUAL_ROOT) {
        PathBuf::from(name)
    } else {
        dir.join(name)
    }
}

/// Strip `.` components so `.`, `./a` and `a` address the same node
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[derive(Debug, Clone)]
enum MemoryNode {
    Dir,
    File(Value),
}

/// In-memory directory tree.
///
/// Parents are created implicitly, so a fixture can be described file by file:
///
/// ```
/// use mounted_secrets::MemoryFs;
///
/// let fs = MemoryFs::new()
///     .with_file("service/port", "8080")
///     .with_file("service/..data/hostname", "db.local")
///     .with_dir("empty-secret");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    nodes: BTreeMap<PathBuf, MemoryNode>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.add_dir(path);
        self
    }

    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<Value>) -> Self {
        self.add_file(path, contents);
        self
    }

    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = normalize(path.as_ref());
        self.add_parents(&path);
        if !path.as_os_str().is_empty() {
            self.nodes.insert(path, MemoryNode::Dir);
        }
    }

    /// Add or replace a file
    pub fn add_file(&mut self, path: impl AsRef<Path>, contents: impl Into<Value>) {
        let path = normalize(path.as_ref());
        self.add_parents(&path);
        self.nodes.insert(path, MemoryNode::File(contents.into()));
    }

    fn add_parents(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.nodes
                .entry(ancestor.to_path_buf())
                .or_insert(MemoryNode::Dir);
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.as_os_str().is_empty() || matches!(self.nodes.get(path), Some(MemoryNode::Dir))
    }
}

impl VirtualFs for MemoryFs {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<VirtualEntry>> {
        let path = normalize(path);
        if !self.is_dir(&path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a directory: {}", path.display()),
            ));
        }

        Ok(self
            .nodes
            .iter()
            .filter(|(node_path, _)| node_path.parent() == Some(path.as_path()))
            .filter_map(|(node_path, node)| {
                Some(VirtualEntry {
                    name: node_path.file_name()?.to_os_string(),
                    is_dir: matches!(node, MemoryNode::Dir),
                })
            })
            .collect())
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        let path = normalize(path);
        match self.nodes.get(&path) {
            Some(MemoryNode::File(value)) => Ok(value.as_bytes().to_vec()),
            Some(MemoryNode::Dir) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("is a directory: {}", path.display()),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )),
        }
    }
}

/// A local directory seen through [`VirtualFs`], with paths relative to it.
///
/// Symlinks are reported as files, and reading one follows the link.
#[derive(Debug, Clone)]
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl VirtualFs for DirFs {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<VirtualEntry>> {
        fs::read_dir(self.root.join(path))?
            .map(|entry| {
                let entry = entry?;
                Ok(VirtualEntry {
                    name: entry.file_name(),
                    is_dir: entry.file_type()?.is_dir(),
                })
            })
            .collect()
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(self.root.join(path))
    }
}
