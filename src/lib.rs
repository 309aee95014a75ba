//! # Mounted Secrets
//!
//! Loads Kubernetes secret and configmap volume mounts into memory as
//! secret name -> key -> value.
//!
//! ## Volume Layout
//!
//! Each secret is a directory and each key a file inside it. The kubelet
//! writes volumes atomically: the real files live in a hidden, timestamped
//! directory, `..data` points at it, and every key is a symlink through
//! `..data`. Entries whose names start with `.` are never loaded themselves,
//! and files inside a hidden directory are attributed to the directory above
//! it, so each key shows up once under its real secret name.
//!
//! ## Usage
//!
//! ```no_run
//! let secrets = mounted_secrets::walk("/etc/secrets")?;
//!
//! if let Some(port) = secrets.value("service", "port") {
//!     println!("port = {}", port.to_string_lossy());
//! }
//! # Ok::<(), mounted_secrets::LoadError>(())
//! ```
//!
//! Embedded or in-memory trees go through [`walk_fs`] and [`VirtualFs`].

pub mod config;
pub mod constants;
pub mod error;
pub mod loader;
pub mod observability;
pub mod resolver;
pub mod source;
pub mod store;

pub use config::LoaderConfig;
pub use error::LoadError;
pub use loader::{spawn_walk, walk, walk_from_env, walk_fs};
pub use resolver::{Resolver, WalkEntry, WalkSummary};
pub use source::{
    load_into, DirFs, EntrySource, LocalVolume, MemoryFs, VirtualEntry, VirtualFs, VirtualVolume,
};
pub use store::{Key, SecretData, SecretName, Secrets, Value};
