//! # Secrets Store
//!
//! Two-level mapping of secret name -> key -> value produced by a volume walk.
//!
//! A store only grows: walks add secrets and overwrite values, they never
//! remove entries. Walking into an existing store therefore merges the new
//! contents over the old ones. Start from [`Secrets::new`] for a clean view.
//!
//! Enumeration order of secrets and keys is unspecified.

mod types;

pub use types::{Key, SecretName, Value};

use std::collections::hash_map;
use std::collections::HashMap;
use std::ops::Index;

/// Keys and values of a single secret
pub type SecretData = HashMap<Key, Value>;

/// Mounted secrets, keyed by secret name then key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    secrets: HashMap<SecretName, SecretData>,
}

impl Secrets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a secret with no keys unless it already exists.
    ///
    /// Returns the secret's data so callers can fill it in.
    pub fn declare_secret(&mut self, name: impl Into<SecretName>) -> &mut SecretData {
        self.secrets.entry(name.into()).or_default()
    }

    /// Store a value, creating the secret on demand.
    ///
    /// Returns the previous value for the same secret and key, if any.
    pub fn insert_value(
        &mut self,
        secret: impl Into<SecretName>,
        key: impl Into<Key>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.declare_secret(secret).insert(key.into(), value.into())
    }

    /// Keys of a secret. `None` when the secret is unknown, an empty map
    /// when it is known but has no keys.
    pub fn secret(&self, name: &str) -> Option<&SecretData> {
        self.secrets.get(name)
    }

    pub fn value(&self, secret: &str, key: &str) -> Option<&Value> {
        self.secrets.get(secret).and_then(|data| data.get(key))
    }

    pub fn contains_secret(&self, name: &str) -> bool {
        self.secrets.contains_key(name)
    }

    pub fn secret_names(&self) -> impl Iterator<Item = &SecretName> {
        self.secrets.keys()
    }

    /// Key names of a secret, or `None` when the secret is unknown
    pub fn keys(&self, secret: &str) -> Option<impl Iterator<Item = &Key>> {
        self.secrets.get(secret).map(HashMap::keys)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, SecretName, SecretData> {
        self.secrets.iter()
    }

    /// Number of secrets
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl<'a> IntoIterator for &'a Secrets {
    type Item = (&'a SecretName, &'a SecretData);
    type IntoIter = hash_map::Iter<'a, SecretName, SecretData>;

    fn into_iter(self) -> Self::IntoIter {
        self.secrets.iter()
    }
}

impl Index<&str> for Secrets {
    type Output = SecretData;

    /// # Panics
    ///
    /// Panics if the secret is not present, like `HashMap`'s `Index`.
    fn index(&self, name: &str) -> &Self::Output {
        &self.secrets[name]
    }
}
