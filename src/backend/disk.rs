//! Shared fjall plumbing for the on-disk backends.

use std::path::Path;

use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};

use crate::logging::{debug, info};
use crate::store::KvError;

/// One fjall database holding a single keyspace.
pub(crate) struct Disk {
    db: fjall::Database,
    keyspace: Keyspace,
}

impl Disk {
    /// Opens (or creates) the database at `path`.
    pub(crate) fn open(path: &Path, keyspace: &str) -> Result<Self, KvError> {
        debug!(path = %path.display(), keyspace = keyspace, "opening store");

        std::fs::create_dir_all(path)?;
        let db = fjall::Database::builder(path).open()?;
        let name = keyspace_name(keyspace);
        let keyspace = db.keyspace(&name, KeyspaceCreateOptions::default)?;

        info!(path = %path.display(), keyspace = %name, "store opened");
        Ok(Self { db, keyspace })
    }

    pub(crate) fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        Ok(self.keyspace.get(key)?.map(|v| v.to_vec()))
    }

    pub(crate) fn contains(&self, key: &str) -> Result<bool, KvError> {
        Ok(self.keyspace.get(key)?.is_some())
    }

    pub(crate) fn insert(&self, key: &str, bytes: &[u8]) -> Result<(), KvError> {
        self.keyspace.insert(key, bytes)?;
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    pub(crate) fn remove(&self, key: &str) -> Result<(), KvError> {
        self.keyspace.remove(key)?;
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    /// Keys starting with `prefix`, in key order. Keys that fail to read are
    /// skipped.
    pub(crate) fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys = Vec::new();
        for kv in self.keyspace.prefix(prefix) {
            let Ok(key_bytes) = kv.key() else {
                continue;
            };
            keys.push(String::from_utf8_lossy(&key_bytes).into_owned());
        }
        keys
    }
}

/// Keyspace names are restricted; anything outside `[A-Za-z0-9_-]` becomes
/// `_`.
fn keyspace_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() {
        "default".to_string()
    } else {
        sanitized
    }
}
