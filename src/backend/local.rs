//! Local preference store.

use std::path::Path;

use crate::logging::trace;
use crate::store::{Entries, KvError, KvStore, ValueSink};
use crate::value::{Value, codec};

use super::disk::Disk;

/// Preferences persisted in a local fjall database.
///
/// The only native slot is a byte string, so every value goes through the
/// byte envelope; `Data` values are stored raw.
pub struct LocalStore {
    disk: Disk,
    suite: String,
}

impl LocalStore {
    /// Opens the preference suite `suite` in the database at `path`.
    pub fn open(path: &Path, suite: &str) -> Result<Self, KvError> {
        Ok(Self {
            disk: Disk::open(path, suite)?,
            suite: suite.to_string(),
        })
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// All stored keys in key order.
    pub fn keys(&self) -> Vec<String> {
        self.disk.keys_with_prefix("")
    }

    pub fn contains(&self, key: &str) -> Result<bool, KvError> {
        self.disk.contains(key)
    }
}

impl KvStore for LocalStore {
    fn name(&self) -> &str {
        "local"
    }

    fn read(&self, key: &str, sink: &mut dyn ValueSink) -> Result<bool, KvError> {
        let Some(bytes) = self.disk.get(key)? else {
            return Ok(false);
        };
        trace!(key = key, bytes = bytes.len(), "local read");
        sink.accept(codec::decode(&bytes)?)?;
        Ok(true)
    }

    fn write(&self, key: &str, value: Option<Value>) -> Result<(), KvError> {
        match value {
            Some(value) => self.disk.insert(key, &codec::encode(&value)?),
            None => self.disk.remove(key),
        }
    }

    fn all(&self) -> Result<Entries, KvError> {
        let mut entries = Entries::new();
        for key in self.keys() {
            if let Some(bytes) = self.disk.get(&key)? {
                entries.insert(key, codec::decode(&bytes)?);
            }
        }
        Ok(entries)
    }
}
