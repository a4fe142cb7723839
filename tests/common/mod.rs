//! Common test utilities and fixtures.
//!
//! Shared stores and helpers used across the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use kv_field::{CloudStore, Entries, KvError, KvStore, KvValue, StoreConfig, Value, ValueSink, defaults};

// =============================================================================
// Fixture stores
// =============================================================================

/// A store whose every operation fails with a backend error.
pub struct FailingStore;

impl KvStore for FailingStore {
    fn name(&self) -> &str {
        "failing"
    }

    fn read(&self, _key: &str, _sink: &mut dyn ValueSink) -> Result<bool, KvError> {
        Err(KvError::backend("backend offline"))
    }

    fn write(&self, _key: &str, _value: Option<Value>) -> Result<(), KvError> {
        Err(KvError::backend("backend offline"))
    }

    fn all(&self) -> Result<Entries, KvError> {
        Err(KvError::backend("backend offline"))
    }
}

/// An in-memory store that counts calls.
#[derive(Default)]
pub struct CountingStore {
    inner: CloudStore,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl CountingStore {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KvStore for CountingStore {
    fn name(&self) -> &str {
        "counting"
    }

    fn read(&self, key: &str, sink: &mut dyn ValueSink) -> Result<bool, KvError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(key, sink)
    }

    fn write(&self, key: &str, value: Option<Value>) -> Result<(), KvError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.write(key, value)
    }

    fn all(&self) -> Result<Entries, KvError> {
        self.inner.all()
    }
}

pub fn memory() -> Arc<CloudStore> {
    Arc::new(CloudStore::in_memory())
}

// =============================================================================
// Codable payloads
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub tags: Vec<String>,
}

impl KvValue for Profile {}

pub fn sample_profile() -> Profile {
    Profile {
        name: "alice".to_string(),
        age: 34,
        tags: vec!["admin".to_string(), "beta".to_string()],
    }
}

// =============================================================================
// Default registry
// =============================================================================

static DEFAULTS_LOCK: Mutex<()> = Mutex::new(());

/// Holds the global registry for one test, rooted in a fresh temp dir.
pub struct IsolatedDefaults {
    pub dir: TempDir,
    _guard: MutexGuard<'static, ()>,
}

impl Drop for IsolatedDefaults {
    fn drop(&mut self) {
        defaults::reset();
    }
}

pub fn isolated_defaults() -> Result<IsolatedDefaults, anyhow::Error> {
    let guard = DEFAULTS_LOCK.lock();
    let dir = TempDir::new()?;
    defaults::configure(StoreConfig::with_root(dir.path()));
    Ok(IsolatedDefaults { dir, _guard: guard })
}
