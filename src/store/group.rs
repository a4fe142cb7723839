//! Ordered composites of stores.
//!
//! A group reads from its members in declared order and returns the first
//! value that decodes; it writes to every member and reports the first
//! failure only after all members were attempted. Members are called one at
//! a time, never concurrently.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::logging::{debug, trace, warn};
use crate::value::Value;

use super::any::{AnyStore, AsyncAnyStore};
use super::{AsyncKvStore, Entries, KvError, KvStore, ValueSink};

/// Tracks per-member write failures, keeping the first one.
#[derive(Default)]
struct WriteFailures {
    first: Option<(usize, KvError)>,
    failed: usize,
}

impl WriteFailures {
    fn record(&mut self, member: usize, err: KvError) {
        self.failed += 1;
        if self.first.is_none() {
            self.first = Some((member, err));
        }
    }

    fn finish(self) -> Result<(), KvError> {
        match self.first {
            None => Ok(()),
            Some((member, source)) => Err(KvError::GroupWrite {
                member,
                failed: self.failed,
                source: Box::new(source),
            }),
        }
    }
}

/// A fixed, ordered list of stores presented as one store.
#[derive(Clone, Default)]
pub struct KvStoreGroup {
    stores: Vec<Arc<dyn KvStore>>,
}

impl KvStoreGroup {
    pub fn new(stores: Vec<Arc<dyn KvStore>>) -> Self {
        Self { stores }
    }

    /// Builds a group from named backends, resolving each one.
    pub fn from_selectors(selectors: impl IntoIterator<Item = AnyStore>) -> Self {
        Self::new(selectors.into_iter().map(AnyStore::into_store).collect())
    }

    /// Members in declared order.
    pub fn stores(&self) -> &[Arc<dyn KvStore>] {
        &self.stores
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl fmt::Debug for KvStoreGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.stores.iter().map(|s| s.name()))
            .finish()
    }
}

impl KvStore for KvStoreGroup {
    fn name(&self) -> &str {
        "group"
    }

    fn read(&self, key: &str, sink: &mut dyn ValueSink) -> Result<bool, KvError> {
        for (index, store) in self.stores.iter().enumerate() {
            match store.read(key, sink) {
                Ok(true) => {
                    trace!(key = key, member = index, store = store.name(), "group read hit");
                    return Ok(true);
                }
                Ok(false) => {}
                Err(err) => {
                    debug!(key = key, member = index, store = store.name(), error = %err, "group member read failed, trying next");
                }
            }
        }
        Ok(false)
    }

    fn write(&self, key: &str, value: Option<Value>) -> Result<(), KvError> {
        let mut failures = WriteFailures::default();
        for (index, store) in self.stores.iter().enumerate() {
            if let Err(err) = store.write(key, value.clone()) {
                warn!(key = key, member = index, store = store.name(), error = %err, "group member write failed");
                failures.record(index, err);
            }
        }
        failures.finish()
    }

    fn all(&self) -> Result<Entries, KvError> {
        let mut items = Entries::new();
        for store in &self.stores {
            items.extend(store.all()?);
        }
        Ok(items)
    }
}

/// Async counterpart of [`KvStoreGroup`].
#[derive(Clone, Default)]
pub struct AsyncKvStoreGroup {
    stores: Vec<Arc<dyn AsyncKvStore>>,
}

impl AsyncKvStoreGroup {
    pub fn new(stores: Vec<Arc<dyn AsyncKvStore>>) -> Self {
        Self { stores }
    }

    pub fn from_selectors<S: Into<AsyncAnyStore>>(selectors: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            selectors
                .into_iter()
                .map(|s| s.into().into_store())
                .collect(),
        )
    }

    pub fn stores(&self) -> &[Arc<dyn AsyncKvStore>] {
        &self.stores
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl fmt::Debug for AsyncKvStoreGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.stores.iter().map(|s| s.async_name()))
            .finish()
    }
}

#[async_trait]
impl AsyncKvStore for AsyncKvStoreGroup {
    fn async_name(&self) -> &str {
        "group"
    }

    async fn read_async(&self, key: &str, sink: &mut dyn ValueSink) -> Result<bool, KvError> {
        for (index, store) in self.stores.iter().enumerate() {
            match store.read_async(key, &mut *sink).await {
                Ok(true) => {
                    trace!(key = key, member = index, store = store.async_name(), "group read hit");
                    return Ok(true);
                }
                Ok(false) => {}
                Err(err) => {
                    debug!(key = key, member = index, store = store.async_name(), error = %err, "group member read failed, trying next");
                }
            }
        }
        Ok(false)
    }

    async fn write_async(&self, key: &str, value: Option<Value>) -> Result<(), KvError> {
        let mut failures = WriteFailures::default();
        for (index, store) in self.stores.iter().enumerate() {
            if let Err(err) = store.write_async(key, value.clone()).await {
                warn!(key = key, member = index, store = store.async_name(), error = %err, "group member write failed");
                failures.record(index, err);
            }
        }
        failures.finish()
    }

    async fn all_async(&self) -> Result<Entries, KvError> {
        let mut items = Entries::new();
        for store in &self.stores {
            items.extend(store.all_async().await?);
        }
        Ok(items)
    }
}
