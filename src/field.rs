//! Typed field bindings.
//!
//! A binding pairs a key with the store it lives in and exposes total
//! `read`/`write` accessors: a backend that fails behaves as if the key were
//! unset. Compose bindings into your own structs as plain fields:
//!
//! ```
//! use kv_field::prelude::*;
//!
//! struct Settings {
//!     launches: KvField<u32>,
//!     nickname: KvOptionalField<String>,
//! }
//!
//! let settings = Settings {
//!     launches: KvField::new("launches", 0, AnyStore::custom(CloudStore::in_memory())),
//!     nickname: KvOptionalField::new("nickname", AnyStore::custom(CloudStore::in_memory())),
//! };
//! settings.launches.write(settings.launches.read() + 1);
//! assert_eq!(settings.launches.read(), 1);
//! assert_eq!(settings.nickname.read(), None);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::logging::{debug, warn};
use crate::store::{IntoKvStore, KvStore, KvStoreExt};
use crate::value::KvValue;

/// What every binding exposes regardless of its fallback policy.
pub trait KvFieldBinding {
    fn key(&self) -> &str;

    fn store(&self) -> &Arc<dyn KvStore>;
}

/// A binding that always yields a value, falling back to `default`.
pub struct KvField<T: KvValue + Clone> {
    key: String,
    default: T,
    store: Arc<dyn KvStore>,
}

impl<T: KvValue + Clone> KvField<T> {
    /// Binds `key` in `store` (a selector, a list of selectors or a store).
    pub fn new(key: impl Into<String>, default: T, store: impl IntoKvStore) -> Self {
        Self {
            key: key.into(),
            default,
            store: store.into_kv_store(),
        }
    }

    /// The stored value, or the default if it is unset, unreadable or the
    /// store fails.
    pub fn read(&self) -> T {
        match self.store.get::<T>(&self.key) {
            Ok(Some(value)) => value,
            Ok(None) => self.default.clone(),
            Err(err) => {
                debug!(key = %self.key, store = self.store.name(), error = %err, "read failed, using default");
                self.default.clone()
            }
        }
    }

    /// Stores `value`. Failures are logged and dropped.
    pub fn write(&self, value: T) {
        if let Err(err) = self.store.set(&self.key, Some(value)) {
            warn!(key = %self.key, store = self.store.name(), error = %err, "write failed");
        }
    }

    /// Removes the stored value so reads return the default again.
    pub fn remove(&self) {
        if let Err(err) = self.store.remove(&self.key) {
            warn!(key = %self.key, store = self.store.name(), error = %err, "remove failed");
        }
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }
}

impl<T: KvValue + Clone> KvFieldBinding for KvField<T> {
    fn key(&self) -> &str {
        &self.key
    }

    fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }
}

impl<T: KvValue + Clone + fmt::Debug> fmt::Debug for KvField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KvField")
            .field("key", &self.key)
            .field("default", &self.default)
            .field("store", &self.store.name())
            .finish()
    }
}

/// A binding whose reads may be absent.
pub struct KvOptionalField<T: KvValue> {
    key: String,
    store: Arc<dyn KvStore>,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: KvValue> KvOptionalField<T> {
    pub fn new(key: impl Into<String>, store: impl IntoKvStore) -> Self {
        Self {
            key: key.into(),
            store: store.into_kv_store(),
            _marker: std::marker::PhantomData,
        }
    }

    /// The stored value; `None` if it is unset, unreadable or the store
    /// fails.
    pub fn read(&self) -> Option<T> {
        self.store.get::<T>(&self.key).unwrap_or_else(|err| {
            debug!(key = %self.key, store = self.store.name(), error = %err, "read failed, treating as absent");
            None
        })
    }

    /// Stores `value`; `None` removes the key. Failures are logged and
    /// dropped.
    pub fn write(&self, value: Option<T>) {
        if let Err(err) = self.store.set(&self.key, value) {
            warn!(key = %self.key, store = self.store.name(), error = %err, "write failed");
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }
}

impl<T: KvValue> KvFieldBinding for KvOptionalField<T> {
    fn key(&self) -> &str {
        &self.key
    }

    fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }
}

impl<T: KvValue> fmt::Debug for KvOptionalField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KvOptionalField")
            .field("key", &self.key)
            .field("store", &self.store.name())
            .finish()
    }
}
