//! Naming backends by identity instead of constructing them.

use std::fmt;
use std::sync::Arc;

use crate::defaults::{self, DefaultStore};
use crate::logging::warn;
use crate::value::Value;

use super::group::KvStoreGroup;
use super::{AsyncKvStore, Entries, KvError, KvStore, ValueSink};

/// A backend chosen by identity: one of the process-wide defaults or a
/// user-supplied store.
#[derive(Clone)]
pub enum AnyStore {
    /// The shared secure vault.
    Vault,
    /// The shared cloud-synchronized store.
    Cloud,
    /// The shared local preference store.
    Local,
    Custom(Arc<dyn KvStore>),
}

impl AnyStore {
    /// Wraps a user-defined store.
    pub fn custom(store: impl KvStore + 'static) -> Self {
        Self::Custom(Arc::new(store))
    }

    /// Returns the store this selector names, opening a default singleton
    /// on first use.
    pub fn resolve(&self) -> Result<Arc<dyn KvStore>, KvError> {
        match self {
            AnyStore::Vault => defaults::shared(DefaultStore::Vault),
            AnyStore::Cloud => defaults::shared(DefaultStore::Cloud),
            AnyStore::Local => defaults::shared(DefaultStore::Local),
            AnyStore::Custom(store) => Ok(store.clone()),
        }
    }

    /// Like [`resolve`](Self::resolve), but a backend that cannot be opened
    /// becomes a placeholder whose every operation fails. Reads through it
    /// behave as "not set" at the binding layer and groups skip it.
    pub fn into_store(self) -> Arc<dyn KvStore> {
        match self.resolve() {
            Ok(store) => store,
            Err(err) => {
                let backend = self.label();
                warn!(backend = backend, error = %err, "backend unavailable");
                Arc::new(UnavailableStore {
                    backend,
                    reason: err.to_string(),
                })
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AnyStore::Vault => DefaultStore::Vault.as_str(),
            AnyStore::Cloud => DefaultStore::Cloud.as_str(),
            AnyStore::Local => DefaultStore::Local.as_str(),
            AnyStore::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for AnyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyStore::Custom(store) => f.debug_tuple("Custom").field(&store.name()).finish(),
            other => f.write_str(other.label()),
        }
    }
}

/// Async counterpart of [`AnyStore`].
#[derive(Clone)]
pub enum AsyncAnyStore {
    Vault,
    Cloud,
    Local,
    Custom(Arc<dyn AsyncKvStore>),
}

impl AsyncAnyStore {
    pub fn custom(store: impl AsyncKvStore + 'static) -> Self {
        Self::Custom(Arc::new(store))
    }

    pub fn resolve(&self) -> Result<Arc<dyn AsyncKvStore>, KvError> {
        let shared = match self {
            AsyncAnyStore::Vault => defaults::shared(DefaultStore::Vault)?,
            AsyncAnyStore::Cloud => defaults::shared(DefaultStore::Cloud)?,
            AsyncAnyStore::Local => defaults::shared(DefaultStore::Local)?,
            AsyncAnyStore::Custom(store) => return Ok(store.clone()),
        };
        Ok(Arc::new(shared))
    }

    pub fn into_store(self) -> Arc<dyn AsyncKvStore> {
        match self.resolve() {
            Ok(store) => store,
            Err(err) => {
                let backend = match self {
                    AsyncAnyStore::Vault => DefaultStore::Vault.as_str(),
                    AsyncAnyStore::Cloud => DefaultStore::Cloud.as_str(),
                    AsyncAnyStore::Local => DefaultStore::Local.as_str(),
                    AsyncAnyStore::Custom(_) => "custom",
                };
                warn!(backend = backend, error = %err, "backend unavailable");
                Arc::new(UnavailableStore {
                    backend,
                    reason: err.to_string(),
                })
            }
        }
    }
}

impl From<AnyStore> for AsyncAnyStore {
    fn from(store: AnyStore) -> Self {
        match store {
            AnyStore::Vault => AsyncAnyStore::Vault,
            AnyStore::Cloud => AsyncAnyStore::Cloud,
            AnyStore::Local => AsyncAnyStore::Local,
            AnyStore::Custom(store) => AsyncAnyStore::Custom(Arc::new(store)),
        }
    }
}

impl fmt::Debug for AsyncAnyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsyncAnyStore::Vault => f.write_str(DefaultStore::Vault.as_str()),
            AsyncAnyStore::Cloud => f.write_str(DefaultStore::Cloud.as_str()),
            AsyncAnyStore::Local => f.write_str(DefaultStore::Local.as_str()),
            AsyncAnyStore::Custom(store) => {
                f.debug_tuple("Custom").field(&store.async_name()).finish()
            }
        }
    }
}

/// Conversion into the store a field binding holds.
///
/// A single selector resolves to that backend; a list becomes a
/// [`KvStoreGroup`] in the listed order.
pub trait IntoKvStore {
    fn into_kv_store(self) -> Arc<dyn KvStore>;
}

impl IntoKvStore for AnyStore {
    fn into_kv_store(self) -> Arc<dyn KvStore> {
        self.into_store()
    }
}

impl IntoKvStore for Vec<AnyStore> {
    fn into_kv_store(self) -> Arc<dyn KvStore> {
        Arc::new(KvStoreGroup::from_selectors(self))
    }
}

impl<const N: usize> IntoKvStore for [AnyStore; N] {
    fn into_kv_store(self) -> Arc<dyn KvStore> {
        Arc::new(KvStoreGroup::from_selectors(self))
    }
}

impl IntoKvStore for KvStoreGroup {
    fn into_kv_store(self) -> Arc<dyn KvStore> {
        Arc::new(self)
    }
}

impl IntoKvStore for Arc<dyn KvStore> {
    fn into_kv_store(self) -> Arc<dyn KvStore> {
        self
    }
}

/// Stands in for a backend that could not be opened.
struct UnavailableStore {
    backend: &'static str,
    reason: String,
}

impl UnavailableStore {
    fn error(&self) -> KvError {
        KvError::Unavailable {
            backend: self.backend,
            reason: self.reason.clone(),
        }
    }
}

impl KvStore for UnavailableStore {
    fn name(&self) -> &str {
        self.backend
    }

    fn read(&self, _key: &str, _sink: &mut dyn ValueSink) -> Result<bool, KvError> {
        Err(self.error())
    }

    fn write(&self, _key: &str, _value: Option<Value>) -> Result<(), KvError> {
        Err(self.error())
    }

    fn all(&self) -> Result<Entries, KvError> {
        Err(self.error())
    }
}
