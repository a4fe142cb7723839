//! The store contract every backend and composite implements.
//!
//! [`KvStore`] is the blocking form and [`AsyncKvStore`] the
//! suspension-capable one. Both are object safe so stores can be grouped
//! behind `Arc<dyn ...>`; the typed surface (`get::<T>`, `set`, `remove`)
//! lives in the blanket-implemented [`KvStoreExt`] and [`AsyncKvStoreExt`].
//!
//! Reads go through a [`ValueSink`]: the caller's typed slot, which tells the
//! backend which [`ValueType`] was requested and decodes the value the
//! backend delivers. A group can therefore skip a member whose value does not
//! decode and keep looking.

mod any;
mod error;
mod group;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::logging::warn;
use crate::value::{KvValue, Value, ValueType};

pub use any::{AnyStore, AsyncAnyStore, IntoKvStore};
pub use error::KvError;
pub use group::{AsyncKvStoreGroup, KvStoreGroup};

/// Snapshot returned by `all()`.
pub type Entries = BTreeMap<String, Value>;

/// Type-erased destination for a read.
pub trait ValueSink: Send {
    /// The tag of the type the caller asked for.
    fn value_type(&self) -> ValueType;

    /// Decodes `value` into the slot. Fails with a decode mismatch if the
    /// value cannot be read as the requested type.
    fn accept(&mut self, value: Value) -> Result<(), KvError>;
}

/// A typed [`ValueSink`].
#[derive(Debug)]
pub struct Decoded<T>(Option<T>);

impl<T: KvValue> Decoded<T> {
    pub fn new() -> Self {
        Self(None)
    }

    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}

impl<T: KvValue> Default for Decoded<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: KvValue> ValueSink for Decoded<T> {
    fn value_type(&self) -> ValueType {
        T::VALUE_TYPE
    }

    fn accept(&mut self, value: Value) -> Result<(), KvError> {
        self.0 = Some(T::from_value(value)?);
        Ok(())
    }
}

/// Blocking store contract.
pub trait KvStore: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str {
        "custom"
    }

    /// Looks up `key` and hands the value to `sink`.
    ///
    /// Returns `Ok(false)` if the key is unset. Backend failures and decode
    /// mismatches reported by the sink are returned as errors.
    fn read(&self, key: &str, sink: &mut dyn ValueSink) -> Result<bool, KvError>;

    /// Stores `value` under `key`, or removes the key when `value` is `None`.
    fn write(&self, key: &str, value: Option<Value>) -> Result<(), KvError>;

    /// Best-effort snapshot of every stored entry.
    fn all(&self) -> Result<Entries, KvError>;
}

impl<S: KvStore + ?Sized> KvStore for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read(&self, key: &str, sink: &mut dyn ValueSink) -> Result<bool, KvError> {
        (**self).read(key, sink)
    }

    fn write(&self, key: &str, value: Option<Value>) -> Result<(), KvError> {
        (**self).write(key, value)
    }

    fn all(&self) -> Result<Entries, KvError> {
        (**self).all()
    }
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read(&self, key: &str, sink: &mut dyn ValueSink) -> Result<bool, KvError> {
        (**self).read(key, sink)
    }

    fn write(&self, key: &str, value: Option<Value>) -> Result<(), KvError> {
        (**self).write(key, value)
    }

    fn all(&self) -> Result<Entries, KvError> {
        (**self).all()
    }
}

/// Typed operations for every [`KvStore`].
pub trait KvStoreExt: KvStore {
    /// Reads `key` as `T`.
    ///
    /// Returns `None` when the key is unset or holds a value that does not
    /// decode as `T`. Only backend failures are errors.
    fn get<T: KvValue>(&self, key: &str) -> Result<Option<T>, KvError> {
        let mut slot = Decoded::<T>::new();
        match self.read(key, &mut slot) {
            Ok(_) => Ok(slot.into_inner()),
            Err(err) if err.is_decode() => {
                warn!(store = self.name(), key = key, error = %err, "decode mismatch, treating as absent");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Stores `value`, or removes the key when `value` is `None`.
    fn set<T: KvValue>(&self, key: &str, value: Option<T>) -> Result<(), KvError> {
        let value = value.map(T::into_value).transpose()?;
        self.write(key, value)
    }

    /// Removes `key`. Removing an unset key is not an error.
    fn remove(&self, key: &str) -> Result<(), KvError> {
        self.write(key, None)
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}

/// Suspension-capable store contract.
///
/// Every [`KvStore`] implements this by running the blocking call to
/// completion without yielding. Backends doing real asynchronous I/O
/// implement it directly instead of [`KvStore`].
#[async_trait]
pub trait AsyncKvStore: Send + Sync {
    fn async_name(&self) -> &str {
        "custom"
    }

    async fn read_async(&self, key: &str, sink: &mut dyn ValueSink) -> Result<bool, KvError>;

    async fn write_async(&self, key: &str, value: Option<Value>) -> Result<(), KvError>;

    async fn all_async(&self) -> Result<Entries, KvError>;
}

#[async_trait]
impl<S: KvStore + ?Sized> AsyncKvStore for S {
    fn async_name(&self) -> &str {
        self.name()
    }

    async fn read_async(&self, key: &str, sink: &mut dyn ValueSink) -> Result<bool, KvError> {
        self.read(key, sink)
    }

    async fn write_async(&self, key: &str, value: Option<Value>) -> Result<(), KvError> {
        self.write(key, value)
    }

    async fn all_async(&self) -> Result<Entries, KvError> {
        self.all()
    }
}

/// Typed operations for every [`AsyncKvStore`].
#[async_trait]
pub trait AsyncKvStoreExt: AsyncKvStore {
    /// Async counterpart of [`KvStoreExt::get`].
    async fn get_async<T: KvValue>(&self, key: &str) -> Result<Option<T>, KvError> {
        let mut slot = Decoded::<T>::new();
        match self.read_async(key, &mut slot).await {
            Ok(_) => Ok(slot.into_inner()),
            Err(err) if err.is_decode() => {
                warn!(store = self.async_name(), key = key, error = %err, "decode mismatch, treating as absent");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Async counterpart of [`KvStoreExt::set`].
    async fn set_async<T: KvValue>(&self, key: &str, value: Option<T>) -> Result<(), KvError> {
        let value = value.map(T::into_value).transpose()?;
        self.write_async(key, value).await
    }

    /// Async counterpart of [`KvStoreExt::remove`].
    async fn remove_async(&self, key: &str) -> Result<(), KvError> {
        self.write_async(key, None).await
    }
}

#[async_trait]
impl<S: AsyncKvStore + ?Sized> AsyncKvStoreExt for S {}
