//! Typed key-value fields over interchangeable storage backends.
//!
//! A value is stored under a string key in a backend: the secure vault, the
//! cloud-synchronized store, the local preference store or any type that
//! implements [`KvStore`]. Backends can be combined into a [`KvStoreGroup`]
//! that reads from the first member holding a value and writes to all of
//! them. Field bindings wrap a key, a default and a store into a typed
//! accessor that never fails.
//!
//! # Quick Start
//!
//! ```
//! use kv_field::prelude::*;
//!
//! let store = CloudStore::in_memory();
//! store.set("launches", Some(3u32))?;
//! assert_eq!(store.get::<u32>("launches")?, Some(3));
//!
//! // A mismatched type reads as "not set".
//! assert_eq!(store.get::<String>("launches")?, None);
//!
//! let theme = KvField::new("theme", "light".to_string(), AnyStore::custom(store));
//! assert_eq!(theme.read(), "light");
//! # Ok::<(), kv_field::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`value`] - Storable value kinds and conversions
//! - [`store`] - Store contract, groups and selectors
//! - [`backend`] - Vault, cloud and local backends
//! - [`field`] - Field bindings
//! - [`defaults`] - Process-wide default backends
//! - [`config`] - TOML configuration for the defaults
//!
//! # Feature Flags
//!
//! - `persistent` - fjall-backed vault and local stores (enabled by default)
//! - `logging` - Library-level tracing; consumers provide their own subscriber (enabled by default)
//! - `full` - Enable all features

pub mod backend;
pub mod config;
pub mod defaults;
mod error;
pub mod field;
mod logging;
pub mod prelude;
pub mod store;
pub mod value;

pub use error::{Error, Result};

pub use backend::{Accessibility, CloudStore, CloudValue};
#[cfg(feature = "persistent")]
pub use backend::{LocalStore, VaultItemInfo, VaultOptions, VaultStore};
pub use config::{ConfigError, StoreConfig};
pub use defaults::DefaultStore;
pub use field::{KvField, KvFieldBinding, KvOptionalField};
pub use store::{
    AnyStore, AsyncAnyStore, AsyncKvStore, AsyncKvStoreExt, AsyncKvStoreGroup, Decoded, Entries,
    IntoKvStore, KvError, KvStore, KvStoreExt, KvStoreGroup, ValueSink,
};
pub use value::{KvValue, Value, ValueType};
