//! Convenient re-exports for common usage patterns.
//!
//! # Example
//!
//! ```
//! use kv_field::prelude::*;
//!
//! let store = KvStoreGroup::from_selectors([
//!     AnyStore::custom(CloudStore::in_memory()),
//!     AnyStore::custom(CloudStore::in_memory()),
//! ]);
//! store.set("token", Some("abc".to_string()))?;
//! assert_eq!(store.get::<String>("token")?, Some("abc".to_string()));
//! # Ok::<(), KvError>(())
//! ```

pub use crate::error::{Error, Result};

pub use crate::backend::{Accessibility, CloudStore};
#[cfg(feature = "persistent")]
pub use crate::backend::{LocalStore, VaultOptions, VaultStore};

pub use crate::store::{
    AnyStore, AsyncAnyStore, AsyncKvStore, AsyncKvStoreExt, AsyncKvStoreGroup, IntoKvStore,
    KvError, KvStore, KvStoreExt, KvStoreGroup,
};

pub use crate::field::{KvField, KvFieldBinding, KvOptionalField};
pub use crate::value::{KvValue, Value, ValueType};
