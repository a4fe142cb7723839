//! Storable values: the closed set of value type tags, the tagged union that
//! carries a decoded payload, and the [`KvValue`] contract every stored type
//! implements.

#[cfg(feature = "persistent")]
pub mod codec;
mod convert;
mod types;

pub use convert::KvValue;
pub use types::{Value, ValueType};
