//! The storable value contract and its implementations for common types.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_bytes::ByteBuf;

use crate::store::KvError;

use super::types::{Value, ValueType};

/// A type that can be stored in any [`KvStore`](crate::store::KvStore).
///
/// The defaults implement the opaque structured path: the value is encoded
/// to JSON bytes and tagged [`ValueType::Codable`]. Any serde type opts in
/// with an empty impl:
///
/// ```
/// use kv_field::KvValue;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Profile {
///     name: String,
///     age: u8,
/// }
///
/// impl KvValue for Profile {}
/// ```
///
/// Primitives override all three items with their native mapping.
pub trait KvValue: Serialize + DeserializeOwned + Send + 'static {
    /// The tag backends dispatch on.
    const VALUE_TYPE: ValueType = ValueType::Codable;

    /// Converts into the tagged union.
    fn into_value(self) -> Result<Value, KvError> {
        Ok(Value::Codable(serde_json::to_vec(&self)?))
    }

    /// Converts back from any compatible representation.
    fn from_value(value: Value) -> Result<Self, KvError> {
        match value {
            Value::Codable(bytes) | Value::Data(bytes) => Ok(serde_json::from_slice(&bytes)?),
            other => Err(KvError::mismatch(Self::VALUE_TYPE, &other)),
        }
    }
}

impl KvValue for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;

    fn into_value(self) -> Result<Value, KvError> {
        Ok(Value::Bool(self))
    }

    fn from_value(value: Value) -> Result<Self, KvError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(KvError::mismatch(Self::VALUE_TYPE, &other)),
        }
    }
}

/// Widens any integer representation so the target can range-check it.
fn integer(value: Value, expected: ValueType) -> Result<i128, KvError> {
    match value {
        Value::Int(v) | Value::Int64(v) => Ok(i128::from(v)),
        Value::UInt(v) => Ok(i128::from(v)),
        other => Err(KvError::mismatch(expected, &other)),
    }
}

macro_rules! impl_integer {
    ($ty:ty, $tag:ident, $variant:ident, $wire:ty) => {
        impl KvValue for $ty {
            const VALUE_TYPE: ValueType = ValueType::$tag;

            fn into_value(self) -> Result<Value, KvError> {
                let wire = <$wire>::try_from(self)
                    .map_err(|_| KvError::range(self, stringify!($wire)))?;
                Ok(Value::$variant(wire))
            }

            fn from_value(value: Value) -> Result<Self, KvError> {
                let wide = integer(value, Self::VALUE_TYPE)?;
                <$ty>::try_from(wide).map_err(|_| KvError::range(wide, stringify!($ty)))
            }
        }
    };
}

impl_integer!(i32, Int, Int, i64);
impl_integer!(isize, Int, Int, i64);
impl_integer!(i64, Int64, Int64, i64);
impl_integer!(u32, UInt, UInt, u64);
impl_integer!(usize, UInt, UInt, u64);
impl_integer!(u64, UInt, UInt, u64);

impl KvValue for f32 {
    const VALUE_TYPE: ValueType = ValueType::Float;

    fn into_value(self) -> Result<Value, KvError> {
        Ok(Value::Float(self))
    }

    fn from_value(value: Value) -> Result<Self, KvError> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Double(d) if d.is_finite() && d.abs() > f64::from(f32::MAX) => {
                Err(KvError::range(d, "f32"))
            }
            Value::Double(d) => Ok(d as f32),
            other => Err(KvError::mismatch(Self::VALUE_TYPE, &other)),
        }
    }
}

impl KvValue for f64 {
    const VALUE_TYPE: ValueType = ValueType::Double;

    fn into_value(self) -> Result<Value, KvError> {
        Ok(Value::Double(self))
    }

    fn from_value(value: Value) -> Result<Self, KvError> {
        match value {
            Value::Double(d) => Ok(d),
            Value::Float(f) => Ok(f64::from(f)),
            other => Err(KvError::mismatch(Self::VALUE_TYPE, &other)),
        }
    }
}

impl KvValue for String {
    const VALUE_TYPE: ValueType = ValueType::String;

    fn into_value(self) -> Result<Value, KvError> {
        Ok(Value::String(self))
    }

    fn from_value(value: Value) -> Result<Self, KvError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(KvError::mismatch(Self::VALUE_TYPE, &other)),
        }
    }
}

impl KvValue for DateTime<Utc> {
    const VALUE_TYPE: ValueType = ValueType::Date;

    fn into_value(self) -> Result<Value, KvError> {
        Ok(Value::Date(self))
    }

    /// Also accepts nanoseconds since the Unix epoch, the wire form used by
    /// native-typed backends.
    fn from_value(value: Value) -> Result<Self, KvError> {
        match value {
            Value::Date(date) => Ok(date),
            Value::Int64(nanos) | Value::Int(nanos) => Ok(DateTime::from_timestamp_nanos(nanos)),
            other => Err(KvError::mismatch(Self::VALUE_TYPE, &other)),
        }
    }
}

impl KvValue for ByteBuf {
    const VALUE_TYPE: ValueType = ValueType::Data;

    fn into_value(self) -> Result<Value, KvError> {
        Ok(Value::Data(self.into_vec()))
    }

    fn from_value(value: Value) -> Result<Self, KvError> {
        match value {
            Value::Data(bytes) | Value::Codable(bytes) => Ok(ByteBuf::from(bytes)),
            other => Err(KvError::mismatch(Self::VALUE_TYPE, &other)),
        }
    }
}

impl<T: KvValue> KvValue for Vec<T> {
    const VALUE_TYPE: ValueType = ValueType::Array;

    fn into_value(self) -> Result<Value, KvError> {
        let items = self
            .into_iter()
            .map(T::into_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(items))
    }

    fn from_value(value: Value) -> Result<Self, KvError> {
        match value {
            Value::Array(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(KvError::mismatch(Self::VALUE_TYPE, &other)),
        }
    }
}

impl<T: KvValue> KvValue for BTreeMap<String, T> {
    const VALUE_TYPE: ValueType = ValueType::Dictionary;

    fn into_value(self) -> Result<Value, KvError> {
        let entries = self
            .into_iter()
            .map(|(k, v)| Ok((k, v.into_value()?)))
            .collect::<Result<BTreeMap<_, _>, KvError>>()?;
        Ok(Value::Dictionary(entries))
    }

    fn from_value(value: Value) -> Result<Self, KvError> {
        match value {
            Value::Dictionary(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((k, T::from_value(v)?)))
                .collect(),
            other => Err(KvError::mismatch(Self::VALUE_TYPE, &other)),
        }
    }
}

impl<T: KvValue> KvValue for HashMap<String, T> {
    const VALUE_TYPE: ValueType = ValueType::Dictionary;

    fn into_value(self) -> Result<Value, KvError> {
        let entries = self
            .into_iter()
            .map(|(k, v)| Ok((k, v.into_value()?)))
            .collect::<Result<BTreeMap<_, _>, KvError>>()?;
        Ok(Value::Dictionary(entries))
    }

    fn from_value(value: Value) -> Result<Self, KvError> {
        match value {
            Value::Dictionary(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((k, T::from_value(v)?)))
                .collect(),
            other => Err(KvError::mismatch(Self::VALUE_TYPE, &other)),
        }
    }
}
