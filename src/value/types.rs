//! Value type tags and the tagged value union.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies which storage representation a value maps to.
///
/// The set is closed: backends with several native slot kinds `match` on it
/// to pick the right one, and every [`KvValue`](super::KvValue) resolves to
/// exactly one tag at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    Bool,
    /// Platform-width signed integer.
    Int,
    /// Platform-width unsigned integer.
    UInt,
    Int64,
    Float,
    Double,
    String,
    Date,
    /// Raw byte blob.
    Data,
    /// Homogeneous list.
    Array,
    /// String-keyed map.
    Dictionary,
    /// Opaque structured payload, serialized to JSON bytes.
    Codable,
}

impl ValueType {
    /// Lower-case name used in error messages and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::UInt => "uint",
            ValueType::Int64 => "int64",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::String => "string",
            ValueType::Date => "date",
            ValueType::Data => "data",
            ValueType::Array => "array",
            ValueType::Dictionary => "dictionary",
            ValueType::Codable => "codable",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded value in transit between a typed caller and a backend.
///
/// One variant per [`ValueType`]. Stores never keep references to caller
/// values; a `Value` is built on `set` and consumed on `get`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Int64(i64),
    Float(f32),
    Double(f64),
    String(String),
    Date(DateTime<Utc>),
    Data(#[serde(with = "serde_bytes")] Vec<u8>),
    Array(Vec<Value>),
    Dictionary(BTreeMap<String, Value>),
    /// JSON bytes of a structured value.
    Codable(#[serde(with = "serde_bytes")] Vec<u8>),
}

impl Value {
    /// The tag this value carries.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::UInt(_) => ValueType::UInt,
            Value::Int64(_) => ValueType::Int64,
            Value::Float(_) => ValueType::Float,
            Value::Double(_) => ValueType::Double,
            Value::String(_) => ValueType::String,
            Value::Date(_) => ValueType::Date,
            Value::Data(_) => ValueType::Data,
            Value::Array(_) => ValueType::Array,
            Value::Dictionary(_) => ValueType::Dictionary,
            Value::Codable(_) => ValueType::Codable,
        }
    }

    /// Returns the bytes of a `Data` or `Codable` value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Data(bytes) | Value::Codable(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Decodes this value as `T`.
    pub fn decode<T: super::KvValue>(self) -> Result<T, crate::store::KvError> {
        T::from_value(self)
    }
}
