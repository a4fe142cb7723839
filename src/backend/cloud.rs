//! Cloud-synchronized store with typed native slots.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::logging::{debug, info};
use crate::store::{Entries, KvError, KvStore, ValueSink};
use crate::value::{KvValue, Value, ValueType};

/// The native slot kinds of the cloud store.
///
/// Integers travel as `i64`, floats as `f64` and dates as `i64` nanoseconds
/// since the Unix epoch. Byte blobs and structured payloads share the `Data`
/// slot. Non-finite doubles are written to the snapshot as `"nan"`, `"inf"`
/// or `"-inf"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum CloudValue {
    Bool(bool),
    Int64(i64),
    Double(#[serde(with = "double")] f64),
    String(String),
    Data(#[serde(with = "serde_bytes")] Vec<u8>),
    Array(Vec<CloudValue>),
    Dictionary(BTreeMap<String, CloudValue>),
}

impl CloudValue {
    /// The tag this slot reads back as when no type is requested.
    pub fn value_type(&self) -> ValueType {
        match self {
            CloudValue::Bool(_) => ValueType::Bool,
            CloudValue::Int64(_) => ValueType::Int64,
            CloudValue::Double(_) => ValueType::Double,
            CloudValue::String(_) => ValueType::String,
            CloudValue::Data(_) => ValueType::Data,
            CloudValue::Array(_) => ValueType::Array,
            CloudValue::Dictionary(_) => ValueType::Dictionary,
        }
    }

    /// Converts a value to its native slot.
    ///
    /// Fails with a range error for unsigned values above `i64::MAX` and for
    /// dates that do not fit in `i64` nanoseconds.
    pub fn from_value(value: Value) -> Result<Self, KvError> {
        Ok(match value {
            Value::Bool(b) => CloudValue::Bool(b),
            Value::Int(i) | Value::Int64(i) => CloudValue::Int64(i),
            Value::UInt(u) => {
                CloudValue::Int64(i64::try_from(u).map_err(|_| KvError::range(u, "i64"))?)
            }
            Value::Float(f) => CloudValue::Double(f64::from(f)),
            Value::Double(d) => CloudValue::Double(d),
            Value::String(s) => CloudValue::String(s),
            Value::Date(date) => CloudValue::Int64(
                date.timestamp_nanos_opt()
                    .ok_or_else(|| KvError::range(date, "i64 nanoseconds"))?,
            ),
            Value::Data(bytes) | Value::Codable(bytes) => CloudValue::Data(bytes),
            Value::Array(items) => CloudValue::Array(
                items
                    .into_iter()
                    .map(CloudValue::from_value)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Dictionary(entries) => CloudValue::Dictionary(
                entries
                    .into_iter()
                    .map(|(k, v)| Ok((k, CloudValue::from_value(v)?)))
                    .collect::<Result<_, KvError>>()?,
            ),
        })
    }

    /// Reads the slot as the requested tag, choosing the native accessor the
    /// tag maps to.
    pub fn to_value(&self, requested: ValueType) -> Result<Value, KvError> {
        let mismatch = || KvError::TypeMismatch {
            expected: requested,
            found: self.value_type(),
        };
        Ok(match (requested, self) {
            (ValueType::Bool, CloudValue::Bool(b)) => Value::Bool(*b),
            (ValueType::Int, CloudValue::Int64(i)) => Value::Int(*i),
            (ValueType::UInt, CloudValue::Int64(i)) => {
                Value::UInt(u64::try_from(*i).map_err(|_| KvError::range(i, "u64"))?)
            }
            (ValueType::Int64, CloudValue::Int64(i)) => Value::Int64(*i),
            (ValueType::Float, CloudValue::Double(d)) => {
                Value::Float(f32::from_value(Value::Double(*d))?)
            }
            (ValueType::Double, CloudValue::Double(d)) => Value::Double(*d),
            (ValueType::String, CloudValue::String(s)) => Value::String(s.clone()),
            (ValueType::Date, CloudValue::Int64(nanos)) => {
                Value::Date(DateTime::from_timestamp_nanos(*nanos))
            }
            (ValueType::Data, CloudValue::Data(bytes)) => Value::Data(bytes.clone()),
            (ValueType::Codable, CloudValue::Data(bytes)) => Value::Codable(bytes.clone()),
            (ValueType::Array, CloudValue::Array(_))
            | (ValueType::Dictionary, CloudValue::Dictionary(_)) => self.to_natural(),
            _ => return Err(mismatch()),
        })
    }

    /// Reads the slot without a requested type. Element types inside
    /// containers are resolved later by the caller's `KvValue` impl.
    pub fn to_natural(&self) -> Value {
        match self {
            CloudValue::Bool(b) => Value::Bool(*b),
            CloudValue::Int64(i) => Value::Int64(*i),
            CloudValue::Double(d) => Value::Double(*d),
            CloudValue::String(s) => Value::String(s.clone()),
            CloudValue::Data(bytes) => Value::Data(bytes.clone()),
            CloudValue::Array(items) => {
                Value::Array(items.iter().map(CloudValue::to_natural).collect())
            }
            CloudValue::Dictionary(entries) => Value::Dictionary(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_natural()))
                    .collect(),
            ),
        }
    }
}

/// JSON has no NaN or infinity; those travel as strings.
mod double {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("nan")
        } else if value.is_sign_positive() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.as_str() {
                "nan" => Ok(f64::NAN),
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!("invalid double '{other}'"))),
            },
        }
    }
}

#[derive(Default)]
struct State {
    entries: BTreeMap<String, CloudValue>,
    dirty: bool,
}

/// Key-value store synchronized through a snapshot file.
///
/// Values live in memory; [`synchronize`](Self::synchronize) writes them out.
/// Without a sync path the store is process-local.
#[derive(Default)]
pub struct CloudStore {
    state: RwLock<State>,
    sync_path: Option<PathBuf>,
}

impl CloudStore {
    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens a store synchronized through `path`, loading the last snapshot
    /// if one exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, KvError> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read(&path)?;
            serde_json::from_slice(&content).map_err(|e| {
                KvError::Corrupted(format!("cloud snapshot '{}': {e}", path.display()))
            })?
        } else {
            BTreeMap::new()
        };
        info!(path = %path.display(), entries = entries.len(), "cloud store opened");

        Ok(Self {
            state: RwLock::new(State {
                entries,
                dirty: false,
            }),
            sync_path: Some(path),
        })
    }

    pub fn sync_path(&self) -> Option<&Path> {
        self.sync_path.as_deref()
    }

    /// Writes pending changes to the snapshot file.
    ///
    /// Returns `false` when there is nothing to write or no sync path.
    pub fn synchronize(&self) -> Result<bool, KvError> {
        let Some(path) = &self.sync_path else {
            return Ok(false);
        };
        let mut state = self.state.write();
        if !state.dirty {
            return Ok(false);
        }

        let content = serde_json::to_vec_pretty(&state.entries)?;
        let tmp = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, path)?;
        state.dirty = false;

        debug!(path = %path.display(), entries = state.entries.len(), "cloud store synchronized");
        Ok(true)
    }

    /// Raw native slot for `key`.
    pub fn native(&self, key: &str) -> Option<CloudValue> {
        self.state.read().entries.get(key).cloned()
    }
}

impl KvStore for CloudStore {
    fn name(&self) -> &str {
        "cloud"
    }

    fn read(&self, key: &str, sink: &mut dyn ValueSink) -> Result<bool, KvError> {
        let value = {
            let state = self.state.read();
            let Some(slot) = state.entries.get(key) else {
                return Ok(false);
            };
            slot.to_value(sink.value_type())?
        };
        sink.accept(value)?;
        Ok(true)
    }

    fn write(&self, key: &str, value: Option<Value>) -> Result<(), KvError> {
        let slot = value.map(CloudValue::from_value).transpose()?;
        let mut state = self.state.write();
        match slot {
            Some(slot) => {
                state.entries.insert(key.to_string(), slot);
            }
            None => {
                state.entries.remove(key);
            }
        }
        state.dirty = true;
        Ok(())
    }

    fn all(&self) -> Result<Entries, KvError> {
        Ok(self
            .state
            .read()
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_natural()))
            .collect())
    }
}
