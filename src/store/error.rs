//! Error types for store operations.

use std::fmt::Display;

use thiserror::Error;

use crate::value::{Value, ValueType};

/// Errors that can occur during store operations.
///
/// Variants fall into two categories. Decode mismatches (see
/// [`KvError::is_decode`]) mean a stored value exists but cannot be read as
/// the requested type. Everything else is a backend failure. An unset key is
/// never an error.
#[derive(Error, Debug)]
pub enum KvError {
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: ValueType,
        found: ValueType,
    },

    #[error("Codable payload error: {0}")]
    Codable(#[from] serde_json::Error),

    #[error("Value {value} does not fit in {target}")]
    Range { value: String, target: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "persistent")]
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("Corrupted entry: {0}")]
    Corrupted(String),

    #[error("Backend error: {0}")]
    Backend(#[from] anyhow::Error),

    #[error("{backend} store unavailable: {reason}")]
    Unavailable {
        backend: &'static str,
        reason: String,
    },

    #[error("Write failed on {failed} group member(s), first at index {member}: {source}")]
    GroupWrite {
        member: usize,
        failed: usize,
        #[source]
        source: Box<KvError>,
    },
}

impl KvError {
    /// A stored value had a different tag than the one requested.
    pub fn mismatch(expected: ValueType, found: &Value) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.value_type(),
        }
    }

    /// A value could not be represented in the target width.
    pub fn range(value: impl Display, target: &'static str) -> Self {
        Self::Range {
            value: value.to_string(),
            target,
        }
    }

    /// Wraps an arbitrary failure from a user-defined backend.
    pub fn backend(msg: impl Display) -> Self {
        Self::Backend(anyhow::anyhow!("{msg}"))
    }

    /// Returns `true` if the stored value exists but cannot be read as the
    /// requested type.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Self::TypeMismatch { .. } | Self::Codable(_) | Self::Range { .. }
        )
    }

    /// Returns `true` if the underlying persistence call itself failed.
    pub fn is_backend(&self) -> bool {
        !self.is_decode()
    }
}
