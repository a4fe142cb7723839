//! Unified error type for the crate's entry points.

use thiserror::Error;

use crate::config::ConfigError;
use crate::store::KvError;

/// Any error surfaced by kv-field.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Kv(#[from] KvError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kv_error_is_transparent() {
        let err: Error = KvError::Corrupted("crc mismatch".to_string()).into();
        assert_eq!(err.to_string(), KvError::Corrupted("crc mismatch".to_string()).to_string());
    }
}
