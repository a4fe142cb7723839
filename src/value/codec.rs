//! Byte envelope for backends whose only native slot is a byte string.
//!
//! Layout: `[format: u8][crc32: u32 LE][payload]`.
//!
//! - format `0`: payload is the raw bytes of a [`Value::Data`]
//! - format `1`: payload is a postcard-encoded [`Value`]
//!
//! Already-bytes values skip the serializer entirely; everything else goes
//! through postcard so any tag survives a byte-only store.

use crate::store::KvError;

use super::types::Value;

const FORMAT_RAW: u8 = 0;
const FORMAT_ENCODED: u8 = 1;
const HEADER_LEN: usize = 5;

/// Encodes a value into the envelope.
pub fn encode(value: &Value) -> Result<Vec<u8>, KvError> {
    let (format, payload) = match value {
        Value::Data(bytes) => (FORMAT_RAW, bytes.clone()),
        other => {
            let payload = postcard::to_stdvec(other)
                .map_err(|e| KvError::Corrupted(format!("failed to encode value: {e}")))?;
            (FORMAT_ENCODED, payload)
        }
    };

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.push(format);
    out.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decodes an envelope written by [`encode`].
///
/// Any structural problem is reported as [`KvError::Corrupted`], never as a
/// decode mismatch: the bytes are damaged, not of the wrong type.
pub fn decode(bytes: &[u8]) -> Result<Value, KvError> {
    let Some((&format, rest)) = bytes.split_first() else {
        return Err(KvError::Corrupted("empty envelope".to_string()));
    };
    let (crc, payload) = rest
        .split_at_checked(4)
        .ok_or_else(|| KvError::Corrupted("truncated envelope header".to_string()))?;
    let expected = u32::from_le_bytes(
        crc.try_into()
            .map_err(|_| KvError::Corrupted("truncated envelope header".to_string()))?,
    );
    let actual = crc32fast::hash(payload);
    if expected != actual {
        return Err(KvError::Corrupted(format!(
            "checksum mismatch: expected {expected:#010x}, got {actual:#010x}"
        )));
    }

    match format {
        FORMAT_RAW => Ok(Value::Data(payload.to_vec())),
        FORMAT_ENCODED => postcard::from_bytes(payload)
            .map_err(|e| KvError::Corrupted(format!("failed to decode value: {e}"))),
        other => Err(KvError::Corrupted(format!("unknown envelope format {other}"))),
    }
}
