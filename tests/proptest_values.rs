//! Property-based round-trip tests for numeric, date and string values.
//!
//! Exercises the tag dispatch of the cloud store and, with `persistent`, the
//! byte envelope used by the vault and local stores.

use chrono::{DateTime, Utc};
use proptest::prelude::*;

use kv_field::{CloudStore, KvError, KvStoreExt, Value};

proptest! {
    #[test]
    fn roundtrip_i32_cloud(val in any::<i32>()) {
        let store = CloudStore::in_memory();
        store.set("k", Some(val)).unwrap();
        prop_assert_eq!(store.get::<i32>("k").unwrap(), Some(val));
    }

    #[test]
    fn roundtrip_i64_cloud(val in any::<i64>()) {
        let store = CloudStore::in_memory();
        store.set("k", Some(val)).unwrap();
        prop_assert_eq!(store.get::<i64>("k").unwrap(), Some(val));
    }

    #[test]
    fn unsigned_cloud_respects_i64_range(val in any::<u64>()) {
        let store = CloudStore::in_memory();
        let result = store.set("k", Some(val));
        if val <= i64::MAX as u64 {
            prop_assert!(result.is_ok());
            prop_assert_eq!(store.get::<u64>("k").unwrap(), Some(val));
        } else {
            prop_assert!(matches!(result, Err(KvError::Range { .. })), "expected a range error");
            prop_assert_eq!(store.get::<u64>("k").unwrap(), None);
        }
    }

    #[test]
    fn narrowing_reads_are_absent(val in (i64::from(i32::MAX) + 1)..=i64::MAX) {
        let store = CloudStore::in_memory();
        store.set("k", Some(val)).unwrap();
        prop_assert_eq!(store.get::<i32>("k").unwrap(), None);
    }

    #[test]
    fn roundtrip_f64_cloud(val in any::<f64>()) {
        let store = CloudStore::in_memory();
        store.set("k", Some(val)).unwrap();
        let read = store.get::<f64>("k").unwrap().unwrap();
        prop_assert_eq!(read.to_bits(), val.to_bits());
    }

    #[test]
    fn roundtrip_f64_cloud_snapshot(val in prop_oneof![
        any::<f64>(),
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
    ]) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cloud.json");
        let store = CloudStore::open(&path).unwrap();
        store.set("k", Some(val)).unwrap();
        prop_assert!(store.synchronize().unwrap());

        let read = CloudStore::open(&path).unwrap().get::<f64>("k").unwrap().unwrap();
        if val.is_nan() {
            prop_assert!(read.is_nan());
        } else {
            prop_assert_eq!(read, val);
        }
    }

    #[test]
    fn roundtrip_f32_cloud(val in any::<f32>()) {
        let store = CloudStore::in_memory();
        store.set("k", Some(val)).unwrap();
        let read = store.get::<f32>("k").unwrap().unwrap();
        if val.is_nan() {
            prop_assert!(read.is_nan());
        } else {
            prop_assert_eq!(read, val);
        }
    }

    #[test]
    fn roundtrip_date_cloud(nanos in any::<i64>()) {
        let date = DateTime::<Utc>::from_timestamp_nanos(nanos);
        let store = CloudStore::in_memory();
        store.set("k", Some(date)).unwrap();
        prop_assert_eq!(store.get::<DateTime<Utc>>("k").unwrap(), Some(date));
    }

    #[test]
    fn roundtrip_string_cloud(s in ".*") {
        let store = CloudStore::in_memory();
        store.set("k", Some(s.clone())).unwrap();
        prop_assert_eq!(store.get::<String>("k").unwrap(), Some(s));
    }
}

#[cfg(feature = "persistent")]
proptest! {
    #[test]
    fn envelope_roundtrip_integers(a in any::<i64>(), b in any::<u64>()) {
        use kv_field::value::codec;

        for value in [Value::Int64(a), Value::UInt(b), Value::Int(a)] {
            let bytes = codec::encode(&value).unwrap();
            prop_assert_eq!(codec::decode(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn envelope_roundtrip_dates(secs in -62_135_596_800i64..=253_402_300_799i64, nanos in 0u32..1_000_000_000) {
        use kv_field::value::codec;

        let date = DateTime::<Utc>::from_timestamp(secs, nanos).unwrap();
        let bytes = codec::encode(&Value::Date(date)).unwrap();
        prop_assert_eq!(codec::decode(&bytes).unwrap(), Value::Date(date));
    }

    #[test]
    fn envelope_rejects_truncation(data in proptest::collection::vec(any::<u8>(), 1..64), cut in 0usize..5) {
        use kv_field::value::codec;

        let bytes = codec::encode(&Value::Data(data)).unwrap();
        let truncated = bytes.get(..cut).unwrap_or_default();
        prop_assert!(
            matches!(codec::decode(truncated), Err(KvError::Corrupted(_))),
            "expected a corrupted envelope"
        );
    }
}
