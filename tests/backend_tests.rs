//! Round-trip tests for every backend, including boundary values.

mod common;

use std::collections::{BTreeMap, HashMap};

use chrono::{TimeZone, Utc};
use serde_bytes::ByteBuf;

use common::{Profile, sample_profile};
use kv_field::{CloudStore, CloudValue, KvError, KvStore, KvStoreExt, Value};

/// Writes and reads back one value of every kind.
fn roundtrip_all_kinds(store: &dyn KvStore) -> Result<(), anyhow::Error> {
    store.set("bool", Some(true))?;
    assert_eq!(store.get::<bool>("bool")?, Some(true));

    for n in [i32::MIN, -1, 0, i32::MAX] {
        store.set("int", Some(n))?;
        assert_eq!(store.get::<i32>("int")?, Some(n));
    }
    for n in [i64::MIN, i64::MAX] {
        store.set("int64", Some(n))?;
        assert_eq!(store.get::<i64>("int64")?, Some(n));
    }
    store.set("uint", Some(u32::MAX))?;
    assert_eq!(store.get::<u32>("uint")?, Some(u32::MAX));
    for n in [isize::MIN, isize::MAX] {
        store.set("isize", Some(n))?;
        assert_eq!(store.get::<isize>("isize")?, Some(n));
    }
    // usize::MAX exceeds the cloud store's i64 slot; the byte-only stores
    // cover it separately.
    for n in [usize::MIN, i64::MAX as usize] {
        store.set("usize", Some(n))?;
        assert_eq!(store.get::<usize>("usize")?, Some(n));
    }

    store.set("float", Some(f32::MAX))?;
    assert_eq!(store.get::<f32>("float")?, Some(f32::MAX));
    store.set("double", Some(f64::MIN_POSITIVE))?;
    assert_eq!(store.get::<f64>("double")?, Some(f64::MIN_POSITIVE));
    for d in [f64::INFINITY, f64::NEG_INFINITY] {
        store.set("double", Some(d))?;
        assert_eq!(store.get::<f64>("double")?, Some(d));
    }
    store.set("double", Some(f64::NAN))?;
    assert!(store.get::<f64>("double")?.is_some_and(f64::is_nan));

    store.set("string", Some(String::new()))?;
    assert_eq!(store.get::<String>("string")?, Some(String::new()));
    store.set("string", Some("héllo wörld".to_string()))?;
    assert_eq!(store.get::<String>("string")?, Some("héllo wörld".to_string()));

    let date = Utc
        .with_ymd_and_hms(1969, 7, 20, 20, 17, 40)
        .single()
        .ok_or_else(|| anyhow::anyhow!("invalid date"))?;
    store.set("date", Some(date))?;
    assert_eq!(store.get("date")?, Some(date));

    store.set("data", Some(ByteBuf::from(vec![0u8, 1, 254, 255])))?;
    assert_eq!(store.get::<ByteBuf>("data")?, Some(ByteBuf::from(vec![0u8, 1, 254, 255])));
    store.set("empty", Some(ByteBuf::new()))?;
    assert_eq!(store.get::<ByteBuf>("empty")?, Some(ByteBuf::new()));

    store.set("array", Some(vec![1i32, 2, 3]))?;
    assert_eq!(store.get::<Vec<i32>>("array")?, Some(vec![1, 2, 3]));
    store.set("empty-array", Some(Vec::<i32>::new()))?;
    assert_eq!(store.get::<Vec<i32>>("empty-array")?, Some(Vec::new()));
    store.set("nested", Some(vec![vec!["a".to_string()], vec![]]))?;
    assert_eq!(
        store.get::<Vec<Vec<String>>>("nested")?,
        Some(vec![vec!["a".to_string()], vec![]])
    );

    let dict: BTreeMap<String, f64> = [("half".to_string(), 0.5), ("ten".to_string(), 10.0)].into();
    store.set("dict", Some(dict.clone()))?;
    assert_eq!(store.get::<BTreeMap<String, f64>>("dict")?, Some(dict));
    store.set("empty-dict", Some(BTreeMap::<String, bool>::new()))?;
    assert_eq!(
        store.get::<BTreeMap<String, bool>>("empty-dict")?,
        Some(BTreeMap::new())
    );
    store.set("empty-hash", Some(HashMap::<String, String>::new()))?;
    assert_eq!(
        store.get::<HashMap<String, String>>("empty-hash")?,
        Some(HashMap::new())
    );

    store.set("profile", Some(sample_profile()))?;
    assert_eq!(store.get::<Profile>("profile")?, Some(sample_profile()));

    store.remove("profile")?;
    assert_eq!(store.get::<Profile>("profile")?, None);
    assert_eq!(store.get::<bool>("never-set")?, None);
    Ok(())
}

#[test]
fn test_cloud_roundtrip() -> Result<(), anyhow::Error> {
    let store = CloudStore::in_memory();
    roundtrip_all_kinds(&store)
}

#[cfg(feature = "persistent")]
#[test]
fn test_local_roundtrip() -> Result<(), anyhow::Error> {
    let dir = tempfile::TempDir::new()?;
    let store = kv_field::LocalStore::open(dir.path(), "defaults")?;
    roundtrip_all_kinds(&store)?;

    // Unsigned values above i64::MAX fit the byte envelope.
    store.set("big", Some(u64::MAX))?;
    assert_eq!(store.get::<u64>("big")?, Some(u64::MAX));
    store.set("usize", Some(usize::MAX))?;
    assert_eq!(store.get::<usize>("usize")?, Some(usize::MAX));
    Ok(())
}

#[cfg(feature = "persistent")]
#[test]
fn test_vault_roundtrip() -> Result<(), anyhow::Error> {
    let dir = tempfile::TempDir::new()?;
    let store = kv_field::VaultStore::open(dir.path(), kv_field::VaultOptions::default())?;
    roundtrip_all_kinds(&store)?;
    store.set("big", Some(u64::MAX))?;
    assert_eq!(store.get::<u64>("big")?, Some(u64::MAX));
    store.set("usize", Some(usize::MAX))?;
    assert_eq!(store.get::<usize>("usize")?, Some(usize::MAX));
    Ok(())
}

#[test]
fn test_cloud_range_violations_surface() -> Result<(), anyhow::Error> {
    let store = CloudStore::in_memory();

    let err = store.set("big", Some(u64::MAX)).err();
    assert!(matches!(err, Some(KvError::Range { .. })));
    let err = store.set("usize", Some(usize::MAX)).err();
    assert!(matches!(err, Some(KvError::Range { .. })));

    let far_future = Utc
        .with_ymd_and_hms(2300, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| anyhow::anyhow!("invalid date"))?;
    let err = store.set("future", Some(far_future)).err();
    assert!(matches!(err, Some(KvError::Range { .. })));

    // Largest storable unsigned value.
    store.set("max", Some(i64::MAX as u64))?;
    assert_eq!(store.get::<u64>("max")?, Some(i64::MAX as u64));
    Ok(())
}

#[test]
fn test_cloud_native_slots() -> Result<(), anyhow::Error> {
    let store = CloudStore::in_memory();
    store.set("ratio", Some(0.5f32))?;
    store.set("profile", Some(sample_profile()))?;
    store.set("tags", Some(vec!["a".to_string()]))?;

    assert_eq!(store.native("ratio"), Some(CloudValue::Double(0.5)));
    assert!(matches!(store.native("profile"), Some(CloudValue::Data(_))));
    assert_eq!(
        store.native("tags"),
        Some(CloudValue::Array(vec![CloudValue::String("a".to_string())]))
    );

    let all = store.all()?;
    assert_eq!(all.get("ratio"), Some(&Value::Double(0.5)));
    Ok(())
}

#[test]
fn test_mismatched_type_reads_as_absent() -> Result<(), anyhow::Error> {
    let store = CloudStore::in_memory();
    store.set("name", Some("alice".to_string()))?;
    assert_eq!(store.get::<i64>("name")?, None);
    assert_eq!(store.get::<Profile>("name")?, None);
    assert_eq!(store.get::<String>("name")?, Some("alice".to_string()));
    Ok(())
}

#[cfg(feature = "persistent")]
#[test]
fn test_corrupted_envelope_is_backend_error() -> Result<(), anyhow::Error> {
    let encoded = kv_field::value::codec::encode(&Value::String("ok".to_string()))?;
    let mut damaged = encoded.clone();
    if let Some(last) = damaged.last_mut() {
        *last ^= 0xff;
    }
    let err = kv_field::value::codec::decode(&damaged).err();
    assert!(matches!(err, Some(KvError::Corrupted(_))));
    assert!(err.is_some_and(|e| !e.is_decode()));
    Ok(())
}
