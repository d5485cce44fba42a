//! Object cache collaborator.
//!
//! The engine reads reference data through two operations: a prefix query
//! returning every item under a namespace-scoped key, and a point lookup by
//! fully-qualified key. Payloads are JSON values decoded into record types on
//! demand.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// One keyed entry of the object cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheItem {
    /// Fully-qualified key, segments joined by `.`.
    pub key: String,
    /// Serialized record.
    pub data: serde_json::Value,
}

impl CacheItem {
    /// Creates an item.
    #[must_use]
    pub fn new(key: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            key: key.into(),
            data,
        }
    }

    /// Decodes the payload.
    pub fn decode<T: DeserializeOwned>(&self) -> EngineResult<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

/// Read access to the external object cache.
pub trait ObjectCache: Send + Sync {
    /// All items whose key equals `query` or starts with `query` followed by `.`.
    fn load_items(&self, query: &str) -> EngineResult<Vec<CacheItem>>;

    /// The item stored under `key`, if any.
    fn load_object(&self, key: &str) -> EngineResult<Option<CacheItem>>;
}

impl<'a> dyn ObjectCache + 'a {
    /// Point lookup decoded into `T`.
    pub fn load_typed<T: DeserializeOwned>(&self, key: &str) -> EngineResult<Option<T>> {
        self.load_object(key)?
            .map(|item| item.decode::<T>())
            .transpose()
    }

    /// Prefix query decoded into `T`.
    pub fn load_items_typed<T: DeserializeOwned>(&self, query: &str) -> EngineResult<Vec<T>> {
        self.load_items(query)?
            .iter()
            .map(CacheItem::decode::<T>)
            .collect()
    }
}

fn key_matches(key: &str, query: &str) -> bool {
    key.strip_prefix(query)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

/// Thread-safe in-memory object cache.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    items: RwLock<HashMap<String, serde_json::Value>>,
}

impl InMemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes `value` and stores it under `key`, replacing any previous entry.
    pub fn insert<T: Serialize>(&self, key: impl Into<String>, value: &T) -> EngineResult<()> {
        let data = serde_json::to_value(value)?;
        self.items.write().insert(key.into(), data);
        Ok(())
    }

    /// Stores a JSON document under `key`.
    pub fn insert_json(&self, key: impl Into<String>, json: &str) -> EngineResult<()> {
        let data: serde_json::Value = serde_json::from_str(json)?;
        self.items.write().insert(key.into(), data);
        Ok(())
    }

    /// Removes the entry under `key`.
    pub fn remove(&self, key: &str) -> bool {
        self.items.write().remove(key).is_some()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl ObjectCache for InMemoryCache {
    fn load_items(&self, query: &str) -> EngineResult<Vec<CacheItem>> {
        let items = self.items.read();
        let mut found: Vec<CacheItem> = items
            .iter()
            .filter(|(key, _)| key_matches(key, query))
            .map(|(key, data)| CacheItem::new(key.clone(), data.clone()))
            .collect();
        found.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(found)
    }

    fn load_object(&self, key: &str) -> EngineResult<Option<CacheItem>> {
        Ok(self
            .items
            .read()
            .get(key)
            .map(|data| CacheItem::new(key, data.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
        count: u32,
    }

    fn populated() -> InMemoryCache {
        let cache = InMemoryCache::new();
        cache
            .insert(
                "Orion.ReferenceData.BusinessCenterHolidays.AUSY",
                &Record {
                    name: "AUSY".into(),
                    count: 1,
                },
            )
            .unwrap();
        cache
            .insert(
                "Orion.ReferenceData.BusinessCenterHolidays.GBLO",
                &Record {
                    name: "GBLO".into(),
                    count: 2,
                },
            )
            .unwrap();
        cache
            .insert_json(
                "Orion.ReferenceData.BusinessCenterHolidaysArchive",
                r#"{"name":"old","count":0}"#,
            )
            .unwrap();
        cache
    }

    #[test]
    fn test_prefix_query_respects_segments() {
        let cache = populated();
        let items = cache
            .load_items("Orion.ReferenceData.BusinessCenterHolidays")
            .unwrap();
        let keys: Vec<_> = items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "Orion.ReferenceData.BusinessCenterHolidays.AUSY",
                "Orion.ReferenceData.BusinessCenterHolidays.GBLO",
            ]
        );
    }

    #[test]
    fn test_typed_lookup() {
        let cache: Arc<dyn ObjectCache> = Arc::new(populated());
        let record: Option<Record> = cache
            .load_typed("Orion.ReferenceData.BusinessCenterHolidays.GBLO")
            .unwrap();
        assert_eq!(record.unwrap().count, 2);
        let missing: Option<Record> = cache.load_typed("Orion.Nothing").unwrap();
        assert!(missing.is_none());

        let all: Vec<Record> = cache.load_items_typed("Orion.ReferenceData").unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_decode_mismatch_is_serialization_error() {
        let cache = InMemoryCache::new();
        cache.insert_json("k", r#"{"name": 5}"#).unwrap();
        let cache: &dyn ObjectCache = &cache;
        let err = cache.load_typed::<Record>("k").unwrap_err();
        assert!(err.to_string().starts_with("serialization error"));
    }

    #[test]
    fn test_remove() {
        let cache = populated();
        assert_eq!(cache.len(), 3);
        assert!(cache.remove("Orion.ReferenceData.BusinessCenterHolidaysArchive"));
        assert!(!cache.is_empty());
        assert_eq!(cache.len(), 2);
    }
}
