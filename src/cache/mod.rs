//! Process-wide query cache, normalized by entity id.
//!
//! Queries read through the cache per collection; mutations either upsert the
//! entity carried in their response or invalidate the collections they affect,
//! forcing the next read to refetch. Logout clears everything as a
//! coarse-grained consistency reset.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

/// Cached entity collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Doctors,
    Patients,
    Branches,
    Mappings,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Doctors => "doctors",
            Collection::Patients => "patients",
            Collection::Branches => "branches",
            Collection::Mappings => "mappings",
        }
    }
}

#[derive(Default)]
struct CacheInner {
    /// collection -> (id -> entity); a missing collection means "not cached"
    collections: HashMap<Collection, HashMap<String, Value>>,
}

/// Shared query cache.
#[derive(Default)]
pub struct QueryCache {
    inner: Mutex<CacheInner>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a collection with a freshly fetched result set.
    pub fn store_all(&self, collection: Collection, entities: &[Value]) {
        let mut inner = self.inner.lock().unwrap();
        let entries = entities
            .iter()
            .filter_map(|e| {
                e.get("id")
                    .and_then(Value::as_str)
                    .map(|id| (id.to_string(), e.clone()))
            })
            .collect();
        inner.collections.insert(collection, entries);
    }

    /// Read a whole collection, if it is currently cached.
    pub fn get_all(&self, collection: Collection) -> Option<Vec<Value>> {
        let inner = self.inner.lock().unwrap();
        inner
            .collections
            .get(&collection)
            .map(|entries| entries.values().cloned().collect())
    }

    /// Apply a mutation response directly to the cached collection.
    ///
    /// No-op when the collection is not cached; the next read refetches anyway.
    pub fn upsert(&self, collection: Collection, entity: &Value) {
        let Some(id) = entity.get("id").and_then(Value::as_str) else {
            return;
        };
        let mut inner = self.inner.lock().unwrap();
        if let Some(entries) = inner.collections.get_mut(&collection) {
            entries.insert(id.to_string(), entity.clone());
        }
    }

    /// Remove one entity from a cached collection.
    pub fn remove(&self, collection: Collection, id: &str) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(entries) = inner.collections.get_mut(&collection) {
            entries.remove(id);
        }
    }

    /// Drop collections whose server state the mutation response could not
    /// reconstruct; the next read issues a targeted refetch.
    pub fn invalidate(&self, collections: &[Collection]) {
        let mut inner = self.inner.lock().unwrap();
        for collection in collections {
            inner.collections.remove(collection);
        }
    }

    /// Drop everything. Used on logout and forced logout.
    pub fn clear(&self) {
        self.inner.lock().unwrap().collections.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_store_and_read_through() {
        let cache = QueryCache::new();
        assert!(cache.get_all(Collection::Doctors).is_none());

        cache.store_all(
            Collection::Doctors,
            &[json!({"id": "d1", "name": "Smith"})],
        );
        let cached = cache.get_all(Collection::Doctors).unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0]["name"], "Smith");
    }

    #[test]
    fn test_upsert_updates_cached_entity() {
        let cache = QueryCache::new();
        cache.store_all(
            Collection::Branches,
            &[json!({"id": "b1", "branchCode": "NYC01"})],
        );
        cache.upsert(Collection::Branches, &json!({"id": "b1", "branchCode": "NYC02"}));

        let cached = cache.get_all(Collection::Branches).unwrap();
        assert_eq!(cached[0]["branchCode"], "NYC02");
    }

    #[test]
    fn test_upsert_is_noop_when_not_cached() {
        let cache = QueryCache::new();
        cache.upsert(Collection::Branches, &json!({"id": "b1"}));
        assert!(cache.get_all(Collection::Branches).is_none());
    }

    #[test]
    fn test_invalidate_forces_refetch() {
        let cache = QueryCache::new();
        cache.store_all(Collection::Branches, &[json!({"id": "b1"})]);
        cache.store_all(Collection::Mappings, &[json!({"id": "m1"})]);

        // branch deletion cascades into mappings server-side
        cache.invalidate(&[Collection::Branches, Collection::Mappings]);
        assert!(cache.get_all(Collection::Branches).is_none());
        assert!(cache.get_all(Collection::Mappings).is_none());
    }

    #[test]
    fn test_clear_drops_all_collections() {
        let cache = QueryCache::new();
        cache.store_all(Collection::Doctors, &[json!({"id": "d1"})]);
        cache.clear();
        assert!(cache.get_all(Collection::Doctors).is_none());
    }
}
