use std::collections::HashMap;
use std::sync::RwLock;

use got_types::ObjectId;

use crate::codec::KindRegistry;
use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// In-memory, HashMap-based object store.
///
/// Intended for tests and embedding. Holds encoded (uncompressed) records
/// keyed by ID behind a `RwLock`, and runs them through the same codec and
/// registry as [`LooseObjectStore`](crate::LooseObjectStore), so hashes and
/// kind checks are identical across backends.
pub struct InMemoryObjectStore {
    records: RwLock<HashMap<ObjectId, Vec<u8>>>,
    registry: KindRegistry,
}

impl InMemoryObjectStore {
    /// Create a new empty store accepting the default kinds.
    pub fn new() -> Self {
        Self::with_registry(KindRegistry::default())
    }

    /// Create a new empty store accepting the kinds in `registry`.
    pub fn with_registry(registry: KindRegistry) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            registry,
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().expect("lock poisoned").is_empty()
    }

    /// Return a sorted list of all object IDs in the store.
    pub fn all_ids(&self) -> Vec<ObjectId> {
        let map = self.records.read().expect("lock poisoned");
        let mut ids: Vec<ObjectId> = map.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    fn write(&self, kind: &str, payload: &[u8]) -> StoreResult<ObjectId> {
        let record = self.registry.encode(kind, payload)?;
        let id = ObjectId::hash_record(&record);
        let mut map = self.records.write().expect("lock poisoned");
        map.entry(id).or_insert(record);
        Ok(id)
    }

    fn read(&self, id: &ObjectId, expected_kind: &str) -> StoreResult<Vec<u8>> {
        let map = self.records.read().expect("lock poisoned");
        let bytes = map.get(id).ok_or(StoreError::NotFound(*id))?;
        let record = self
            .registry
            .decode(bytes.as_slice())
            .map_err(|source| StoreError::Corrupt { id: *id, source })?;
        if record.kind != expected_kind {
            return Err(StoreError::KindMismatch {
                id: *id,
                expected: expected_kind.to_string(),
                actual: record.kind.to_string(),
            });
        }
        Ok(record.payload)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        let map = self.records.read().expect("lock poisoned");
        Ok(map.contains_key(id))
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &self.len())
            .field("kinds", &self.registry.tags().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loose::LooseObjectStore;
    use crate::object::Blob;

    #[test]
    fn write_and_read_blob() {
        let store = InMemoryObjectStore::new();
        let id = store.write("blob", b"hello world").unwrap();
        assert_eq!(store.read(&id, "blob").unwrap(), b"hello world");
    }

    #[test]
    fn same_content_is_stored_once() {
        let store = InMemoryObjectStore::new();
        let id1 = store.write("blob", b"identical").unwrap();
        let id2 = store.write_object(&Blob::new(b"identical".to_vec())).unwrap();
        assert_eq!(id1, id2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn ids_match_loose_store() {
        let dir = tempfile::tempdir().unwrap();
        let loose = LooseObjectStore::new(dir.path());
        let memory = InMemoryObjectStore::new();
        for payload in [&b""[..], b"hello\n", b"\x00\x01\x02"] {
            assert_eq!(
                memory.write("blob", payload).unwrap(),
                loose.write("blob", payload).unwrap()
            );
        }
    }

    #[test]
    fn read_missing_object() {
        let store = InMemoryObjectStore::new();
        let id = ObjectId::hash_record(b"blob 1\x00x");
        assert!(matches!(
            store.read(&id, "blob"),
            Err(StoreError::NotFound(_))
        ));
        assert!(!store.exists(&id).unwrap());
    }

    #[test]
    fn read_with_unexpected_kind() {
        let store = InMemoryObjectStore::new();
        let id = store.write("blob", b"x").unwrap();
        assert!(matches!(
            store.read(&id, "tree"),
            Err(StoreError::KindMismatch { .. })
        ));
    }

    #[test]
    fn empty_registry_rejects_everything() {
        let store = InMemoryObjectStore::with_registry(KindRegistry::empty());
        assert!(store.write("blob", b"x").is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn all_ids_is_sorted() {
        let store = InMemoryObjectStore::new();
        for payload in [b"aaa", b"bbb", b"ccc"] {
            store.write("blob", payload).unwrap();
        }
        let ids = store.all_ids();
        assert_eq!(ids.len(), 3);
        for w in ids.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn debug_format() {
        let store = InMemoryObjectStore::new();
        store.write("blob", b"x").unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("object_count: 1"));
        assert!(debug.contains("blob"));
    }
}
