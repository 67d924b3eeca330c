use got_types::ObjectId;

use crate::codec::KindRegistry;
use crate::error::{StoreError, StoreResult};
use crate::object::Object;
use crate::resolve;

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - The ID of an object is the hash of its full encoded record, so the same
///   (kind, payload) always maps to the same ID.
/// - Objects are write-once. Writing an existing object is a successful
///   no-op and never damages the stored copy.
/// - Only kinds in [`registry`](Self::registry) are accepted on write or
///   returned on read.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Kinds this store accepts.
    fn registry(&self) -> &KindRegistry;

    /// Store `payload` as a `kind` object and return its ID.
    fn write(&self, kind: &str, payload: &[u8]) -> StoreResult<ObjectId>;

    /// Load the payload stored under `id`, which must be of `expected_kind`.
    fn read(&self, id: &ObjectId, expected_kind: &str) -> StoreResult<Vec<u8>>;

    /// Check whether an object is stored under `id`.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// The ID `write` would return, without storing anything.
    fn write_dry(&self, kind: &str, payload: &[u8]) -> StoreResult<ObjectId> {
        let record = self.registry().encode(kind, payload)?;
        Ok(ObjectId::hash_record(&record))
    }

    /// Translate a user-supplied name into an object ID.
    fn resolve(&self, name: &str) -> StoreResult<ObjectId> {
        resolve::resolve(name)
    }

    /// Store a typed object.
    fn write_object<T: Object>(&self, object: &T) -> StoreResult<ObjectId>
    where
        Self: Sized,
    {
        self.write(T::KIND, &object.serialize())
    }

    /// Load a typed object.
    fn read_object<T: Object>(&self, id: &ObjectId) -> StoreResult<T>
    where
        Self: Sized,
    {
        let payload = self.read(id, T::KIND)?;
        T::deserialize(payload).map_err(|source| StoreError::Corrupt { id: *id, source })
    }
}
