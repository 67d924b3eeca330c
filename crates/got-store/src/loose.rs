use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use got_repo::{write_atomic, Repository};
use got_types::ObjectId;
use tracing::{debug, warn};

use crate::codec::{KindRegistry, ObjectRecord};
use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// zstd level used for every object. Fixed so identical records always
/// produce identical files.
pub const COMPRESSION_LEVEL: i32 = 3;

/// Filesystem store keeping one compressed file per object.
///
/// Objects live at `<objects_dir>/<first 2 hex>/<remaining 62 hex>`. Each file
/// is the zstd-compressed object record; the ID is the hash of the
/// uncompressed record. Files are written to a temporary name and renamed
/// into place, so concurrent writers and readers never see partial objects.
///
/// The store holds only a path and a registry; it keeps no state between
/// calls.
#[derive(Clone, Debug)]
pub struct LooseObjectStore {
    objects_dir: PathBuf,
    registry: KindRegistry,
}

impl LooseObjectStore {
    /// Store rooted at `objects_dir`, accepting the default kinds.
    pub fn new(objects_dir: impl Into<PathBuf>) -> Self {
        Self {
            objects_dir: objects_dir.into(),
            registry: KindRegistry::default(),
        }
    }

    /// Store for a repository's `objects` directory.
    pub fn open(repo: &Repository) -> Self {
        Self::new(repo.objects_dir())
    }

    /// Replace the accepted kinds.
    pub fn with_registry(mut self, registry: KindRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Where the object `id` is (or would be) stored.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        let (dir, file) = id.loose_segments();
        self.objects_dir.join(dir).join(file)
    }

    /// Open, decompress, decode and re-hash the object filed under `id`.
    fn load_record(&self, id: &ObjectId) -> StoreResult<ObjectRecord> {
        let path = self.object_path(id);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(*id));
            }
            Err(e) => return Err(StoreError::io(&path)(e)),
        };
        let decoder = zstd::stream::read::Decoder::new(file).map_err(StoreError::io(&path))?;
        let record = self
            .registry
            .decode(BufReader::new(decoder))
            .map_err(|source| StoreError::Corrupt { id: *id, source })?;

        let computed = ObjectId::hash_record(&record.encode());
        if computed != *id {
            return Err(StoreError::HashMismatch { id: *id, computed });
        }
        Ok(record)
    }

    fn persist(&self, id: &ObjectId, record: &[u8]) -> StoreResult<()> {
        let path = self.object_path(id);
        let compressed =
            zstd::encode_all(record, COMPRESSION_LEVEL).map_err(StoreError::io(&path))?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(StoreError::io(dir))?;
        }
        write_atomic(&path, &compressed).map_err(StoreError::io(&path))
    }
}

impl ObjectStore for LooseObjectStore {
    fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    fn write(&self, kind: &str, payload: &[u8]) -> StoreResult<ObjectId> {
        let record = self.registry.encode(kind, payload)?;
        let id = ObjectId::hash_record(&record);

        if self.exists(&id)? {
            match self.load_record(&id) {
                Ok(_) => {
                    debug!(id = %id.short_hex(), kind, "object already stored");
                    return Ok(id);
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "stored object failed verification; rewriting");
                }
            }
        }

        self.persist(&id, &record)?;
        debug!(id = %id.short_hex(), kind, size = payload.len(), "object written");
        Ok(id)
    }

    fn read(&self, id: &ObjectId, expected_kind: &str) -> StoreResult<Vec<u8>> {
        let record = self.load_record(id)?;
        if record.kind != expected_kind {
            return Err(StoreError::KindMismatch {
                id: *id,
                expected: expected_kind.to_string(),
                actual: record.kind.to_string(),
            });
        }
        debug!(id = %id.short_hex(), kind = record.kind, size = record.payload.len(), "object read");
        Ok(record.payload)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        let path = self.object_path(id);
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(&path)(e)),
        }
    }
}
