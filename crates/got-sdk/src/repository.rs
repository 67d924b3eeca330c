use std::path::Path;

use got_repo::{InitOptions, Repository};
use got_store::{KindRegistry, LooseObjectStore, Object, ObjectStore};
use got_types::ObjectId;
use tracing::debug;

use crate::error::SdkResult;
use crate::options::HashOptions;

/// High-level got repository API.
///
/// Pairs a [`Repository`] with the loose object store under its `objects/`
/// directory.
#[derive(Debug)]
pub struct Got {
    repo: Repository,
    store: LooseObjectStore,
}

impl Got {
    /// Initialize a new repository at `path` with default options.
    pub fn init(path: impl AsRef<Path>) -> SdkResult<Self> {
        Self::init_with(path, &InitOptions::default())
    }

    /// Initialize a new repository at `path`.
    pub fn init_with(path: impl AsRef<Path>, options: &InitOptions) -> SdkResult<Self> {
        let repo = Repository::init_with(path, options)?;
        Ok(Self::from_repository(repo))
    }

    /// Open the repository whose worktree is exactly `path`.
    pub fn open(path: impl AsRef<Path>) -> SdkResult<Self> {
        let repo = Repository::load(path)?;
        Ok(Self::from_repository(repo))
    }

    /// Open the repository containing `path`, searching parent directories.
    pub fn discover(path: impl AsRef<Path>) -> SdkResult<Self> {
        let repo = Repository::find(path)?;
        Ok(Self::from_repository(repo))
    }

    pub fn from_repository(repo: Repository) -> Self {
        let store = LooseObjectStore::open(&repo);
        Self { repo, store }
    }

    /// Replace the set of accepted kinds.
    pub fn with_registry(mut self, registry: KindRegistry) -> Self {
        self.store = self.store.with_registry(registry);
        self
    }

    // ---- Object operations ----

    /// Hash `payload` as an object of `options.kind`, storing it when
    /// `options.write` is set.
    pub fn hash_object(&self, payload: &[u8], options: &HashOptions) -> SdkResult<ObjectId> {
        let id = if options.write {
            self.store.write(&options.kind, payload)?
        } else {
            self.store.write_dry(&options.kind, payload)?
        };
        debug!(id = %id.short_hex(), kind = %options.kind, write = options.write, "hash-object");
        Ok(id)
    }

    /// Resolve `name` and return the payload of the `kind` object it names.
    pub fn cat_file(&self, name: &str, kind: &str) -> SdkResult<Vec<u8>> {
        let id = self.resolve(name)?;
        Ok(self.store.read(&id, kind)?)
    }

    /// Translate a user-supplied object name into an ID.
    pub fn resolve(&self, name: &str) -> SdkResult<ObjectId> {
        Ok(self.store.resolve(name)?)
    }

    pub fn write_object<T: Object>(&self, object: &T) -> SdkResult<ObjectId> {
        Ok(self.store.write_object(object)?)
    }

    pub fn read_object<T: Object>(&self, id: &ObjectId) -> SdkResult<T> {
        Ok(self.store.read_object(id)?)
    }

    // ---- Accessors ----

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn store(&self) -> &LooseObjectStore {
        &self.store
    }
}

/// Compute the ID of a `kind` object without any repository.
///
/// Accepts the default kinds only.
pub fn hash_only(kind: &str, payload: &[u8]) -> SdkResult<ObjectId> {
    let record = KindRegistry::default()
        .encode(kind, payload)
        .map_err(got_store::StoreError::from)?;
    Ok(ObjectId::hash_record(&record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use got_store::Blob;

    fn temp_got() -> (tempfile::TempDir, Got) {
        let dir = tempfile::tempdir().unwrap();
        let got = Got::init(dir.path()).unwrap();
        (dir, got)
    }

    #[test]
    fn write_then_cat_file() {
        let (_dir, got) = temp_got();
        let id = got
            .hash_object(b"hello\n", &HashOptions::default().write(true))
            .unwrap();
        assert!(got.store().exists(&id).unwrap());
        assert_eq!(got.cat_file(&id.to_hex(), "blob").unwrap(), b"hello\n");
    }

    #[test]
    fn dry_hash_stores_nothing() {
        let (_dir, got) = temp_got();
        let id = got.hash_object(b"hello\n", &HashOptions::default()).unwrap();
        assert!(!got.store().exists(&id).unwrap());
        let err = got.cat_file(&id.to_hex(), "blob").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn hash_only_agrees_with_repository() {
        let (_dir, got) = temp_got();
        let stored = got
            .hash_object(b"payload", &HashOptions::default().write(true))
            .unwrap();
        assert_eq!(hash_only("blob", b"payload").unwrap(), stored);
    }

    #[test]
    fn hash_only_rejects_unknown_kind() {
        let err = hash_only("tree", b"").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Format);
    }

    #[test]
    fn cat_file_with_wrong_kind() {
        let (_dir, got) = temp_got();
        let id = got.write_object(&Blob::new(b"x".to_vec())).unwrap();
        let err = got.cat_file(&id.to_hex(), "commit").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::KindMismatch);
    }

    #[test]
    fn cat_file_rejects_abbreviated_names() {
        let (_dir, got) = temp_got();
        let id = got.write_object(&Blob::new(b"x".to_vec())).unwrap();
        let err = got.cat_file(&id.to_hex()[..7], "blob").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Unresolved);
        let err = got.cat_file("master", "blob").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Unresolved);
    }

    #[test]
    fn typed_roundtrip() {
        let (_dir, got) = temp_got();
        let blob = Blob::new(b"typed".to_vec());
        let id = got.write_object(&blob).unwrap();
        assert_eq!(got.read_object::<Blob>(&id).unwrap(), blob);
    }

    #[test]
    fn discover_from_nested_directory() {
        let (dir, got) = temp_got();
        let id = got
            .hash_object(b"shared", &HashOptions::default().write(true))
            .unwrap();

        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        let found = Got::discover(&nested).unwrap();
        assert_eq!(found.repository().worktree(), got.repository().worktree());
        assert_eq!(found.cat_file(&id.to_hex(), "blob").unwrap(), b"shared");
    }

    #[test]
    fn open_requires_repository() {
        let dir = tempfile::tempdir().unwrap();
        let err = Got::open(dir.path()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::RepositoryState);
    }

    #[test]
    fn init_on_non_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("file"), b"x").unwrap();
        let err = Got::init(dir.path()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::RepositoryState);
    }

    #[test]
    fn init_with_custom_branch() {
        let dir = tempfile::tempdir().unwrap();
        let options = InitOptions {
            default_branch: "trunk".into(),
            ..InitOptions::default()
        };
        let got = Got::init_with(dir.path(), &options).unwrap();
        let head = std::fs::read_to_string(got.repository().path_to(["HEAD"])).unwrap();
        assert_eq!(head, "ref: refs/heads/trunk\n");
    }
}
