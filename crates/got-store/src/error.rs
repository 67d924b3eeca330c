use std::path::PathBuf;

use got_types::ObjectId;

/// A byte sequence that is not a well-formed object record.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormatError {
    /// The kind tag is not registered.
    #[error("unknown object kind {tag:?}")]
    UnknownKind { tag: String },

    /// The header ended early or a header field is oversized.
    #[error("malformed record header: {0}")]
    MalformedHeader(String),

    /// The length field is not a canonical decimal number.
    #[error("malformed payload length {raw:?}")]
    MalformedLength { raw: String },

    /// The payload is shorter or longer than the header declares.
    #[error("payload length mismatch: header declares {declared} bytes, record holds {actual}")]
    LengthMismatch { declared: u64, actual: u64 },

    /// The payload was rejected by the kind's deserializer.
    #[error("invalid {kind} payload: {reason}")]
    InvalidPayload { kind: &'static str, reason: String },

    /// The underlying reader failed mid-record.
    #[error("stream error while decoding: {0}")]
    Stream(String),
}

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No object is stored under this ID.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// The stored object has a different kind than the caller asked for.
    #[error("object {id} is a {actual}, expected {expected}")]
    KindMismatch {
        id: ObjectId,
        expected: String,
        actual: String,
    },

    /// The stored record does not hash to the ID it is filed under.
    #[error("hash mismatch for {id}: stored record hashes to {computed}")]
    HashMismatch { id: ObjectId, computed: ObjectId },

    /// The stored bytes could not be decoded.
    #[error("corrupt object {id}: {source}")]
    Corrupt {
        id: ObjectId,
        #[source]
        source: FormatError,
    },

    /// A record could not be encoded or decoded.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The name is not a full hash and no other resolution is available.
    #[error("cannot resolve {name:?}: {reason}")]
    Unresolvable { name: String, reason: String },

    /// I/O error from the underlying storage.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
