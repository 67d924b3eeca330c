//! Content-addressed object storage for got.
//!
//! Objects are stored as records of the form `kind SP length NUL payload`
//! and identified by the BLAKE3 hash of the full record. The loose backend
//! keeps each record zstd-compressed at `objects/<2 hex>/<62 hex>`, the
//! same fan-out git uses for its loose objects.
//!
//! # Kinds
//!
//! A store only accepts kinds present in its [`KindRegistry`]. The default
//! registry knows [`Blob`]; further kinds implement [`Object`] and are
//! registered explicitly.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`LooseObjectStore`] -- one compressed file per object under a
//!   repository's `objects/` directory
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written; rewriting the same content is a no-op.
//! 2. Files only appear at their final path fully written (temp file + rename).
//! 3. Every read re-hashes the record and rejects content filed under the wrong ID.
//! 4. Decoding is strictly sequential and never trusts the declared length
//!    for allocation.

pub mod codec;
pub mod error;
pub mod loose;
pub mod memory;
pub mod object;
pub mod resolve;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use codec::{decode, encode, KindCodec, KindRegistry, ObjectRecord, MAX_TAG_LEN};
pub use error::{FormatError, StoreError, StoreResult};
pub use loose::{LooseObjectStore, COMPRESSION_LEVEL};
pub use memory::InMemoryObjectStore;
pub use object::{Blob, Object};
pub use resolve::resolve;
pub use traits::ObjectStore;
