//! High-level SDK for got.
//!
//! Provides a single handle, [`Got`], over a repository and its loose object
//! store. This is the entry point for the `got` binary and for applications
//! embedding the store.

pub mod error;
pub mod options;
pub mod repository;

pub use error::{ErrorCategory, SdkError, SdkResult};
pub use options::HashOptions;
pub use repository::{hash_only, Got};

// Re-export key types
pub use got_repo::{InitOptions, Repository};
pub use got_store::{Blob, KindRegistry, Object, ObjectStore};
pub use got_types::ObjectId;
