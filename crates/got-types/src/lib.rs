//! Foundation types for got.
//!
//! Every other got crate depends on `got-types`. It is intentionally tiny:
//! the content hash that addresses stored objects and the error raised when
//! one cannot be parsed.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- BLAKE3 digest of an encoded object record

pub mod error;
pub mod object;

pub use error::TypeError;
pub use object::{ObjectId, HEX_LEN};
