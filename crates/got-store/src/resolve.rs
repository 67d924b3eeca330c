//! Object name resolution.
//!
//! Only full hashes resolve. Abbreviated hashes, branch and tag names and
//! symbolic refs are rejected with [`StoreError::Unresolvable`] instead of
//! being passed through unvalidated.

use got_types::{ObjectId, HEX_LEN};

use crate::error::{StoreError, StoreResult};

/// Resolve `name` to an object ID.
pub fn resolve(name: &str) -> StoreResult<ObjectId> {
    let unresolvable = |reason: &str| StoreError::Unresolvable {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if ObjectId::is_full_hex(name) {
        return ObjectId::from_hex(name).map_err(|e| unresolvable(&e.to_string()));
    }
    // TODO: expand abbreviated hashes by scanning the fan-out directory once
    // ambiguity reporting is designed.
    let reason = if name.is_empty() {
        "empty name"
    } else if name.bytes().all(|b| b.is_ascii_hexdigit()) && name.len() < HEX_LEN {
        "abbreviated hashes are not supported"
    } else if name.bytes().all(|b| b.is_ascii_hexdigit()) {
        "too long to be a hash"
    } else {
        "reference names are not supported"
    };
    Err(unresolvable(reason))
}
