use serde::{Deserialize, Serialize};

use got_store::{Blob, Object};

/// Options for [`Got::hash_object`](crate::Got::hash_object).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashOptions {
    /// Kind tag to store the payload under.
    pub kind: String,
    /// Persist the object. When `false` only the hash is computed.
    pub write: bool,
}

impl HashOptions {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            write: false,
        }
    }

    pub fn write(mut self, write: bool) -> Self {
        self.write = write;
        self
    }
}

impl Default for HashOptions {
    fn default() -> Self {
        Self::new(Blob::KIND)
    }
}
