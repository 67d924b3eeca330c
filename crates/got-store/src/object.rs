use std::borrow::Cow;

use crate::error::FormatError;

/// A payload kind that can be stored.
///
/// Each kind owns a tag and a serializer/deserializer pair. Registering a
/// kind with [`KindRegistry::register`](crate::KindRegistry::register) is
/// all that is needed for the codec and every store to accept it.
pub trait Object: Sized {
    /// Tag written at the start of the record. Must be non-empty ASCII with
    /// no space or NUL.
    const KIND: &'static str;

    /// Payload bytes for this value.
    fn serialize(&self) -> Cow<'_, [u8]>;

    /// Rebuild a value from payload bytes.
    fn deserialize(payload: Vec<u8>) -> Result<Self, FormatError>;

    /// Check that `payload` would deserialize, without keeping the value.
    fn validate(payload: &[u8]) -> Result<(), FormatError> {
        Self::deserialize(payload.to_vec()).map(drop)
    }

    /// The kind tag of this value.
    fn kind(&self) -> &'static str {
        Self::KIND
    }
}

// ---------------------------------------------------------------------------
// Blob
// ---------------------------------------------------------------------------

/// Opaque bytes with no internal structure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Blob {
    data: Vec<u8>,
}

impl Blob {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl Object for Blob {
    const KIND: &'static str = "blob";

    fn serialize(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.data)
    }

    fn deserialize(payload: Vec<u8>) -> Result<Self, FormatError> {
        Ok(Self { data: payload })
    }

    fn validate(_payload: &[u8]) -> Result<(), FormatError> {
        Ok(())
    }
}

impl From<Vec<u8>> for Blob {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_serialize_is_identity() {
        let blob = Blob::new(b"hello world".to_vec());
        assert_eq!(&*blob.serialize(), b"hello world");
        assert!(matches!(blob.serialize(), Cow::Borrowed(_)));
    }

    #[test]
    fn blob_deserialize_is_identity() {
        let blob = Blob::deserialize(vec![0, 1, 2, 255]).unwrap();
        assert_eq!(blob.data(), &[0, 1, 2, 255]);
        assert_eq!(blob.into_data(), vec![0, 1, 2, 255]);
    }

    #[test]
    fn blob_kind() {
        assert_eq!(Blob::KIND, "blob");
        assert_eq!(Blob::default().kind(), "blob");
    }
}
