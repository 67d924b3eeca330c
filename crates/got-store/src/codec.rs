//! Object record encoding.
//!
//! Wire format:
//! ```text
//! <kind-tag> 0x20 <payload-length as ASCII decimal> 0x00 <payload bytes>
//! ```
//!
//! The record is both the hash input and (compressed) the on-disk content.
//! The length has no sign, no padding and no leading zeros, and nothing may
//! follow the payload.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Read};

use crate::error::FormatError;
use crate::object::{Blob, Object};

/// Longest kind tag accepted by the decoder.
pub const MAX_TAG_LEN: usize = 32;

/// Digits in `u64::MAX`.
const MAX_LEN_DIGITS: usize = 20;

/// Upper bound on the buffer reserved up front from an untrusted length.
const PREALLOC_LIMIT: u64 = 64 * 1024;

/// A decoded record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectRecord {
    /// Registered tag of the payload kind.
    pub kind: &'static str,
    pub payload: Vec<u8>,
}

impl ObjectRecord {
    /// Re-encode into canonical bytes.
    pub fn encode(&self) -> Vec<u8> {
        encode(self.kind, &self.payload)
    }
}

/// Encode `payload` as a record of kind `kind`.
///
/// ```
/// assert_eq!(got_store::encode("blob", b"hello\n"), b"blob 6\0hello\n");
/// ```
pub fn encode(kind: &str, payload: &[u8]) -> Vec<u8> {
    let len = payload.len().to_string();
    let mut out = Vec::with_capacity(kind.len() + len.len() + 2 + payload.len());
    out.extend_from_slice(kind.as_bytes());
    out.push(b' ');
    out.extend_from_slice(len.as_bytes());
    out.push(0);
    out.extend_from_slice(payload);
    out
}

/// Decode one record from `reader`, consuming it to the end.
///
/// The reader is consumed front to back and never seeked, so it may be a
/// decompression stream.
pub fn decode<R: BufRead>(
    mut reader: R,
    registry: &KindRegistry,
) -> Result<ObjectRecord, FormatError> {
    let tag = read_field(&mut reader, b' ', MAX_TAG_LEN, "kind tag")?;
    let codec = std::str::from_utf8(&tag)
        .ok()
        .and_then(|t| registry.get(t))
        .ok_or_else(|| FormatError::UnknownKind {
            tag: String::from_utf8_lossy(&tag).into_owned(),
        })?;

    let raw_len = read_field(&mut reader, 0, MAX_LEN_DIGITS, "payload length")?;
    let declared = parse_length(&raw_len)?;

    let mut payload = Vec::with_capacity(declared.min(PREALLOC_LIMIT) as usize);
    let got = reader
        .by_ref()
        .take(declared)
        .read_to_end(&mut payload)
        .map_err(stream_error)? as u64;
    if got < declared {
        return Err(FormatError::LengthMismatch {
            declared,
            actual: got,
        });
    }
    let trailing = io::copy(&mut reader, &mut io::sink()).map_err(stream_error)?;
    if trailing > 0 {
        return Err(FormatError::LengthMismatch {
            declared,
            actual: declared + trailing,
        });
    }

    (codec.check)(&payload)?;
    Ok(ObjectRecord {
        kind: codec.tag,
        payload,
    })
}

/// Read up to and excluding `delim`, failing if more than `limit` bytes come
/// first or the stream ends.
fn read_field<R: BufRead>(
    reader: &mut R,
    delim: u8,
    limit: usize,
    what: &str,
) -> Result<Vec<u8>, FormatError> {
    let mut buf = Vec::new();
    reader
        .by_ref()
        .take(limit as u64 + 1)
        .read_until(delim, &mut buf)
        .map_err(stream_error)?;
    if buf.last() == Some(&delim) {
        buf.pop();
        return Ok(buf);
    }
    if buf.len() > limit {
        Err(FormatError::MalformedHeader(format!(
            "{what} longer than {limit} bytes"
        )))
    } else {
        Err(FormatError::MalformedHeader(format!(
            "record ends inside {what}"
        )))
    }
}

fn parse_length(raw: &[u8]) -> Result<u64, FormatError> {
    let malformed = || FormatError::MalformedLength {
        raw: String::from_utf8_lossy(raw).into_owned(),
    };
    let canonical = !raw.is_empty()
        && raw.iter().all(u8::is_ascii_digit)
        && (raw.len() == 1 || raw[0] != b'0');
    if !canonical {
        return Err(malformed());
    }
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(malformed)
}

fn stream_error(e: io::Error) -> FormatError {
    FormatError::Stream(e.to_string())
}

// ---------------------------------------------------------------------------
// KindRegistry
// ---------------------------------------------------------------------------

/// Registry entry: a kind tag and the payload check taken from its
/// [`Object`] implementation.
#[derive(Clone, Copy, Debug)]
pub struct KindCodec {
    pub tag: &'static str,
    check: fn(&[u8]) -> Result<(), FormatError>,
}

/// The set of kinds a store accepts.
///
/// The default registry knows only [`Blob`]. Structured kinds are added with
/// [`register`](Self::register); the codec and stores need no other change.
#[derive(Clone, Debug)]
pub struct KindRegistry {
    kinds: BTreeMap<&'static str, KindCodec>,
}

impl KindRegistry {
    /// A registry with no kinds.
    pub fn empty() -> Self {
        Self {
            kinds: BTreeMap::new(),
        }
    }

    /// Register `T`. Re-registering a tag replaces the previous entry.
    ///
    /// # Panics
    ///
    /// If `T::KIND` is empty, longer than [`MAX_TAG_LEN`], or contains a
    /// space, NUL or non-ASCII byte.
    pub fn register<T: Object>(&mut self) -> &mut Self {
        assert!(valid_tag(T::KIND), "invalid kind tag {:?}", T::KIND);
        self.kinds.insert(
            T::KIND,
            KindCodec {
                tag: T::KIND,
                check: T::validate,
            },
        );
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<T: Object>(mut self) -> Self {
        self.register::<T>();
        self
    }

    pub fn get(&self, tag: &str) -> Option<&KindCodec> {
        self.kinds.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.kinds.contains_key(tag)
    }

    /// Registered tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.kinds.keys().copied()
    }

    /// Encode after checking that `kind` is registered and accepts `payload`.
    pub fn encode(&self, kind: &str, payload: &[u8]) -> Result<Vec<u8>, FormatError> {
        let codec = self.get(kind).ok_or_else(|| FormatError::UnknownKind {
            tag: kind.to_string(),
        })?;
        (codec.check)(payload)?;
        Ok(encode(codec.tag, payload))
    }

    /// Decode against this registry.
    pub fn decode<R: BufRead>(&self, reader: R) -> Result<ObjectRecord, FormatError> {
        decode(reader, self)
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::empty().with::<Blob>()
    }
}

fn valid_tag(tag: &str) -> bool {
    !tag.is_empty() && tag.len() <= MAX_TAG_LEN && tag.bytes().all(|b| b.is_ascii_graphic())
}
