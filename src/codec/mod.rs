//! Object codec: serializable values to printable text and back.
//!
//! Values are serialized to CBOR, wrapped in a small versioned envelope,
//! and base64-encoded so the result can be stored next to ordinary string
//! values:
//!
//! ```text
//! base64( version:u8 | checksum:u32 LE | name-len:u16 LE | type name | CBOR payload )
//! ```
//!
//! The checksum (crc32) covers every byte after itself. The type name
//! recorded at encode time must match the type requested at decode time;
//! a mismatch is an error, not a best-effort coercion. Cyclic value graphs
//! are out of scope: serde traverses values as trees.

mod error;

pub use error::{DecodeError, EncodeError};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Current envelope version.
const ENVELOPE_VERSION: u8 = 1;

/// Bytes before the checksummed body: version + checksum.
const BODY_OFFSET: usize = 5;

/// Encode a serializable value as self-contained printable text.
///
/// The output is standard base64 with padding and is deterministic for
/// values whose `Serialize` impl is deterministic.
pub fn encode<T: Serialize>(value: &T) -> Result<String, EncodeError> {
    let name = std::any::type_name::<T>();
    let name_len = u16::try_from(name.len())
        .map_err(|_| EncodeError::Serialize(format!("type name too long: {}", name.len())))?;

    let mut body = Vec::with_capacity(name.len() + 32);
    body.extend_from_slice(&name_len.to_le_bytes());
    body.extend_from_slice(name.as_bytes());
    ciborium::into_writer(value, &mut body).map_err(|e| EncodeError::Serialize(e.to_string()))?;

    let mut raw = Vec::with_capacity(body.len() + BODY_OFFSET);
    raw.push(ENVELOPE_VERSION);
    raw.extend_from_slice(&crc32fast::hash(&body).to_le_bytes());
    raw.extend_from_slice(&body);

    Ok(STANDARD.encode(raw))
}

/// Decode text produced by [`encode`] back into a value of type `T`.
///
/// Validation order: base64, envelope version, checksum, recorded type
/// name against `T`, CBOR payload. Each failure maps to a distinct
/// [`DecodeError`] variant; arbitrary input never panics.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, DecodeError> {
    let raw = STANDARD.decode(text)?;

    let version = *raw.first().ok_or(DecodeError::Truncated(0))?;
    if version != ENVELOPE_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let stored_checksum = raw
        .get(1..BODY_OFFSET)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or(DecodeError::Truncated(raw.len()))?;

    let body = raw.get(BODY_OFFSET..).ok_or(DecodeError::Truncated(raw.len()))?;
    let computed = crc32fast::hash(body);
    if stored_checksum != computed {
        return Err(DecodeError::Corrupted {
            stored: stored_checksum,
            computed,
        });
    }

    let name_len = body
        .get(..2)
        .and_then(|b| b.try_into().ok())
        .map(u16::from_le_bytes)
        .ok_or(DecodeError::Truncated(raw.len()))? as usize;

    let name_bytes = body
        .get(2..2 + name_len)
        .ok_or(DecodeError::Truncated(raw.len()))?;
    let stored_name = std::str::from_utf8(name_bytes)
        .map_err(|_| DecodeError::Deserialize("type name is not valid UTF-8".to_string()))?;

    let requested = std::any::type_name::<T>();
    if stored_name != requested {
        return Err(DecodeError::TypeMismatch {
            stored: stored_name.to_string(),
            requested: requested.to_string(),
        });
    }

    let payload = body
        .get(2 + name_len..)
        .ok_or(DecodeError::Truncated(raw.len()))?;
    ciborium::from_reader(payload).map_err(|e| DecodeError::Deserialize(e.to_string()))
}
