//! Tagged binary encoding for preference values.
//!
//! Every stored value is `version:u8 | tag:u8 | payload`, little-endian
//! lengths throughout. Set entries are written in `BTreeSet` order, so
//! encoding a given value always produces the same bytes.

use std::collections::BTreeSet;

use super::error::StoreError;
use super::types::PrefValue;

/// Current wire format version.
const FORMAT_VERSION: u8 = 1;

// One tag byte per value kind.
const TAG_BOOL: u8 = 1;
const TAG_INT: u8 = 2;
const TAG_FLOAT: u8 = 3;
const TAG_LONG: u8 = 4;
const TAG_TEXT: u8 = 5;
const TAG_TEXT_SET: u8 = 6;
const TAG_OBJECT: u8 = 7;

/// Encode a value to its stored byte form.
pub(crate) fn encode_value(value: &PrefValue) -> Vec<u8> {
    let mut out = Vec::with_capacity(16);
    out.push(FORMAT_VERSION);
    match value {
        PrefValue::Bool(v) => {
            out.push(TAG_BOOL);
            out.push(u8::from(*v));
        }
        PrefValue::Int(v) => {
            out.push(TAG_INT);
            out.extend_from_slice(&v.to_le_bytes());
        }
        PrefValue::Float(v) => {
            out.push(TAG_FLOAT);
            out.extend_from_slice(&v.to_le_bytes());
        }
        PrefValue::Long(v) => {
            out.push(TAG_LONG);
            out.extend_from_slice(&v.to_le_bytes());
        }
        PrefValue::Text(text) => {
            out.push(TAG_TEXT);
            put_str(&mut out, text);
        }
        PrefValue::TextSet(set) => {
            out.push(TAG_TEXT_SET);
            out.extend_from_slice(&(set.len() as u32).to_le_bytes());
            for entry in set {
                put_str(&mut out, entry);
            }
        }
        PrefValue::Object(text) => {
            out.push(TAG_OBJECT);
            put_str(&mut out, text);
        }
    }
    out
}

/// Decode a stored byte form back into a value.
///
/// Rejects unknown versions and tags, truncated input, trailing bytes,
/// and invalid UTF-8 in strings.
pub(crate) fn decode_value(buffer: &[u8]) -> Result<PrefValue, StoreError> {
    let mut reader = Reader::new(buffer);

    let version = reader.byte()?;
    if version != FORMAT_VERSION {
        return Err(StoreError::InvalidFormat(format!(
            "Unsupported value format version: {}",
            version
        )));
    }

    let tag = reader.byte()?;
    let value = match tag {
        TAG_BOOL => match reader.byte()? {
            0 => PrefValue::Bool(false),
            1 => PrefValue::Bool(true),
            other => {
                return Err(StoreError::InvalidFormat(format!(
                    "Invalid bool byte: {}",
                    other
                )));
            }
        },
        TAG_INT => PrefValue::Int(i32::from_le_bytes(reader.array()?)),
        TAG_FLOAT => PrefValue::Float(f64::from_le_bytes(reader.array()?)),
        TAG_LONG => PrefValue::Long(i64::from_le_bytes(reader.array()?)),
        TAG_TEXT => PrefValue::Text(reader.string()?),
        TAG_TEXT_SET => {
            let count = u32::from_le_bytes(reader.array()?);
            let mut set = BTreeSet::new();
            for _ in 0..count {
                set.insert(reader.string()?);
            }
            PrefValue::TextSet(set)
        }
        TAG_OBJECT => PrefValue::Object(reader.string()?),
        other => {
            return Err(StoreError::InvalidFormat(format!(
                "Unknown value tag: {}",
                other
            )));
        }
    };

    if !reader.is_empty() {
        return Err(StoreError::InvalidFormat(format!(
            "Trailing bytes after value: {}",
            reader.remaining()
        )));
    }

    Ok(value)
}

fn put_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as u32).to_le_bytes());
    out.extend_from_slice(s.as_bytes());
}

/// Cursor over a stored byte form. Reads return errors instead of panicking.
struct Reader<'a> {
    buffer: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], StoreError> {
        let end = self
            .pos
            .checked_add(len)
            .ok_or_else(|| self.too_small(usize::MAX))?;
        let slice = self
            .buffer
            .get(self.pos..end)
            .ok_or_else(|| self.too_small(end))?;
        self.pos = end;
        Ok(slice)
    }

    fn byte(&mut self) -> Result<u8, StoreError> {
        let byte = *self
            .buffer
            .get(self.pos)
            .ok_or_else(|| self.too_small(self.pos + 1))?;
        self.pos += 1;
        Ok(byte)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], StoreError> {
        self.take(N)?
            .try_into()
            .map_err(|_| self.too_small(self.pos))
    }

    fn string(&mut self) -> Result<String, StoreError> {
        let len = u32::from_le_bytes(self.array()?) as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| StoreError::InvalidFormat("String is not valid UTF-8".to_string()))
    }

    fn is_empty(&self) -> bool {
        self.pos == self.buffer.len()
    }

    fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.pos)
    }

    fn too_small(&self, needed: usize) -> StoreError {
        StoreError::InvalidFormat(format!(
            "Value truncated: need {} bytes, have {}",
            needed,
            self.buffer.len()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: PrefValue) {
        let encoded = encode_value(&value);
        let decoded = decode_value(&encoded).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn test_roundtrip_scalars() {
        roundtrip(PrefValue::Bool(true));
        roundtrip(PrefValue::Bool(false));
        roundtrip(PrefValue::Int(i32::MIN));
        roundtrip(PrefValue::Int(0));
        roundtrip(PrefValue::Long(i64::MAX));
        roundtrip(PrefValue::Float(-0.5));
    }

    #[test]
    fn test_roundtrip_text() {
        roundtrip(PrefValue::Text(String::new()));
        roundtrip(PrefValue::Text("hello".to_string()));
        roundtrip(PrefValue::Text("日本語".to_string()));
    }

    #[test]
    fn test_roundtrip_text_set() {
        roundtrip(PrefValue::TextSet(BTreeSet::new()));
        let set: BTreeSet<String> = ["b", "a", "c"].iter().map(|s| s.to_string()).collect();
        roundtrip(PrefValue::TextSet(set));
    }

    #[test]
    fn test_roundtrip_object_text() {
        roundtrip(PrefValue::Object("AQIDBA==".to_string()));
    }

    #[test]
    fn test_nan_preserves_bits() {
        let encoded = encode_value(&PrefValue::Float(f64::NAN));
        match decode_value(&encoded).unwrap() {
            PrefValue::Float(v) => assert_eq!(v.to_bits(), f64::NAN.to_bits()),
            other => panic!("expected float, got {:?}", other),
        }
    }

    #[test]
    fn test_set_encoding_ignores_insertion_order() {
        let forward: BTreeSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        let reverse: BTreeSet<String> = ["b", "a"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            encode_value(&PrefValue::TextSet(forward)),
            encode_value(&PrefValue::TextSet(reverse))
        );
    }

    #[test]
    fn test_unknown_version() {
        let result = decode_value(&[99, TAG_BOOL, 1]);
        assert!(matches!(result, Err(StoreError::InvalidFormat(_))));
    }

    #[test]
    fn test_unknown_tag() {
        let result = decode_value(&[FORMAT_VERSION, 200, 0]);
        assert!(matches!(result, Err(StoreError::InvalidFormat(_))));
    }

    #[test]
    fn test_truncated_input() {
        let mut encoded = encode_value(&PrefValue::Text("hello".to_string()));
        encoded.truncate(encoded.len() - 1);
        assert!(matches!(
            decode_value(&encoded),
            Err(StoreError::InvalidFormat(_))
        ));
        assert!(matches!(
            decode_value(&[]),
            Err(StoreError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut encoded = encode_value(&PrefValue::Bool(true));
        encoded.push(0);
        assert!(matches!(
            decode_value(&encoded),
            Err(StoreError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut encoded = vec![FORMAT_VERSION, TAG_TEXT];
        encoded.extend_from_slice(&2u32.to_le_bytes());
        encoded.extend_from_slice(&[0xff, 0xfe]);
        assert!(matches!(
            decode_value(&encoded),
            Err(StoreError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_invalid_bool_byte() {
        let result = decode_value(&[FORMAT_VERSION, TAG_BOOL, 7]);
        assert!(matches!(result, Err(StoreError::InvalidFormat(_))));
    }
}
