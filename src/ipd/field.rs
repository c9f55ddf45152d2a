//! Field-level tagged value decoding.
//!
//! Each field is framed as a `u16` length (covering the type tag, field id,
//! and payload), a one-byte type tag, a one-byte field id, and the payload.
//! The declared length is authoritative: the cursor always advances by
//! exactly that many payload bytes, whatever the tag, so one malformed or
//! future-version field can never desynchronize the fields after it.
//!
//! Tag dispatch goes through a [`TypeTable`]. Tags outside the table — and
//! fixed-width tags whose payload length does not match the expected
//! width — decode to [`FieldValue::Unknown`] carrying the untouched payload
//! bytes. That fallback is what keeps the decoder forward-compatible with
//! format revisions it does not fully understand; it is never an error.
//!
//! # Built-in tags
//!
//! | Tag | Kind | Payload |
//! |-----|------|---------|
//! | 1 | `Boolean` | 1 byte, nonzero = true |
//! | 2 | `Byte` | 1 byte |
//! | 3 | `Word` | 2 bytes LE |
//! | 4 | `DWord` | 4 bytes LE |
//! | 5 | `QWord` | 8 bytes LE |
//! | 6 | `String` | text per [`StringOptions`], trailing NUL stripped |
//! | 7 | `Bytes` | raw payload |

use std::collections::BTreeMap;

use byteorder::{ByteOrder, LittleEndian};
use serde::{Serialize, Serializer};

use crate::ipd::constants::*;
use crate::ipd::cursor::Cursor;
use crate::ipd::text::{decode_string, StringOptions};
use crate::IpdError;

/// A decoded field payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldValue {
    /// One byte, nonzero = true.
    Boolean(bool),
    /// Unsigned 8-bit value.
    Byte(u8),
    /// Unsigned 16-bit value (little-endian payload).
    Word(u16),
    /// Unsigned 32-bit value (little-endian payload).
    DWord(u32),
    /// Unsigned 64-bit value (little-endian payload).
    QWord(u64),
    /// Decoded text.
    Str(String),
    /// Raw payload bytes, hex-encoded in JSON output.
    Bytes(#[serde(serialize_with = "hex_bytes")] Vec<u8>),
    /// Any tag outside the type table, payload preserved byte-for-byte.
    Unknown {
        type_tag: u8,
        #[serde(serialize_with = "hex_bytes")]
        data: Vec<u8>,
    },
}

fn hex_bytes<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&crate::util::hex::format_bytes(bytes))
}

/// How a known tag's payload is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Boolean,
    Byte,
    Word,
    DWord,
    QWord,
    String,
    Bytes,
}

impl FieldKind {
    /// Required payload width in bytes, or `None` for variable-length kinds.
    fn fixed_width(self) -> Option<usize> {
        match self {
            FieldKind::Boolean | FieldKind::Byte => Some(1),
            FieldKind::Word => Some(2),
            FieldKind::DWord => Some(4),
            FieldKind::QWord => Some(8),
            FieldKind::String | FieldKind::Bytes => None,
        }
    }
}

/// The type-tag → decoder mapping.
///
/// Defaults to the built-in table above. Callers holding the authoritative
/// format document can override or extend individual tags without forking
/// the decoder.
#[derive(Debug, Clone)]
pub struct TypeTable {
    entries: BTreeMap<u8, FieldKind>,
}

impl Default for TypeTable {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(TAG_BOOLEAN, FieldKind::Boolean);
        entries.insert(TAG_BYTE, FieldKind::Byte);
        entries.insert(TAG_WORD, FieldKind::Word);
        entries.insert(TAG_DWORD, FieldKind::DWord);
        entries.insert(TAG_QWORD, FieldKind::QWord);
        entries.insert(TAG_STRING, FieldKind::String);
        entries.insert(TAG_BYTES, FieldKind::Bytes);
        TypeTable { entries }
    }
}

impl TypeTable {
    /// A table with no known tags: every field decodes as `Unknown`.
    pub fn empty() -> Self {
        TypeTable {
            entries: BTreeMap::new(),
        }
    }

    /// Map `tag` to `kind`, replacing any existing mapping.
    pub fn set(&mut self, tag: u8, kind: FieldKind) -> &mut Self {
        self.entries.insert(tag, kind);
        self
    }

    /// Remove `tag` so it decodes as `Unknown`.
    pub fn unset(&mut self, tag: u8) -> &mut Self {
        self.entries.remove(&tag);
        self
    }

    /// Look up the decoder kind for `tag`.
    pub fn lookup(&self, tag: u8) -> Option<FieldKind> {
        self.entries.get(&tag).copied()
    }
}

/// One field as read from the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    /// Field id from the framing.
    pub field_id: u8,
    /// Decoded payload.
    pub value: FieldValue,
    /// Total bytes this field occupied in the stream, length prefix
    /// included. The record decoder sums these against the declared
    /// record length.
    pub consumed: u32,
}

/// Decode one field at the cursor position.
///
/// Fails with [`IpdError::FieldLengthInconsistent`] when the declared
/// length cannot even hold the tag and id, since no skip distance can be
/// computed from it. Every other shape of payload decodes to *some*
/// [`FieldValue`].
pub fn decode_field(
    cursor: &mut Cursor<'_>,
    table: &TypeTable,
    strings: &StringOptions,
) -> Result<DecodedField, IpdError> {
    let field_start = cursor.position();
    let length = cursor.read_u16_le()?;
    if length < FIELD_FIXED_HEADER {
        return Err(IpdError::FieldLengthInconsistent {
            length,
            minimum: FIELD_FIXED_HEADER,
            offset: field_start,
        });
    }

    let type_tag = cursor.read_u8()?;
    let field_id = cursor.read_u8()?;
    let payload_offset = cursor.position();
    let payload = cursor.read_bytes((length - FIELD_FIXED_HEADER) as usize)?;

    let value = interpret(type_tag, payload, table, strings, payload_offset)?;

    Ok(DecodedField {
        field_id,
        value,
        consumed: FIELD_LENGTH_PREFIX + length as u32,
    })
}

/// Interpret `payload` under `tag`. The cursor has already consumed the
/// declared length, so nothing here can move it.
fn interpret(
    tag: u8,
    payload: &[u8],
    table: &TypeTable,
    strings: &StringOptions,
    payload_offset: u64,
) -> Result<FieldValue, IpdError> {
    let Some(kind) = table.lookup(tag) else {
        return Ok(FieldValue::Unknown {
            type_tag: tag,
            data: payload.to_vec(),
        });
    };

    // A fixed-width tag with the wrong payload length falls back to
    // Unknown rather than truncating or zero-extending the value.
    if let Some(width) = kind.fixed_width() {
        if payload.len() != width {
            return Ok(FieldValue::Unknown {
                type_tag: tag,
                data: payload.to_vec(),
            });
        }
    }

    Ok(match kind {
        FieldKind::Boolean => FieldValue::Boolean(payload[0] != 0),
        FieldKind::Byte => FieldValue::Byte(payload[0]),
        FieldKind::Word => FieldValue::Word(LittleEndian::read_u16(payload)),
        FieldKind::DWord => FieldValue::DWord(LittleEndian::read_u32(payload)),
        FieldKind::QWord => FieldValue::QWord(LittleEndian::read_u64(payload)),
        FieldKind::String => FieldValue::Str(decode_string(payload, strings, payload_offset)?),
        FieldKind::Bytes => FieldValue::Bytes(payload.to_vec()),
    })
}
