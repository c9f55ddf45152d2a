//! Record framing and field accumulation.
//!
//! A record is framed as a `u16` LE database index, a `u32` LE record
//! length, a `u8` database version, a `u16` LE handle, and a `u32`
//! big-endian unique id. The declared length counts the seven bytes of
//! version + handle + unique id plus every field byte that follows; fields
//! are decoded until the consumed total meets it exactly. Overrunning it is
//! [`IpdError::RecordLengthMismatch`] and fatal, since record framing
//! desynchronization cannot be locally recovered.

use std::collections::BTreeMap;

use crate::ipd::constants::RECORD_CONTENT_PREFIX;
use crate::ipd::cursor::Cursor;
use crate::ipd::field::{decode_field, TypeTable};
use crate::ipd::model::Record;
use crate::ipd::text::StringOptions;
use crate::IpdError;

/// Decode one record at the cursor position.
///
/// Returns the directory index of the owning database alongside the
/// record. `database_count` is the directory size; an index at or beyond
/// it fails with [`IpdError::UnknownDatabaseIndex`].
///
/// A record whose declared length is exactly the seven framing bytes is
/// valid and carries an empty field map. A field id declared twice within
/// one record keeps the later occurrence (last write wins).
pub fn decode_record(
    cursor: &mut Cursor<'_>,
    database_count: usize,
    table: &TypeTable,
    strings: &StringOptions,
) -> Result<(u16, Record), IpdError> {
    let record_start = cursor.position();

    let db_index = cursor.read_u16_le()?;
    if db_index as usize >= database_count {
        return Err(IpdError::UnknownDatabaseIndex {
            index: db_index,
            count: database_count,
            offset: record_start,
        });
    }

    let declared = cursor.read_u32_le()?;
    if declared < RECORD_CONTENT_PREFIX {
        return Err(IpdError::RecordLengthMismatch {
            declared,
            consumed: RECORD_CONTENT_PREFIX,
            offset: record_start,
        });
    }

    let db_version = cursor.read_u8()?;
    let handle = cursor.read_u16_le()?;
    let unique_id = cursor.read_u32_be()?;

    let mut fields = BTreeMap::new();
    let mut consumed = RECORD_CONTENT_PREFIX;
    while consumed < declared {
        let field = decode_field(cursor, table, strings)?;
        consumed += field.consumed;
        if consumed > declared {
            return Err(IpdError::RecordLengthMismatch {
                declared,
                consumed,
                offset: record_start,
            });
        }
        fields.insert(field.field_id, field.value);
    }

    Ok((
        db_index,
        Record {
            unique_id,
            handle,
            db_version,
            fields,
        },
    ))
}
