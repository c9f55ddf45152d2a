//! Top-level single-pass assembler.
//!
//! [`decode`] drives the whole pipeline over one borrowed buffer: header
//! validation, the directory walk, then record decoding until the stream is
//! exactly exhausted. Control flow is strictly linear — the format has no
//! index, no checksums, and no resynchronization markers, so every record's
//! start offset is discoverable only by having fully consumed every byte
//! before it. The assembler never scans forward for a plausible next record
//! boundary; on the first structural fault it stops and reports the error,
//! the byte offset, and whatever was fully decoded before it.
//!
//! Decoding independent buffers is embarrassingly parallel: no state is
//! shared between invocations (the CLI's multi-file export leans on that).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ipd::cursor::Cursor;
use crate::ipd::directory::walk_directory;
use crate::ipd::field::TypeTable;
use crate::ipd::header::validate_header;
use crate::ipd::model::Container;
use crate::ipd::record::decode_record;
use crate::ipd::text::StringOptions;
use crate::IpdError;

/// Decode configuration.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Text encoding and strict/lossy policy for names and string fields.
    pub strings: StringOptions,
    /// Type-tag dispatch table.
    pub type_table: TypeTable,
    /// Cooperative cancellation flag, polled between records only.
    pub cancel: Option<Arc<AtomicBool>>,
    /// Poll the cancellation flag every this many records (0 behaves as 1).
    pub cancel_check_interval: usize,
}

/// A failed decode pass.
///
/// Carries the partially built container so a caller may, at its own risk,
/// keep the databases and records that were fully decoded before the
/// fault. The partial result is never returned as a success.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{error}")]
pub struct DecodeFailure {
    /// The fault that aborted the pass.
    pub error: IpdError,
    /// Byte offset at which the fault was detected.
    pub offset: u64,
    /// Everything fully decoded before the fault.
    pub partial: Container,
}

/// Decode one IPD byte buffer into a [`Container`].
///
/// The buffer must be fully resident; streaming a file in is the caller's
/// concern. The pass is synchronous and CPU-bound with no suspension
/// points, and touches no shared state.
pub fn decode(data: &[u8], opts: &DecodeOptions) -> Result<Container, DecodeFailure> {
    let mut cursor = Cursor::new(data);
    let mut container = Container::default();
    match run(&mut cursor, opts, &mut container) {
        Ok(()) => Ok(container),
        Err(error) => Err(DecodeFailure {
            offset: error.offset().unwrap_or_else(|| cursor.position()),
            error,
            partial: container,
        }),
    }
}

fn run(
    cursor: &mut Cursor<'_>,
    opts: &DecodeOptions,
    container: &mut Container,
) -> Result<(), IpdError> {
    validate_header(cursor)?;
    container.databases = walk_directory(cursor, &opts.strings)?;

    let database_count = container.databases.len();
    let interval = opts.cancel_check_interval.max(1);
    let mut records_decoded: usize = 0;

    while !cursor.is_exhausted() {
        // Polled between records only, never between fields.
        if records_decoded > 0 && records_decoded % interval == 0 {
            if let Some(flag) = &opts.cancel {
                if flag.load(Ordering::SeqCst) {
                    return Err(IpdError::Cancelled {
                        offset: cursor.position(),
                    });
                }
            }
        }

        let (db_index, record) =
            decode_record(cursor, database_count, &opts.type_table, &opts.strings)?;
        container.databases[db_index as usize].records.push(record);
        records_decoded += 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipd::constants::*;
    use crate::ipd::field::FieldValue;

    fn header() -> Vec<u8> {
        let mut buf = IPD_MAGIC.to_vec();
        buf.push(IPD_MAGIC_TERMINATOR);
        buf.push(IPD_VERSION);
        buf
    }

    fn directory(names: &[&str]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(names.len() as u16).to_be_bytes());
        buf.push(0x00);
        for name in names {
            buf.extend_from_slice(&(name.len() as u16).to_le_bytes());
            buf.extend_from_slice(name.as_bytes());
        }
        buf
    }

    fn field(tag: u8, id: u8, payload: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&((payload.len() + 2) as u16).to_le_bytes());
        buf.push(tag);
        buf.push(id);
        buf.extend_from_slice(payload);
        buf
    }

    fn record(db_index: u16, unique_id: u32, fields: &[Vec<u8>]) -> Vec<u8> {
        let field_len: usize = fields.iter().map(|f| f.len()).sum();
        let mut buf = Vec::new();
        buf.extend_from_slice(&db_index.to_le_bytes());
        buf.extend_from_slice(&((7 + field_len) as u32).to_le_bytes());
        buf.push(1);
        buf.extend_from_slice(&0u16.to_le_bytes());
        buf.extend_from_slice(&unique_id.to_be_bytes());
        for f in fields {
            buf.extend_from_slice(f);
        }
        buf
    }

    #[test]
    fn test_empty_container() {
        let mut buf = header();
        buf.extend_from_slice(&directory(&[]));
        let container = decode(&buf, &DecodeOptions::default()).unwrap();
        assert!(container.databases.is_empty());
        assert_eq!(container.record_count(), 0);
    }

    #[test]
    fn test_address_book_scenario() {
        let mut buf = header();
        buf.extend_from_slice(&directory(&["AddressBook"]));
        buf.extend_from_slice(&record(
            0,
            7,
            &[
                field(TAG_STRING, 1, b"Jane Doe"),
                field(TAG_DWORD, 2, &[0x2A, 0x00, 0x00, 0x00]),
            ],
        ));

        let container = decode(&buf, &DecodeOptions::default()).unwrap();
        assert_eq!(container.databases.len(), 1);
        let db = &container.databases[0];
        assert_eq!(db.name, "AddressBook");
        assert_eq!(db.records.len(), 1);
        let rec = &db.records[0];
        assert_eq!(rec.unique_id, 7);
        assert_eq!(rec.fields[&1], FieldValue::Str("Jane Doe".to_string()));
        assert_eq!(rec.fields[&2], FieldValue::DWord(42));
    }

    #[test]
    fn test_records_append_in_decode_order() {
        let mut buf = header();
        buf.extend_from_slice(&directory(&["A", "B"]));
        buf.extend_from_slice(&record(1, 10, &[]));
        buf.extend_from_slice(&record(0, 20, &[]));
        buf.extend_from_slice(&record(1, 30, &[]));

        let container = decode(&buf, &DecodeOptions::default()).unwrap();
        assert_eq!(container.databases[0].records[0].unique_id, 20);
        let b_ids: Vec<u32> = container.databases[1]
            .records
            .iter()
            .map(|r| r.unique_id)
            .collect();
        assert_eq!(b_ids, [10, 30]);
    }

    #[test]
    fn test_failure_carries_partial_container_and_offset() {
        let mut buf = header();
        buf.extend_from_slice(&directory(&["Memos"]));
        buf.extend_from_slice(&record(0, 1, &[]));
        let bad_record_offset = buf.len() as u64;
        // Second record addresses a database that does not exist.
        buf.extend_from_slice(&record(9, 2, &[]));

        let failure = decode(&buf, &DecodeOptions::default()).unwrap_err();
        assert_eq!(
            failure.error,
            IpdError::UnknownDatabaseIndex {
                index: 9,
                count: 1,
                offset: bad_record_offset
            }
        );
        assert_eq!(failure.offset, bad_record_offset);
        // The first record survived into the partial container.
        assert_eq!(failure.partial.databases[0].records.len(), 1);
        assert_eq!(failure.partial.databases[0].records[0].unique_id, 1);
    }

    #[test]
    fn test_trailing_garbage_fails() {
        let mut buf = header();
        buf.extend_from_slice(&directory(&["Memos"]));
        buf.extend_from_slice(&record(0, 1, &[]));
        buf.extend_from_slice(&[0x00, 0x00, 0x01]); // not a full record frame

        let failure = decode(&buf, &DecodeOptions::default()).unwrap_err();
        assert!(matches!(
            failure.error,
            IpdError::UnexpectedEndOfStream { .. }
        ));
    }

    #[test]
    fn test_cancellation_between_records() {
        let mut buf = header();
        buf.extend_from_slice(&directory(&["A"]));
        buf.extend_from_slice(&record(0, 1, &[]));
        buf.extend_from_slice(&record(0, 2, &[]));

        let flag = Arc::new(AtomicBool::new(true));
        let opts = DecodeOptions {
            cancel: Some(flag),
            ..DecodeOptions::default()
        };
        let failure = decode(&buf, &opts).unwrap_err();
        assert!(matches!(failure.error, IpdError::Cancelled { .. }));
        // Cancellation releases partial results, it never returns them as
        // a successful decode. The check fires between records, so the
        // first record made it in.
        assert_eq!(failure.partial.databases[0].records.len(), 1);
    }

    #[test]
    fn test_cancel_interval_defers_the_check() {
        let mut buf = header();
        buf.extend_from_slice(&directory(&["A"]));
        for uid in 0..5 {
            buf.extend_from_slice(&record(0, uid, &[]));
        }

        let flag = Arc::new(AtomicBool::new(true));
        let opts = DecodeOptions {
            cancel: Some(flag),
            cancel_check_interval: 3,
            ..DecodeOptions::default()
        };
        let failure = decode(&buf, &opts).unwrap_err();
        assert!(matches!(failure.error, IpdError::Cancelled { .. }));
        assert_eq!(failure.partial.databases[0].records.len(), 3);
    }
}
