//! Database directory walk.
//!
//! Directly after the header, the file declares a big-endian `u16` count of
//! databases, a mandatory null separator, and then one length-prefixed name
//! per database. The walk produces the ordered [`Database`] shells that
//! records later address by index. Running out of bytes anywhere inside the
//! directory is re-raised as [`IpdError::DirectoryCorrupt`] so the failure
//! carries directory context instead of a bare end-of-stream.

use crate::ipd::constants::DIRECTORY_SEPARATOR;
use crate::ipd::cursor::Cursor;
use crate::ipd::model::Database;
use crate::ipd::text::{decode_string, StringOptions};
use crate::IpdError;

/// Read the directory and build empty database shells in declared order.
pub fn walk_directory(
    cursor: &mut Cursor<'_>,
    strings: &StringOptions,
) -> Result<Vec<Database>, IpdError> {
    let count = cursor
        .read_u16_be()
        .map_err(|e| corrupt(e, "database count"))?;

    let separator_offset = cursor.position();
    let separator = cursor
        .read_u8()
        .map_err(|e| corrupt(e, "null separator"))?;
    if separator != DIRECTORY_SEPARATOR {
        return Err(IpdError::DirectoryCorrupt {
            offset: separator_offset,
            detail: format!("expected null separator, found 0x{:02x}", separator),
        });
    }

    let mut databases = Vec::with_capacity(count as usize);
    for index in 0..count {
        let name_length = cursor
            .read_u16_le()
            .map_err(|e| corrupt_entry(e, index, count))?;
        let name_offset = cursor.position();
        let name_bytes = cursor
            .read_bytes(name_length as usize)
            .map_err(|e| corrupt_entry(e, index, count))?;
        let name = decode_string(name_bytes, strings, name_offset)?;
        databases.push(Database::new(name));
    }

    Ok(databases)
}

fn corrupt(err: IpdError, what: &str) -> IpdError {
    match err {
        IpdError::UnexpectedEndOfStream { offset } => IpdError::DirectoryCorrupt {
            offset,
            detail: format!("stream ended reading {}", what),
        },
        other => other,
    }
}

fn corrupt_entry(err: IpdError, index: u16, count: u16) -> IpdError {
    match err {
        IpdError::UnexpectedEndOfStream { offset } => IpdError::DirectoryCorrupt {
            offset,
            detail: format!("stream ended in name {} of {}", index, count),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{ByteOrder, LittleEndian};

    fn make_directory(names: &[&[u8]]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(names.len() as u16).to_be_bytes());
        buf.push(0x00);
        for name in names {
            let mut len = [0u8; 2];
            LittleEndian::write_u16(&mut len, name.len() as u16);
            buf.extend_from_slice(&len);
            buf.extend_from_slice(name);
        }
        buf
    }

    #[test]
    fn test_walk_names_in_order() {
        let bytes = make_directory(&[b"Address Book\x00", b"SMS Messages\x00", b"Memos\x00"]);
        let mut cur = Cursor::new(&bytes);
        let dbs = walk_directory(&mut cur, &StringOptions::default()).unwrap();
        let names: Vec<&str> = dbs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Address Book", "SMS Messages", "Memos"]);
        assert!(dbs.iter().all(|d| d.records.is_empty()));
        assert!(cur.is_exhausted());
    }

    #[test]
    fn test_zero_databases() {
        let bytes = make_directory(&[]);
        let mut cur = Cursor::new(&bytes);
        let dbs = walk_directory(&mut cur, &StringOptions::default()).unwrap();
        assert!(dbs.is_empty());
    }

    #[test]
    fn test_duplicate_names_allowed() {
        let bytes = make_directory(&[b"Tasks", b"Tasks"]);
        let mut cur = Cursor::new(&bytes);
        let dbs = walk_directory(&mut cur, &StringOptions::default()).unwrap();
        assert_eq!(dbs.len(), 2);
        assert_eq!(dbs[0].name, dbs[1].name);
    }

    #[test]
    fn test_missing_separator() {
        let bytes = [0x00, 0x01, 0xFF];
        let mut cur = Cursor::new(&bytes);
        let err = walk_directory(&mut cur, &StringOptions::default()).unwrap_err();
        assert_eq!(
            err,
            IpdError::DirectoryCorrupt {
                offset: 2,
                detail: "expected null separator, found 0xff".to_string()
            }
        );
    }

    #[test]
    fn test_count_overruns_buffer() {
        // Declares 5 databases but only one name follows.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&5u16.to_be_bytes());
        bytes.push(0x00);
        bytes.extend_from_slice(&[0x02, 0x00]);
        bytes.extend_from_slice(b"ok");
        let mut cur = Cursor::new(&bytes);
        let err = walk_directory(&mut cur, &StringOptions::default()).unwrap_err();
        assert!(matches!(err, IpdError::DirectoryCorrupt { .. }));
    }

    #[test]
    fn test_truncated_name_bytes() {
        // Name declares 10 bytes, only 3 present.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.push(0x00);
        bytes.extend_from_slice(&[0x0A, 0x00]);
        bytes.extend_from_slice(b"abc");
        let mut cur = Cursor::new(&bytes);
        let err = walk_directory(&mut cur, &StringOptions::default()).unwrap_err();
        assert!(matches!(err, IpdError::DirectoryCorrupt { .. }));
    }
}
