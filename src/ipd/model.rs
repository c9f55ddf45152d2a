//! The decoded container tree.
//!
//! A [`Container`] holds databases in directory order; each [`Database`]
//! holds its records in decode order; each [`Record`] maps field ids to
//! decoded [`FieldValue`]s. The whole tree derives `Serialize` so the CLI
//! can emit it as JSON without re-interpreting anything.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ipd::field::FieldValue;

/// The fully decoded result of one IPD file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Container {
    /// Databases in the order the directory declared them. Names are not
    /// required to be unique; records address databases by index.
    pub databases: Vec<Database>,
}

impl Container {
    /// Total number of records across all databases.
    pub fn record_count(&self) -> usize {
        self.databases.iter().map(|db| db.records.len()).sum()
    }
}

/// One named database within the container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Database {
    /// Database name from the directory, trailing NULs stripped.
    pub name: String,
    /// Records in decode order.
    pub records: Vec<Record>,
}

impl Database {
    /// An empty shell for a directory entry; the assembler appends records.
    pub fn new(name: String) -> Self {
        Database {
            name,
            records: Vec::new(),
        }
    }
}

/// One record within a database.
///
/// Field ids are unique within the map. When the byte stream declares the
/// same field id twice in one record, the later occurrence overwrites the
/// earlier one; this matches how every known IPD consumer treats the
/// format and is covered by tests rather than silently assumed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Unique record id (stored big-endian in the file).
    pub unique_id: u32,
    /// Record handle from the framing.
    pub handle: u16,
    /// Database version byte from the framing.
    pub db_version: u8,
    /// Decoded fields keyed by field id.
    pub fields: BTreeMap<u8, FieldValue>,
}
