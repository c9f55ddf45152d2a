//! BlackBerry IPD backup file decoding toolkit.
//!
//! The `ipd-utils` crate (library name `ipd`) provides Rust types and
//! functions for decoding BlackBerry IPD backup containers
//! (`Inter@ctive Pager Backup/Restore File`) into a fully structured,
//! introspectable in-memory tree of databases, records, and tagged fields.
//!
//! # CLI Reference
//!
//! Install the `ipd` binary and use its subcommands to work with IPD files
//! from the command line.
//!
//! ## Subcommands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | [`ipd parse`](cli::app::Commands::Parse) | Decode a file and display a database/record summary |
//! | [`ipd export`](cli::app::Commands::Export) | Emit the full decoded tree as JSON (one or more files) |
//! | [`ipd dump`](cli::app::Commands::Dump) | Hex dump of raw file bytes |
//!
//! All subcommands accept `--color <auto|always|never>` and `--output <file>`.
//!
//! # Library API
//!
//! Add `ipd` as a dependency to use the decoder directly:
//!
//! ```toml
//! [dependencies]
//! ipd = { package = "ipd-utils", version = "0.3", default-features = false }
//! ```
//!
//! ## Quick example
//!
//! ```
//! use ipd::ipd::decoder::{decode, DecodeOptions};
//!
//! // A valid but empty container: header plus a zero-database directory.
//! let mut buf = Vec::new();
//! buf.extend_from_slice(b"Inter@ctive Pager Backup/Restore File");
//! buf.push(0x0A); // line feed
//! buf.push(2);    // version
//! buf.extend_from_slice(&[0x00, 0x00]); // database count (big-endian)
//! buf.push(0x00); // separator
//!
//! let container = decode(&buf, &DecodeOptions::default()).unwrap();
//! assert!(container.databases.is_empty());
//! ```
//!
//! ## Key entry points
//!
//! | Type / Function | Purpose |
//! |-----------------|---------|
//! | [`decode`](ipd::decoder::decode) | Decode one byte buffer into a [`Container`](ipd::model::Container) |
//! | [`DecodeOptions`](ipd::decoder::DecodeOptions) | String encoding, type-tag table, cancellation |
//! | [`Container`](ipd::model::Container) | Decoded tree: databases → records → fields |
//! | [`FieldValue`](ipd::field::FieldValue) | Typed field payloads, including the `Unknown` fallback |
//! | [`DecodeFailure`](ipd::decoder::DecodeFailure) | Error + offset + whatever decoded before the fault |
//!
//! ## Module overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`ipd::cursor`] | Bounds-checked sequential reads over the input buffer |
//! | [`ipd::text`] | Latin-1 / UTF-8 string decoding with strict or lossy policy |
//! | [`ipd::header`] | Magic and version validation |
//! | [`ipd::directory`] | Database directory walk |
//! | [`ipd::field`] | Tagged field decoding and the type-tag table |
//! | [`ipd::record`] | Record framing and field accumulation |
//! | [`ipd::decoder`] | Top-level single-pass assembler |
//! | [`ipd::model`] | The decoded container tree |
//! | [`ipd::constants`] | IPD framing constants |
//!
//! ## Feature flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | on | Builds the `ipd` binary (clap, colored, rayon, memmap2, ctrlc). |

#[cfg(feature = "cli")]
pub mod cli;
pub mod ipd;
pub mod util;

use thiserror::Error;

/// Errors returned by `ipd` operations.
///
/// Every decoding variant carries the byte offset at which the fault was
/// detected. All of them are fatal to the decode pass in which they occur;
/// the format carries no redundancy to retry against. Unknown field type
/// tags are deliberately NOT an error (they decode to
/// [`FieldValue::Unknown`](ipd::field::FieldValue::Unknown)).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IpdError {
    /// A read needed more bytes than remain in the buffer.
    #[error("unexpected end of stream at offset {offset}")]
    UnexpectedEndOfStream { offset: u64 },

    /// The file does not start with the IPD magic signature.
    #[error("invalid magic at offset {offset}: not an IPD file")]
    InvalidMagic { offset: u64 },

    /// The header version byte is not a version this decoder understands.
    #[error("unsupported IPD version {version} at offset {offset}")]
    UnsupportedVersion { version: u8, offset: u64 },

    /// The database directory ended before its declared count of names.
    #[error("database directory corrupt at offset {offset}: {detail}")]
    DirectoryCorrupt { offset: u64, detail: String },

    /// A record referenced a database index outside the directory.
    #[error("record at offset {offset} references unknown database index {index} (directory has {count})")]
    UnknownDatabaseIndex { index: u16, count: usize, offset: u64 },

    /// A field declared a length smaller than its fixed header, so no valid
    /// skip distance exists.
    #[error("field at offset {offset} declares length {length}, below the {minimum}-byte minimum")]
    FieldLengthInconsistent { length: u16, minimum: u16, offset: u64 },

    /// Field framing overran the record's declared length, or the declared
    /// length cannot hold the record's own framing.
    #[error("record length mismatch at offset {offset}: declared {declared}, consumed {consumed}")]
    RecordLengthMismatch { declared: u32, consumed: u32, offset: u64 },

    /// Text bytes were rejected by the configured encoding under the
    /// `strict` decoding policy.
    #[error("string at offset {offset} is not valid {encoding}")]
    StringDecodeError { encoding: &'static str, offset: u64 },

    /// The decode was aborted through the cooperative cancellation flag.
    #[error("decode cancelled at offset {offset}")]
    Cancelled { offset: u64 },

    /// An I/O error occurred (file open, read, or write failure).
    #[error("I/O error: {0}")]
    Io(String),
}

impl IpdError {
    /// The byte offset at which a decoding error was detected, if any.
    pub fn offset(&self) -> Option<u64> {
        match self {
            IpdError::UnexpectedEndOfStream { offset }
            | IpdError::InvalidMagic { offset }
            | IpdError::UnsupportedVersion { offset, .. }
            | IpdError::DirectoryCorrupt { offset, .. }
            | IpdError::UnknownDatabaseIndex { offset, .. }
            | IpdError::FieldLengthInconsistent { offset, .. }
            | IpdError::RecordLengthMismatch { offset, .. }
            | IpdError::StringDecodeError { offset, .. }
            | IpdError::Cancelled { offset } => Some(*offset),
            IpdError::Io(_) => None,
        }
    }
}
