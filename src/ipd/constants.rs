//! IPD file structure constants.
//!
//! Offsets and sizes for the framing layers of an IPD container: the fixed
//! file header, the database directory, record framing, and field framing.
//! All multi-byte integers in the format are little-endian except the
//! database count in the header and the record unique id, which are
//! big-endian.

/// The 37-byte ASCII magic at the start of every IPD file.
pub const IPD_MAGIC: &[u8] = b"Inter@ctive Pager Backup/Restore File";

/// Mandatory line-feed byte immediately after the magic.
pub const IPD_MAGIC_TERMINATOR: u8 = 0x0A;

/// The only IPD format version this decoder understands.
pub const IPD_VERSION: u8 = 2;

/// Mandatory null separator byte after the database count.
pub const DIRECTORY_SEPARATOR: u8 = 0x00;

/// Bytes of record framing counted inside the declared record length:
/// database version (1) + record handle (2) + unique id (4).
pub const RECORD_CONTENT_PREFIX: u32 = 7;

/// Bytes of field framing covered by the declared field length before the
/// payload begins: type tag (1) + field id (1).
pub const FIELD_FIXED_HEADER: u16 = 2;

/// Bytes occupied by a field's length prefix, which the declared field
/// length does NOT cover.
pub const FIELD_LENGTH_PREFIX: u32 = 2;

// Built-in type tags. The referenced format document was never published,
// so these are this crate's convention; see TypeTable for overriding them.
pub const TAG_BOOLEAN: u8 = 1;
pub const TAG_BYTE: u8 = 2;
pub const TAG_WORD: u8 = 3;
pub const TAG_DWORD: u8 = 4;
pub const TAG_QWORD: u8 = 5;
pub const TAG_STRING: u8 = 6;
pub const TAG_BYTES: u8 = 7;
