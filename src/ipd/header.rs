//! IPD file header validation.
//!
//! Every IPD file opens with the 37-byte ASCII magic
//! `Inter@ctive Pager Backup/Restore File`, a mandatory line-feed byte, and
//! a one-byte format version. Header validation is fatal on failure; there
//! is no partial-header recovery.

use serde::Serialize;

use crate::ipd::constants::*;
use crate::ipd::cursor::Cursor;
use crate::IpdError;

/// Validated IPD file header.
#[derive(Debug, Clone, Serialize)]
pub struct Header {
    /// Format version byte (currently always 2).
    pub version: u8,
}

/// Consume and validate the header at the start of the stream.
///
/// Fails with [`IpdError::InvalidMagic`] when the signature or its
/// terminating line feed is wrong and [`IpdError::UnsupportedVersion`] for
/// any version byte other than [`IPD_VERSION`].
pub fn validate_header(cursor: &mut Cursor<'_>) -> Result<Header, IpdError> {
    let start = cursor.position();
    let magic = cursor.read_bytes(IPD_MAGIC.len())?;
    if magic != IPD_MAGIC {
        return Err(IpdError::InvalidMagic { offset: start });
    }

    let terminator_offset = cursor.position();
    if cursor.read_u8()? != IPD_MAGIC_TERMINATOR {
        return Err(IpdError::InvalidMagic {
            offset: terminator_offset,
        });
    }

    let version_offset = cursor.position();
    let version = cursor.read_u8()?;
    if version != IPD_VERSION {
        return Err(IpdError::UnsupportedVersion {
            version,
            offset: version_offset,
        });
    }

    Ok(Header { version })
}
