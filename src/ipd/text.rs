//! Text decoding for database names and string fields.
//!
//! IPD predates UTF-8 ubiquity; real files carry single-byte Latin-1 text,
//! so the default decoder is `WINDOWS_1252` (the Latin-1-compatible web
//! encoding). UTF-8 can be selected for files produced by later tooling.
//! Under the default `lossy` policy malformed bytes become replacement
//! characters; under `strict` they fail the decode with
//! [`IpdError::StringDecodeError`].

use encoding_rs::Encoding;
use serde::Serialize;

use crate::IpdError;

/// Text encoding used for names and string payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StringEncoding {
    /// Single-byte Latin-1-compatible decoding (WINDOWS_1252). Default.
    Latin1,
    /// UTF-8.
    Utf8,
}

impl StringEncoding {
    fn encoding(self) -> &'static Encoding {
        match self {
            StringEncoding::Latin1 => encoding_rs::WINDOWS_1252,
            StringEncoding::Utf8 => encoding_rs::UTF_8,
        }
    }

    /// Human-readable encoding name for error messages.
    pub fn name(self) -> &'static str {
        self.encoding().name()
    }
}

/// Behavior on bytes the configured encoding rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DecodePolicy {
    /// Substitute replacement characters. Default.
    Lossy,
    /// Fail the decode pass.
    Strict,
}

/// String decoding configuration.
#[derive(Debug, Clone, Copy)]
pub struct StringOptions {
    pub encoding: StringEncoding,
    pub policy: DecodePolicy,
}

impl Default for StringOptions {
    fn default() -> Self {
        StringOptions {
            encoding: StringEncoding::Latin1,
            policy: DecodePolicy::Lossy,
        }
    }
}

/// Decode `bytes` under `opts`, reporting `offset` on strict-mode failure.
///
/// Trailing NUL bytes are stripped first: IPD stores names and string
/// payloads NUL-terminated inside their declared lengths.
pub fn decode_string(bytes: &[u8], opts: &StringOptions, offset: u64) -> Result<String, IpdError> {
    let trimmed = strip_trailing_nuls(bytes);
    let encoding = opts.encoding.encoding();
    let (decoded, _, had_errors) = encoding.decode(trimmed);
    if had_errors && opts.policy == DecodePolicy::Strict {
        return Err(IpdError::StringDecodeError {
            encoding: encoding.name(),
            offset,
        });
    }
    Ok(decoded.into_owned())
}

/// Strip trailing NUL terminators without touching interior bytes.
fn strip_trailing_nuls(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
    &bytes[..end]
}
