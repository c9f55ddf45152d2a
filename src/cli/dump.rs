use std::io::Write;

use crate::cli::{load_input, wprintln};
use crate::util::hex::hex_dump;
use crate::IpdError;

/// Options for the dump subcommand.
pub struct DumpOptions {
    pub file: String,
    pub offset: Option<u64>,
    pub length: Option<usize>,
    pub raw: bool,
}

/// Hex dump of raw IPD file bytes at an offset.
///
/// Useful for eyeballing the framing around an offset reported by a decode
/// failure. With `--raw` the selected bytes are written verbatim instead of
/// formatted.
pub fn execute(opts: &DumpOptions, writer: &mut dyn Write) -> Result<(), IpdError> {
    let input = load_input(&opts.file)?;
    let data = input.bytes();

    let start = opts.offset.unwrap_or(0) as usize;
    if start >= data.len() {
        return Err(IpdError::Io(format!(
            "Offset {} is past the end of {} ({} bytes)",
            start,
            opts.file,
            data.len()
        )));
    }

    let length = opts.length.unwrap_or(256);
    let end = (start + length).min(data.len());
    let slice = &data[start..end];

    if opts.raw {
        writer
            .write_all(slice)
            .map_err(|e| IpdError::Io(format!("Cannot write output: {}", e)))?;
    } else {
        wprintln!(
            writer,
            "Hex dump of {} at offset {} ({} bytes):",
            opts.file,
            start,
            slice.len()
        )?;
        wprintln!(writer)?;
        wprintln!(writer, "{}", hex_dump(slice, start as u64))?;
    }

    Ok(())
}
