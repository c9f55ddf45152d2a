//! CLI subcommand implementations for the `ipd` binary.
//!
//! CLI argument parsing uses clap derive macros, with the top-level
//! [`app::Cli`] struct and [`app::Commands`] enum defined in [`app`]. Each
//! subcommand module follows the same pattern: an `Options` struct holding
//! the parsed arguments and a `pub fn execute(opts, writer) -> Result<(),
//! IpdError>` entry point. The `writer: &mut dyn Write` parameter allows
//! output to be captured in tests or redirected to a file via the global
//! `--output` flag.
//!
//! # Subcommands
//!
//! | Command | Module | Purpose |
//! |---------|--------|---------|
//! | `ipd parse` | [`parse`] | Decode a file and show a per-database record summary |
//! | `ipd export` | [`export`] | Emit the full decoded tree as JSON, parallel over many files |
//! | `ipd dump` | [`dump`] | Hex dump of raw file bytes at an offset |
//!
//! # Common patterns
//!
//! - **`--json`** — `parse` supports structured JSON output via
//!   `#[derive(Serialize)]` structs and `serde_json`.
//! - **`--encoding` / `--strict`** — select Latin-1 or UTF-8 text decoding
//!   and whether undecodable bytes abort the run.
//! - **`--color`** (global) — control colored terminal output (`auto`,
//!   `always`, `never`).
//! - **`--output` / `-o`** (global) — redirect output to a file.
//!
//! Input files are memory-mapped so large backups do not get copied into
//! the process just to be walked once; Ctrl-C is wired to the decoder's
//! cooperative cancellation flag so long runs abort cleanly. The
//! `wprintln!` macro wraps `writeln!` to convert `io::Error` into
//! `IpdError`.

pub mod app;
pub mod dump;
pub mod export;
pub mod parse;

/// Write a line to the given writer, converting io::Error to IpdError.
macro_rules! wprintln {
    ($w:expr) => {
        writeln!($w).map_err(|e| $crate::IpdError::Io(e.to_string()))
    };
    ($w:expr, $($arg:tt)*) => {
        writeln!($w, $($arg)*).map_err(|e| $crate::IpdError::Io(e.to_string()))
    };
}

pub(crate) use wprintln;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::ipd::decoder::DecodeOptions;
use crate::ipd::text::{DecodePolicy, StringEncoding, StringOptions};
use crate::IpdError;

/// A loaded input file: either memory-mapped or read into memory.
///
/// Mapping keeps large backups backed by the OS page cache instead of a
/// heap copy; the plain read path exists for filesystems where `mmap(2)`
/// fails (and for stdin-substitute paths like `/dev/fd/*`).
pub(crate) enum InputBuffer {
    Mapped(memmap2::Mmap),
    Owned(Vec<u8>),
}

impl InputBuffer {
    pub(crate) fn bytes(&self) -> &[u8] {
        match self {
            InputBuffer::Mapped(m) => m,
            InputBuffer::Owned(v) => v,
        }
    }
}

/// Open `path`, preferring a read-only memory map.
///
/// # Safety considerations
///
/// The map is only sound if no other process truncates the file while it
/// is held; IPD files are offline backups, not live data, so this is safe
/// in practice.
pub(crate) fn load_input(path: &str) -> Result<InputBuffer, IpdError> {
    let file = std::fs::File::open(path)
        .map_err(|e| IpdError::Io(format!("Cannot open {}: {}", path, e)))?;
    match unsafe { memmap2::Mmap::map(&file) } {
        Ok(mmap) => Ok(InputBuffer::Mapped(mmap)),
        Err(_) => std::fs::read(path)
            .map(InputBuffer::Owned)
            .map_err(|e| IpdError::Io(format!("Cannot read {}: {}", path, e))),
    }
}

/// Build [`DecodeOptions`] from the shared CLI flags.
pub(crate) fn decode_options(
    encoding: app::EncodingArg,
    strict: bool,
    cancel: Option<Arc<AtomicBool>>,
) -> DecodeOptions {
    DecodeOptions {
        strings: StringOptions {
            encoding: match encoding {
                app::EncodingArg::Latin1 => StringEncoding::Latin1,
                app::EncodingArg::Utf8 => StringEncoding::Utf8,
            },
            policy: if strict {
                DecodePolicy::Strict
            } else {
                DecodePolicy::Lossy
            },
        },
        cancel,
        ..DecodeOptions::default()
    }
}

/// Install a Ctrl-C handler that flips the decoder's cancellation flag.
///
/// Only one handler can exist per process; a failed install leaves the
/// decode uncancellable rather than aborting the run.
pub(crate) fn cancel_on_ctrlc() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let f = flag.clone();
    let _ = ctrlc::set_handler(move || {
        f.store(true, std::sync::atomic::Ordering::SeqCst);
    });
    flag
}
