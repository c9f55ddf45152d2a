use std::io::Write;

use rayon::prelude::*;

use crate::cli::{cancel_on_ctrlc, decode_options, load_input, wprintln};
use crate::cli::app::EncodingArg;
use crate::ipd::decoder::{decode, DecodeOptions};
use crate::ipd::model::Database;
use crate::util::hex::format_offset;
use crate::IpdError;

/// Options for the export subcommand.
pub struct ExportOptions {
    pub files: Vec<String>,
    pub pretty: bool,
    pub encoding: EncodingArg,
    pub strict: bool,
    pub keep_partial: bool,
}

/// One exported file in the JSON output.
#[derive(serde::Serialize)]
struct ExportJson {
    file: String,
    databases: Vec<Database>,
    /// True when a structural fault cut the decode short and
    /// `--keep-partial` salvaged what came before it.
    partial: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_offset: Option<u64>,
}

/// Emit the full decoded tree of one or more IPD files as JSON.
///
/// Every field value is rendered, including `Unknown` payloads
/// (hex-encoded, tag preserved); nothing is re-interpreted or dropped.
/// Multiple files decode in parallel — each decode owns its cursor and
/// container, so containers are independent work units. Output order
/// follows the argument order regardless of completion order.
///
/// Without `--keep-partial` the first failing file aborts the run; with it,
/// failing files are emitted with whatever decoded before the fault,
/// explicitly marked `"partial": true`.
pub fn execute(opts: &ExportOptions, writer: &mut dyn Write) -> Result<(), IpdError> {
    let decode_opts = decode_options(opts.encoding, opts.strict, Some(cancel_on_ctrlc()));

    let results: Vec<Result<ExportJson, IpdError>> = opts
        .files
        .par_iter()
        .map(|file| export_one(file, &decode_opts, opts.keep_partial))
        .collect();

    let mut exports = Vec::with_capacity(results.len());
    for result in results {
        exports.push(result?);
    }

    let json = if opts.pretty {
        match exports.as_slice() {
            [single] => serde_json::to_string_pretty(single),
            _ => serde_json::to_string_pretty(&exports),
        }
    } else {
        match exports.as_slice() {
            [single] => serde_json::to_string(single),
            _ => serde_json::to_string(&exports),
        }
    }
    .map_err(|e| IpdError::Io(format!("Cannot serialize export: {}", e)))?;

    wprintln!(writer, "{}", json)?;
    Ok(())
}

fn export_one(
    file: &str,
    decode_opts: &DecodeOptions,
    keep_partial: bool,
) -> Result<ExportJson, IpdError> {
    let input = load_input(file)?;
    match decode(input.bytes(), decode_opts) {
        Ok(container) => Ok(ExportJson {
            file: file.to_string(),
            databases: container.databases,
            partial: false,
            error: None,
            error_offset: None,
        }),
        Err(failure) if keep_partial => Ok(ExportJson {
            file: file.to_string(),
            databases: failure.partial.databases,
            partial: true,
            error: Some(failure.error.to_string()),
            error_offset: Some(failure.offset),
        }),
        Err(failure) => {
            eprintln!(
                "{}: decode failed at offset {}: {}",
                file,
                format_offset(failure.offset),
                failure.error
            );
            Err(failure.error)
        }
    }
}
