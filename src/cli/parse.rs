use std::io::Write;

use colored::Colorize;

use crate::cli::{cancel_on_ctrlc, decode_options, load_input, wprintln};
use crate::cli::app::EncodingArg;
use crate::ipd::decoder::decode;
use crate::ipd::model::Container;
use crate::util::hex::format_offset;
use crate::IpdError;

/// Options for the parse subcommand.
pub struct ParseOptions {
    pub file: String,
    pub verbose: bool,
    pub json: bool,
    pub encoding: EncodingArg,
    pub strict: bool,
}

/// JSON-serializable per-database summary.
#[derive(serde::Serialize)]
struct DatabaseJson {
    name: String,
    record_count: usize,
}

#[derive(serde::Serialize)]
struct SummaryJson {
    file: String,
    database_count: usize,
    record_count: usize,
    databases: Vec<DatabaseJson>,
}

/// Decode an IPD file and display a database/record summary.
///
/// Decodes the whole file up front, then prints one line per database with
/// its record count. With `--verbose` each record is listed with its unique
/// id, handle, and field count. With `--json` the same summary is emitted
/// as a machine-readable document. A structural fault aborts the run and
/// reports the byte offset at which it was detected.
pub fn execute(opts: &ParseOptions, writer: &mut dyn Write) -> Result<(), IpdError> {
    let input = load_input(&opts.file)?;
    let decode_opts = decode_options(opts.encoding, opts.strict, Some(cancel_on_ctrlc()));

    let container = decode(input.bytes(), &decode_opts).map_err(|failure| {
        eprintln!(
            "decode failed at offset {}: {}",
            format_offset(failure.offset),
            failure.error
        );
        failure.error
    })?;

    if opts.json {
        return write_json(&opts.file, &container, writer);
    }

    wprintln!(
        writer,
        "{} {}",
        "File:".bold(),
        opts.file
    )?;
    wprintln!(
        writer,
        "{} databases, {} records",
        container.databases.len(),
        container.record_count()
    )?;
    wprintln!(writer)?;

    for (index, db) in container.databases.iter().enumerate() {
        wprintln!(
            writer,
            "[{:3}] {} ({} records)",
            index,
            db.name.cyan(),
            db.records.len()
        )?;
        if opts.verbose {
            for rec in &db.records {
                wprintln!(
                    writer,
                    "      uid {:10} handle {:5} version {:3} fields {}",
                    rec.unique_id,
                    rec.handle,
                    rec.db_version,
                    rec.fields.len()
                )?;
            }
        }
    }

    Ok(())
}

fn write_json(file: &str, container: &Container, writer: &mut dyn Write) -> Result<(), IpdError> {
    let summary = SummaryJson {
        file: file.to_string(),
        database_count: container.databases.len(),
        record_count: container.record_count(),
        databases: container
            .databases
            .iter()
            .map(|db| DatabaseJson {
                name: db.name.clone(),
                record_count: db.records.len(),
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&summary)
        .map_err(|e| IpdError::Io(format!("Cannot serialize summary: {}", e)))?;
    wprintln!(writer, "{}", json)?;
    Ok(())
}
