#[cfg(not(feature = "cli"))]
compile_error!("The `ipd` binary requires the `cli` feature. Build with `--features cli`.");

use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::process;

use ipd::cli;
use ipd::cli::app::{Cli, ColorMode, Commands};
use ipd::IpdError;

fn main() {
    let cli = Cli::parse();

    match cli.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {} // colored auto-detects tty
    }

    let writer_result: Result<Box<dyn Write>, IpdError> = match &cli.output {
        Some(path) => File::create(path)
            .map(|f| Box::new(f) as Box<dyn Write>)
            .map_err(|e| IpdError::Io(format!("Cannot create {}: {}", path, e))),
        None => Ok(Box::new(std::io::stdout()) as Box<dyn Write>),
    };

    let mut writer = match writer_result {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Parse {
            file,
            verbose,
            json,
            encoding,
            strict,
        } => cli::parse::execute(
            &cli::parse::ParseOptions {
                file,
                verbose,
                json,
                encoding,
                strict,
            },
            &mut writer,
        ),

        Commands::Export {
            file,
            pretty,
            encoding,
            strict,
            keep_partial,
        } => cli::export::execute(
            &cli::export::ExportOptions {
                files: file,
                pretty,
                encoding,
                strict,
                keep_partial,
            },
            &mut writer,
        ),

        Commands::Dump {
            file,
            offset,
            length,
            raw,
        } => cli::dump::execute(
            &cli::dump::DumpOptions {
                file,
                offset,
                length,
                raw,
            },
            &mut writer,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
