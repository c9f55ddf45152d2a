use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "ipd")]
#[command(about = "BlackBerry IPD backup file decoding toolkit")]
#[command(version)]
pub struct Cli {
    /// Control colored output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Write output to a file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

/// Text encoding for database names and string fields.
#[derive(Clone, Copy, ValueEnum)]
pub enum EncodingArg {
    /// Single-byte Latin-1-compatible decoding (default)
    Latin1,
    /// UTF-8
    Utf8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode an IPD file and display a database/record summary
    Parse {
        /// Path to IPD backup file
        #[arg(short, long)]
        file: String,

        /// Display per-record detail, not just counts
        #[arg(short, long)]
        verbose: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Text encoding for names and string fields
        #[arg(long, default_value = "latin1")]
        encoding: EncodingArg,

        /// Fail on undecodable text instead of substituting
        #[arg(long)]
        strict: bool,
    },

    /// Emit the full decoded tree as JSON
    Export {
        /// Paths to IPD backup files (decoded in parallel when several)
        #[arg(short, long, required = true, num_args = 1..)]
        file: Vec<String>,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Text encoding for names and string fields
        #[arg(long, default_value = "latin1")]
        encoding: EncodingArg,

        /// Fail on undecodable text instead of substituting
        #[arg(long)]
        strict: bool,

        /// Emit whatever decoded before a structural fault (marked partial)
        #[arg(long)]
        keep_partial: bool,
    },

    /// Hex dump of raw file bytes
    Dump {
        /// Path to IPD backup file
        #[arg(short, long)]
        file: String,

        /// Byte offset to start from (default: 0)
        #[arg(long)]
        offset: Option<u64>,

        /// Number of bytes to dump (default: 256)
        #[arg(short, long)]
        length: Option<usize>,

        /// Write raw bytes instead of a formatted dump
        #[arg(long)]
        raw: bool,
    },
}
