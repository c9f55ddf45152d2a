//! Shared utilities (hex formatting and dump output).

pub mod hex;
