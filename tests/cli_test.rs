//! CLI-level tests: each subcommand's `execute` run against real files on
//! disk, with output captured through the writer parameter.

#![cfg(feature = "cli")]

use std::io::Write;

use byteorder::{ByteOrder, LittleEndian};
use tempfile::NamedTempFile;

use ipd::cli::app::EncodingArg;
use ipd::cli::{dump, export, parse};
use ipd::ipd::constants::*;

fn sample_ipd() -> Vec<u8> {
    let mut buf = IPD_MAGIC.to_vec();
    buf.push(IPD_MAGIC_TERMINATOR);
    buf.push(IPD_VERSION);
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.push(0x00);
    let name = b"Address Book\x00";
    let mut len = [0u8; 2];
    LittleEndian::write_u16(&mut len, name.len() as u16);
    buf.extend_from_slice(&len);
    buf.extend_from_slice(name);

    // One record: uid 7, one string field.
    let field_payload = b"Jane Doe\x00";
    buf.extend_from_slice(&0u16.to_le_bytes());
    buf.extend_from_slice(&((7 + 2 + 2 + field_payload.len()) as u32).to_le_bytes());
    buf.push(1);
    buf.extend_from_slice(&5u16.to_le_bytes());
    buf.extend_from_slice(&7u32.to_be_bytes());
    buf.extend_from_slice(&((2 + field_payload.len()) as u16).to_le_bytes());
    buf.push(TAG_STRING);
    buf.push(1);
    buf.extend_from_slice(field_payload);
    buf
}

fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(bytes).unwrap();
    f.flush().unwrap();
    f
}

#[test]
fn test_parse_summary_output() {
    let file = write_temp(&sample_ipd());
    let mut out: Vec<u8> = Vec::new();
    parse::execute(
        &parse::ParseOptions {
            file: file.path().to_string_lossy().into_owned(),
            verbose: true,
            json: false,
            encoding: EncodingArg::Latin1,
            strict: false,
        },
        &mut out,
    )
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("1 databases, 1 records"));
    assert!(text.contains("Address Book"));
    assert!(text.contains("uid"));
}

#[test]
fn test_parse_json_output() {
    let file = write_temp(&sample_ipd());
    let mut out: Vec<u8> = Vec::new();
    parse::execute(
        &parse::ParseOptions {
            file: file.path().to_string_lossy().into_owned(),
            verbose: false,
            json: true,
            encoding: EncodingArg::Latin1,
            strict: false,
        },
        &mut out,
    )
    .unwrap();

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["database_count"], 1);
    assert_eq!(json["databases"][0]["name"], "Address Book");
    assert_eq!(json["databases"][0]["record_count"], 1);
}

#[test]
fn test_export_full_tree() {
    let file = write_temp(&sample_ipd());
    let mut out: Vec<u8> = Vec::new();
    export::execute(
        &export::ExportOptions {
            files: vec![file.path().to_string_lossy().into_owned()],
            pretty: false,
            encoding: EncodingArg::Latin1,
            strict: false,
            keep_partial: false,
        },
        &mut out,
    )
    .unwrap();

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["partial"], false);
    assert_eq!(json["databases"][0]["name"], "Address Book");
    assert_eq!(
        json["databases"][0]["records"][0]["fields"]["1"],
        serde_json::json!({ "Str": "Jane Doe" })
    );
}

#[test]
fn test_export_keep_partial_marks_truncated_file() {
    let bytes = sample_ipd();
    let truncated = &bytes[..bytes.len() - 4];
    let file = write_temp(truncated);
    let mut out: Vec<u8> = Vec::new();
    export::execute(
        &export::ExportOptions {
            files: vec![file.path().to_string_lossy().into_owned()],
            pretty: false,
            encoding: EncodingArg::Latin1,
            strict: false,
            keep_partial: true,
        },
        &mut out,
    )
    .unwrap();

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["partial"], true);
    assert!(json["error"].as_str().unwrap().contains("end of stream"));
    // The database shell decoded before the fault is still present.
    assert_eq!(json["databases"][0]["name"], "Address Book");
    assert_eq!(json["databases"][0]["records"], serde_json::json!([]));
}

#[test]
fn test_export_multiple_files_keeps_argument_order() {
    let a = write_temp(&sample_ipd());
    let b = write_temp(&sample_ipd());
    let mut out: Vec<u8> = Vec::new();
    export::execute(
        &export::ExportOptions {
            files: vec![
                a.path().to_string_lossy().into_owned(),
                b.path().to_string_lossy().into_owned(),
            ],
            pretty: false,
            encoding: EncodingArg::Latin1,
            strict: false,
            keep_partial: false,
        },
        &mut out,
    )
    .unwrap();

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["file"], a.path().to_string_lossy().into_owned());
    assert_eq!(arr[1]["file"], b.path().to_string_lossy().into_owned());
}

#[test]
fn test_dump_formats_magic_bytes() {
    let file = write_temp(&sample_ipd());
    let mut out: Vec<u8> = Vec::new();
    dump::execute(
        &dump::DumpOptions {
            file: file.path().to_string_lossy().into_owned(),
            offset: None,
            length: Some(16),
            raw: false,
        },
        &mut out,
    )
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("00000000"));
    assert!(text.contains("|Inter@ctive Page|"));
}

#[test]
fn test_dump_raw_roundtrips_bytes() {
    let bytes = sample_ipd();
    let file = write_temp(&bytes);
    let mut out: Vec<u8> = Vec::new();
    dump::execute(
        &dump::DumpOptions {
            file: file.path().to_string_lossy().into_owned(),
            offset: Some(0),
            length: Some(bytes.len()),
            raw: true,
        },
        &mut out,
    )
    .unwrap();
    assert_eq!(out, bytes);
}

#[test]
fn test_dump_offset_past_end_fails() {
    let file = write_temp(&sample_ipd());
    let mut out: Vec<u8> = Vec::new();
    let err = dump::execute(
        &dump::DumpOptions {
            file: file.path().to_string_lossy().into_owned(),
            offset: Some(1 << 20),
            length: None,
            raw: false,
        },
        &mut out,
    )
    .unwrap_err();
    assert!(matches!(err, ipd::IpdError::Io(_)));
}
