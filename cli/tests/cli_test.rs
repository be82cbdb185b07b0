//! Tests running the hpcreport binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn hpcreport(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hpcreport"))
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_text_from_content_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("local.md"),
        "# Local Cluster\r\n\r\n**64** nodes\r\n- one\r\n",
    )
    .unwrap();
    let out = dir.path().join("local.txt");

    let output = hpcreport(&[
        "text",
        "local.md",
        "--content-dir",
        path_arg(dir.path()),
        "-o",
        path_arg(&out),
    ]);

    assert!(output.status.success(), "{:?}", output);
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "Local Cluster\n\n64 nodes\n  • one"
    );
}

#[test]
fn test_html_page_for_embedded_document() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nau.html");

    let output = hpcreport(&["html", "nau_hpc_resources.md", "--page", "-o", path_arg(&out)]);

    assert!(output.status.success(), "{:?}", output);
    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains("NAU HPC Resources"));
    assert!(html.contains("<h1>"));
}

#[test]
fn test_pdf_written_without_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.pdf");

    let output = hpcreport(&["pdf", "-o", path_arg(&out), "--sequential"]);

    assert!(output.status.success(), "{:?}", output);
    assert!(fs::read(&out).unwrap().starts_with(b"%PDF-"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_layout_compact_json() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("layout.json");

    let output = hpcreport(&["layout", "--compact", "-o", path_arg(&out)]);

    assert!(output.status.success(), "{:?}", output);
    let json = fs::read_to_string(&out).unwrap();
    assert!(json.starts_with('{'));
    assert!(!json.contains('\n'));
    assert!(json.contains("\"pages\""));
}

#[test]
fn test_missing_document_fails() {
    let output = hpcreport(&["text", "missing.md"]);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error"));
}
