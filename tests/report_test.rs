//! End-to-end tests for report generation.

use std::fs;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use hpcreport::capture::{Bitmap, CaptureError};
use hpcreport::report::CHART_PLACEHOLDER;
use hpcreport::{
    ChartCapture, DirectoryCapture, EmbeddedContent, NoCapture, PdfBackend, ReportBuilder,
    ReportOptions, ReportStatus, TimedCapture, REPORT_FILENAME,
};

/// Minimal JPEG stream: SOI, SOF0 with the given size, EOI.
fn jpeg(width: u16, height: u16) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08];
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&[0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01]);
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

struct HangingCapture;

impl ChartCapture for HangingCapture {
    fn capture(&self, _id: &str) -> Result<Bitmap, CaptureError> {
        thread::sleep(Duration::from_secs(5));
        Bitmap::from_jpeg(jpeg(10, 10))
    }
}

fn options() -> ReportOptions {
    ReportOptions::new().with_generated(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
}

#[test]
fn test_write_report_with_chart_directory() {
    let charts = tempfile::tempdir().unwrap();
    fs::write(charts.path().join("timeline-viz.jpg"), jpeg(1200, 600)).unwrap();
    fs::write(charts.path().join("gpu-evolution-viz.jpg"), jpeg(600, 1200)).unwrap();

    let out = tempfile::tempdir().unwrap();
    let path = out.path().join(REPORT_FILENAME);

    let options = options();
    let capture = DirectoryCapture::new(charts.path());
    let builder = ReportBuilder::new(&options, &EmbeddedContent, &capture);

    let doc = builder.layout().unwrap();
    assert_eq!(doc.images.len(), 2);

    builder.write_to(&PdfBackend::new(), &path).unwrap();
    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));

    // Only the finished file remains.
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 1);
}

#[test]
fn test_tall_chart_shrinks_to_remaining_space() {
    let charts = tempfile::tempdir().unwrap();
    fs::write(charts.path().join("gpu-evolution-viz.jpg"), jpeg(600, 1200)).unwrap();

    let options = options();
    let capture = DirectoryCapture::new(charts.path());
    let doc = ReportBuilder::new(&options, &EmbeddedContent, &capture)
        .layout()
        .unwrap();

    let page = &doc.pages[3];
    assert_eq!(page.commands[0].text(), Some("GPU Performance Evolution"));
    let (y, width, height) = match &page.commands[1] {
        hpcreport::DrawCommand::Image {
            y, width, height, ..
        } => (*y, *width, *height),
        other => panic!("expected chart image, got {:?}", other),
    };
    let bottom = options.geometry.content_bottom();
    assert!((y + height - bottom).abs() < 1e-3);
    assert!(width < options.geometry.content_width());
    assert!((height / width - 2.0).abs() < 1e-3);
}

#[test]
fn test_capture_timeout_becomes_placeholder() {
    let options = options().with_charts(vec![hpcreport::report::ChartSpec::new(
        "timeline-viz",
        "HPC Systems Timeline",
    )]);
    let capture = TimedCapture::new(HangingCapture, Duration::from_millis(50));

    let doc = ReportBuilder::new(&options, &EmbeddedContent, &capture)
        .layout()
        .unwrap();

    assert!(doc.images.is_empty());
    assert_eq!(doc.pages[1].commands[1].text(), Some(CHART_PLACEHOLDER));
}

#[test]
fn test_status_sequence() {
    let options = options().with_documents(["asu_hpc_resources.md", "missing.md"]);
    let seen = Mutex::new(Vec::new());
    let sink = |status: &ReportStatus| seen.lock().unwrap().push(status.clone());

    let out = tempfile::tempdir().unwrap();
    let path = out.path().join("report.pdf");
    ReportBuilder::new(&options, &EmbeddedContent, &NoCapture)
        .with_status(&sink)
        .write_to(&PdfBackend::new(), &path)
        .unwrap();

    let seen = seen.into_inner().unwrap();
    let position = |status: &ReportStatus| seen.iter().position(|s| s == status).unwrap();

    assert_eq!(seen.first(), Some(&ReportStatus::Generating));
    assert!(position(&ReportStatus::CapturingVisualizations) < position(&ReportStatus::LoadingDocumentation));
    assert!(
        position(&ReportStatus::LoadingDocument("asu_hpc_resources.md".to_string()))
            < position(&ReportStatus::LoadingDocument("missing.md".to_string()))
    );
    assert!(position(&ReportStatus::LoadingDocumentation) < position(&ReportStatus::Saving));
    assert_eq!(seen.last(), Some(&ReportStatus::Done));
}

#[test]
fn test_report_is_deterministic_for_fixed_date() {
    let options = options();
    let a = ReportBuilder::new(&options, &EmbeddedContent, &NoCapture)
        .layout()
        .unwrap();
    let b = ReportBuilder::new(&options, &EmbeddedContent, &NoCapture)
        .layout()
        .unwrap();

    assert_eq!(a.page_count(), b.page_count());
    assert_eq!(a.command_count(), b.command_count());
    assert_eq!(
        hpcreport::render::to_json(&a, hpcreport::JsonFormat::Compact).unwrap(),
        hpcreport::render::to_json(&b, hpcreport::JsonFormat::Compact).unwrap()
    );
}
