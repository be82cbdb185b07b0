//! # hpcreport
//!
//! Markdown conversion and paginated PDF layout for the UA HPC resources
//! report.
//!
//! The report combines a title page, captured chart images, and a set of
//! markdown documents describing university computing resources. The
//! markdown is converted to HTML for on-screen documentation and to plain
//! text for the PDF, where a layout engine flows it across fixed-size pages.
//!
//! ## Quick Start
//!
//! ```no_run
//! use hpcreport::{markdown_to_html, markdown_to_text};
//!
//! let html = markdown_to_html("# Title\n\nSome *text* here.");
//! let text = markdown_to_text("# Title\n\nSome *text* here.");
//! assert_eq!(text, "Title\n\nSome text here.");
//! # let _ = html;
//! ```
//!
//! ## Features
//!
//! - **Rule-based conversion**: ordered regex rules for HTML and plain text
//! - **Paragraph state machine**: explicit block state for `<p>` wrapping
//! - **Pagination**: cursor-based layout with page breaks and footers
//! - **PDF output**: standard fonts, JPEG charts, compressed content
//! - **Bounded capture**: chart captures time out instead of hanging

pub mod capture;
pub mod content;
pub mod error;
pub mod layout;
pub mod markdown;
pub mod render;
pub mod report;

// Re-export commonly used types
pub use capture::{Bitmap, CaptureError, ChartCapture, DirectoryCapture, NoCapture, TimedCapture};
pub use content::{ContentError, ContentSource, DirectoryContent, EmbeddedContent, Fallback};
pub use error::{Error, Result};
pub use layout::{Align, DrawCommand, FontSpec, LayoutEngine, PageGeometry, PaginatedDocument};
pub use render::{DocumentBackend, JsonFormat, PdfBackend};
pub use report::{ReportBuilder, ReportOptions, ReportStatus, StatusSink, REPORT_FILENAME};

use std::path::Path;

/// Convert markdown to an HTML fragment.
///
/// # Example
///
/// ```
/// use hpcreport::markdown_to_html;
///
/// let html = markdown_to_html("## Puma\n\n- 300 nodes");
/// assert!(html.contains("<h2>Puma</h2>"));
/// assert!(html.contains("<ul>"));
/// ```
pub fn markdown_to_html(markdown: &str) -> String {
    markdown::to_html(markdown)
}

/// Convert markdown to indented plain text.
pub fn markdown_to_text(markdown: &str) -> String {
    markdown::to_plain_text(markdown)
}

/// Render all embedded documents as collapsible HTML sections.
pub fn documentation_html() -> String {
    render::render_documentation(&EmbeddedContent, content::DISPLAY_ORDER)
}

/// Generate the report from embedded content, without charts.
///
/// Each chart page carries the "could not be captured" placeholder.
pub fn generate_report() -> Result<Vec<u8>> {
    report::generate_pdf(&ReportOptions::default(), &EmbeddedContent, &NoCapture)
}

/// Generate the report and save it to `path`.
///
/// Charts are read from `chart_dir` when given (`<id>.jpg`), each capture
/// bounded by the default timeout.
///
/// # Example
///
/// ```no_run
/// use hpcreport::{write_report, REPORT_FILENAME};
///
/// write_report(REPORT_FILENAME, Some("charts")).unwrap();
/// ```
pub fn write_report<P: AsRef<Path>, D: AsRef<Path>>(path: P, chart_dir: Option<D>) -> Result<()> {
    let options = ReportOptions::default();
    let backend = PdfBackend::new().with_title(options.title.as_str());

    match chart_dir {
        Some(dir) => {
            let capture = TimedCapture::with_default_timeout(DirectoryCapture::new(dir.as_ref()));
            ReportBuilder::new(&options, &EmbeddedContent, &capture).write_to(&backend, path.as_ref())
        }
        None => ReportBuilder::new(&options, &EmbeddedContent, &NoCapture)
            .write_to(&backend, path.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_to_text() {
        assert_eq!(
            markdown_to_text("# Title\n\nSome *text* here."),
            "Title\n\nSome text here."
        );
    }

    #[test]
    fn test_documentation_html() {
        let html = documentation_html();
        assert_eq!(html.matches("class=\"doc-collapsible\"").count(), 6);
    }

    #[test]
    fn test_generate_report() {
        let bytes = generate_report().unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
