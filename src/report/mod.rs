//! Report assembly: title page, charts, and supplementary documentation.
//!
//! # Example
//!
//! ```no_run
//! use hpcreport::capture::NoCapture;
//! use hpcreport::content::EmbeddedContent;
//! use hpcreport::render::PdfBackend;
//! use hpcreport::report::{ReportBuilder, ReportOptions, REPORT_FILENAME};
//!
//! fn main() -> hpcreport::Result<()> {
//!     let options = ReportOptions::default();
//!     let builder = ReportBuilder::new(&options, &EmbeddedContent, &NoCapture);
//!     builder.write_to(&PdfBackend::new(), REPORT_FILENAME.as_ref())?;
//!     Ok(())
//! }
//! ```

mod options;
mod status;

pub use options::{ChartSpec, ReportOptions, REPORT_FILENAME, REPORT_TITLE};
pub use status::{NoStatus, ReportStatus, StatusSink};

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::capture::ChartCapture;
use crate::content::ContentSource;
use crate::error::Result;
use crate::layout::{
    wrap_text, Align, FontSpec, Footer, LayoutEngine, LayoutItem, PaginatedDocument,
};
use crate::markdown::{section_heading, to_plain_text};
use crate::render::DocumentBackend;

/// Line drawn in place of a chart that could not be captured.
pub const CHART_PLACEHOLDER: &str = "[Visualization could not be captured]";

/// Heading of the documentation part.
const DOCUMENTATION_HEADING: &str = "Supplementary Documentation";

/// Line under the documentation heading.
const DOCUMENTATION_DESCRIPTION: &str =
    "Detailed technical specifications and resource descriptions";

/// Document body text: 8 pt on a 3.5 mm line.
const BODY_LINE_HEIGHT: f32 = 3.5;

/// Space a body line must find before it is placed.
const BODY_LINE_SPACE: f32 = 4.0;

/// Space kept free for a section header and its first lines.
const SECTION_HEADER_SPACE: f32 = 20.0;

/// Assembles one report from content, charts, and options.
pub struct ReportBuilder<'a> {
    options: &'a ReportOptions,
    content: &'a (dyn ContentSource + Sync),
    capture: &'a dyn ChartCapture,
    status: &'a dyn StatusSink,
}

impl<'a> ReportBuilder<'a> {
    /// Create a builder reading documents from `content` and charts from
    /// `capture`.
    pub fn new(
        options: &'a ReportOptions,
        content: &'a (dyn ContentSource + Sync),
        capture: &'a dyn ChartCapture,
    ) -> Self {
        Self {
            options,
            content,
            capture,
            status: &NoStatus,
        }
    }

    /// Send status updates to `status`.
    pub fn with_status(mut self, status: &'a dyn StatusSink) -> Self {
        self.status = status;
        self
    }

    /// Fetch every document and convert it to plain text, in order.
    ///
    /// Missing documents are replaced with placeholder text.
    pub fn convert_documents(&self) -> Vec<(String, String)> {
        let content = self.content;
        let convert = |name: &String| {
            let markdown = content.fetch_or_placeholder(name);
            (name.clone(), to_plain_text(&markdown))
        };

        if self.options.parallel {
            self.options.documents.par_iter().map(convert).collect()
        } else {
            self.options.documents.iter().map(convert).collect()
        }
    }

    /// Lay out the whole report and run the footer pass.
    pub fn layout(&self) -> Result<PaginatedDocument> {
        self.status.update(&ReportStatus::Generating);
        let documents = self.convert_documents();

        let mut engine = LayoutEngine::new(self.options.geometry)?;
        self.layout_title_page(&mut engine);
        self.layout_charts(&mut engine);
        self.layout_documentation(&mut engine, &documents);

        let doc = engine.finish(&Footer::new(self.options.footer_title.as_str()));
        log::info!(
            "Laid out report: {} pages, {} images",
            doc.page_count(),
            doc.images.len()
        );
        Ok(doc)
    }

    /// Lay out the report and render it with `backend`.
    ///
    /// Ends with [`ReportStatus::Done`] or [`ReportStatus::Failed`].
    pub fn render<B: DocumentBackend + ?Sized>(&self, backend: &B) -> Result<Vec<u8>> {
        let result = self.render_bytes(backend);
        self.finish_status(&result);
        result
    }

    fn render_bytes<B: DocumentBackend + ?Sized>(&self, backend: &B) -> Result<Vec<u8>> {
        let doc = self.layout()?;
        self.status.update(&ReportStatus::Saving);
        backend.render(&doc)
    }

    fn finish_status<T>(&self, result: &Result<T>) {
        match result {
            Ok(_) => self.status.update(&ReportStatus::Done),
            Err(err) => self.status.update(&ReportStatus::Failed(err.to_string())),
        }
    }

    /// Render the report and save it to `path`.
    ///
    /// Nothing is written unless rendering succeeds, and the file is moved
    /// into place only once fully written.
    pub fn write_to<B: DocumentBackend + ?Sized>(&self, backend: &B, path: &Path) -> Result<()> {
        let result = self
            .render_bytes(backend)
            .and_then(|bytes| write_complete(path, &bytes));

        if result.is_ok() {
            log::info!("Saved {}", path.display());
        }
        self.finish_status(&result);
        result
    }

    fn layout_title_page(&self, engine: &mut LayoutEngine) {
        let options = self.options;

        engine.place(
            LayoutItem::text(options.title.as_str(), FontSpec::bold(24.0))
                .with_align(Align::Center)
                .with_height(10.0),
        );

        let last = options.subtitles.len().saturating_sub(1);
        for (i, subtitle) in options.subtitles.iter().enumerate() {
            let advance = if i == last { 15.0 } else { 6.0 };
            engine.place(
                LayoutItem::text(subtitle.as_str(), FontSpec::new(14.0))
                    .with_align(Align::Center)
                    .with_height(advance),
            );
        }

        engine.place(
            LayoutItem::text(options.generated_line(), FontSpec::new(10.0))
                .with_align(Align::Center)
                .with_height(20.0),
        );

        engine.place(LayoutItem::text("Summary Statistics", FontSpec::bold(16.0)).with_height(10.0));
        for stat in &options.stats {
            engine.place(
                LayoutItem::text(format!("\u{2022} {}", stat), FontSpec::new(10.0))
                    .with_indent(5.0)
                    .with_height(6.0),
            );
        }
    }

    fn layout_charts(&self, engine: &mut LayoutEngine) {
        self.status.update(&ReportStatus::CapturingVisualizations);

        for chart in &self.options.charts {
            engine.new_page();
            engine.place(LayoutItem::text(chart.title.as_str(), FontSpec::bold(14.0)).with_height(10.0));

            self.status.update(&ReportStatus::Capturing(chart.id.clone()));
            match self.capture.capture(&chart.id) {
                Ok(bitmap) => {
                    engine.image(bitmap);
                }
                Err(err) => {
                    log::warn!("Error capturing {}: {}", chart.id, err);
                    engine.text(CHART_PLACEHOLDER, FontSpec::new(10.0), Align::Left);
                }
            }
        }
    }

    fn layout_documentation(&self, engine: &mut LayoutEngine, documents: &[(String, String)]) {
        self.status.update(&ReportStatus::LoadingDocumentation);

        engine.new_page();
        engine.place(LayoutItem::text(DOCUMENTATION_HEADING, FontSpec::bold(18.0)).with_height(10.0));
        engine.place(LayoutItem::text(DOCUMENTATION_DESCRIPTION, FontSpec::new(10.0)).with_height(10.0));

        let body = FontSpec::new(8.0).with_line_height(BODY_LINE_HEIGHT);
        let width = engine.geometry().content_width();

        for (name, text) in documents {
            self.status.update(&ReportStatus::LoadingDocument(name.clone()));

            engine.ensure_space(SECTION_HEADER_SPACE);
            engine.place(LayoutItem::text(section_heading(name), FontSpec::bold(12.0)).with_height(8.0));
            engine.rule(0.5, 5.0);

            let mut line_count = 0;
            for line in text.split('\n') {
                let line = line.trim();
                if line.is_empty() {
                    engine.advance(2.0);
                    engine.ensure_space(10.0);
                    continue;
                }

                for wrapped in wrap_text(line, width, &body, engine.measure()) {
                    engine.ensure_space(BODY_LINE_SPACE);
                    engine.place(LayoutItem::text(wrapped, body));
                    line_count += 1;
                }
            }
            log::debug!("Added {} lines for {}", line_count, name);

            engine.advance(8.0);
        }
    }
}

/// Write `bytes` next to `path` and rename into place.
fn write_complete(path: &Path, bytes: &[u8]) -> Result<()> {
    persist(path, |file| file.write_all(bytes))
}

/// Fill `<path>.part` with `fill`, then rename it to `path`.
///
/// The partial file is removed on any failure, including a write that
/// stops halfway.
fn persist<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    let result = File::create(&partial)
        .and_then(|mut file| {
            fill(&mut file)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&partial, path));

    if let Err(err) = result {
        if partial.exists() {
            let _ = fs::remove_file(&partial);
        }
        return Err(err.into());
    }
    Ok(())
}

/// Lay out a report with the given collaborators.
pub fn build_layout(
    options: &ReportOptions,
    content: &(dyn ContentSource + Sync),
    capture: &dyn ChartCapture,
) -> Result<PaginatedDocument> {
    ReportBuilder::new(options, content, capture).layout()
}

/// Lay out a report and render it to PDF bytes.
pub fn generate_pdf(
    options: &ReportOptions,
    content: &(dyn ContentSource + Sync),
    capture: &dyn ChartCapture,
) -> Result<Vec<u8>> {
    ReportBuilder::new(options, content, capture).render(&crate::render::PdfBackend::new())
}
