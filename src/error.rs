//! Error types for hpcreport library.

use std::io;
use thiserror::Error;

/// Result type alias for hpcreport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building a report.
///
/// Per-section failures (missing documents, charts that cannot be captured)
/// never surface here; they are recovered into placeholder content. Only the
/// document backend and the final write are terminal.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error while producing the output document.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Error reported by the PDF writer.
    #[error("PDF generation error: {0}")]
    Pdf(String),

    /// Page geometry leaves no usable area.
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Pdf(err.to_string())
    }
}
