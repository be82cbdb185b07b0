//! Progress reporting while a report is generated.

use std::fmt;

/// A step of report generation, as shown on a status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportStatus {
    /// Layout started
    Generating,
    /// Charts are being captured
    CapturingVisualizations,
    /// Capturing one chart
    Capturing(String),
    /// The documentation section started
    LoadingDocumentation,
    /// Laying out one document
    LoadingDocument(String),
    /// Rendering and writing the artifact
    Saving,
    /// The artifact was produced
    Done,
    /// Generation was abandoned; nothing was written
    Failed(String),
}

impl ReportStatus {
    /// Whether this is the last status of a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Done | ReportStatus::Failed(_))
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::Generating => write!(f, "Generating PDF... This may take a minute."),
            ReportStatus::CapturingVisualizations => write!(f, "Capturing visualizations..."),
            ReportStatus::Capturing(id) => write!(f, "Capturing {}...", id),
            ReportStatus::LoadingDocumentation => {
                write!(f, "Loading supplementary documentation...")
            }
            ReportStatus::LoadingDocument(name) => write!(f, "Loading {}...", name),
            ReportStatus::Saving => write!(f, "Saving PDF..."),
            ReportStatus::Done => write!(f, "PDF generated successfully"),
            ReportStatus::Failed(reason) => {
                write!(f, "Error generating PDF: {}. Please try again.", reason)
            }
        }
    }
}

/// Receives status updates during generation.
pub trait StatusSink {
    /// Called once per status change.
    fn update(&self, status: &ReportStatus);
}

impl<F: Fn(&ReportStatus)> StatusSink for F {
    fn update(&self, status: &ReportStatus) {
        self(status)
    }
}

/// Discards status updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStatus;

impl StatusSink for NoStatus {
    fn update(&self, _status: &ReportStatus) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_status_display() {
        assert_eq!(ReportStatus::Saving.to_string(), "Saving PDF...");
        assert_eq!(
            ReportStatus::LoadingDocument("asu_hpc_resources.md".to_string()).to_string(),
            "Loading asu_hpc_resources.md..."
        );
        assert!(ReportStatus::Failed("disk full".to_string())
            .to_string()
            .contains("Please try again"));
    }

    #[test]
    fn test_terminal_status() {
        assert!(ReportStatus::Done.is_terminal());
        assert!(ReportStatus::Failed(String::new()).is_terminal());
        assert!(!ReportStatus::Saving.is_terminal());
    }

    #[test]
    fn test_closure_sink() {
        let seen = RefCell::new(Vec::new());
        let sink = |status: &ReportStatus| seen.borrow_mut().push(status.clone());
        sink.update(&ReportStatus::Generating);
        sink.update(&ReportStatus::Done);
        assert_eq!(seen.into_inner(), vec![ReportStatus::Generating, ReportStatus::Done]);
    }
}
