//! Report configuration.

use chrono::NaiveDate;

use crate::content::DOCUMENT_NAMES;
use crate::layout::PageGeometry;

/// File name the generated report is saved under.
pub const REPORT_FILENAME: &str = "UA_HPC_Resources_Timeline_Report.pdf";

/// Report title, also used as the footer title.
pub const REPORT_TITLE: &str = "UA HPC Resources Timeline";

/// A chart to capture: container id and the heading printed above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    /// Chart container id passed to the capture
    pub id: String,

    /// Heading shown above the chart
    pub title: String,
}

impl ChartSpec {
    /// Create a chart entry.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Options controlling report assembly.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Page size and margins
    pub geometry: PageGeometry,

    /// Title on the first page
    pub title: String,

    /// Lines shown under the title
    pub subtitles: Vec<String>,

    /// Bullet lines under "Summary Statistics"
    pub stats: Vec<String>,

    /// Charts, one per page, in order
    pub charts: Vec<ChartSpec>,

    /// Documentation files, in order
    pub documents: Vec<String>,

    /// Title used in the page footer
    pub footer_title: String,

    /// Date printed on the title page (today when unset)
    pub generated: Option<NaiveDate>,

    /// Convert documents on the rayon pool
    pub parallel: bool,
}

impl ReportOptions {
    /// Create report options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page geometry.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Replace the summary statistics.
    pub fn with_stats<I, S>(mut self, stats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stats = stats.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the chart list.
    pub fn with_charts(mut self, charts: Vec<ChartSpec>) -> Self {
        self.charts = charts;
        self
    }

    /// Replace the documentation list.
    pub fn with_documents<I, S>(mut self, documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.documents = documents.into_iter().map(Into::into).collect();
        self
    }

    /// Set the footer title.
    pub fn with_footer_title(mut self, title: impl Into<String>) -> Self {
        self.footer_title = title.into();
        self
    }

    /// Fix the date printed on the title page.
    pub fn with_generated(mut self, date: NaiveDate) -> Self {
        self.generated = Some(date);
        self
    }

    /// Enable or disable parallel document conversion.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel document conversion.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// The "Generated:" line, e.g. `Generated: October 17, 2026`.
    pub fn generated_line(&self) -> String {
        let date = self
            .generated
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        format!("Generated: {}", date.format("%B %-d, %Y"))
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::letter(),
            title: REPORT_TITLE.to_string(),
            subtitles: vec![
                "Evolution of High Performance Computing".to_string(),
                "at University of Arizona".to_string(),
            ],
            stats: vec![
                "Total CPU Cores: 43,688".to_string(),
                "Total GPUs: 163".to_string(),
                "System Memory: 256 TB".to_string(),
                "AI Performance: 10.5 PFLOPS (Tensor)".to_string(),
                "Active Clusters: Puma, Ocelote, El Gato, Soteria".to_string(),
            ],
            charts: vec![
                ChartSpec::new("timeline-viz", "HPC Systems Timeline"),
                ChartSpec::new("performance-viz", "CPU Performance Evolution"),
                ChartSpec::new("gpu-evolution-viz", "GPU Performance Evolution"),
                ChartSpec::new("ua-asu-comparison-viz", "Arizona Universities Comparison"),
                ChartSpec::new("peer-comparison-viz", "Peer Universities Comparison"),
                ChartSpec::new("access-ci-comparison-viz", "UA + ACCESS-CI Resources"),
            ],
            documents: DOCUMENT_NAMES.iter().map(|name| name.to_string()).collect(),
            footer_title: REPORT_TITLE.to_string(),
            generated: None,
            parallel: true,
        }
    }
}
