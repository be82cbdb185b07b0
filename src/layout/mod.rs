//! Paginated layout engine.
//!
//! Content is placed top to bottom on fixed-size pages. The engine inserts a
//! page break whenever the remaining vertical space is insufficient, scales
//! images to the content width, and finally stamps a footer with the page
//! number and total page count on every page.
//!
//! # Example
//!
//! ```
//! use hpcreport::layout::{Align, FontSpec, Footer, LayoutEngine, PageGeometry};
//!
//! let mut engine = LayoutEngine::new(PageGeometry::letter())?;
//! engine.text("UA HPC Resources Timeline", FontSpec::bold(24.0), Align::Center);
//! engine.paragraph("Combined UA HPC resources: 865 nodes.", FontSpec::new(8.0));
//!
//! let document = engine.finish(&Footer::new("UA HPC Resources Timeline"));
//! assert_eq!(document.page_count(), 1);
//! # Ok::<(), hpcreport::Error>(())
//! ```

mod command;
mod engine;
mod geometry;
mod measure;

pub use command::{DrawCommand, ImageRef, Page, PaginatedDocument};
pub use engine::{Footer, ItemKind, LayoutEngine, LayoutItem, PageCursor, Placement};
pub use geometry::{Align, FontSpec, PageGeometry, PT_TO_MM};
pub use measure::{wrap_text, HelveticaMetrics, TextMeasure};
