//! Draw commands and the paginated document handed to a backend.

use serde::Serialize;

use super::geometry::{Align, FontSpec, PageGeometry};
use crate::capture::Bitmap;

/// Index of an image in [`PaginatedDocument::images`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ImageRef(pub usize);

/// An instruction bound to an absolute position on one page.
///
/// Coordinates are millimetres from the top-left corner; a text `y` is the
/// baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Place a line of text
    Text {
        /// Anchor x, interpreted through `align`
        x: f32,
        /// Baseline y
        y: f32,
        /// Text content
        text: String,
        /// Font
        font: FontSpec,
        /// Anchoring of `x`
        align: Align,
    },

    /// Place an image with its top-left corner at (`x`, `y`)
    Image {
        /// Left edge
        x: f32,
        /// Top edge
        y: f32,
        /// Rendered width
        width: f32,
        /// Rendered height
        height: f32,
        /// Image to draw
        image: ImageRef,
    },

    /// Draw a straight line
    Line {
        /// Start x
        x1: f32,
        /// Start y
        y1: f32,
        /// End x
        x2: f32,
        /// End y
        y2: f32,
        /// Stroke width in mm
        thickness: f32,
    },
}

impl DrawCommand {
    /// Vertical position the command is anchored at.
    pub fn y(&self) -> f32 {
        match self {
            DrawCommand::Text { y, .. } | DrawCommand::Image { y, .. } => *y,
            DrawCommand::Line { y1, .. } => *y1,
        }
    }

    /// Text content, if this is a text command.
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawCommand::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// One laid-out page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Body commands in emission order
    pub commands: Vec<DrawCommand>,

    /// Footer command, set by the footer pass
    pub footer: Option<DrawCommand>,
}

impl Page {
    pub(crate) fn new(number: u32) -> Self {
        Self {
            number,
            commands: Vec::new(),
            footer: None,
        }
    }

    /// Check if the page has no body commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Body commands followed by the footer.
    pub fn all_commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().chain(self.footer.iter())
    }

    /// Plain text of the body commands, one line per text command.
    pub fn plain_text(&self) -> String {
        self.commands
            .iter()
            .filter_map(DrawCommand::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Output of a layout pass: finalized pages plus the images they reference.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedDocument {
    /// Page geometry used for layout
    pub geometry: PageGeometry,

    /// Pages in order
    pub pages: Vec<Page>,

    /// Images referenced by [`DrawCommand::Image`]
    pub images: Vec<Bitmap>,
}

impl PaginatedDocument {
    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Look up an image by reference.
    pub fn image(&self, image: ImageRef) -> Option<&Bitmap> {
        self.images.get(image.0)
    }

    /// Total number of body commands across all pages.
    pub fn command_count(&self) -> usize {
        self.pages.iter().map(|p| p.commands.len()).sum()
    }
}
