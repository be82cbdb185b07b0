//! Page geometry and font specifications.
//!
//! All lengths are millimetres measured from the top-left corner of the page;
//! font sizes are points.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Millimetres per typographic point.
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Fixed page size and margins for one document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Page width in mm
    pub width: f32,

    /// Page height in mm
    pub height: f32,

    /// Top margin; the cursor resets here after a page break
    pub margin_top: f32,

    /// Bottom margin; content may not start below `height - margin_bottom`
    pub margin_bottom: f32,

    /// Left margin
    pub margin_left: f32,

    /// Right margin
    pub margin_right: f32,

    /// Distance of the footer baseline from the bottom edge
    pub footer_offset: f32,
}

impl PageGeometry {
    /// US Letter (8.5 x 11 inches) with 20 mm margins.
    pub fn letter() -> Self {
        Self {
            width: 215.9,
            height: 279.4,
            margin_top: 20.0,
            margin_bottom: 20.0,
            margin_left: 20.0,
            margin_right: 20.0,
            footer_offset: 10.0,
        }
    }

    /// ISO A4 (210 x 297 mm) with 20 mm margins.
    pub fn a4() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            ..Self::letter()
        }
    }

    /// Custom page size with 20 mm margins.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::letter()
        }
    }

    /// Set all four margins to the same value.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin_top = margin;
        self.margin_bottom = margin;
        self.margin_left = margin;
        self.margin_right = margin;
        self
    }

    /// Set the footer baseline distance from the bottom edge.
    pub fn with_footer_offset(mut self, offset: f32) -> Self {
        self.footer_offset = offset;
        self
    }

    /// Usable horizontal span for text wrapping and image scaling.
    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// Lowest vertical offset at which content may be placed.
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin_bottom
    }

    /// Vertical span available between the top and bottom margins.
    pub fn usable_height(&self) -> f32 {
        self.content_bottom() - self.margin_top
    }

    /// Check that the margins leave a usable area.
    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(Error::InvalidGeometry(format!(
                "page size {}x{} must be positive",
                self.width, self.height
            )));
        }
        if self.content_width() <= 0.0 {
            return Err(Error::InvalidGeometry(
                "left and right margins exceed page width".to_string(),
            ));
        }
        if self.usable_height() <= 0.0 {
            return Err(Error::InvalidGeometry(
                "top and bottom margins exceed page height".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

/// Horizontal anchoring of a text command relative to its `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    /// `x` is the left edge
    #[default]
    Left,
    /// `x` is the centre
    Center,
    /// `x` is the right edge
    Right,
}

/// Font used for a text command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Size in points
    pub size: f32,

    /// Bold face
    pub bold: bool,

    /// Vertical advance for one line, in mm
    pub line_height: f32,
}

impl FontSpec {
    /// Regular face at the given size, with a 1.25 line spacing.
    pub fn new(size: f32) -> Self {
        Self {
            size,
            bold: false,
            line_height: size * PT_TO_MM * 1.25,
        }
    }

    /// Bold face at the given size.
    pub fn bold(size: f32) -> Self {
        Self {
            bold: true,
            ..Self::new(size)
        }
    }

    /// Override the line advance.
    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_content_area() {
        let g = PageGeometry::letter();
        assert!((g.content_width() - 175.9).abs() < 1e-3);
        assert!((g.content_bottom() - 259.4).abs() < 1e-3);
        assert!((g.usable_height() - 239.4).abs() < 1e-3);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_invalid_geometry() {
        let g = PageGeometry::new(100.0, 30.0).with_margin(20.0);
        assert!(matches!(g.validate(), Err(Error::InvalidGeometry(_))));

        let g = PageGeometry::new(30.0, 100.0).with_margin(15.0);
        assert!(g.validate().is_err());
    }

    #[test]
    fn test_font_line_height() {
        let font = FontSpec::new(8.0);
        assert!((font.line_height - 3.5277).abs() < 1e-3);
        assert!(FontSpec::bold(12.0).bold);
        assert_eq!(FontSpec::new(8.0).with_line_height(4.0).line_height, 4.0);
    }

    #[test]
    fn test_geometry_serde() {
        let g = PageGeometry::a4();
        let json = serde_json::to_string(&g).unwrap();
        let back: PageGeometry = serde_json::from_str(&json).unwrap();
        assert_eq!(g, back);
    }
}
