//! Paginated layout: places items on fixed-size pages.

use serde::Serialize;

use super::command::{DrawCommand, ImageRef, Page, PaginatedDocument};
use super::geometry::{Align, FontSpec, PageGeometry};
use super::measure::{wrap_text, HelveticaMetrics, TextMeasure};
use crate::capture::Bitmap;
use crate::error::Result;

/// Current write position during one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageCursor {
    /// Current page number (1-indexed, only ever increases)
    pub page: u32,

    /// Vertical offset from the top edge in mm
    pub y: f32,
}

/// Where an item ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Page the item was drawn on
    pub page: u32,

    /// Vertical offset the item was drawn at
    pub y: f32,

    /// Whether a page break was taken for this item
    pub page_break: bool,
}

/// What a layout item draws.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    /// A single line of text
    Text {
        /// Content
        text: String,
        /// Font
        font: FontSpec,
        /// Horizontal anchoring
        align: Align,
        /// Extra left indentation in mm (left-aligned text only)
        indent: f32,
    },
    /// A horizontal rule across the content width
    Rule {
        /// Stroke width in mm
        thickness: f32,
    },
    /// Vertical space without any drawing
    Space,
}

/// An item with the vertical space it occupies.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutItem {
    /// What to draw
    pub kind: ItemKind,

    /// Vertical advance after the item, in mm
    pub height: f32,
}

impl LayoutItem {
    /// A text line occupying the font's line height.
    pub fn text(text: impl Into<String>, font: FontSpec) -> Self {
        Self {
            height: font.line_height,
            kind: ItemKind::Text {
                text: text.into(),
                font,
                align: Align::Left,
                indent: 0.0,
            },
        }
    }

    /// A horizontal rule followed by `height` of space.
    pub fn rule(thickness: f32, height: f32) -> Self {
        Self {
            kind: ItemKind::Rule { thickness },
            height,
        }
    }

    /// Blank vertical space.
    pub fn space(height: f32) -> Self {
        Self {
            kind: ItemKind::Space,
            height,
        }
    }

    /// Override the vertical advance.
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Set text alignment.
    pub fn with_align(mut self, new_align: Align) -> Self {
        if let ItemKind::Text { ref mut align, .. } = self.kind {
            *align = new_align;
        }
        self
    }

    /// Set left indentation of a text line.
    pub fn with_indent(mut self, new_indent: f32) -> Self {
        if let ItemKind::Text { ref mut indent, .. } = self.kind {
            *indent = new_indent;
        }
        self
    }
}

/// Footer written on every page once the page count is known.
#[derive(Debug, Clone, PartialEq)]
pub struct Footer {
    /// Leading title, e.g. the report name
    pub title: String,

    /// Footer font
    pub font: FontSpec,
}

impl Footer {
    /// Footer with the given title in 8 pt text.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            font: FontSpec::new(8.0),
        }
    }

    /// Footer text for page `number` of `total`.
    pub fn text(&self, number: u32, total: u32) -> String {
        if self.title.is_empty() {
            format!("Page {} of {}", number, total)
        } else {
            format!("{} - Page {} of {}", self.title, number, total)
        }
    }
}

/// Lays out items top to bottom with automatic page breaks.
///
/// The engine owns its cursor for exactly one document: it is consumed by
/// [`LayoutEngine::finish`], which runs the footer pass.
#[derive(Debug)]
pub struct LayoutEngine<M = HelveticaMetrics> {
    geometry: PageGeometry,
    measure: M,
    cursor: PageCursor,
    pages: Vec<Page>,
    images: Vec<Bitmap>,
}

impl LayoutEngine<HelveticaMetrics> {
    /// Create an engine using approximate Helvetica metrics.
    pub fn new(geometry: PageGeometry) -> Result<Self> {
        Self::with_measure(geometry, HelveticaMetrics)
    }
}

impl<M: TextMeasure> LayoutEngine<M> {
    /// Create an engine with a custom text measure.
    pub fn with_measure(geometry: PageGeometry, measure: M) -> Result<Self> {
        geometry.validate()?;
        Ok(Self {
            geometry,
            measure,
            cursor: PageCursor {
                page: 1,
                y: geometry.margin_top,
            },
            pages: vec![Page::new(1)],
            images: Vec::new(),
        })
    }

    /// Current cursor.
    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    /// Page geometry.
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Text measure used for wrapping.
    pub fn measure(&self) -> &M {
        &self.measure
    }

    /// Pages allocated so far.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Space left above the bottom margin on the current page.
    pub fn remaining(&self) -> f32 {
        self.geometry.content_bottom() - self.cursor.y
    }

    /// True when nothing has been placed on the current page yet.
    fn is_fresh(&self) -> bool {
        self.cursor.y <= self.geometry.margin_top
            && self.pages.last().map_or(true, Page::is_empty)
    }

    fn overflows(&self, height: f32) -> bool {
        self.cursor.y + height > self.geometry.content_bottom()
    }

    fn break_page(&mut self) {
        let number = self.cursor.page + 1;
        self.pages.push(Page::new(number));
        self.cursor = PageCursor {
            page: number,
            y: self.geometry.margin_top,
        };
        log::debug!("Page break: now on page {}", number);
    }

    /// Start a new page. Does nothing on a page that is still untouched.
    pub fn new_page(&mut self) {
        if !self.is_fresh() {
            self.break_page();
        }
    }

    /// Break the page unless `height` still fits below the cursor.
    ///
    /// Returns whether a break was taken.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if self.overflows(height) && !self.is_fresh() {
            self.break_page();
            true
        } else {
            false
        }
    }

    /// Move the cursor down without placing anything.
    ///
    /// The cursor may pass the bottom margin; the next item placed then
    /// starts a new page.
    pub fn advance(&mut self, dy: f32) {
        self.cursor.y += dy;
    }

    /// Place one item, breaking the page first when it does not fit.
    ///
    /// At most one break is taken per item. An item taller than the usable
    /// page height lands at the top margin of a fresh page and overflows the
    /// bottom margin rather than triggering further breaks.
    pub fn place(&mut self, item: LayoutItem) -> Placement {
        let page_break = self.ensure_space(item.height);
        if self.overflows(item.height) {
            log::debug!(
                "Item of height {:.1} mm exceeds usable page height {:.1} mm",
                item.height,
                self.geometry.usable_height()
            );
        }

        let y = self.cursor.y;
        if let Some(command) = self.command_for(item.kind, y) {
            if let Some(page) = self.pages.last_mut() {
                page.commands.push(command);
            }
        }
        self.cursor.y += item.height;

        Placement {
            page: self.cursor.page,
            y,
            page_break,
        }
    }

    fn command_for(&self, kind: ItemKind, y: f32) -> Option<DrawCommand> {
        let g = &self.geometry;
        match kind {
            ItemKind::Text {
                text,
                font,
                align,
                indent,
            } => {
                let x = match align {
                    Align::Left => g.margin_left + indent,
                    Align::Center => g.width / 2.0,
                    Align::Right => g.width - g.margin_right,
                };
                Some(DrawCommand::Text {
                    x,
                    y,
                    text,
                    font,
                    align,
                })
            }
            ItemKind::Rule { thickness } => Some(DrawCommand::Line {
                x1: g.margin_left,
                y1: y,
                x2: g.width - g.margin_right,
                y2: y,
                thickness,
            }),
            ItemKind::Space => None,
        }
    }

    /// Place a single text line advancing by the font's line height.
    pub fn text(&mut self, text: impl Into<String>, font: FontSpec, align: Align) -> Placement {
        self.place(LayoutItem::text(text, font).with_align(align))
    }

    /// Wrap `text` to the content width and place each resulting line.
    ///
    /// Returns the number of lines placed; a long paragraph may span
    /// several page breaks.
    pub fn paragraph(&mut self, text: &str, font: FontSpec) -> usize {
        let lines = wrap_text(text, self.geometry.content_width(), &font, &self.measure);
        let count = lines.len();
        for line in lines {
            self.place(LayoutItem::text(line, font));
        }
        count
    }

    /// Horizontal rule across the content width, then `advance` of space.
    pub fn rule(&mut self, thickness: f32, advance: f32) -> Placement {
        self.place(LayoutItem::rule(thickness, advance))
    }

    /// Place a bitmap scaled to the content width.
    ///
    /// An image taller than the space left on the page is shrunk to fit
    /// that space, keeping its aspect ratio, instead of moving to the next
    /// page. Only when no space is left at all is a page break taken.
    pub fn image(&mut self, bitmap: Bitmap) -> Placement {
        let content_width = self.geometry.content_width();
        let natural_height = if bitmap.width == 0 {
            0.0
        } else {
            bitmap.height as f32 * content_width / bitmap.width as f32
        };

        let page_break = self.remaining() <= 0.0 && !self.is_fresh();
        if page_break {
            self.break_page();
        }
        let available = self.remaining().max(0.0);

        let (width, height) = if natural_height <= available || bitmap.height == 0 {
            (content_width, natural_height)
        } else {
            log::debug!(
                "Shrinking image from {:.1} to {:.1} mm to fit page {}",
                natural_height,
                available,
                self.cursor.page
            );
            (bitmap.width as f32 * available / bitmap.height as f32, available)
        };

        let image = ImageRef(self.images.len());
        self.images.push(bitmap);

        let y = self.cursor.y;
        let command = DrawCommand::Image {
            x: self.geometry.margin_left,
            y,
            width,
            height,
            image,
        };
        if let Some(page) = self.pages.last_mut() {
            page.commands.push(command);
        }
        self.cursor.y += height;

        Placement {
            page: self.cursor.page,
            y,
            page_break,
        }
    }

    /// Finish layout: drop trailing pages that received nothing, add a
    /// footer to every page now that the total page count is known, and
    /// hand over the document.
    pub fn finish(self, footer: &Footer) -> PaginatedDocument {
        let mut pages = self.pages;
        while pages.len() > 1 && pages.last().map_or(false, Page::is_empty) {
            pages.pop();
        }

        let total = pages.len() as u32;
        let x = self.geometry.width / 2.0;
        let y = self.geometry.height - self.geometry.footer_offset;

        for page in &mut pages {
            page.footer = Some(DrawCommand::Text {
                x,
                y,
                text: footer.text(page.number, total),
                font: footer.font,
                align: Align::Center,
            });
        }
        log::debug!("Layout finished with {} pages", total);

        PaginatedDocument {
            geometry: self.geometry,
            pages,
            images: self.images,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::tests::jpeg_bytes;

    /// 100 mm tall page with 10 mm margins: 80 mm usable.
    fn small_page() -> PageGeometry {
        PageGeometry::new(100.0, 100.0).with_margin(10.0)
    }

    fn bitmap(width: u16, height: u16) -> Bitmap {
        Bitmap::from_jpeg(jpeg_bytes(width, height)).unwrap()
    }

    #[test]
    fn test_starts_on_page_one_at_top_margin() {
        let engine = LayoutEngine::new(small_page()).unwrap();
        assert_eq!(
            engine.cursor(),
            PageCursor {
                page: 1,
                y: 10.0
            }
        );
        assert_eq!(engine.page_count(), 1);
    }

    #[test]
    fn test_rejects_invalid_geometry() {
        let geometry = PageGeometry::new(100.0, 30.0).with_margin(20.0);
        assert!(LayoutEngine::new(geometry).is_err());
    }

    #[test]
    fn test_items_fill_page_exactly() {
        let mut engine = LayoutEngine::new(small_page()).unwrap();
        for i in 0..8 {
            let placed = engine.place(LayoutItem::space(10.0));
            assert_eq!(placed.page, 1, "item {}", i);
            assert!(!placed.page_break);
        }
        let placed = engine.place(LayoutItem::space(10.0));
        assert_eq!(placed.page, 2);
        assert!(placed.page_break);
        assert_eq!(placed.y, 10.0);
    }

    #[test]
    fn test_page_count_for_evenly_dividing_items() {
        let font = FontSpec::new(8.0);
        for (count, height, expected) in [(16, 10.0, 2), (17, 10.0, 3), (40, 20.0, 10), (4, 80.0, 4)] {
            let mut engine = LayoutEngine::new(small_page()).unwrap();
            for i in 0..count {
                engine.place(LayoutItem::text(format!("line {}", i), font).with_height(height));
            }
            let doc = engine.finish(&Footer::new("T"));
            assert_eq!(doc.page_count(), expected, "{} items of {}", count, height);
        }
    }

    #[test]
    fn test_no_command_below_bottom_margin() {
        let g = small_page();
        let mut engine = LayoutEngine::new(g).unwrap();
        let font = FontSpec::new(8.0);
        for i in 0..200 {
            engine.place(LayoutItem::text(format!("{}", i), font).with_height(3.5 + (i % 3) as f32));
            if i % 7 == 0 {
                engine.advance(2.0);
            }
        }
        let doc = engine.finish(&Footer::new(""));
        for page in &doc.pages {
            for command in &page.commands {
                assert!(command.y() <= g.content_bottom(), "{:?}", command);
            }
        }
    }

    #[test]
    fn test_oversized_item_goes_to_fresh_page_once() {
        let mut engine = LayoutEngine::new(small_page()).unwrap();
        engine.text("before", FontSpec::new(10.0), Align::Left);

        let placed = engine.place(LayoutItem::text("huge", FontSpec::new(10.0)).with_height(500.0));
        assert_eq!(placed.page, 2);
        assert_eq!(placed.y, 10.0);
        assert!(placed.page_break);

        let next = engine.text("after", FontSpec::new(10.0), Align::Left);
        assert_eq!(next.page, 3);
        assert_eq!(engine.page_count(), 3);
    }

    #[test]
    fn test_oversized_item_on_untouched_page_does_not_break() {
        let mut engine = LayoutEngine::new(small_page()).unwrap();
        let placed = engine.place(LayoutItem::space(1000.0));
        assert_eq!(placed.page, 1);
        assert!(!placed.page_break);
        assert_eq!(engine.page_count(), 1);
    }

    #[test]
    fn test_footer_pass_uses_final_count() {
        let mut engine = LayoutEngine::new(small_page()).unwrap();
        for _ in 0..30 {
            engine.place(LayoutItem::space(10.0));
            engine.text("x", FontSpec::new(8.0), Align::Left);
        }
        let doc = engine.finish(&Footer::new("Report"));
        let total = doc.page_count();
        assert!(total > 2);
        for page in &doc.pages {
            let footer = page.footer.as_ref().unwrap();
            assert_eq!(
                footer.text().unwrap(),
                format!("Report - Page {} of {}", page.number, total)
            );
            assert_eq!(footer.y(), 90.0);
        }
    }

    #[test]
    fn test_paragraph_spans_pages() {
        let mut engine = LayoutEngine::new(small_page()).unwrap();
        let text = "word ".repeat(400);
        let lines = engine.paragraph(&text, FontSpec::new(8.0));
        assert!(lines > 23);
        assert!(engine.page_count() > 1);
    }

    #[test]
    fn test_text_alignment_anchor() {
        let mut engine = LayoutEngine::new(small_page()).unwrap();
        engine.text("c", FontSpec::new(10.0), Align::Center);
        engine.place(LayoutItem::text("i", FontSpec::new(10.0)).with_indent(5.0));
        let doc = engine.finish(&Footer::new(""));
        let xs: Vec<f32> = doc.pages[0]
            .commands
            .iter()
            .map(|c| match c {
                DrawCommand::Text { x, .. } => *x,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(xs, vec![50.0, 15.0]);
    }

    #[test]
    fn test_image_scaled_to_content_width() {
        let mut engine = LayoutEngine::new(small_page()).unwrap();
        engine.image(bitmap(160, 40));
        let doc = engine.finish(&Footer::new(""));
        match &doc.pages[0].commands[0] {
            DrawCommand::Image {
                x,
                width,
                height,
                image,
                ..
            } => {
                assert_eq!(*x, 10.0);
                assert_eq!(*width, 80.0);
                assert_eq!(*height, 20.0);
                assert_eq!(doc.image(*image).unwrap().width, 160);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_tall_image_shrinks_instead_of_breaking() {
        let mut engine = LayoutEngine::new(small_page()).unwrap();
        engine.place(LayoutItem::space(40.0));
        // Natural height 80 mm, only 40 mm left.
        let placed = engine.image(bitmap(100, 100));
        assert!(!placed.page_break);
        assert_eq!(placed.page, 1);
        assert_eq!(engine.page_count(), 1);

        let doc = engine.finish(&Footer::new(""));
        match &doc.pages[0].commands[0] {
            DrawCommand::Image { y, width, height, .. } => {
                assert_eq!(*y, 50.0);
                assert_eq!(*height, 40.0);
                assert_eq!(*width, 40.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_image_with_no_space_left_breaks() {
        let mut engine = LayoutEngine::new(small_page()).unwrap();
        engine.place(LayoutItem::text("x", FontSpec::new(8.0)).with_height(20.0));
        engine.place(LayoutItem::space(60.0));
        assert_eq!(engine.remaining(), 0.0);

        let placed = engine.image(bitmap(100, 50));
        assert!(placed.page_break);
        assert_eq!(placed.page, 2);
        assert_eq!(placed.y, 10.0);
        assert_eq!(engine.page_count(), 2);
    }

    #[test]
    fn test_advance_past_bottom_defers_break() {
        let mut engine = LayoutEngine::new(small_page()).unwrap();
        engine.text("x", FontSpec::new(8.0), Align::Left);
        engine.advance(85.0);
        assert_eq!(engine.page_count(), 1);
        assert!(engine.remaining() < 0.0);

        let placed = engine.text("y", FontSpec::new(8.0), Align::Left);
        assert!(placed.page_break);
        assert_eq!((placed.page, placed.y), (2, 10.0));
    }

    #[test]
    fn test_gap_after_last_item_leaves_no_empty_page() {
        let mut engine = LayoutEngine::new(small_page()).unwrap();
        engine.place(LayoutItem::text("body", FontSpec::new(8.0)).with_height(75.0));
        engine.advance(8.0);
        let doc = engine.finish(&Footer::new("T"));
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.pages[0].footer.as_ref().unwrap().text(), Some("T - Page 1 of 1"));
    }

    #[test]
    fn test_finish_drops_trailing_empty_pages() {
        let mut engine = LayoutEngine::new(small_page()).unwrap();
        engine.text("x", FontSpec::new(8.0), Align::Left);
        engine.place(LayoutItem::space(75.0));
        assert!(engine.ensure_space(10.0));
        assert_eq!(engine.page_count(), 2);

        let doc = engine.finish(&Footer::new(""));
        assert_eq!(doc.page_count(), 1);
        assert!(!doc.pages.last().unwrap().is_empty());
    }

    #[test]
    fn test_finish_keeps_single_empty_page() {
        let engine = LayoutEngine::new(small_page()).unwrap();
        let doc = engine.finish(&Footer::new(""));
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_new_page_skips_untouched_page() {
        let mut engine = LayoutEngine::new(small_page()).unwrap();
        engine.new_page();
        assert_eq!(engine.page_count(), 1);
        engine.text("x", FontSpec::new(8.0), Align::Left);
        engine.new_page();
        assert_eq!(engine.page_count(), 2);
    }

    #[test]
    fn test_rule_spans_content_width() {
        let mut engine = LayoutEngine::new(small_page()).unwrap();
        engine.rule(0.5, 5.0);
        assert_eq!(engine.cursor().y, 15.0);
        let doc = engine.finish(&Footer::new(""));
        assert_eq!(
            doc.pages[0].commands[0],
            DrawCommand::Line {
                x1: 10.0,
                y1: 10.0,
                x2: 90.0,
                y2: 10.0,
                thickness: 0.5
            }
        );
    }
}
