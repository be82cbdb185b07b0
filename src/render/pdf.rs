//! PDF output for laid-out documents, written with lopdf.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use unicode_normalization::UnicodeNormalization;

use crate::capture::{Bitmap, ImageEncoding};
use crate::error::{Error, Result};
use crate::layout::{
    Align, DrawCommand, FontSpec, HelveticaMetrics, PageGeometry, PaginatedDocument, TextMeasure,
};

/// Points per millimetre.
const MM_TO_PT: f32 = 72.0 / 25.4;

/// Consumes a paginated document and produces a serialized artifact.
pub trait DocumentBackend {
    /// Render every page of `doc` to bytes.
    fn render(&self, doc: &PaginatedDocument) -> Result<Vec<u8>>;
}

/// PDF backend using the standard Helvetica fonts.
#[derive(Debug, Clone)]
pub struct PdfBackend<M = HelveticaMetrics> {
    measure: M,
    compress: bool,
    title: Option<String>,
}

impl PdfBackend<HelveticaMetrics> {
    /// Create a backend with compressed content streams.
    pub fn new() -> Self {
        Self::with_measure(HelveticaMetrics)
    }
}

impl Default for PdfBackend<HelveticaMetrics> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: TextMeasure> PdfBackend<M> {
    /// Create a backend that aligns text with the given measure.
    ///
    /// Use the same measure as the layout pass so centred text lines up.
    pub fn with_measure(measure: M) -> Self {
        Self {
            measure,
            compress: true,
            title: None,
        }
    }

    /// Enable or disable deflate compression of page content.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Set the document title stored in the PDF info dictionary.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn content_stream(&self, raw: Vec<u8>) -> Result<Stream> {
        if !self.compress {
            return Ok(Stream::new(Dictionary::new(), raw));
        }
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw)?;
        let data = encoder.finish()?;
        Ok(Stream::new(dictionary! { "Filter" => "FlateDecode" }, data))
    }

    fn text_ops(&self, ops: &mut Vec<Operation>, g: &PageGeometry, cmd: TextCmd<'_>) {
        let width = self.measure.text_width(cmd.text, cmd.font);
        let left = match cmd.align {
            Align::Left => cmd.x,
            Align::Center => cmd.x - width / 2.0,
            Align::Right => cmd.x - width,
        };
        let font_name = if cmd.font.bold { "F2" } else { "F1" };

        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![font_name.into(), cmd.font.size.into()],
        ));
        ops.push(Operation::new(
            "Td",
            vec![(left * MM_TO_PT).into(), ((g.height - cmd.y) * MM_TO_PT).into()],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(cmd.text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
}

struct TextCmd<'a> {
    x: f32,
    y: f32,
    text: &'a str,
    font: &'a FontSpec,
    align: Align,
}

impl<M: TextMeasure> DocumentBackend for PdfBackend<M> {
    fn render(&self, doc: &PaginatedDocument) -> Result<Vec<u8>> {
        let g = &doc.geometry;
        let mut pdf = Document::with_version("1.5");
        let pages_id = pdf.new_object_id();

        let regular = pdf.add_object(font_dictionary("Helvetica"));
        let bold = pdf.add_object(font_dictionary("Helvetica-Bold"));
        let image_ids: Vec<ObjectId> = doc
            .images
            .iter()
            .map(|bitmap| pdf.add_object(image_stream(bitmap)))
            .collect();

        let media_box: Vec<Object> = vec![
            0.into(),
            0.into(),
            (g.width * MM_TO_PT).into(),
            (g.height * MM_TO_PT).into(),
        ];

        let mut kids: Vec<Object> = Vec::with_capacity(doc.pages.len());
        for page in &doc.pages {
            let mut ops = Vec::new();
            let mut xobjects = Dictionary::new();

            for command in page.all_commands() {
                match command {
                    DrawCommand::Text {
                        x,
                        y,
                        text,
                        font,
                        align,
                    } => self.text_ops(
                        &mut ops,
                        g,
                        TextCmd {
                            x: *x,
                            y: *y,
                            text,
                            font,
                            align: *align,
                        },
                    ),
                    DrawCommand::Image {
                        x,
                        y,
                        width,
                        height,
                        image,
                    } => {
                        let Some(&image_id) = image_ids.get(image.0) else {
                            return Err(Error::Render(format!(
                                "page {} references missing image {}",
                                page.number, image.0
                            )));
                        };
                        let name = format!("Im{}", image.0);
                        xobjects.set(name.clone(), image_id);

                        ops.push(Operation::new("q", vec![]));
                        ops.push(Operation::new(
                            "cm",
                            vec![
                                (width * MM_TO_PT).into(),
                                0.into(),
                                0.into(),
                                (height * MM_TO_PT).into(),
                                (x * MM_TO_PT).into(),
                                ((g.height - y - height) * MM_TO_PT).into(),
                            ],
                        ));
                        ops.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
                        ops.push(Operation::new("Q", vec![]));
                    }
                    DrawCommand::Line {
                        x1,
                        y1,
                        x2,
                        y2,
                        thickness,
                    } => {
                        ops.push(Operation::new("w", vec![(thickness * MM_TO_PT).into()]));
                        ops.push(Operation::new(
                            "m",
                            vec![(x1 * MM_TO_PT).into(), ((g.height - y1) * MM_TO_PT).into()],
                        ));
                        ops.push(Operation::new(
                            "l",
                            vec![(x2 * MM_TO_PT).into(), ((g.height - y2) * MM_TO_PT).into()],
                        ));
                        ops.push(Operation::new("S", vec![]));
                    }
                }
            }

            let raw = Content { operations: ops }
                .encode()
                .map_err(|e| Error::Pdf(e.to_string()))?;
            let content_id = pdf.add_object(self.content_stream(raw)?);

            let resources = dictionary! {
                "Font" => dictionary! {
                    "F1" => regular,
                    "F2" => bold,
                },
                "XObject" => xobjects,
            };
            let page_id = pdf.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box.clone(),
                "Contents" => content_id,
                "Resources" => resources,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        pdf.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
            }),
        );

        let catalog_id = pdf.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        pdf.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::string_literal(concat!("hpcreport ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(
                chrono::Local::now().format("D:%Y%m%d%H%M%S").to_string(),
            ),
        };
        if let Some(ref title) = self.title {
            info.set("Title", Object::String(encode_win_ansi(title), StringFormat::Literal));
        }
        let info_id = pdf.add_object(info);
        pdf.trailer.set("Info", info_id);

        let mut output = Vec::new();
        pdf.save_to(&mut output)
            .map_err(|e| Error::Pdf(e.to_string()))?;
        log::debug!(
            "Rendered PDF: {} pages, {} images, {} bytes",
            page_count,
            doc.images.len(),
            output.len()
        );
        Ok(output)
    }
}

fn font_dictionary(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn image_stream(bitmap: &Bitmap) -> Stream {
    let filter = match bitmap.encoding {
        ImageEncoding::Jpeg => "DCTDecode",
    };
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => bitmap.width as i64,
            "Height" => bitmap.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => filter,
        },
        bitmap.data.clone(),
    )
}

/// Encode text for the standard fonts' WinAnsi encoding.
///
/// Text is NFC-normalized first so decomposed accents map to single code
/// points; characters outside the encoding become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.nfc() {
        match c {
            '\t' => bytes.push(b' '),
            ' '..='~' => bytes.push(c as u8),
            '\u{A0}'..='\u{FF}' => bytes.push(c as u32 as u8),
            '→' => bytes.extend_from_slice(b"->"),
            '≥' => bytes.extend_from_slice(b">="),
            '≤' => bytes.extend_from_slice(b"<="),
            other => bytes.push(win_ansi_extra(other).unwrap_or(b'?')),
        }
    }
    bytes
}

/// Code points of the 0x80-0x9F range of WinAnsiEncoding.
fn win_ansi_extra(c: char) -> Option<u8> {
    let byte = match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}
