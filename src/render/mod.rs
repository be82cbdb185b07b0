//! Rendering module for turning converted and laid-out content into output formats.

mod html;
mod json;
mod pdf;

pub use html::{render_documentation, render_page, render_section};
pub use json::{to_json, JsonFormat};
pub use pdf::{encode_win_ansi, DocumentBackend, PdfBackend};
