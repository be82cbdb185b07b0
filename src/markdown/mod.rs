//! Conversion of the report's markdown subset to HTML and plain text.
//!
//! Both conversions are total: any input string produces output, and syntax
//! that is not recognized passes through as literal text.
//!
//! # Example
//!
//! ```
//! use hpcreport::markdown;
//!
//! let html = markdown::to_html("# Title\n\nSome *text* here.");
//! assert!(html.contains("<h1>Title</h1>"));
//! assert!(html.contains("<em>text</em>"));
//!
//! let text = markdown::to_plain_text("# Title\n\nSome *text* here.");
//! assert_eq!(text, "Title\n\nSome text here.");
//! ```

mod block;
mod rules;

use std::borrow::Cow;

pub use block::{wrap_paragraphs, BlockState, LineKind, Transition};
pub use rules::{Replacement, Rule, RuleSet};

/// Convert markdown to an HTML fragment for in-page display.
pub fn to_html(markdown: &str) -> String {
    let html = RuleSet::html().apply(&unix_line_endings(markdown));
    wrap_paragraphs(&html)
}

/// Convert markdown to plain text for embedding in the PDF.
///
/// Markup is removed, headings become indentation, table pipes are padded,
/// fenced code blocks are dropped and runs of blank lines collapse to one.
pub fn to_plain_text(markdown: &str) -> String {
    RuleSet::plain_text()
        .apply(&unix_line_endings(markdown))
        .trim()
        .to_string()
}

/// Replace `\r\n` and lone `\r` line breaks with `\n`.
fn unix_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Human-readable title for a documentation file name.
pub fn display_title(name: &str) -> String {
    match name {
        "uarizona_hpc_resources.md" => "UArizona HPC Resources".to_string(),
        "cyverse_ua_resources.md" => "CyVerse UA Resources".to_string(),
        "asu_hpc_resources.md" => "ASU HPC Resources".to_string(),
        "nau_hpc_resources.md" => "NAU HPC Resources".to_string(),
        "tacc_jetstream2_hpc_resources.md" => "TACC Jetstream2 HPC Resources".to_string(),
        "peer_universities_hpc.md" => "Peer Universities HPC Resources".to_string(),
        other => title_case(&stem_words(other)),
    }
}

/// Section header used for a document in the PDF: upper-cased file stem.
pub fn section_heading(name: &str) -> String {
    stem_words(name).to_uppercase()
}

fn stem_words(name: &str) -> String {
    name.replacen(".md", "", 1).replace('_', " ")
}

fn title_case(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start && c.is_alphanumeric() {
            output.extend(c.to_uppercase());
        } else {
            output.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    output
}
