//! HTML fragments for the documentation view.

use std::fmt::Write;

use crate::content::ContentSource;
use crate::markdown::{display_title, to_html};

/// Render one document as a collapsible section.
///
/// The header holds the display title and a toggle glyph; the body holds
/// the converted markdown.
pub fn render_section(name: &str, markdown: &str) -> String {
    let title = display_title(name);
    let body = to_html(markdown);

    format!(
        "<div class=\"doc-collapsible\">\n\
         \x20   <div class=\"doc-header\">\n\
         \x20       <h3>{title}</h3>\n\
         \x20       <span class=\"doc-toggle\">\u{25BC}</span>\n\
         \x20   </div>\n\
         \x20   <div class=\"doc-content\">\n\
         \x20       <div class=\"doc-content-inner\">\n\
         {body}\n\
         \x20       </div>\n\
         \x20   </div>\n\
         </div>"
    )
}

/// Render every named document that can be fetched, in order.
///
/// Documents that fail to load are skipped with a warning.
pub fn render_documentation<S, I, N>(source: &S, names: I) -> String
where
    S: ContentSource + ?Sized,
    I: IntoIterator<Item = N>,
    N: AsRef<str>,
{
    let mut sections = Vec::new();
    for name in names {
        let name = name.as_ref();
        match source.fetch(name) {
            Ok(markdown) => sections.push(render_section(name, &markdown)),
            Err(err) => log::warn!("Skipping {}: {}", name, err),
        }
    }
    log::debug!("Rendered {} documentation sections", sections.len());
    sections.join("\n")
}

/// Wrap a fragment in a standalone HTML page.
pub fn render_page(title: &str, body: &str) -> String {
    let mut page = String::with_capacity(body.len() + 256);
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    page.push_str("<meta charset=\"utf-8\">\n");
    let _ = writeln!(page, "<title>{}</title>", escape(title));
    page.push_str("</head>\n<body>\n");
    let _ = writeln!(page, "<h1>{}</h1>", escape(title));
    page.push_str(body);
    page.push_str("\n</body>\n</html>\n");
    page
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
