//! Text measurement and word wrapping.

use unicode_width::UnicodeWidthChar;

use super::geometry::{FontSpec, PT_TO_MM};

/// Measures rendered text width.
pub trait TextMeasure {
    /// Width of `text` in mm when set in `font`.
    fn text_width(&self, text: &str, font: &FontSpec) -> f32;
}

/// Approximate advance widths of the standard Helvetica faces.
///
/// Widths are grouped into a few classes rather than a full AFM table;
/// wide (East Asian) characters count double and zero-width characters
/// count nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

impl HelveticaMetrics {
    /// Advance width of one character in em units.
    fn char_em(c: char) -> f32 {
        match c {
            'i' | 'j' | 'l' | '\'' | '|' | '!' | '.' | ',' | ':' | ';' => 0.24,
            ' ' | 'f' | 't' | 'I' | '/' | '(' | ')' | '[' | ']' | '-' => 0.30,
            'r' => 0.33,
            'm' | 'w' => 0.80,
            'M' | 'W' => 0.85,
            '0'..='9' => 0.556,
            'A'..='Z' => 0.68,
            '•' => 0.35,
            _ => 0.52,
        }
    }
}

impl TextMeasure for HelveticaMetrics {
    fn text_width(&self, text: &str, font: &FontSpec) -> f32 {
        let em: f32 = text
            .chars()
            .map(|c| Self::char_em(c) * c.width().unwrap_or(0) as f32)
            .sum();
        let weight = if font.bold { 1.06 } else { 1.0 };
        em * weight * font.size * PT_TO_MM
    }
}

/// Greedy word wrap of a single line of text to `max_width`.
///
/// Words are separated by whitespace; a word wider than the line on its own
/// is split between characters. Empty input yields no lines.
pub fn wrap_text<M: TextMeasure + ?Sized>(
    text: &str,
    max_width: f32,
    font: &FontSpec,
    measure: &M,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if measure.text_width(&candidate, font) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if measure.text_width(word, font) <= max_width {
            current = word.to_string();
        } else {
            let mut pieces = split_word(word, max_width, font, measure);
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_word<M: TextMeasure + ?Sized>(
    word: &str,
    max_width: f32,
    font: &FontSpec,
    measure: &M,
) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for c in word.chars() {
        piece.push(c);
        // Keep at least one character per piece so narrow columns still progress.
        if measure.text_width(&piece, font) > max_width && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
