//! Layout-preserving page text.
//!
//! The content stream is replayed with a text matrix so every shown string
//! lands at a position. Strings are grouped into lines by baseline, written
//! top to bottom, and placed on a character grid so that horizontal gaps
//! survive as runs of spaces.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::Result;

use super::lopdf_source::decode_pdf_string;

/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

/// Gaps wider than this many font sizes separate columns, not words.
const COLUMN_GAP: f32 = 2.0;

/// Baseline distance, in font sizes, above which a blank line is written.
const PARAGRAPH_GAP: f32 = 1.5;

/// A string shown at a position in text space.
#[derive(Debug, Clone, PartialEq)]
struct TextSpan {
    text: String,
    x: f32,
    y: f32,
    font_size: f32,
}

impl TextSpan {
    fn new(text: String, x: f32, y: f32, font_size: f32) -> Self {
        Self {
            text,
            x,
            y,
            font_size,
        }
    }

    /// Estimated right edge.
    fn end(&self) -> f32 {
        self.x + self.text.chars().count() as f32 * self.font_size * GLYPH_WIDTH
    }
}

/// Text matrix state between `BT` and `ET`.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Extract the text of a page as newline-separated lines.
pub(crate) fn page_layout_text(doc: &LopdfDocument, page_id: ObjectId) -> Result<String> {
    let spans = extract_page_spans(doc, page_id)?;
    Ok(render_lines(&group_spans_into_lines(spans)))
}

/// Replay a page's content stream and collect positioned strings.
fn extract_page_spans(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<TextSpan>> {
    let content = doc.get_page_content(page_id)?;
    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let fonts = doc.get_page_fonts(page_id)?;
    let content = Content::decode(&content)?;

    let mut spans = Vec::new();
    let mut font_name: Vec<u8> = Vec::new();
    let mut font_size: f32 = 12.0;
    let mut matrix = TextMatrix::default();
    let mut leading: f32 = 0.0;
    let mut in_text = false;

    for op in &content.operations {
        let operands = &op.operands;
        let shown: Option<String> = match op.operator.as_str() {
            "BT" => {
                in_text = true;
                matrix = TextMatrix {
                    leading,
                    ..TextMatrix::default()
                };
                None
            }
            "ET" => {
                in_text = false;
                None
            }
            "Tf" => {
                if let (Some(Object::Name(name)), Some(size)) =
                    (operands.first(), operands.get(1).and_then(get_number))
                {
                    font_name = name.clone();
                    font_size = size;
                }
                None
            }
            "TL" => {
                if let Some(tl) = operands.first().and_then(get_number) {
                    leading = tl;
                    matrix.leading = tl;
                }
                None
            }
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (
                    operands.first().and_then(get_number),
                    operands.get(1).and_then(get_number),
                ) {
                    if op.operator == "TD" {
                        leading = -ty;
                        matrix.leading = leading;
                    }
                    matrix.translate(tx, ty);
                }
                None
            }
            "Tm" => {
                let values: Vec<f32> = operands.iter().filter_map(get_number).collect();
                if let [a, b, c, d, e, f] = values[..] {
                    matrix.set(a, b, c, d, e, f);
                }
                None
            }
            "T*" => {
                matrix.next_line();
                None
            }
            "Tj" if in_text => operands
                .first()
                .and_then(|o| o.as_str().ok())
                .map(|bytes| decode_shown(doc, &fonts, &font_name, bytes)),
            "TJ" if in_text => match operands.first() {
                Some(Object::Array(items)) => Some(decode_array(doc, &fonts, &font_name, items)),
                _ => None,
            },
            "'" | "\"" if in_text => {
                matrix.next_line();
                let index = if op.operator == "\"" { 2 } else { 0 };
                operands
                    .get(index)
                    .and_then(|o| o.as_str().ok())
                    .map(|bytes| decode_shown(doc, &fonts, &font_name, bytes))
            }
            _ => None,
        };

        if let Some(text) = shown {
            if !text.trim().is_empty() {
                let (x, y) = matrix.position();
                spans.push(TextSpan::new(text, x, y, font_size * matrix.scale()));
            }
        }
    }

    Ok(spans)
}

/// Group spans into lines, top to bottom, each sorted left to right.
fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<Vec<TextSpan>> {
    // PDF y grows upwards; the sort is stable so same-position strings keep
    // their stream order.
    spans.sort_by(|a, b| b.y.total_cmp(&a.y));

    let mut lines: Vec<Vec<TextSpan>> = Vec::new();
    let mut line_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match line_y {
            Some(y) if (span.y - y).abs() <= tolerance => {
                if let Some(line) = lines.last_mut() {
                    line.push(span);
                }
            }
            _ => {
                line_y = Some(span.y);
                lines.push(vec![span]);
            }
        }
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    lines
}

/// Write lines on a character grid anchored at the leftmost span.
fn render_lines(lines: &[Vec<TextSpan>]) -> String {
    let Some(origin) = lines
        .iter()
        .flatten()
        .map(|s| s.x)
        .min_by(|a, b| a.total_cmp(b))
    else {
        return String::new();
    };
    let cell = dominant_font_size(lines) * GLYPH_WIDTH;

    let mut out = String::new();
    let mut prev_y: Option<(f32, f32)> = None;

    for line in lines {
        let Some(first) = line.first() else {
            continue;
        };
        if let Some((y, size)) = prev_y {
            out.push('\n');
            if y - first.y > size * PARAGRAPH_GAP {
                out.push('\n');
            }
        }
        prev_y = Some((first.y, first.font_size));

        let mut written = 0usize;
        let mut prev: Option<&TextSpan> = None;
        for span in line {
            let column = ((span.x - origin) / cell).round().max(0.0) as usize;
            let pad = match prev {
                None => column,
                Some(p) => {
                    let gap = span.x - p.end();
                    if gap < span.font_size * 0.15 {
                        0
                    } else if gap < span.font_size * COLUMN_GAP {
                        1
                    } else {
                        column.saturating_sub(written).max(2)
                    }
                }
            };
            out.extend(std::iter::repeat(' ').take(pad));
            out.push_str(&span.text);
            written += pad + span.text.chars().count();
            prev = Some(span);
        }
    }

    out
}

/// Font size carrying the most characters.
fn dominant_font_size(lines: &[Vec<TextSpan>]) -> f32 {
    let mut weights: BTreeMap<u32, usize> = BTreeMap::new();
    for span in lines.iter().flatten() {
        *weights.entry((span.font_size * 10.0) as u32).or_default() += span.text.len();
    }
    weights
        .into_iter()
        .max_by_key(|(_, chars)| *chars)
        .map(|(size, _)| (size as f32 / 10.0).max(1.0))
        .unwrap_or(12.0)
}

/// Decode a shown string with the current font's encoding.
fn decode_shown(
    doc: &LopdfDocument,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    font_name: &[u8],
    bytes: &[u8],
) -> String {
    let encoding = fonts
        .get(font_name)
        .and_then(|font| font.get_font_encoding(doc).ok());

    encoding
        .and_then(|enc| LopdfDocument::decode_text(&enc, bytes).ok())
        .unwrap_or_else(|| decode_pdf_string(bytes))
}

/// Decode a `TJ` array. Kerning beyond a fifth of an em becomes a space.
fn decode_array(
    doc: &LopdfDocument,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    font_name: &[u8],
    items: &[Object],
) -> String {
    let mut combined = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => {
                combined.push_str(&decode_shown(doc, fonts, font_name, bytes));
            }
            other => {
                let adjustment = get_number(other).map(|n| -n).unwrap_or(0.0);
                if adjustment > 200.0 && !combined.is_empty() && !combined.ends_with(' ') {
                    combined.push(' ');
                }
            }
        }
    }
    combined
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text.to_string(), x, y, 12.0)
    }

    #[test]
    fn test_lines_ordered_top_down() {
        let lines = group_spans_into_lines(vec![
            span("second", 50.0, 686.0),
            span("first", 50.0, 700.0),
            span("tail", 120.0, 700.5),
        ]);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][0].text, "first");
        assert_eq!(lines[0][1].text, "tail");
        assert_eq!(lines[1][0].text, "second");
    }

    #[test]
    fn test_words_single_spaced() {
        // "Hello" ends at 80; the next word starts one glyph later.
        let lines =
            group_spans_into_lines(vec![span("Hello", 50.0, 700.0), span("world", 84.0, 700.0)]);
        assert_eq!(render_lines(&lines), "Hello world");
    }

    #[test]
    fn test_adjacent_strings_join() {
        let lines =
            group_spans_into_lines(vec![span("Hel", 50.0, 700.0), span("lo", 68.0, 700.0)]);
        assert_eq!(render_lines(&lines), "Hello");
    }

    #[test]
    fn test_columns_aligned_on_grid() {
        let lines = group_spans_into_lines(vec![
            span("Name", 50.0, 700.0),
            span("Score", 200.0, 700.0),
            span("Alice", 50.0, 686.0),
            span("42", 200.0, 686.0),
        ]);
        let text = render_lines(&lines);
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].find("Score"), rows[1].find("42"));
        assert!(rows[0].contains("Name  "));
    }

    #[test]
    fn test_wide_baseline_gap_writes_blank_line() {
        let lines = group_spans_into_lines(vec![
            span("One.", 50.0, 700.0),
            span("Two.", 50.0, 660.0),
        ]);
        assert_eq!(render_lines(&lines), "One.\n\nTwo.");
    }

    #[test]
    fn test_empty_page_renders_nothing() {
        assert_eq!(render_lines(&[]), "");
    }

    #[test]
    fn test_text_matrix_moves() {
        let mut matrix = TextMatrix::default();
        matrix.translate(50.0, 700.0);
        matrix.translate(0.0, -14.0);
        assert_eq!(matrix.position(), (50.0, 686.0));

        matrix.leading = 12.0;
        matrix.next_line();
        assert_eq!(matrix.position(), (50.0, 674.0));

        matrix.set(2.0, 0.0, 0.0, 2.0, 10.0, 20.0);
        assert_eq!(matrix.scale(), 2.0);
        assert_eq!(matrix.position(), (10.0, 20.0));
    }
}
