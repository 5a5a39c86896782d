//! Greedy word wrap with ellipsis truncation.
//!
//! Overflow is never an error. A word wider than the line is cut and ends
//! in [`ELLIPSIS`]; text that needs more lines than allowed keeps the first
//! `max_lines` lines and the last one ends in [`ELLIPSIS`].

use crate::font::FontFace;

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Wrap `text` into at most `max_lines` lines no wider than `max_width`.
///
/// Newlines start a new paragraph; an empty paragraph yields an empty line.
pub fn wrap(face: &dyn FontFace, text: &str, max_width: u32, max_lines: usize) -> Vec<String> {
    if max_lines == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        wrap_paragraph(face, paragraph, max_width, &mut lines);
        if lines.len() > max_lines {
            break;
        }
    }

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            *last = truncate_with_ellipsis(face, last, max_width);
        }
    }
    lines
}

/// Fit `text` on one line, cutting it with an ellipsis when it overflows.
pub fn ellipsize(face: &dyn FontFace, text: &str, max_width: u32) -> String {
    if face.measure(text) <= max_width {
        return text.to_string();
    }
    truncate_with_ellipsis(face, text, max_width)
}

fn wrap_paragraph(face: &dyn FontFace, paragraph: &str, max_width: u32, lines: &mut Vec<String>) {
    let mut current = String::new();
    let mut any_word = false;

    for word in paragraph.split_whitespace() {
        any_word = true;
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate_width =
            face.measure(&current) + face.advance(' ') + face.measure(word);
        if candidate_width <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(ellipsize(face, &current, max_width));
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(ellipsize(face, &current, max_width));
    } else if !any_word {
        lines.push(String::new());
    }
}

/// Longest prefix of `text` that fits together with the ellipsis.
///
/// Returns an empty string when not even the ellipsis fits.
fn truncate_with_ellipsis(face: &dyn FontFace, text: &str, max_width: u32) -> String {
    let marker = face.measure(ELLIPSIS);
    if marker > max_width {
        return String::new();
    }

    let budget = max_width - marker;
    let mut width = 0;
    let mut kept = String::new();
    for ch in text.chars() {
        let advance = face.advance(ch);
        if width + advance > budget {
            break;
        }
        width += advance;
        kept.push(ch);
    }

    let mut out = kept.trim_end().to_string();
    out.push_str(ELLIPSIS);
    out
}
