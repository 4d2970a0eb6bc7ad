//! Line-level handling of manifest text.
//!
//! A header occupies one logical line that may be folded onto following
//! physical lines, each starting with a single space. The main section ends
//! at the first blank line; anything after it belongs to per-entry sections
//! (for example JAR signing digests).

use std::ops::Range;

/// A physical line inside a manifest text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalLine {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset just past the content (before the terminator).
    pub content_end: usize,
    /// Byte offset just past the terminator.
    pub end: usize,
}

impl PhysicalLine {
    /// The line content without its terminator.
    pub fn content<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.content_end]
    }

    /// Whether this line continues the previous logical line.
    pub fn is_continuation(&self, text: &str) -> bool {
        self.content(text).starts_with(' ')
    }

    /// Whether this line is empty.
    pub fn is_blank(&self) -> bool {
        self.start == self.content_end
    }
}

/// Split text into physical lines, accepting `\r\n`, `\n` and `\r` terminators.
pub fn physical_lines(text: &str) -> Vec<PhysicalLine> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                let end = if bytes.get(i + 1) == Some(&b'\n') { i + 2 } else { i + 1 };
                lines.push(PhysicalLine { start, content_end: i, end });
                start = end;
                i = end;
            }
            b'\n' => {
                lines.push(PhysicalLine { start, content_end: i, end: i + 1 });
                start = i + 1;
                i += 1;
            }
            _ => i += 1,
        }
    }

    if start < bytes.len() {
        lines.push(PhysicalLine {
            start,
            content_end: bytes.len(),
            end: bytes.len(),
        });
    }

    lines
}

/// The location of a header inside manifest text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSpan {
    /// Canonical name as written in the text.
    pub name: String,
    /// Byte range covering the header and all its continuation lines,
    /// including the final terminator.
    pub bytes: Range<usize>,
    /// 1-based number of the first physical line.
    pub line: usize,
    /// The unfolded, trimmed value.
    pub value: String,
}

/// Iterate over every header in the main section.
pub fn main_section_headers(text: &str) -> Vec<HeaderSpan> {
    let lines = physical_lines(text);
    let mut headers = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if line.is_blank() {
            break;
        }
        if line.is_continuation(text) {
            // Orphan continuation at the top of the text
            i += 1;
            continue;
        }

        let content = line.content(text);
        let Some((name, first)) = content.split_once(':') else {
            i += 1;
            continue;
        };

        let mut value = first.strip_prefix(' ').unwrap_or(first).to_string();
        let mut last = i;
        while last + 1 < lines.len() && lines[last + 1].is_continuation(text) {
            last += 1;
            value.push_str(&lines[last].content(text)[1..]);
        }

        headers.push(HeaderSpan {
            name: name.trim().to_string(),
            bytes: line.start..lines[last].end,
            line: i + 1,
            value: value.trim().to_string(),
        });
        i = last + 1;
    }

    headers
}

/// Locate a header by name (ASCII case-insensitive) in the main section.
pub fn find_header(text: &str, name: &str) -> Option<HeaderSpan> {
    main_section_headers(text)
        .into_iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
}

/// Byte offset of the first blank line, which separates the main section
/// from any per-entry sections.
pub fn main_section_end(text: &str) -> Option<usize> {
    physical_lines(text)
        .into_iter()
        .find(|l| l.is_blank())
        .map(|l| l.start)
}

/// Split on `separator` outside double quotes, trimming each piece and
/// dropping empty pieces.
pub fn split_unquoted(value: &str, separator: char) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in value.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                current.push(c);
            }
            c if c == separator && !quoted => {
                pieces.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    pieces.push(current);

    pieces
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Split a header value into its comma-separated clauses.
pub fn split_clauses(value: &str) -> Vec<String> {
    split_unquoted(value, ',')
}
