//! Outline parser: indented text to `(name, depth)` records.
//!
//! One record per non-empty line. Depth is the leading-whitespace width
//! divided by [`INDENT_WIDTH`], rounded down, so a stray odd space never
//! produces an error. A tab counts as one full indent unit.

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

/// Columns per depth level. Two spaces or one tab.
pub const INDENT_WIDTH: usize = 2;

/// A single outline entry in document order.
///
/// The record's position in the parsed sequence doubles as its node id for
/// the rest of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineRecord {
    pub name: String,
    pub depth: usize,
}

impl OutlineRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, depth: usize) -> Self {
        Self { name: name.into(), depth }
    }
}

/// Parse indented outline text into ordered records.
///
/// Blank lines and lines whose trimmed name is empty are skipped.
#[must_use]
pub fn parse(input: &str) -> Vec<OutlineRecord> {
    input.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<OutlineRecord> {
    let mut columns = 0;
    let mut rest = line;
    for (offset, ch) in line.char_indices() {
        match ch {
            ' ' => columns += 1,
            '\t' => columns += INDENT_WIDTH,
            _ => {
                rest = &line[offset..];
                break;
            }
        }
    }

    let name = rest.trim();
    if name.is_empty() {
        return None;
    }
    Some(OutlineRecord { name: name.to_owned(), depth: columns / INDENT_WIDTH })
}

/// Flatten records back into indented text, two spaces per depth level.
///
/// This is the format stored as `sitemapText` metadata; [`parse`] reads it
/// back into the same records.
#[must_use]
pub fn to_indented_text(records: &[OutlineRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{}{}", " ".repeat(r.depth * INDENT_WIDTH), r.name))
        .collect::<Vec<_>>()
        .join("\n")
}
