//! Position and location utilities.
//!
//! Host type-checkers report declaration sites either as line/column
//! pairs or as byte offsets. This module provides both representations
//! and the conversion between them.

use serde::{Deserialize, Serialize};

/// A position in a source file (0-indexed line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column (UTF-16 code units, matching source-map columns)
    pub character: u32,
}

impl Position {
    #[must_use]
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A declaration site in an original source file.
///
/// This is the unit of source-map attribution: every output node can
/// point back at one of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Path of the file containing the declaration
    pub file: String,
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column (UTF-16 code units)
    pub column: u32,
}

impl SourceLocation {
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line + 1, self.column + 1)
    }
}

/// Line map for efficient offset <-> position conversion.
/// Stores the starting offset of each line.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Starting offset of each line (`line_starts`[0] is always 0)
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map from source text.
    #[must_use]
    pub fn build(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = vec![0u32];

        for (i, &byte) in bytes.iter().enumerate() {
            let terminates_line = match byte {
                b'\n' => true,
                // A bare carriage return ends a line; in a CRLF pair
                // only the \n half counts.
                b'\r' => bytes.get(i + 1) != Some(&b'\n'),
                _ => false,
            };
            if terminates_line {
                line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }

        Self { line_starts }
    }

    /// The index of the line containing `offset`: the last line whose
    /// start is at or before it.
    fn line_of(&self, offset: u32) -> usize {
        self.line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    /// Convert a byte offset to a Position (line, character).
    /// Character is counted in UTF-16 code units.
    #[must_use]
    pub fn offset_to_position(&self, offset: u32, source: &str) -> Position {
        let line = self.line_of(offset);
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);

        Position {
            line: u32::try_from(line).unwrap_or(u32::MAX),
            character: utf16_width(source, line_start, offset),
        }
    }

    /// Convert a byte offset in `source` to a full `SourceLocation` for `file`.
    #[must_use]
    pub fn offset_to_location(&self, file: &str, offset: u32, source: &str) -> SourceLocation {
        let pos = self.offset_to_position(offset, source);
        SourceLocation::new(file, pos.line, pos.character)
    }

    /// Get the number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the starting offset of a line.
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<u32> {
        self.line_starts.get(line).copied()
    }
}

/// UTF-16 code-unit width of `source[from..to]`, clamped to the text
/// and yielding 0 when the range is not a character boundary.
fn utf16_width(source: &str, from: u32, to: u32) -> u32 {
    let from = (from as usize).min(source.len());
    let to = (to as usize).min(source.len()).max(from);
    let units = source
        .get(from..to)
        .map(|slice| slice.encode_utf16().count())
        .unwrap_or(0);
    u32::try_from(units).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[path = "../tests/position_tests.rs"]
mod tests;
