//! Line-offset index for converting between offsets and positions.
//!
//! Offsets and characters are counted in UTF-16 code units, the unit used by
//! JavaScript tooling, source maps and LSP. `\r`, `\n` and `\r\n` all end a
//! line; `\r\n` is a single two-unit terminator.

use std::ops::Range;

use crate::Position;

/// Line start offsets for one text snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Offset of the first character of each line. `line_starts[0]` is 0.
    line_starts: Vec<u32>,
    /// Length of the text in UTF-16 code units.
    len: u32,
}

impl LineIndex {
    /// Scan `text` once and record where every line starts.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut offset = 0u32;
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            offset += ch.len_utf16() as u32;
            match ch {
                '\r' => {
                    if chars.next_if_eq(&'\n').is_some() {
                        offset += 1;
                    }
                    line_starts.push(offset);
                }
                '\n' => line_starts.push(offset),
                _ => {}
            }
        }

        Self {
            line_starts,
            len: offset,
        }
    }

    /// Number of lines. A trailing terminator counts as a final empty line.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Text length in UTF-16 code units.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The raw line-offset table.
    #[inline]
    pub fn line_starts(&self) -> &[u32] {
        &self.line_starts
    }

    /// Offset range of `line`, including its terminator.
    pub fn line_range(&self, line: u32) -> Option<Range<u32>> {
        let line = line as usize;
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.len);
        Some(start..end)
    }

    /// Convert a position to an absolute offset.
    ///
    /// Lines past the end resolve to the text length. The character is
    /// clamped so the result never leaves its line's range.
    pub fn offset_at(&self, position: Position) -> u32 {
        let Some(range) = self.line_range(position.line) else {
            return self.len;
        };
        range
            .start
            .saturating_add(position.character)
            .min(range.end)
            .max(range.start)
    }

    /// Convert an absolute offset to a position.
    ///
    /// The offset is clamped into `[0, len]` first. Binary search, O(log n)
    /// in the number of lines.
    pub fn position_at(&self, offset: u32) -> Position {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .checked_sub(1);

        match line {
            Some(line) => Position::new(line as u32, offset - self.line_starts[line]),
            None => Position::new(0, offset),
        }
    }
}
