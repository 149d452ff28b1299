//! Bridge over the rewriter's source map.
//!
//! Maps 0-based positions in rewritten code back to 0-based positions in the
//! document the rewriter was given. Lookups follow the usual JavaScript
//! consumer behavior: the greatest segment at or before the column on the
//! same generated line wins, and its original position is returned as-is.

use std::borrow::Cow;

use calque_carton::Position;
use serde_json::Value;

use crate::error::CanonResult;

/// One decoded mapping segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    generated_column: u32,
    /// `None` for segments that carry no source (synthesized code).
    original: Option<Position>,
}

/// Position lookups over a generated-to-original source map.
#[derive(Debug, Clone, Default)]
pub struct SourceMapBridge {
    /// Segments per generated line, sorted by column.
    lines: Vec<Vec<Segment>>,
}

impl SourceMapBridge {
    /// Build from a raw JSON source map as emitted by the rewriter.
    ///
    /// Rewriters disagree on whether `version` is a number or a string; a
    /// numeric string is coerced before decoding.
    pub fn from_json(raw: &Value) -> CanonResult<Self> {
        let raw = normalize_version(raw);
        let bytes = serde_json::to_vec(raw.as_ref())?;
        Self::from_slice(&bytes)
    }

    /// Build from serialized source map JSON.
    pub fn from_slice(bytes: &[u8]) -> CanonResult<Self> {
        let map = sourcemap::SourceMap::from_slice(bytes)?;
        Ok(Self::from_source_map(&map))
    }

    /// Index the tokens of an already decoded map.
    pub fn from_source_map(map: &sourcemap::SourceMap) -> Self {
        let mut lines: Vec<Vec<Segment>> = Vec::new();

        for token in map.tokens() {
            let line = token.get_dst_line() as usize;
            if lines.len() <= line {
                lines.resize_with(line + 1, Vec::new);
            }
            let original = token
                .get_source()
                .map(|_| Position::new(token.get_src_line(), token.get_src_col()));
            lines[line].push(Segment {
                generated_column: token.get_dst_col(),
                original,
            });
        }

        for segments in &mut lines {
            segments.sort_by_key(|s| s.generated_column);
        }

        Self { lines }
    }

    /// Map a generated position to the original document.
    ///
    /// Returns `None` when the generated line has no segment at or before the
    /// column, or when that segment has no source.
    pub fn original_position(&self, position: Position) -> Option<Position> {
        let segments = self.lines.get(position.line as usize)?;
        let idx = segments
            .partition_point(|s| s.generated_column <= position.character)
            .checked_sub(1)?;
        segments[idx].original
    }

    /// Map a whole generated line to an original line.
    ///
    /// Uses the first segment on the line that has a source, so indentation
    /// before the first mapped token does not matter.
    pub fn original_line(&self, line: u32) -> Option<u32> {
        self.lines
            .get(line as usize)?
            .iter()
            .find_map(|s| s.original)
            .map(|p| p.line)
    }

    /// Number of generated lines that carry at least one segment.
    pub fn mapped_line_count(&self) -> usize {
        self.lines.iter().filter(|l| !l.is_empty()).count()
    }
}

fn normalize_version(raw: &Value) -> Cow<'_, Value> {
    let Some(Value::String(version)) = raw.get("version") else {
        return Cow::Borrowed(raw);
    };
    let Ok(version) = version.trim().parse::<u64>() else {
        return Cow::Borrowed(raw);
    };
    let mut owned = raw.clone();
    owned["version"] = Value::from(version);
    Cow::Owned(owned)
}
