//! Text positions.

use serde::{Deserialize, Serialize};

/// Position in a text buffer (0-based line, 0-based UTF-16 character).
///
/// This is the same shape LSP uses, so positions reported by TypeScript
/// tooling deserialize directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }

    /// Same character, different line.
    #[inline]
    pub fn with_line(self, line: u32) -> Self {
        Self { line, ..self }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}
