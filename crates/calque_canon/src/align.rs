//! Whole-line alignment between two related texts.
//!
//! The *after* text is expected to be the *before* text with whole lines
//! deleted. Lines are matched by exact text, greedily and in order. Once an
//! *after* line has no match the walk stops, and everything after it is left
//! unmapped.

use calque_carton::split_lines;

/// Line correspondence between a *before* ("original") and an *after*
/// ("generated") text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentMap {
    /// Indexed by *after* line.
    generated_to_original: Vec<Option<u32>>,
    /// Indexed by *before* line.
    original_to_generated: Vec<Option<u32>>,
    /// *Before* lines with no *after* counterpart, ascending.
    removed_lines: Vec<u32>,
}

impl AlignmentMap {
    /// The *before* line an *after* line came from.
    #[inline]
    pub fn generated_to_original(&self, line: u32) -> Option<u32> {
        self.generated_to_original
            .get(line as usize)
            .copied()
            .flatten()
    }

    /// The *after* line a *before* line ended up on.
    #[inline]
    pub fn original_to_generated(&self, line: u32) -> Option<u32> {
        self.original_to_generated
            .get(line as usize)
            .copied()
            .flatten()
    }

    /// *Before* lines that do not survive in *after*.
    #[inline]
    pub fn removed_lines(&self) -> &[u32] {
        &self.removed_lines
    }

    /// Number of lines in the *before* text.
    pub fn original_line_count(&self) -> usize {
        self.original_to_generated.len()
    }

    /// Number of lines in the *after* text.
    pub fn generated_line_count(&self) -> usize {
        self.generated_to_original.len()
    }

    /// Number of *after* lines that found a counterpart.
    pub fn matched_count(&self) -> usize {
        self.generated_to_original.iter().flatten().count()
    }

    /// True when both texts have the same lines.
    pub fn is_identity(&self) -> bool {
        self.removed_lines.is_empty()
            && self.generated_line_count() == self.original_line_count()
            && self.matched_count() == self.generated_line_count()
    }
}

/// Align `after` against `before`.
pub fn align(before: &str, after: &str) -> AlignmentMap {
    let before_lines = split_lines(before);
    let after_lines = split_lines(after);

    let mut generated_to_original = vec![None; after_lines.len()];
    let mut original_to_generated = vec![None; before_lines.len()];
    let mut cursor = 0;

    for (i, line) in after_lines.iter().enumerate() {
        let Some(found) = before_lines[cursor..].iter().position(|b| b == line) else {
            tracing::debug!(
                "alignment stopped at line {} of {}; remaining lines stay unmapped",
                i,
                after_lines.len()
            );
            break;
        };
        let j = cursor + found;
        generated_to_original[i] = Some(j as u32);
        original_to_generated[j] = Some(i as u32);
        cursor = j + 1;
    }

    let removed_lines = original_to_generated
        .iter()
        .enumerate()
        .filter(|(_, mapped)| mapped.is_none())
        .map(|(line, _)| line as u32)
        .collect();

    AlignmentMap {
        generated_to_original,
        original_to_generated,
        removed_lines,
    }
}
