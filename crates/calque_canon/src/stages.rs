//! Position-mapping stages.
//!
//! Every result reported by the analysis engine is walked back through:
//!
//! ```text
//! engine output ──► PrependCorrection ──► AlignmentCorrection ──► SourceMapStage
//!    (line, char)    drop reference lines   undo engine line drops   rewritten code → document
//!                                                                          │
//!                              processed document ◄── ProcessedCorrection ◄┘
//! ```
//!
//! A stage returns `None` when the position has no counterpart; the result
//! is then dropped by the pipeline.

use calque_carton::Position;

use crate::align::AlignmentMap;
use crate::source_map::SourceMapBridge;

/// One position transformation.
pub trait Stage {
    fn name(&self) -> &'static str;

    fn apply(&self, position: Position) -> Option<Position>;
}

/// Removes the synthetic reference lines prepended to the rewritten code.
#[derive(Debug, Clone, Copy)]
pub struct PrependCorrection {
    pub lines: u32,
}

impl Stage for PrependCorrection {
    fn name(&self) -> &'static str {
        "prepend"
    }

    fn apply(&self, position: Position) -> Option<Position> {
        Some(position.with_line(position.line.checked_sub(self.lines)?))
    }
}

/// Undoes line drops the engine performed on the code it was given.
///
/// The alignment is computed over the full generated text, reference lines
/// included, while this stage runs after [`PrependCorrection`]; lookups are
/// shifted by the prepended line count accordingly.
#[derive(Debug, Clone, Copy)]
pub struct AlignmentCorrection<'a> {
    pub alignment: &'a AlignmentMap,
    pub prepended: u32,
}

impl Stage for AlignmentCorrection<'_> {
    fn name(&self) -> &'static str {
        "alignment"
    }

    fn apply(&self, position: Position) -> Option<Position> {
        let engine_line = position.line.checked_add(self.prepended)?;
        let generated_line = self.alignment.generated_to_original(engine_line)?;
        Some(position.with_line(generated_line.checked_sub(self.prepended)?))
    }
}

/// Maps rewritten code back to the original document.
#[derive(Debug, Clone, Copy)]
pub struct SourceMapStage<'a> {
    pub bridge: &'a SourceMapBridge,
}

impl Stage for SourceMapStage<'_> {
    fn name(&self) -> &'static str {
        "source-map"
    }

    fn apply(&self, position: Position) -> Option<Position> {
        self.bridge.original_position(position)
    }
}

/// Moves an original-document position into the processed document.
#[derive(Debug, Clone, Copy)]
pub struct ProcessedCorrection<'a> {
    pub alignment: &'a AlignmentMap,
}

impl Stage for ProcessedCorrection<'_> {
    fn name(&self) -> &'static str {
        "processed"
    }

    fn apply(&self, position: Position) -> Option<Position> {
        Some(position.with_line(self.alignment.original_to_generated(position.line)?))
    }
}

/// Ordered sequence of stages applied one after another.
#[derive(Default)]
pub struct StageChain<'a> {
    stages: Vec<Box<dyn Stage + 'a>>,
}

impl<'a> StageChain<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn then(mut self, stage: impl Stage + 'a) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Run `position` through every stage, stopping at the first that has no
    /// counterpart.
    pub fn apply(&self, position: Position) -> Option<Position> {
        self.stages.iter().try_fold(position, |current, stage| {
            let next = stage.apply(current);
            if next.is_none() {
                tracing::debug!("position {} lost at stage '{}'", current, stage.name());
            }
            next
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::align;

    #[test]
    fn test_prepend_correction() {
        let stage = PrependCorrection { lines: 3 };
        assert_eq!(stage.apply(Position::new(5, 2)), Some(Position::new(2, 2)));
        assert_eq!(stage.apply(Position::new(3, 0)), Some(Position::new(0, 0)));
        assert_eq!(stage.apply(Position::new(2, 9)), None);
    }

    #[test]
    fn test_alignment_correction_accounts_for_prepended_lines() {
        let generated = "ref\nref\na\n// @errors\nb\nc";
        let engine = "ref\nref\na\nb\nc";
        let alignment = align(generated, engine);
        let stage = AlignmentCorrection {
            alignment: &alignment,
            prepended: 2,
        };

        // Engine line 3 ("b") minus two reference lines is 1; it was code
        // line 2 before the engine dropped the annotation.
        assert_eq!(stage.apply(Position::new(1, 4)), Some(Position::new(2, 4)));
        assert_eq!(stage.apply(Position::new(0, 0)), Some(Position::new(0, 0)));
        assert_eq!(stage.apply(Position::new(40, 0)), None);
    }

    #[test]
    fn test_processed_correction() {
        let alignment = align("a\nb\nc", "a\nc");
        let stage = ProcessedCorrection {
            alignment: &alignment,
        };
        assert_eq!(stage.apply(Position::new(2, 1)), Some(Position::new(1, 1)));
        assert_eq!(stage.apply(Position::new(1, 1)), None);
    }

    #[test]
    fn test_chain_stops_at_first_gap() {
        let chain = StageChain::new()
            .then(PrependCorrection { lines: 1 })
            .then(PrependCorrection { lines: 1 });

        assert_eq!(chain.apply(Position::new(4, 1)), Some(Position::new(2, 1)));
        assert_eq!(chain.apply(Position::new(1, 1)), None);
        assert_eq!(StageChain::new().apply(Position::new(1, 1)), Some(Position::new(1, 1)));
    }
}
