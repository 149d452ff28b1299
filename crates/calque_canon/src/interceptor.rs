//! Diagnostic filtering at the compiler service boundary.
//!
//! [`DiagnosticsInterceptor`] is a [`ServiceFactory`] that decorates the
//! services of another factory. Diagnostics whose start maps into synthesized
//! code, or that cannot be mapped back to the original document at all, are
//! removed before anything inside the analysis engine can observe them.

use calque_carton::{LineIndex, Position};

use crate::align::{align, AlignmentMap};
use crate::service::{LanguageService, RawDiagnostic, ServiceFactory};

/// Wraps a service factory so every created service filters its diagnostics.
pub struct DiagnosticsInterceptor<'a, M> {
    factory: &'a dyn ServiceFactory,
    rewritten_code: &'a str,
    map_to_original: M,
}

impl<'a, M> DiagnosticsInterceptor<'a, M>
where
    M: Fn(Position) -> Option<Position>,
{
    /// `rewritten_code` is the code handed to the engine; `map_to_original`
    /// maps a position in it to the original document.
    pub fn new(factory: &'a dyn ServiceFactory, rewritten_code: &'a str, map_to_original: M) -> Self {
        Self {
            factory,
            rewritten_code,
            map_to_original,
        }
    }
}

impl<M> ServiceFactory for DiagnosticsInterceptor<'_, M>
where
    M: Fn(Position) -> Option<Position>,
{
    fn create_service(&self, file_name: &str, code: &str) -> Box<dyn LanguageService + '_> {
        Box::new(InterceptedService {
            inner: self.factory.create_service(file_name, code),
            rewritten_code: self.rewritten_code,
            map_to_original: &self.map_to_original,
        })
    }
}

struct InterceptedService<'s, M> {
    inner: Box<dyn LanguageService + 's>,
    rewritten_code: &'s str,
    map_to_original: &'s M,
}

impl<M> InterceptedService<'_, M>
where
    M: Fn(Position) -> Option<Position>,
{
    fn original_position(
        &self,
        diagnostic: &RawDiagnostic,
        view: &LineIndex,
        alignment: &AlignmentMap,
    ) -> Option<Position> {
        let at = view.position_at(diagnostic.start?);
        let line = alignment.generated_to_original(at.line)?;
        (self.map_to_original)(at.with_line(line))
    }
}

impl<M> LanguageService for InterceptedService<'_, M>
where
    M: Fn(Position) -> Option<Position>,
{
    fn diagnostics(&self, file_name: &str) -> Vec<RawDiagnostic> {
        let raw = self.inner.diagnostics(file_name);
        if raw.is_empty() {
            return raw;
        }

        let view = self.inner.source_text(file_name);
        let view = view.as_deref().unwrap_or(self.rewritten_code);
        let alignment = align(self.rewritten_code, view);
        let index = LineIndex::new(view);

        let total = raw.len();
        let kept: Vec<RawDiagnostic> = raw
            .into_iter()
            .filter(|diag| match self.original_position(diag, &index, &alignment) {
                Some(original) if original.line > 0 => true,
                original => {
                    tracing::debug!(
                        "dropping diagnostic TS{} at {:?} (maps to {:?}): {}",
                        diag.code,
                        diag.start,
                        original,
                        diag.message
                    );
                    false
                }
            })
            .collect();

        tracing::debug!(
            "intercepted {} of {} diagnostics for {}",
            total - kept.len(),
            total,
            file_name
        );
        kept
    }

    fn source_text(&self, file_name: &str) -> Option<String> {
        self.inner.source_text(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubService {
        diagnostics: Vec<RawDiagnostic>,
        text: Option<String>,
    }

    impl LanguageService for StubService {
        fn diagnostics(&self, _file_name: &str) -> Vec<RawDiagnostic> {
            self.diagnostics.clone()
        }

        fn source_text(&self, _file_name: &str) -> Option<String> {
            self.text.clone()
        }
    }

    struct StubFactory {
        diagnostics: Vec<RawDiagnostic>,
        text: Option<String>,
    }

    impl ServiceFactory for StubFactory {
        fn create_service(&self, _file_name: &str, _code: &str) -> Box<dyn LanguageService + '_> {
            Box::new(StubService {
                diagnostics: self.diagnostics.clone(),
                text: self.text.clone(),
            })
        }
    }

    const CODE: &str = "ref a\nref b\nref c\nlet x = 1\nlet y: string = x\nhelper()";

    /// Three synthetic lines, then user code shifted by one line, then a
    /// synthesized helper call with no origin.
    fn shift_mapper(position: Position) -> Option<Position> {
        match position.line {
            0..=2 | 5 => None,
            line => Some(position.with_line(line - 2)),
        }
    }

    fn offset_of(text: &str, needle: &str) -> u32 {
        text.find(needle).unwrap() as u32
    }

    #[test]
    fn test_drops_synthetic_and_unmapped() {
        let factory = StubFactory {
            diagnostics: vec![
                RawDiagnostic::error(2304, "in prelude", offset_of(CODE, "ref b"), 3),
                RawDiagnostic::error(2322, "real", offset_of(CODE, "y: string"), 1),
                RawDiagnostic::error(2349, "helper", offset_of(CODE, "helper"), 6),
                RawDiagnostic {
                    start: None,
                    ..RawDiagnostic::error(2318, "global", 0, 0)
                },
            ],
            text: None,
        };
        let interceptor = DiagnosticsInterceptor::new(&factory, CODE, shift_mapper);
        let service = interceptor.create_service("doc.ts", CODE);

        let kept = service.diagnostics("doc.ts");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].message, "real");
    }

    #[test]
    fn test_line_zero_of_the_original_is_dropped() {
        // Original line 0 holds the opening tag, never checkable code.
        let factory = StubFactory {
            diagnostics: vec![RawDiagnostic::error(1, "x", offset_of(CODE, "let x"), 1)],
            text: None,
        };
        let interceptor =
            DiagnosticsInterceptor::new(&factory, CODE, |p: Position| Some(p.with_line(0)));
        let service = interceptor.create_service("doc.ts", CODE);
        assert!(service.diagnostics("doc.ts").is_empty());
    }

    #[test]
    fn test_uses_the_checker_view() {
        // The checker dropped "let x = 1"; offsets are relative to its view.
        let view = "ref a\nref b\nref c\nlet y: string = x\nhelper()";
        let factory = StubFactory {
            diagnostics: vec![RawDiagnostic::error(2322, "real", offset_of(view, "y: string"), 1)],
            text: Some(view.to_string()),
        };
        let seen = std::cell::RefCell::new(Vec::new());
        let interceptor = DiagnosticsInterceptor::new(&factory, CODE, |p: Position| {
            seen.borrow_mut().push(p);
            shift_mapper(p)
        });
        let service = interceptor.create_service("doc.ts", CODE);

        assert_eq!(service.diagnostics("doc.ts").len(), 1);
        // View line 3 is rewritten line 4.
        assert_eq!(seen.borrow().as_slice(), &[Position::new(4, 4)]);
        assert_eq!(service.source_text("doc.ts").as_deref(), Some(view));
    }
}
