//! Page mutation orchestrator.
//!
//! Pages are processed one at a time. Within a page, edits run in list
//! order and each edit walks the fragments left to right:
//!
//! ```text
//! Scanning(edit, cursor) -> MatchFound -> Validated -> Mutated
//!                                      \-> Rejected (rotated, degenerate, too small)
//! ```
//!
//! A mutated match consumes its fragments and scanning resumes after them;
//! a rejected match consumes nothing and scanning resumes one fragment
//! after the candidate start that produced it.

pub mod report;

pub use report::{MatchOutcome, PageReport, ReplaceReport};

use crate::backend::{DocumentMutator, Rasterizer, TextExtractor};
use crate::color::{estimate_background, estimate_foreground, RasterImage};
use crate::config::ReplaceConfig;
use crate::edit::Edit;
use crate::error::Result;
use crate::fonts::classify;
use crate::geometry::Viewport;
use crate::layout::{fit_text, reconstruct, FitError};
use crate::text::{ConsumedSet, MatchFinder, MatchSpan, TextFragment};

/// Applies an edit list to every page of a backend.
#[derive(Debug, Clone, Default)]
pub struct Replacer {
    config: ReplaceConfig,
}

/// Page raster, produced on first use.
enum PageRaster {
    Pending,
    Ready(RasterImage, Viewport),
}

/// Result of trying to apply one span.
enum Attempt {
    Done(MatchOutcome),
    /// The page cannot be rendered; stop working on it
    Unrenderable,
}

impl Replacer {
    /// Create a replacer with the given configuration.
    pub fn new(config: ReplaceConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ReplaceConfig {
        &self.config
    }

    /// Apply `edits` to every page.
    ///
    /// Per-match failures end up in the report; only document-level errors
    /// are returned.
    pub fn run<B>(&self, backend: &mut B, edits: &[Edit]) -> Result<ReplaceReport>
    where
        B: TextExtractor + Rasterizer + DocumentMutator,
    {
        let mut report = ReplaceReport::default();
        for page in 0..backend.page_count() {
            report.pages.push(self.process_page(backend, page, edits)?);
        }
        log::debug!(
            "Replaced {} matches, rejected {}, across {} pages",
            report.mutated_count(),
            report.rejected_count(),
            report.pages.len()
        );
        Ok(report)
    }

    /// Apply `edits` to one page.
    pub fn process_page<B>(&self, backend: &mut B, page: usize, edits: &[Edit]) -> Result<PageReport>
    where
        B: TextExtractor + Rasterizer + DocumentMutator,
    {
        let mut page_report = PageReport::new(page);

        let fragments = match backend.extract_fragments(page) {
            Ok(fragments) => fragments,
            Err(e) if e.is_page_local() => {
                log::warn!("Skipping page {}: {}", page, e);
                page_report.skipped = true;
                return Ok(page_report);
            },
            Err(e) => return Err(e),
        };
        page_report.fragment_count = fragments.len();

        let mut consumed = ConsumedSet::new();
        let mut raster = PageRaster::Pending;

        'edits: for (edit_index, edit) in edits.iter().enumerate() {
            let finder = MatchFinder::new(&edit.find);
            if finder.is_empty() {
                continue;
            }

            let mut cursor = 0;
            let mut found_any = false;
            while let Some(span) = finder.find_next(&fragments, &consumed, cursor) {
                found_any = true;
                let outcome = match self.apply_span(backend, page, &span, &fragments, edit, &mut raster)? {
                    Attempt::Done(outcome) => outcome,
                    Attempt::Unrenderable => {
                        page_report.skipped = true;
                        break 'edits;
                    },
                };

                cursor = if outcome.is_mutated() {
                    consumed.consume(&span);
                    span.resume_after_consumed()
                } else {
                    span.resume_after_rejected()
                };
                page_report.outcomes.push((edit_index, outcome));
            }

            if !found_any {
                page_report.outcomes.push((edit_index, MatchOutcome::NoMatch));
            }
        }

        page_report.consumed_count = consumed.len();
        log::debug!(
            "Page {}: {} fragments, {} replaced, {} rejected",
            page,
            page_report.fragment_count,
            page_report.mutated_count(),
            page_report.rejected_count()
        );
        Ok(page_report)
    }

    /// Validate one span and, if it passes, redact it and draw the replacement.
    fn apply_span<B>(
        &self,
        backend: &mut B,
        page: usize,
        span: &MatchSpan,
        fragments: &[TextFragment],
        edit: &Edit,
        raster: &mut PageRaster,
    ) -> Result<Attempt>
    where
        B: Rasterizer + DocumentMutator,
    {
        let covered = span.fragments.clone();

        let tolerance = self.config.rotation_tolerance;
        if covered
            .iter()
            .filter_map(|&i| fragments.get(i))
            .any(|f| !f.is_upright(tolerance))
        {
            log::warn!(
                "Page {}: skipping rotated match of '{}' (fragments {:?})",
                page,
                edit.find,
                covered
            );
            return Ok(Attempt::Done(MatchOutcome::RejectedRotated { fragments: covered }));
        }

        let Some(geometry) = reconstruct(span, fragments) else {
            return Ok(Attempt::Done(MatchOutcome::RejectedDegenerate { fragments: covered }));
        };

        let Some(first) = span.first().and_then(|i| fragments.get(i)) else {
            return Ok(Attempt::Done(MatchOutcome::RejectedDegenerate { fragments: covered }));
        };
        let variant = classify(&first.font_name);

        let placement = match fit_text(
            &geometry.bbox,
            geometry.nominal_height,
            &edit.replace,
            |text, size| backend.measure_text(variant, text, size),
            &self.config,
        ) {
            Ok(placement) => placement,
            Err(FitError::Degenerate) => {
                log::debug!("Page {}: degenerate box {:?} for '{}'", page, geometry.bbox, edit.find);
                return Ok(Attempt::Done(MatchOutcome::RejectedDegenerate { fragments: covered }));
            },
            Err(FitError::TooSmall { size }) => {
                log::debug!(
                    "Page {}: '{}' would need size {:.2}, below minimum {:.2}",
                    page,
                    edit.replace,
                    size,
                    self.config.min_font_size
                );
                return Ok(Attempt::Done(MatchOutcome::RejectedTooSmall {
                    fragments: covered,
                    font_size: size,
                }));
            },
        };

        if matches!(raster, PageRaster::Pending) {
            match backend.rasterize(page, self.config.render_scale) {
                Ok((image, viewport)) => *raster = PageRaster::Ready(image, viewport),
                Err(e) if e.is_page_local() => {
                    log::warn!("Skipping page {}: {}", page, e);
                    return Ok(Attempt::Unrenderable);
                },
                Err(e) => return Err(e),
            }
        }
        let PageRaster::Ready(image, viewport) = &*raster else {
            return Ok(Attempt::Unrenderable);
        };

        let background = estimate_background(image, &geometry.pixel_rect(viewport), &self.config);
        let foreground =
            estimate_foreground(image, &geometry.ink_rect(viewport), background, &self.config);

        backend.draw_rect(page, &geometry.bbox, background)?;
        if !edit.replace.is_empty() {
            let font = backend.embed_font(page, variant)?;
            backend.draw_text(
                page,
                &edit.replace,
                placement.origin,
                &font,
                placement.font_size,
                foreground,
            )?;
        }

        Ok(Attempt::Done(MatchOutcome::Mutated {
            fragments: covered,
            bbox: geometry.bbox,
            font: variant,
            font_size: placement.font_size,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::FontHandle;
    use crate::color::Color;
    use crate::error::Error;
    use crate::fonts::FontVariant;
    use crate::geometry::{Matrix, PageBox, PagePoint};

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Rect(usize, PageBox),
        Text(usize, String, f32),
    }

    #[derive(Default)]
    struct MockBackend {
        pages: Vec<Vec<TextFragment>>,
        unrenderable: Vec<usize>,
        ops: Vec<Op>,
    }

    impl TextExtractor for MockBackend {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn extract_fragments(&self, page: usize) -> Result<Vec<TextFragment>> {
            Ok(self.pages[page].clone())
        }
    }

    impl Rasterizer for MockBackend {
        fn rasterize(&self, page: usize, scale: f32) -> Result<(RasterImage, Viewport)> {
            if self.unrenderable.contains(&page) {
                return Err(Error::Unrenderable {
                    page,
                    reason: "mock".to_string(),
                });
            }
            let viewport = Viewport::new(PageBox::new(0.0, 0.0, 200.0, 200.0), scale);
            Ok((RasterImage::filled(viewport.width, viewport.height, Color::WHITE), viewport))
        }
    }

    impl DocumentMutator for MockBackend {
        fn embed_font(&mut self, _page: usize, variant: FontVariant) -> Result<FontHandle> {
            Ok(FontHandle {
                variant,
                resource_name: "R1".to_string(),
            })
        }

        fn draw_rect(&mut self, page: usize, bbox: &PageBox, _color: Color) -> Result<()> {
            self.ops.push(Op::Rect(page, *bbox));
            Ok(())
        }

        fn draw_text(
            &mut self,
            page: usize,
            text: &str,
            _origin: PagePoint,
            _font: &FontHandle,
            size: f32,
            _color: Color,
        ) -> Result<()> {
            self.ops.push(Op::Text(page, text.to_string(), size));
            Ok(())
        }

        fn save(&mut self) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    fn frag(text: &str, x: f32) -> TextFragment {
        TextFragment::new(text, x, 100.0, 30.0, 10.0, "Helvetica")
    }

    fn run(backend: &mut MockBackend, edits: &[Edit]) -> ReplaceReport {
        Replacer::default().run(backend, edits).expect("run")
    }

    #[test]
    fn test_rect_drawn_before_text() {
        let mut backend = MockBackend {
            pages: vec![vec![frag("Hello", 10.0)]],
            ..Default::default()
        };
        let report = run(&mut backend, &[Edit::new("Hello", "Hi")]);
        assert_eq!(report.mutated_count(), 1);
        assert!(matches!(backend.ops[0], Op::Rect(0, _)));
        match &backend.ops[1] {
            Op::Text(0, text, size) => {
                assert_eq!(text, "Hi");
                assert!(*size <= 10.0);
            },
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_rotated_match_rejected_and_scan_continues() {
        let rotated = frag("cat", 10.0).with_transform(Matrix::new(0.0, 10.0, -10.0, 0.0, 10.0, 100.0));
        let mut backend = MockBackend {
            pages: vec![vec![rotated, frag("cat", 60.0)]],
            ..Default::default()
        };
        let report = run(&mut backend, &[Edit::new("cat", "dog")]);
        let outcomes = &report.pages[0].outcomes;
        assert!(matches!(outcomes[0].1, MatchOutcome::RejectedRotated { .. }));
        assert_eq!(outcomes[1].1.fragments(), &[1]);
        assert_eq!(report.pages[0].consumed_count, 1);
        assert_eq!(backend.ops.len(), 2);
    }

    #[test]
    fn test_degenerate_match_rejected() {
        let mut backend = MockBackend {
            pages: vec![vec![TextFragment::new("x", 10.0, 100.0, 0.0, 10.0, "Helvetica")]],
            ..Default::default()
        };
        let report = run(&mut backend, &[Edit::new("x", "y")]);
        assert!(matches!(
            report.pages[0].outcomes[0].1,
            MatchOutcome::RejectedDegenerate { .. }
        ));
        assert!(backend.ops.is_empty());
        assert_eq!(report.pages[0].consumed_count, 0);
    }

    #[test]
    fn test_no_match_recorded() {
        let mut backend = MockBackend {
            pages: vec![vec![frag("Hello", 10.0)]],
            ..Default::default()
        };
        let report = run(&mut backend, &[Edit::new("xyz", "abc")]);
        assert_eq!(report.pages[0].outcomes, vec![(0, MatchOutcome::NoMatch)]);
        assert!(backend.ops.is_empty());
    }

    #[test]
    fn test_unrenderable_page_skipped() {
        let mut backend = MockBackend {
            pages: vec![vec![frag("Hello", 10.0)], vec![frag("Hello", 10.0)]],
            unrenderable: vec![0],
            ..Default::default()
        };
        let report = run(&mut backend, &[Edit::new("Hello", "Hi")]);
        assert_eq!(report.skipped_pages(), vec![0]);
        assert_eq!(report.mutated_count(), 1);
        assert!(backend.ops.iter().all(|op| matches!(op, Op::Rect(1, _) | Op::Text(1, _, _))));
    }

    #[test]
    fn test_later_edit_cannot_reuse_fragments() {
        let mut backend = MockBackend {
            pages: vec![vec![frag("Hello", 10.0), frag("world", 45.0)]],
            ..Default::default()
        };
        let edits = [Edit::new("Hello world", "Hi"), Edit::new("world", "there")];
        let report = run(&mut backend, &edits);
        assert_eq!(report.mutations_for_edit(0), 1);
        assert_eq!(report.mutations_for_edit(1), 0);
        assert_eq!(report.pages[0].consumed_count, 2);
    }

    #[test]
    fn test_empty_replacement_only_redacts() {
        let mut backend = MockBackend {
            pages: vec![vec![frag("secret", 10.0)]],
            ..Default::default()
        };
        let report = run(&mut backend, &[Edit::new("secret", "")]);
        assert_eq!(report.mutated_count(), 1);
        assert_eq!(backend.ops.len(), 1);
        assert!(matches!(backend.ops[0], Op::Rect(..)));
    }
}
