//! Path rasterizer - renders PDF paths using tiny-skia.

use super::create_paint;
use crate::content::{GraphicsState, PaintMode, PathSegment};
use tiny_skia::{FillRule, Path, PathBuilder, Pixmap, Stroke, Transform};

/// Rasterizer for PDF path painting operators.
pub struct PathRasterizer {}

impl PathRasterizer {
    /// Create a new path rasterizer.
    pub fn new() -> Self {
        Self {}
    }

    /// Paint a path in user space; `transform` maps user space to pixels.
    pub fn paint(
        &self,
        pixmap: &mut Pixmap,
        segments: &[PathSegment],
        mode: PaintMode,
        transform: Transform,
        gs: &GraphicsState,
    ) {
        let Some(path) = build_path(segments) else {
            return;
        };

        match mode {
            PaintMode::Fill { even_odd } => self.fill_path(pixmap, &path, transform, gs, even_odd),
            PaintMode::Stroke => self.stroke_path(pixmap, &path, transform, gs),
            PaintMode::FillStroke { even_odd } => {
                self.fill_path(pixmap, &path, transform, gs, even_odd);
                self.stroke_path(pixmap, &path, transform, gs);
            },
            PaintMode::None => {},
        }
    }

    /// Fill a path with the current fill color.
    fn fill_path(
        &self,
        pixmap: &mut Pixmap,
        path: &Path,
        transform: Transform,
        gs: &GraphicsState,
        even_odd: bool,
    ) {
        let rule = if even_odd {
            FillRule::EvenOdd
        } else {
            FillRule::Winding
        };
        pixmap.fill_path(path, &create_paint(gs.fill_color), rule, transform, None);
    }

    /// Stroke a path with the current stroke color and line width.
    fn stroke_path(&self, pixmap: &mut Pixmap, path: &Path, transform: Transform, gs: &GraphicsState) {
        // Width 0 is a hairline in both PDF and tiny-skia
        let stroke = Stroke {
            width: gs.line_width.max(0.0),
            ..Stroke::default()
        };
        pixmap.stroke_path(path, &create_paint(gs.stroke_color), &stroke, transform, None);
    }
}

impl Default for PathRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a tiny-skia path; `None` when it has no drawable segments.
pub(crate) fn build_path(segments: &[PathSegment]) -> Option<Path> {
    let mut builder = PathBuilder::new();
    for segment in segments {
        match *segment {
            PathSegment::MoveTo(x, y) => builder.move_to(x, y),
            PathSegment::LineTo(x, y) => builder.line_to(x, y),
            PathSegment::CurveTo(x1, y1, x2, y2, x, y) => builder.cubic_to(x1, y1, x2, y2, x, y),
            PathSegment::Close => builder.close(),
        }
    }
    builder.finish()
}
