//! Page renderer - converts PDF pages to raster images.

use lopdf::{Document, ObjectId};
use tiny_skia::{Pixmap, Transform};

use super::path_rasterizer::PathRasterizer;
use super::text_rasterizer::TextRasterizer;
use super::to_transform;
use crate::color::RasterImage;
use crate::content::resources::media_box;
use crate::content::{ContentSink, GraphicsState, Interpreter, PaintMode, PathSegment, TextRun};
use crate::error::{Error, Result};
use crate::geometry::Viewport;

/// Largest raster side accepted, in pixels.
pub const MAX_DIMENSION: u32 = 20_000;

/// Draws interpreter events onto a white pixmap.
pub struct PageRasterizer {
    pixmap: Pixmap,
    base_transform: Transform,
    path_rasterizer: PathRasterizer,
    text_rasterizer: TextRasterizer,
}

impl PageRasterizer {
    /// Create a white canvas for `viewport`.
    ///
    /// Returns `None` when no pixmap of that size can be allocated.
    pub fn new(viewport: &Viewport) -> Option<Self> {
        if viewport.width > MAX_DIMENSION || viewport.height > MAX_DIMENSION {
            return None;
        }
        let mut pixmap = Pixmap::new(viewport.width, viewport.height)?;
        pixmap.fill(tiny_skia::Color::WHITE);
        Some(Self {
            pixmap,
            base_transform: to_transform(&viewport.matrix()),
            path_rasterizer: PathRasterizer::new(),
            text_rasterizer: TextRasterizer::new(),
        })
    }

    /// Finish drawing and convert to straight RGBA.
    pub fn into_image(self) -> Option<RasterImage> {
        let data = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        RasterImage::from_rgba(self.pixmap.width(), self.pixmap.height(), data)
    }
}

impl ContentSink for PageRasterizer {
    fn show_text(&mut self, run: &TextRun) {
        self.text_rasterizer
            .render_run(&mut self.pixmap, run, self.base_transform);
    }

    fn paint_path(&mut self, path: &[PathSegment], mode: PaintMode, state: &GraphicsState) {
        let transform = self.base_transform.pre_concat(to_transform(&state.ctm));
        self.path_rasterizer
            .paint(&mut self.pixmap, path, mode, transform, state);
    }
}

/// Render a page at `scale` pixels per page unit.
///
/// `page` is the zero-based index reported in errors.
pub fn render_page(
    doc: &Document,
    page_id: ObjectId,
    page: usize,
    scale: f32,
) -> Result<(RasterImage, Viewport)> {
    let viewport = Viewport::new(media_box(doc, page_id), scale);
    if viewport.width == 0 || viewport.height == 0 {
        return Err(Error::Unrenderable {
            page,
            reason: "empty media box".to_string(),
        });
    }

    let mut rasterizer = PageRasterizer::new(&viewport).ok_or_else(|| Error::Unrenderable {
        page,
        reason: format!(
            "cannot allocate {}x{} canvas",
            viewport.width, viewport.height
        ),
    })?;
    Interpreter::new(doc).run_page(page_id, &mut rasterizer);

    let image = rasterizer.into_image().ok_or_else(|| Error::Unrenderable {
        page,
        reason: "canvas size mismatch".to_string(),
    })?;
    log::debug!(
        "Rendered page {} at {}x{} (scale {})",
        page,
        viewport.width,
        viewport.height,
        scale
    );
    Ok((image, viewport))
}
