//! Document backends.
//!
//! The replacement engine never touches PDF objects directly. It sees a
//! document through three capabilities:
//!
//! - [`TextExtractor`]: positioned text fragments per page
//! - [`Rasterizer`]: a page rendered to pixels, with its [`Viewport`]
//! - [`DocumentMutator`]: drawing rectangles and text, then serializing
//!
//! [`LopdfBackend`] provides all three on top of `lopdf`.

pub mod lopdf_backend;

pub use lopdf_backend::LopdfBackend;

use crate::color::{Color, RasterImage};
use crate::error::Result;
use crate::fonts::FontVariant;
use crate::geometry::{PageBox, PagePoint, Viewport};
use crate::text::TextFragment;

/// Source of positioned text.
pub trait TextExtractor {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Ordered text fragments of a page (zero-based).
    ///
    /// Fragment text is whitespace-normalized and blank fragments are
    /// omitted.
    fn extract_fragments(&self, page: usize) -> Result<Vec<TextFragment>>;
}

/// Renders pages to pixels.
pub trait Rasterizer {
    /// Render a page at `scale` pixels per page unit.
    ///
    /// Returns [`Error::Unrenderable`](crate::Error::Unrenderable) when no
    /// drawing surface can be produced; the page is then skipped.
    fn rasterize(&self, page: usize, scale: f32) -> Result<(RasterImage, Viewport)>;
}

/// A font registered on a page and ready for drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontHandle {
    /// Variant the handle draws with
    pub variant: FontVariant,
    /// Resource name under the page's `/Font` dictionary
    pub resource_name: String,
}

/// Draws on pages and serializes the result.
pub trait DocumentMutator {
    /// Make `variant` available on a page.
    fn embed_font(&mut self, page: usize, variant: FontVariant) -> Result<FontHandle>;

    /// Advance width of `text` in page units when set in `variant` at `size`.
    fn measure_text(&self, variant: FontVariant, text: &str, size: f32) -> f32 {
        variant.measure(text, size)
    }

    /// Fill `bbox` with an opaque color.
    fn draw_rect(&mut self, page: usize, bbox: &PageBox, color: Color) -> Result<()>;

    /// Draw `text` with its baseline origin at `origin`.
    fn draw_text(
        &mut self,
        page: usize,
        text: &str,
        origin: PagePoint,
        font: &FontHandle,
        size: f32,
        color: Color,
    ) -> Result<()>;

    /// Serialize the whole document.
    fn save(&mut self) -> Result<Vec<u8>>;
}
