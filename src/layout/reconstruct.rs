//! Match geometry from fragment positions.

use crate::geometry::{PageBox, PixelRect, Viewport};
use crate::text::{MatchSpan, TextFragment};

/// Page-space and raster-space geometry of one match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchGeometry {
    /// Union of the padded fragment boxes
    pub bbox: PageBox,
    /// Mean fragment height, the size the original text was set at
    pub nominal_height: f32,
    /// Unpadded box of the first fragment, where ink is sampled
    pub first_glyph_box: PageBox,
}

impl MatchGeometry {
    /// Raster rectangle covering the whole match.
    pub fn pixel_rect(&self, viewport: &Viewport) -> PixelRect {
        viewport.to_pixel_rect(&self.bbox)
    }

    /// Raster rectangle covering the first fragment's glyphs.
    pub fn ink_rect(&self, viewport: &Viewport) -> PixelRect {
        viewport.to_pixel_rect(&self.first_glyph_box)
    }
}

/// Compute the geometry of `span`.
///
/// Returns `None` if the span references no fragment of `fragments`.
pub fn reconstruct(span: &MatchSpan, fragments: &[TextFragment]) -> Option<MatchGeometry> {
    let covered: Vec<&TextFragment> = span
        .fragments
        .iter()
        .filter_map(|&i| fragments.get(i))
        .collect();
    let first = covered.first()?;

    let bbox = covered
        .iter()
        .skip(1)
        .fold(first.padded_box(), |acc, f| acc.union(&f.padded_box()));
    let nominal_height = covered.iter().map(|f| f.height).sum::<f32>() / covered.len() as f32;

    Some(MatchGeometry {
        bbox,
        nominal_height,
        first_glyph_box: first.glyph_box(),
    })
}
