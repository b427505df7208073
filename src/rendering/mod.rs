//! Page rasterization for color sampling.
//!
//! Pages are rendered with the pure-Rust `tiny-skia` library onto a white
//! canvas. The renderer only needs to be faithful where colors are sampled:
//! filled and stroked paths are drawn exactly, text is drawn as solid glyph
//! boxes at the positions the content stream gives it. Images are not
//! drawn.
//!
//! ## Architecture
//!
//! 1. The [`Interpreter`](crate::content::Interpreter) executes the page
//! 2. [`PageRasterizer`] receives paths and text runs as a
//!    [`ContentSink`](crate::content::ContentSink)
//! 3. Paths and glyph boxes are rasterized to a `tiny_skia::Pixmap`
//! 4. The pixmap is converted to a [`RasterImage`](crate::color::RasterImage)

mod page_renderer;
mod path_rasterizer;
mod text_rasterizer;

pub use page_renderer::{render_page, PageRasterizer};

use crate::color::Color;
use crate::geometry::Matrix;
use tiny_skia::{Paint, Transform};

/// Create an opaque anti-aliased paint.
pub(crate) fn create_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(
        tiny_skia::Color::from_rgba(color.r, color.g, color.b, 1.0)
            .unwrap_or(tiny_skia::Color::BLACK),
    );
    paint.anti_alias = true;
    paint
}

/// Convert a PDF matrix to a tiny-skia transform.
pub(crate) fn to_transform(m: &Matrix) -> Transform {
    Transform::from_row(m.a, m.b, m.c, m.d, m.e, m.f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_matches_matrix() {
        let m = Matrix::new(2.0, 0.0, 0.0, -2.0, 10.0, 100.0);
        let t = to_transform(&m);
        let mut points = [tiny_skia::Point::from_xy(3.0, 4.0)];
        t.map_points(&mut points);
        let expected = m.transform_point(3.0, 4.0);
        assert_eq!(points[0].x, expected.x);
        assert_eq!(points[0].y, expected.y);
    }

    #[test]
    fn test_paint_is_opaque() {
        let paint = create_paint(Color::new(0.2, 0.4, 0.6));
        assert!(paint.anti_alias);
        assert_eq!(paint.blend_mode, tiny_skia::BlendMode::SourceOver);
    }
}
