//! Text rasterizer - renders PDF text as glyph boxes using tiny-skia.
//!
//! Glyph outlines are not rendered. Each glyph becomes a solid box spanning
//! its advance width and a height that depends on the character class, which
//! is enough for the foreground color to show up where text is sampled.

use super::{create_paint, to_transform};
use crate::content::{PositionedGlyph, TextRun};
use tiny_skia::{FillRule, PathBuilder, Pixmap, Rect, Transform};

/// Box height of uppercase letters and digits, relative to the font size.
const CAP_HEIGHT: f32 = 0.8;
/// Box height of lowercase letters.
const X_HEIGHT: f32 = 0.6;
/// Box height of everything else.
const OTHER_HEIGHT: f32 = 0.7;

/// Rasterizer for text runs.
pub struct TextRasterizer {}

impl TextRasterizer {
    /// Create a new text rasterizer.
    pub fn new() -> Self {
        Self {}
    }

    /// Draw the glyph boxes of a run; `base_transform` maps page space to pixels.
    pub fn render_run(&self, pixmap: &mut Pixmap, run: &TextRun, base_transform: Transform) {
        if !run.visible || run.glyphs.is_empty() {
            return;
        }

        let transform = base_transform.pre_concat(to_transform(&run.text_to_page));
        let mut path = PathBuilder::new();
        for glyph in &run.glyphs {
            if let Some(rect) = glyph_rect(glyph, run.font_size, run.rise) {
                path.push_rect(rect);
            }
        }

        if let Some(path) = path.finish() {
            pixmap.fill_path(&path, &create_paint(run.color), FillRule::Winding, transform, None);
        }
    }
}

impl Default for TextRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Box of one glyph in unscaled text space; `None` for blank glyphs.
fn glyph_rect(glyph: &PositionedGlyph, font_size: f32, rise: f32) -> Option<Rect> {
    let ch = glyph.text.chars().next()?;
    if ch.is_whitespace() || glyph.width <= 0.0 {
        return None;
    }
    let ratio = if ch.is_uppercase() || ch.is_ascii_digit() {
        CAP_HEIGHT
    } else if ch.is_lowercase() {
        X_HEIGHT
    } else {
        OTHER_HEIGHT
    };
    let height = font_size * ratio;
    let (bottom, top) = if height >= 0.0 {
        (rise, rise + height)
    } else {
        (rise + height, rise)
    };
    Rect::from_ltrb(glyph.offset, bottom, glyph.offset + glyph.width, top)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::Matrix;

    fn glyph(text: &str, offset: f32, width: f32) -> PositionedGlyph {
        PositionedGlyph {
            text: text.to_string(),
            offset,
            width,
        }
    }

    fn run(glyphs: Vec<PositionedGlyph>) -> TextRun {
        TextRun {
            text: glyphs.iter().map(|g| g.text.as_str()).collect(),
            glyphs,
            rendering_matrix: Matrix::new(10.0, 0.0, 0.0, 10.0, 0.0, 0.0),
            text_to_page: Matrix::identity(),
            advance: 20.0,
            font_size: 10.0,
            rise: 0.0,
            font_name: "Helvetica".to_string(),
            color: Color::new(0.0, 0.0, 1.0),
            visible: true,
        }
    }

    #[test]
    fn test_glyph_heights_by_class() {
        let upper = glyph_rect(&glyph("H", 0.0, 5.0), 10.0, 0.0).expect("box");
        let lower = glyph_rect(&glyph("x", 0.0, 5.0), 10.0, 0.0).expect("box");
        let other = glyph_rect(&glyph("-", 0.0, 5.0), 10.0, 0.0).expect("box");
        assert_eq!(upper.height(), 8.0);
        assert_eq!(lower.height(), 6.0);
        assert_eq!(other.height(), 7.0);
        assert!(glyph_rect(&glyph(" ", 0.0, 5.0), 10.0, 0.0).is_none());
    }

    #[test]
    fn test_render_run_marks_pixels() {
        let mut pixmap = Pixmap::new(30, 20).expect("pixmap");
        let text = run(vec![glyph("A", 2.0, 6.0), glyph(" ", 8.0, 3.0), glyph("B", 11.0, 6.0)]);
        TextRasterizer::new().render_run(&mut pixmap, &text, Transform::identity());

        let blue = |x, y| pixmap.pixel(x, y).map(|p| p.blue()).unwrap_or(0);
        assert_eq!(blue(4, 4), 255);
        assert_eq!(blue(9, 4), 0);
        assert_eq!(blue(13, 4), 255);
        assert_eq!(blue(4, 15), 0);
    }

    #[test]
    fn test_invisible_run_skipped() {
        let mut pixmap = Pixmap::new(10, 10).expect("pixmap");
        let mut text = run(vec![glyph("A", 0.0, 8.0)]);
        text.visible = false;
        TextRasterizer::new().render_run(&mut pixmap, &text, Transform::identity());
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }
}
