//! Background and foreground estimation from a rendered page.

use super::{Color, RasterImage};
use crate::config::ReplaceConfig;
use crate::geometry::{PixelPoint, PixelRect};

/// Mean color of the pixels covered by `rect`.
///
/// The rectangle is rounded outward to whole pixels and clipped to the image.
/// A rectangle that covers no pixel yields white.
pub fn average_color_of_region(image: &RasterImage, rect: &PixelRect) -> Color {
    sample_region(image, rect).unwrap_or(Color::WHITE)
}

/// Mean color of the pixels covered by `rect`, `None` when it covers none.
fn sample_region(image: &RasterImage, rect: &PixelRect) -> Option<Color> {
    let x0 = rect.x.floor().max(0.0);
    let y0 = rect.y.floor().max(0.0);
    let x1 = rect.right().ceil().min(image.width() as f32);
    let y1 = rect.bottom().ceil().min(image.height() as f32);

    if !(x1 > x0 && y1 > y0) {
        return None;
    }

    let (mut r, mut g, mut b) = (0.0f64, 0.0f64, 0.0f64);
    let mut count = 0u64;
    for y in y0 as u32..y1 as u32 {
        for x in x0 as u32..x1 as u32 {
            if let Some(px) = image.pixel(x, y) {
                r += px.r as f64;
                g += px.g as f64;
                b += px.b as f64;
                count += 1;
            }
        }
    }

    if count == 0 {
        return None;
    }
    let n = count as f64;
    Some(Color::new((r / n) as f32, (g / n) as f32, (b / n) as f32))
}

/// Average of four small samples just outside the corners of `rect`.
///
/// A corner sample falling entirely off the page counts as white.
pub fn estimate_background(image: &RasterImage, rect: &PixelRect, config: &ReplaceConfig) -> Color {
    let size = config.background_sample_size;
    let margin = config.background_margin;
    let left = rect.x - margin - size;
    let top = rect.y - margin - size;
    let right = rect.right() + margin;
    let bottom = rect.bottom() + margin;

    let samples: Vec<Color> = [(left, top), (right, top), (left, bottom), (right, bottom)]
        .iter()
        .map(|&(x, y)| average_color_of_region(image, &PixelRect::new(x, y, size, size)))
        .collect();

    Color::mean(&samples).unwrap_or(Color::WHITE)
}

/// Ink color at the center of `glyph_rect`, or a high-contrast fallback.
///
/// The center patch is accepted when it differs enough from `background`;
/// otherwise it probably fell into a glyph counter and black or white is
/// chosen against the background luminance.
pub fn estimate_foreground(
    image: &RasterImage,
    glyph_rect: &PixelRect,
    background: Color,
    config: &ReplaceConfig,
) -> Color {
    let center: PixelPoint = glyph_rect.center();
    let patch = PixelRect::centered(center, config.foreground_sample_size);
    let sample = average_color_of_region(image, &patch);

    if sample.difference(&background) > config.foreground_contrast_threshold {
        sample
    } else {
        background.contrasting()
    }
}
