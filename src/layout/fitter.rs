//! Font size and baseline for replacement text.

use crate::config::ReplaceConfig;
use crate::geometry::{PageBox, PagePoint};

/// Size at which replacement text is measured before scaling.
pub const REFERENCE_SIZE: f32 = 100.0;

/// Share of the font size the baseline sits below the vertical center.
pub const BASELINE_BIAS: f32 = 0.15;

/// Where and how large to draw the replacement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    /// Font size in page units
    pub font_size: f32,
    /// Baseline origin of the first glyph
    pub origin: PagePoint,
}

/// Why a match cannot be laid out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitError {
    /// The box has no positive width or height
    Degenerate,
    /// The text only fits below the configured minimum size
    TooSmall {
        /// Largest size that would fit
        size: f32,
    },
}

/// Fit `text` into `bbox`.
///
/// The size never exceeds `nominal_height` and shrinks further when the text
/// is too wide for the box; the glyph box is centered vertically with a small
/// downward bias. `measure(text, size)` returns the advance width in page
/// units.
pub fn fit_text<F>(
    bbox: &PageBox,
    nominal_height: f32,
    text: &str,
    measure: F,
    config: &ReplaceConfig,
) -> Result<TextPlacement, FitError>
where
    F: Fn(&str, f32) -> f32,
{
    if bbox.is_degenerate() {
        return Err(FitError::Degenerate);
    }
    let box_width = bbox.width();
    let box_height = bbox.height();

    let reference_width = measure(text, REFERENCE_SIZE);
    let font_size = if reference_width > 0.0 {
        let width_limited = box_width / reference_width * REFERENCE_SIZE * config.width_safety_margin;
        nominal_height.min(width_limited)
    } else {
        nominal_height
    };

    if !(font_size >= config.min_font_size) || font_size <= 0.0 {
        return Err(FitError::TooSmall { size: font_size });
    }

    let baseline = bbox.min_y + (box_height - font_size) / 2.0 + font_size * BASELINE_BIAS;
    Ok(TextPlacement {
        font_size,
        origin: PagePoint::new(bbox.min_x, baseline),
    })
}
