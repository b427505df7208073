//! Standard-14 font metrics.
//!
//! Advance widths for printable ASCII in 1/1000 em, from the Adobe Core 14
//! AFM files. Oblique and italic Helvetica share the upright widths, all
//! Courier faces are 600 throughout. Characters outside the table fall back
//! to a nominal 500.

use super::{FontFamily, FontVariant};

/// Width used for characters without an entry.
pub const DEFAULT_WIDTH: f32 = 500.0;

/// Width of every Courier glyph.
pub const MONOSPACE_WIDTH: f32 = 600.0;

/// First character covered by the width tables.
const FIRST_CHAR: u32 = 32;

#[rustfmt::skip]
static HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[rustfmt::skip]
static TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    278, 278, 564, 564, 564, 444, 921,
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    333, 278, 333, 469, 500, 333,
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    480, 200, 480, 541,
];

#[rustfmt::skip]
static TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 930,
    722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
    722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
    333, 278, 333, 581, 500, 333,
    500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
    556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
    394, 220, 394, 520,
];

#[rustfmt::skip]
static TIMES_ITALIC: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 675, 675, 675, 500, 920,
    611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833,
    667, 722, 611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556,
    389, 278, 389, 422, 500, 333,
    500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722,
    500, 500, 500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389,
    400, 275, 400, 541,
];

#[rustfmt::skip]
static TIMES_BOLD_ITALIC: [u16; 95] = [
    250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 832,
    667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889,
    722, 722, 611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611,
    333, 278, 333, 570, 500, 333,
    500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778,
    556, 500, 500, 500, 389, 389, 278, 556, 444, 667, 500, 444, 389,
    348, 220, 348, 570,
];

/// Font width data for one standard variant.
#[derive(Debug, Clone, Copy)]
pub enum FontWidths {
    /// Proportional font with per-character widths
    Proportional(&'static [u16; 95]),
    /// Monospace font with fixed width
    Monospace(f32),
}

impl FontWidths {
    /// Width table for a variant.
    pub fn for_variant(variant: FontVariant) -> Self {
        match (variant.family, variant.style.is_bold(), variant.style.is_italic()) {
            (FontFamily::Monospace, _, _) => FontWidths::Monospace(MONOSPACE_WIDTH),
            (FontFamily::SansSerif, false, _) => FontWidths::Proportional(&HELVETICA),
            (FontFamily::SansSerif, true, _) => FontWidths::Proportional(&HELVETICA_BOLD),
            (FontFamily::Serif, false, false) => FontWidths::Proportional(&TIMES_ROMAN),
            (FontFamily::Serif, true, false) => FontWidths::Proportional(&TIMES_BOLD),
            (FontFamily::Serif, false, true) => FontWidths::Proportional(&TIMES_ITALIC),
            (FontFamily::Serif, true, true) => FontWidths::Proportional(&TIMES_BOLD_ITALIC),
        }
    }

    /// Width of `ch` in 1/1000 em.
    pub fn char_width(&self, ch: char) -> f32 {
        match self {
            FontWidths::Proportional(table) => (ch as u32)
                .checked_sub(FIRST_CHAR)
                .and_then(|i| table.get(i as usize))
                .map_or(DEFAULT_WIDTH, |&w| w as f32),
            FontWidths::Monospace(width) => *width,
        }
    }

    /// Width of `text` in points at `font_size`.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: f32 = text.chars().map(|c| self.char_width(c)).sum();
        units * font_size / 1000.0
    }
}

/// Width of `text` in points when set in `variant` at `font_size`.
pub fn text_width(variant: FontVariant, text: &str, font_size: f32) -> f32 {
    FontWidths::for_variant(variant).text_width(text, font_size)
}

/// Vertical metrics in 1/1000 em: (ascender, descender).
pub fn vertical_metrics(variant: FontVariant) -> (f32, f32) {
    match (variant.family, variant.style.is_bold()) {
        (FontFamily::SansSerif, _) => (718.0, -207.0),
        (FontFamily::Serif, false) => (683.0, -217.0),
        (FontFamily::Serif, true) => (676.0, -205.0),
        (FontFamily::Monospace, false) => (629.0, -157.0),
        (FontFamily::Monospace, true) => (626.0, -142.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontStyle;

    fn variant(family: FontFamily, style: FontStyle) -> FontVariant {
        FontVariant { family, style }
    }

    #[test]
    fn test_helvetica_widths() {
        let widths = FontWidths::for_variant(variant(FontFamily::SansSerif, FontStyle::Regular));
        assert_eq!(widths.char_width(' '), 278.0);
        assert_eq!(widths.char_width('A'), 667.0);
        assert_eq!(widths.char_width('i'), 222.0);
        assert_eq!(widths.char_width('~'), 584.0);
        assert_eq!(widths.char_width('\u{00E9}'), DEFAULT_WIDTH);
    }

    #[test]
    fn test_oblique_shares_upright_widths() {
        let upright = text_width(variant(FontFamily::SansSerif, FontStyle::Bold), "Hello", 12.0);
        let oblique = text_width(variant(FontFamily::SansSerif, FontStyle::BoldItalic), "Hello", 12.0);
        assert_eq!(upright, oblique);
    }

    #[test]
    fn test_times_italic_differs() {
        let roman = FontWidths::for_variant(variant(FontFamily::Serif, FontStyle::Regular));
        let italic = FontWidths::for_variant(variant(FontFamily::Serif, FontStyle::Italic));
        assert_eq!(roman.char_width('A'), 722.0);
        assert_eq!(italic.char_width('A'), 611.0);
    }

    #[test]
    fn test_courier_monospace() {
        let mono = variant(FontFamily::Monospace, FontStyle::Bold);
        assert_eq!(text_width(mono, "iiii", 10.0), 24.0);
        assert_eq!(text_width(mono, "WWWW", 10.0), 24.0);
    }

    #[test]
    fn test_text_width_scales_linearly() {
        let v = variant(FontFamily::SansSerif, FontStyle::Regular);
        let w100 = text_width(v, "Hello", 100.0);
        let w10 = text_width(v, "Hello", 10.0);
        assert!((w100 - 10.0 * w10).abs() < 1e-3);
        // H=722 e=556 l=222 l=222 o=556
        assert!((w100 - 227.8).abs() < 1e-3);
    }

    #[test]
    fn test_vertical_metrics() {
        let (asc, desc) = vertical_metrics(variant(FontFamily::Serif, FontStyle::Regular));
        assert!(asc > 0.0 && desc < 0.0);
    }
}
