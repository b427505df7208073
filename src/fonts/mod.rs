//! Font handling for replacement text.
//!
//! Replacement text is always set in one of twelve standard PDF fonts:
//! three families, each in four styles. [`classify`] picks the variant that
//! best resembles an observed font name, [`metrics`] measures strings in it,
//! [`encoding`] converts text to its single-byte encoding, and [`cmap`]
//! reads ToUnicode maps of the fonts already in a document.

pub mod classify;
pub mod cmap;
pub mod encoding;
pub mod metrics;

pub use classify::classify;
pub use cmap::{parse_tounicode_cmap, CMap};
pub use metrics::text_width;

/// Font family of a standard variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    /// Helvetica
    #[default]
    SansSerif,
    /// Times
    Serif,
    /// Courier
    Monospace,
}

/// Weight and slant of a standard variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    /// Upright, normal weight
    #[default]
    Regular,
    /// Upright, bold
    Bold,
    /// Slanted, normal weight
    Italic,
    /// Slanted, bold
    BoldItalic,
}

impl FontStyle {
    /// Combine weight and slant flags.
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => FontStyle::Regular,
            (true, false) => FontStyle::Bold,
            (false, true) => FontStyle::Italic,
            (true, true) => FontStyle::BoldItalic,
        }
    }

    /// Whether the style is bold.
    pub fn is_bold(&self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    /// Whether the style is italic or oblique.
    pub fn is_italic(&self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }
}

/// One of the twelve standard font variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontVariant {
    /// Font family
    pub family: FontFamily,
    /// Weight and slant
    pub style: FontStyle,
}

impl FontVariant {
    /// Create a variant.
    pub fn new(family: FontFamily, style: FontStyle) -> Self {
        Self { family, style }
    }

    /// Every variant, families outermost.
    pub fn all() -> impl Iterator<Item = FontVariant> {
        [FontFamily::SansSerif, FontFamily::Serif, FontFamily::Monospace]
            .into_iter()
            .flat_map(|family| {
                [
                    FontStyle::Regular,
                    FontStyle::Bold,
                    FontStyle::Italic,
                    FontStyle::BoldItalic,
                ]
                .into_iter()
                .map(move |style| FontVariant { family, style })
            })
    }

    /// PostScript name of the standard font for this variant.
    pub fn base_font_name(&self) -> &'static str {
        match (self.family, self.style) {
            (FontFamily::SansSerif, FontStyle::Regular) => "Helvetica",
            (FontFamily::SansSerif, FontStyle::Bold) => "Helvetica-Bold",
            (FontFamily::SansSerif, FontStyle::Italic) => "Helvetica-Oblique",
            (FontFamily::SansSerif, FontStyle::BoldItalic) => "Helvetica-BoldOblique",
            (FontFamily::Serif, FontStyle::Regular) => "Times-Roman",
            (FontFamily::Serif, FontStyle::Bold) => "Times-Bold",
            (FontFamily::Serif, FontStyle::Italic) => "Times-Italic",
            (FontFamily::Serif, FontStyle::BoldItalic) => "Times-BoldItalic",
            (FontFamily::Monospace, FontStyle::Regular) => "Courier",
            (FontFamily::Monospace, FontStyle::Bold) => "Courier-Bold",
            (FontFamily::Monospace, FontStyle::Italic) => "Courier-Oblique",
            (FontFamily::Monospace, FontStyle::BoldItalic) => "Courier-BoldOblique",
        }
    }

    /// Width of `text` in points at `font_size`.
    pub fn measure(&self, text: &str, font_size: f32) -> f32 {
        metrics::text_width(*self, text, font_size)
    }
}
