//! Font name classification.

use super::{FontFamily, FontStyle, FontVariant};

const BOLD_MARKERS: [&str; 3] = ["bold", "black", "heavy"];
const ITALIC_MARKERS: [&str; 2] = ["italic", "oblique"];
const SERIF_MARKERS: [&str; 3] = ["times", "georgia", "serif"];
const MONOSPACE_MARKERS: [&str; 3] = ["courier", "mono", "consolas"];

/// Map an observed font name to the closest standard variant.
///
/// Matching is a case-insensitive substring test. Style flags are read first
/// and may both be set; the family defaults to sans-serif. Unknown or empty
/// names give sans-serif regular.
///
/// # Examples
///
/// ```
/// use pdf_retext::fonts::{classify, FontFamily, FontStyle};
///
/// let variant = classify("TimesNewRomanPS-ItalicMT");
/// assert_eq!(variant.family, FontFamily::Serif);
/// assert_eq!(variant.style, FontStyle::Italic);
/// ```
pub fn classify(font_name: &str) -> FontVariant {
    let name = font_name.to_lowercase();
    let contains_any = |markers: &[&str]| markers.iter().any(|m| name.contains(m));

    let style = FontStyle::from_flags(contains_any(&BOLD_MARKERS), contains_any(&ITALIC_MARKERS));

    let family = if contains_any(&SERIF_MARKERS) {
        FontFamily::Serif
    } else if contains_any(&MONOSPACE_MARKERS) {
        FontFamily::Monospace
    } else {
        FontFamily::SansSerif
    };

    FontVariant { family, style }
}
