//! Fonts already present in a document.
//!
//! Text extraction needs two things from a font: the Unicode text of each
//! character code and its advance width. Both come from the font dictionary
//! when available (`/ToUnicode`, `/Widths`, `/W`) and from the standard
//! metrics of the closest [`FontVariant`] otherwise.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object};

use crate::content::operators::object_to_f32;
use crate::content::resources::{get_dict, get_name, get_number, get_resolved, resolve, stream_data};
use crate::fonts::metrics::FontWidths;
use crate::fonts::{classify, encoding, parse_tounicode_cmap, CMap, FontVariant};

/// Default glyph width of composite fonts without `/DW`.
const DEFAULT_CID_WIDTH: f32 = 1000.0;

/// One decoded character code.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Unicode text of the code, possibly empty or several characters
    pub text: String,
    /// Advance width in text space units (1/1000 em scaled to 1)
    pub width: f32,
    /// Single-byte code 32, which receives word spacing
    pub is_space: bool,
}

#[derive(Debug, Clone)]
enum Widths {
    /// `/FirstChar` + `/Widths` of a simple font
    Simple { first_char: u32, widths: Vec<f32>, missing: Option<f32> },
    /// `/W` + `/DW` of a CID font
    Composite { widths: HashMap<u32, f32>, default: f32 },
    /// Standard metrics of the classified variant
    Standard,
}

/// A font resource ready to decode strings.
#[derive(Debug, Clone)]
pub struct PdfFont {
    /// `/BaseFont` without a subset prefix
    pub base_font: String,
    /// Closest standard variant
    pub variant: FontVariant,
    /// Two-byte codes (Type0) instead of single bytes
    pub composite: bool,
    to_unicode: Option<CMap>,
    widths: Widths,
}

impl PdfFont {
    /// Helvetica with WinAnsi decoding, for text shown without a usable font.
    pub fn fallback() -> Self {
        Self {
            base_font: "Helvetica".to_string(),
            variant: FontVariant::default(),
            composite: false,
            to_unicode: None,
            widths: Widths::Standard,
        }
    }

    /// Read a font dictionary.
    pub fn load(doc: &Document, dict: &Dictionary) -> Self {
        let base_font = get_name(doc, dict, b"BaseFont")
            .map(|name| strip_subset_prefix(&name).to_string())
            .unwrap_or_else(|| "Helvetica".to_string());
        let composite = get_name(doc, dict, b"Subtype").as_deref() == Some("Type0");

        let to_unicode = match get_resolved(doc, dict, b"ToUnicode") {
            Some(Object::Stream(stream)) => {
                let cmap = parse_tounicode_cmap(&stream_data(stream));
                (!cmap.is_empty()).then_some(cmap)
            },
            _ => None,
        };

        let widths = if composite {
            composite_widths(doc, dict)
        } else {
            simple_widths(doc, dict)
        };

        log::trace!(
            "Loaded font {} (composite: {}, tounicode: {})",
            base_font,
            composite,
            to_unicode.is_some()
        );

        Self {
            variant: classify(&base_font),
            base_font,
            composite,
            to_unicode,
            widths,
        }
    }

    /// Split a shown string into glyphs.
    pub fn decode(&self, bytes: &[u8]) -> Vec<Glyph> {
        let code_len = if self.composite { 2 } else { 1 };
        bytes
            .chunks(code_len)
            .map(|chunk| {
                let code = chunk.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32);
                let text = self.code_text(code);
                Glyph {
                    width: self.code_width(code, &text),
                    is_space: !self.composite && code == 32,
                    text,
                }
            })
            .collect()
    }

    fn code_text(&self, code: u32) -> String {
        if let Some(text) = self.to_unicode.as_ref().and_then(|cmap| cmap.get(&code)) {
            return text.clone();
        }
        if self.composite {
            char::from_u32(code)
                .filter(|c| !c.is_control())
                .map(String::from)
                .unwrap_or_default()
        } else {
            encoding::winansi_to_unicode(code as u8)
                .map(String::from)
                .unwrap_or_default()
        }
    }

    /// Width in 1/1000 em, scaled to text space.
    fn code_width(&self, code: u32, text: &str) -> f32 {
        let units = match &self.widths {
            Widths::Simple {
                first_char,
                widths,
                missing,
            } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize).copied())
                .or(*missing)
                .unwrap_or_else(|| self.standard_width(text)),
            Widths::Composite { widths, default } => {
                widths.get(&code).copied().unwrap_or(*default)
            },
            Widths::Standard => self.standard_width(text),
        };
        units / 1000.0
    }

    fn standard_width(&self, text: &str) -> f32 {
        let table = FontWidths::for_variant(self.variant);
        match text.chars().next() {
            Some(ch) => table.char_width(ch),
            None => 0.0,
        }
    }
}

/// `ABCDEF+Helvetica` -> `Helvetica`
fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.chars().all(|c| c.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

fn simple_widths(doc: &Document, dict: &Dictionary) -> Widths {
    let missing = get_dict(doc, dict, b"FontDescriptor")
        .and_then(|fd| get_number(doc, fd, b"MissingWidth"));
    match get_resolved(doc, dict, b"Widths") {
        Some(Object::Array(items)) => {
            let first_char = get_number(doc, dict, b"FirstChar").unwrap_or(0.0).max(0.0) as u32;
            let widths = items
                .iter()
                .map(|w| object_to_f32(resolve(doc, w)).unwrap_or(0.0))
                .collect();
            Widths::Simple {
                first_char,
                widths,
                missing,
            }
        },
        _ => Widths::Standard,
    }
}

fn composite_widths(doc: &Document, dict: &Dictionary) -> Widths {
    let descendant = match get_resolved(doc, dict, b"DescendantFonts") {
        Some(Object::Array(items)) => items.first().and_then(|d| resolve(doc, d).as_dict().ok()),
        _ => None,
    };
    let Some(cid_font) = descendant else {
        return Widths::Composite {
            widths: HashMap::new(),
            default: DEFAULT_CID_WIDTH,
        };
    };

    let default = get_number(doc, cid_font, b"DW").unwrap_or(DEFAULT_CID_WIDTH);
    let mut widths = HashMap::new();
    if let Some(Object::Array(entries)) = get_resolved(doc, cid_font, b"W") {
        parse_w_array(doc, entries, &mut widths);
    }
    Widths::Composite { widths, default }
}

/// `/W` mixes `c [w1 w2 ...]` and `c_first c_last w` entries.
fn parse_w_array(doc: &Document, entries: &[Object], widths: &mut HashMap<u32, f32>) {
    let mut i = 0;
    while i < entries.len() {
        let Some(start) = object_to_f32(resolve(doc, &entries[i])) else {
            i += 1;
            continue;
        };
        let start = start.max(0.0) as u32;
        match entries.get(i + 1).map(|e| resolve(doc, e)) {
            Some(Object::Array(list)) => {
                for (offset, w) in list.iter().enumerate() {
                    if let Some(w) = object_to_f32(resolve(doc, w)) {
                        widths.insert(start + offset as u32, w);
                    }
                }
                i += 2;
            },
            Some(end) => {
                let end = object_to_f32(end).unwrap_or(0.0).max(0.0) as u32;
                let width = entries
                    .get(i + 2)
                    .and_then(|w| object_to_f32(resolve(doc, w)));
                if let Some(width) = width {
                    for cid in start..=end.min(start.saturating_add(0xFFFF)) {
                        widths.insert(cid, width);
                    }
                }
                i += 3;
            },
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{FontFamily, FontStyle};
    use lopdf::{dictionary, Stream};

    mod simple_fonts {
        use super::*;

        #[test]
        fn test_standard_font_without_widths() {
            let doc = Document::with_version("1.5");
            let dict = dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => "Helvetica-Bold",
            };
            let font = PdfFont::load(&doc, &dict);
            assert_eq!(font.variant.style, FontStyle::Bold);

            let glyphs = font.decode(b"A b");
            assert_eq!(glyphs.len(), 3);
            assert_eq!(glyphs[0].text, "A");
            // Helvetica-Bold 'A' is 722/1000
            assert!((glyphs[0].width - 0.722).abs() < 1e-4);
            assert!(glyphs[1].is_space);
        }

        #[test]
        fn test_widths_array_and_subset_prefix() {
            let doc = Document::with_version("1.5");
            let dict = dictionary! {
                "Subtype" => "TrueType",
                "BaseFont" => "ABCDEF+TimesNewRoman",
                "FirstChar" => 65,
                "Widths" => vec![600.into(), 700.into()],
            };
            let font = PdfFont::load(&doc, &dict);
            assert_eq!(font.base_font, "TimesNewRoman");
            assert_eq!(font.variant.family, FontFamily::Serif);

            let glyphs = font.decode(b"AB");
            assert!((glyphs[0].width - 0.6).abs() < 1e-6);
            assert!((glyphs[1].width - 0.7).abs() < 1e-6);
        }

        #[test]
        fn test_tounicode_overrides_encoding() {
            let mut doc = Document::with_version("1.5");
            let cmap = b"1 beginbfchar\n<01> <0048>\nendbfchar\n".to_vec();
            let cmap_id = doc.add_object(Stream::new(dictionary! {}, cmap));
            let dict = dictionary! {
                "Subtype" => "Type1",
                "BaseFont" => "Custom",
                "ToUnicode" => cmap_id,
            };
            let font = PdfFont::load(&doc, &dict);
            assert_eq!(font.decode(&[1])[0].text, "H");
            // Unmapped codes fall back to WinAnsi
            assert_eq!(font.decode(b"i")[0].text, "i");
        }
    }

    mod composite_fonts {
        use super::*;

        #[test]
        fn test_two_byte_codes_and_w_array() {
            let mut doc = Document::with_version("1.5");
            let cid_font = doc.add_object(dictionary! {
                "Subtype" => "CIDFontType2",
                "DW" => 500,
                "W" => vec![
                    Object::Integer(3),
                    Object::Array(vec![250.into(), 260.into()]),
                    Object::Integer(10),
                    Object::Integer(12),
                    Object::Integer(400),
                ],
            });
            let dict = dictionary! {
                "Subtype" => "Type0",
                "BaseFont" => "Arial",
                "DescendantFonts" => vec![cid_font.into()],
            };
            let font = PdfFont::load(&doc, &dict);
            assert!(font.composite);

            let glyphs = font.decode(&[0x00, 0x04, 0x00, 0x0B, 0x00, 0x41]);
            assert_eq!(glyphs.len(), 3);
            assert!((glyphs[0].width - 0.26).abs() < 1e-6);
            assert!((glyphs[1].width - 0.4).abs() < 1e-6);
            assert!((glyphs[2].width - 0.5).abs() < 1e-6);
            assert_eq!(glyphs[2].text, "A");
            assert!(!glyphs[2].is_space);
        }
    }

    #[test]
    fn test_strip_subset_prefix() {
        assert_eq!(strip_subset_prefix("ABCDEF+Arial"), "Arial");
        assert_eq!(strip_subset_prefix("Foo+Bar"), "Foo+Bar");
        assert_eq!(strip_subset_prefix("Helvetica"), "Helvetica");
    }
}
