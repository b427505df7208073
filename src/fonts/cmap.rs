//! ToUnicode CMap parser.
//!
//! CMap streams map character codes to Unicode text. Composite fonts need
//! them to turn the 2-byte codes in a content stream back into characters.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

/// A character map from character codes to Unicode strings.
///
/// Keys are character codes (typically 1-4 bytes), values are Unicode strings.
pub type CMap = HashMap<u32, String>;

/// Largest number of codes a single bfrange entry may expand to.
const MAX_RANGE: u32 = 0xFFFF;

lazy_static! {
    static ref RE_BFCHAR: Regex =
        Regex::new(r"<([0-9A-Fa-f]+)>\s*<([0-9A-Fa-f]+)>").expect("valid bfchar regex");
    static ref RE_BFRANGE_SEQ: Regex =
        Regex::new(r"<([0-9A-Fa-f]+)>\s*<([0-9A-Fa-f]+)>\s*<([0-9A-Fa-f]+)>")
            .expect("valid bfrange regex");
    static ref RE_BFRANGE_ARRAY: Regex = Regex::new(
        r"<([0-9A-Fa-f]+)>\s*<([0-9A-Fa-f]+)>\s*\[((?:\s*<[0-9A-Fa-f]+>\s*)+)\]"
    )
    .expect("valid bfrange array regex");
    static ref RE_HEX: Regex = Regex::new(r"<([0-9A-Fa-f]+)>").expect("valid hex regex");
}

/// Parse a ToUnicode CMap stream.
///
/// Both `bfchar` (`<src> <dst>`) and `bfrange` sections are read; ranges come
/// either as `<lo> <hi> <dst>` or `<lo> <hi> [<dst0> <dst1> ...]`.
/// Unparseable lines are skipped.
///
/// # Examples
///
/// ```
/// use pdf_retext::fonts::parse_tounicode_cmap;
///
/// let cmap = parse_tounicode_cmap(b"beginbfchar\n<0041> <0041>\nendbfchar");
/// assert_eq!(cmap.get(&0x41).map(String::as_str), Some("A"));
/// ```
pub fn parse_tounicode_cmap(data: &[u8]) -> CMap {
    let mut cmap = HashMap::new();
    let content = String::from_utf8_lossy(data);

    for section in extract_sections(&content, "beginbfchar", "endbfchar") {
        for line in section.lines() {
            if let Some((src, dst)) = parse_bfchar_line(line) {
                log::trace!("ToUnicode bfchar: 0x{:02X} -> {:?}", src, dst);
                cmap.insert(src, dst);
            }
        }
    }

    for section in extract_sections(&content, "beginbfrange", "endbfrange") {
        for line in section.lines() {
            if let Some(mappings) = parse_bfrange_line(line) {
                cmap.extend(mappings);
            }
        }
    }

    cmap
}

/// Extract sections between begin and end markers.
fn extract_sections<'a>(content: &'a str, begin: &str, end: &str) -> Vec<&'a str> {
    let mut sections = Vec::new();
    let mut remaining = content;

    while let Some(begin_pos) = remaining.find(begin) {
        let after_begin = &remaining[begin_pos + begin.len()..];
        match after_begin.find(end) {
            Some(end_pos) => {
                sections.push(&after_begin[..end_pos]);
                remaining = &after_begin[end_pos + end.len()..];
            },
            None => break,
        }
    }

    sections
}

/// Decode a destination hex string.
///
/// Destinations are UTF-16BE; four hex digits per unit, so surrogate pairs
/// and multi-character ligatures decode naturally. Short odd-length values
/// are taken as a bare code point.
fn decode_destination(hex: &str) -> Option<String> {
    if hex.len() % 4 != 0 {
        let code = u32::from_str_radix(hex, 16).ok()?;
        return char::from_u32(code).map(|c| c.to_string());
    }

    let units: Vec<u16> = (0..hex.len())
        .step_by(4)
        .map(|i| u16::from_str_radix(&hex[i..i + 4], 16))
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    let text = String::from_utf16(&units).ok()?;
    (!text.is_empty()).then_some(text)
}

/// Parse a bfchar line: `<src> <dst>`.
fn parse_bfchar_line(line: &str) -> Option<(u32, String)> {
    let caps = RE_BFCHAR.captures(line)?;
    let src = u32::from_str_radix(&caps[1], 16).ok()?;
    let dst = decode_destination(&caps[2])?;
    Some((src, dst))
}

/// Parse a bfrange line in either of its two forms.
fn parse_bfrange_line(line: &str) -> Option<Vec<(u32, String)>> {
    if let Some(caps) = RE_BFRANGE_ARRAY.captures(line) {
        let start = u32::from_str_radix(&caps[1], 16).ok()?;
        let end = u32::from_str_radix(&caps[2], 16).ok()?;
        let range_size = end.checked_sub(start)?.min(MAX_RANGE) as usize + 1;

        let destinations: Vec<&str> = RE_HEX
            .captures_iter(&caps[3])
            .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
            .collect();
        if destinations.len() != range_size {
            log::warn!(
                "ToUnicode bfrange array size mismatch: expected {} entries for range 0x{:X}-0x{:X}, got {}",
                range_size,
                start,
                end,
                destinations.len()
            );
        }

        return Some(
            destinations
                .iter()
                .take(range_size)
                .enumerate()
                .filter_map(|(i, hex)| Some((start + i as u32, decode_destination(hex)?)))
                .collect(),
        );
    }

    let caps = RE_BFRANGE_SEQ.captures(line)?;
    let start = u32::from_str_radix(&caps[1], 16).ok()?;
    let end = u32::from_str_radix(&caps[2], 16).ok()?;
    let dst_hex = &caps[3];
    let span = end.checked_sub(start)?.min(MAX_RANGE);

    // Only the last UTF-16 unit of the destination increments
    let first = decode_destination(dst_hex)?;
    let mut units: Vec<u16> = first.encode_utf16().collect();
    let base = *units.last()?;

    let mut result = Vec::with_capacity(span as usize + 1);
    for i in 0..=span {
        let Some(last) = base.checked_add(i as u16) else {
            break;
        };
        if let Some(slot) = units.last_mut() {
            *slot = last;
        }
        if let Ok(text) = String::from_utf16(&units) {
            result.push((start + i, text));
        }
    }
    Some(result)
}

/// Decode a string of character codes through a CMap.
///
/// Codes are `code_bytes` wide and big-endian; codes without a mapping
/// are skipped.
pub fn decode_with_cmap(bytes: &[u8], cmap: &CMap, code_bytes: usize) -> String {
    let width = code_bytes.clamp(1, 4);
    bytes
        .chunks(width)
        .filter_map(|chunk| {
            let code = chunk.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32);
            cmap.get(&code).map(String::as_str)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(cmap: &CMap, code: u32) -> Option<&str> {
        cmap.get(&code).map(String::as_str)
    }

    mod bfchar {
        use super::*;

        #[test]
        fn test_single_and_multiple() {
            let cmap = parse_tounicode_cmap(
                b"beginbfchar\n<0041> <0041>\n<0042> <0058>\n  <00E9>   <00E9>  \nendbfchar",
            );
            assert_eq!(get(&cmap, 0x41), Some("A"));
            assert_eq!(get(&cmap, 0x42), Some("X"));
            assert_eq!(get(&cmap, 0xE9), Some("\u{00E9}"));
        }

        #[test]
        fn test_ligature() {
            let cmap = parse_tounicode_cmap(b"beginbfchar\n<000C> <00660069>\nendbfchar");
            assert_eq!(get(&cmap, 0x0C), Some("fi"));
        }

        #[test]
        fn test_surrogate_pair() {
            let cmap = parse_tounicode_cmap(b"beginbfchar\n<0001> <D835DF0C>\nendbfchar");
            assert_eq!(get(&cmap, 0x01), Some("\u{1D70C}"));
        }

        #[test]
        fn test_invalid_line_ignored() {
            assert_eq!(parse_bfchar_line("invalid line"), None);
            assert!(parse_tounicode_cmap(b"").is_empty());
        }
    }

    mod bfrange {
        use super::*;

        #[test]
        fn test_sequential() {
            let cmap = parse_tounicode_cmap(b"beginbfrange\n<0020> <007E> <0020>\nendbfrange");
            assert_eq!(cmap.len(), 95);
            assert_eq!(get(&cmap, 0x30), Some("0"));
            assert_eq!(get(&cmap, 0x7E), Some("~"));
        }

        #[test]
        fn test_array_form() {
            let cmap = parse_tounicode_cmap(
                b"beginbfrange\n<005F> <0061> [<00660066> <00660069> <00660066006C>]\nendbfrange",
            );
            assert_eq!(get(&cmap, 0x5F), Some("ff"));
            assert_eq!(get(&cmap, 0x60), Some("fi"));
            assert_eq!(get(&cmap, 0x61), Some("ffl"));
        }

        #[test]
        fn test_inverted_range_rejected() {
            assert!(parse_bfrange_line("<0043> <0041> <0041>").is_none());
        }

        #[test]
        fn test_mixed_with_bfchar() {
            let cmap = parse_tounicode_cmap(
                b"beginbfchar\n<0001> <0058>\nendbfchar\nbeginbfrange\n<0002> <0004> <0042>\nendbfrange",
            );
            assert_eq!(get(&cmap, 0x01), Some("X"));
            assert_eq!(get(&cmap, 0x03), Some("C"));
        }
    }

    #[test]
    fn test_extract_sections() {
        let content = "a\nbeginbfchar\ndata1\nendbfchar\nb\nbeginbfchar\ndata2\nendbfchar\nc";
        let sections = extract_sections(content, "beginbfchar", "endbfchar");
        assert_eq!(sections.len(), 2);
        assert!(sections[1].contains("data2"));
    }

    #[test]
    fn test_decode_two_byte_codes() {
        let cmap = parse_tounicode_cmap(b"beginbfrange\n<0003> <0005> <0048>\nendbfrange");
        let text = decode_with_cmap(&[0x00, 0x03, 0x00, 0x05, 0x00, 0x09], &cmap, 2);
        assert_eq!(text, "HJ");
    }
}
