//! WinAnsi (Windows-1252) encoding.
//!
//! Simple fonts in the documents we read, and every standard font we add,
//! use this single-byte encoding. Bytes 0x00-0x7F and 0xA0-0xFF coincide
//! with Latin-1; 0x80-0x9F hold typographic punctuation.

/// Characters for bytes 0x80..=0x9F; `None` marks unassigned codes.
const HIGH_CONTROL_RANGE: [Option<char>; 32] = [
    Some('\u{20AC}'), // Euro sign
    None,
    Some('\u{201A}'), // Single low-9 quotation mark
    Some('\u{0192}'), // Latin small letter f with hook
    Some('\u{201E}'), // Double low-9 quotation mark
    Some('\u{2026}'), // Horizontal ellipsis
    Some('\u{2020}'), // Dagger
    Some('\u{2021}'), // Double dagger
    Some('\u{02C6}'), // Modifier letter circumflex accent
    Some('\u{2030}'), // Per mille sign
    Some('\u{0160}'), // Latin capital letter S with caron
    Some('\u{2039}'), // Single left-pointing angle quotation mark
    Some('\u{0152}'), // Latin capital ligature OE
    None,
    Some('\u{017D}'), // Latin capital letter Z with caron
    None,
    None,
    Some('\u{2018}'), // Left single quotation mark
    Some('\u{2019}'), // Right single quotation mark
    Some('\u{201C}'), // Left double quotation mark
    Some('\u{201D}'), // Right double quotation mark
    Some('\u{2022}'), // Bullet
    Some('\u{2013}'), // En dash
    Some('\u{2014}'), // Em dash
    Some('\u{02DC}'), // Small tilde
    Some('\u{2122}'), // Trade mark sign
    Some('\u{0161}'), // Latin small letter s with caron
    Some('\u{203A}'), // Single right-pointing angle quotation mark
    Some('\u{0153}'), // Latin small ligature oe
    None,
    Some('\u{017E}'), // Latin small letter z with caron
    Some('\u{0178}'), // Latin capital letter Y with diaeresis
];

/// Byte substituted for characters WinAnsi cannot represent.
pub const REPLACEMENT_BYTE: u8 = b'?';

/// Decode one WinAnsi byte.
pub fn winansi_to_unicode(byte: u8) -> Option<char> {
    match byte {
        0x80..=0x9F => HIGH_CONTROL_RANGE[(byte - 0x80) as usize],
        _ => Some(byte as char),
    }
}

/// Encode one character as a WinAnsi byte.
pub fn unicode_to_winansi(ch: char) -> Option<u8> {
    let codepoint = ch as u32;
    if codepoint < 0x80 || (0xA0..=0xFF).contains(&codepoint) {
        return Some(codepoint as u8);
    }
    HIGH_CONTROL_RANGE
        .iter()
        .position(|&c| c == Some(ch))
        .map(|i| 0x80 + i as u8)
}

/// Decode a byte string, dropping unassigned codes.
pub fn decode_winansi(bytes: &[u8]) -> String {
    bytes.iter().filter_map(|&b| winansi_to_unicode(b)).collect()
}

/// Encode text, replacing unrepresentable characters with `?`.
///
/// # Examples
///
/// ```
/// use pdf_retext::fonts::encoding::encode_winansi;
///
/// assert_eq!(encode_winansi("caf\u{e9} \u{2014} \u{4e2d}"), b"caf\xe9 \x97 ?".to_vec());
/// ```
pub fn encode_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| unicode_to_winansi(c).unwrap_or(REPLACEMENT_BYTE))
        .collect()
}

/// Text as it will actually appear once encoded.
pub fn representable(text: &str) -> String {
    decode_winansi(&encode_winansi(text))
}
