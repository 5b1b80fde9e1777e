//! Simple-font text encodings.
//!
//! WinAnsiEncoding is windows-1252, which [`encoding_rs`] provides in both
//! directions: decoding glyph codes found on a page and encoding the text
//! formstamp writes into an overlay.

use encoding_rs::WINDOWS_1252;

/// A 256-entry code to Unicode table for a simple (single-byte) font.
#[derive(Debug, Clone)]
pub struct SimpleEncoding {
    table: [Option<char>; 256],
}

impl Default for SimpleEncoding {
    fn default() -> Self {
        Self::win_ansi()
    }
}

impl SimpleEncoding {
    pub fn win_ansi() -> Self {
        let mut table = [None; 256];
        for (code, slot) in table.iter_mut().enumerate() {
            let byte = [code as u8];
            let (decoded, _) = WINDOWS_1252.decode_without_bom_handling(&byte);
            *slot = decoded.chars().next();
        }
        Self { table }
    }

    /// Build the encoding described by a font's `/Encoding` entry.
    ///
    /// Every named base encoding is treated as WinAnsi; `/Differences`
    /// overrides are applied on top.
    pub fn from_font_dict(doc: &lopdf::Document, font_dict: &lopdf::Dictionary) -> Self {
        let mut encoding = Self::win_ansi();
        let dict = font_dict
            .get(b"Encoding")
            .ok()
            .and_then(|obj| match obj {
                lopdf::Object::Reference(id) => doc.get_object(*id).ok(),
                other => Some(other),
            })
            .and_then(|obj| obj.as_dict().ok());

        if let Some(differences) = dict
            .and_then(|d| d.get(b"Differences").ok())
            .and_then(|obj| obj.as_array().ok())
        {
            encoding.apply_differences(differences);
        }
        encoding
    }

    /// Apply a `/Differences` array: `[code /name /name ... code /name ...]`.
    pub fn apply_differences(&mut self, differences: &[lopdf::Object]) {
        let mut code: usize = 0;
        for item in differences {
            match item {
                lopdf::Object::Integer(start) => code = (*start).clamp(0, 255) as usize,
                lopdf::Object::Name(name) => {
                    if code < 256 {
                        if let Some(ch) = std::str::from_utf8(name)
                            .ok()
                            .and_then(glyph_name_to_char)
                        {
                            self.table[code] = Some(ch);
                        }
                    }
                    code += 1;
                }
                _ => {}
            }
        }
    }

    pub fn decode(&self, code: u8) -> Option<char> {
        self.table[code as usize]
    }
}

/// Map a glyph name to its Unicode character.
///
/// Covers single-letter names, `uniXXXX`, and the names that show up on
/// ordinary Latin forms. Unknown names return `None`.
pub fn glyph_name_to_char(name: &str) -> Option<char> {
    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if ch.is_ascii_alphabetic() {
            return Some(ch);
        }
    }
    if let Some(hex) = name.strip_prefix("uni") {
        if hex.len() == 4 {
            return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
        }
    }

    let ch = match name {
        "space" | "nbspace" => ' ',
        "zero" => '0',
        "one" => '1',
        "two" => '2',
        "three" => '3',
        "four" => '4',
        "five" => '5',
        "six" => '6',
        "seven" => '7',
        "eight" => '8',
        "nine" => '9',
        "period" => '.',
        "comma" => ',',
        "colon" => ':',
        "semicolon" => ';',
        "hyphen" | "minus" => '-',
        "underscore" => '_',
        "slash" => '/',
        "quotesingle" => '\'',
        "quoteright" => '\u{2019}',
        "quoteleft" => '\u{2018}',
        "quotedbl" => '"',
        "parenleft" => '(',
        "parenright" => ')',
        "question" => '?',
        "exclam" => '!',
        "ampersand" => '&',
        "numbersign" => '#',
        "percent" => '%',
        "asterisk" => '*',
        "at" => '@',
        "bullet" => '\u{2022}',
        "endash" => '\u{2013}',
        "emdash" => '\u{2014}',
        "fi" => '\u{FB01}',
        "fl" => '\u{FB02}',
        _ => return None,
    };
    Some(ch)
}

/// Encode text as WinAnsi bytes for a `Tj` operand.
///
/// Characters windows-1252 cannot represent become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        let (bytes, _, had_errors) = WINDOWS_1252.encode(ch.encode_utf8(&mut buf));
        match (had_errors, bytes.as_ref()) {
            (false, [byte]) => out.push(*byte),
            _ => out.push(b'?'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Object;

    #[test]
    fn win_ansi_ascii_and_high_codes() {
        let enc = SimpleEncoding::win_ansi();
        assert_eq!(enc.decode(b'A'), Some('A'));
        assert_eq!(enc.decode(0x80), Some('\u{20AC}'));
        assert_eq!(enc.decode(0x92), Some('\u{2019}'));
        assert_eq!(enc.decode(0xE9), Some('é'));
    }

    #[test]
    fn differences_override_runs() {
        let mut enc = SimpleEncoding::win_ansi();
        enc.apply_differences(&[
            Object::Integer(65),
            Object::Name(b"B".to_vec()),
            Object::Name(b"underscore".to_vec()),
            Object::Integer(1),
            Object::Name(b"uni00E9".to_vec()),
        ]);
        assert_eq!(enc.decode(65), Some('B'));
        assert_eq!(enc.decode(66), Some('_'));
        assert_eq!(enc.decode(1), Some('é'));
        assert_eq!(enc.decode(67), Some('C'));
    }

    #[test]
    fn unknown_glyph_names_keep_base() {
        let mut enc = SimpleEncoding::win_ansi();
        enc.apply_differences(&[Object::Integer(65), Object::Name(b"g123".to_vec())]);
        assert_eq!(enc.decode(65), Some('A'));
    }

    #[test]
    fn glyph_names() {
        assert_eq!(glyph_name_to_char("a"), Some('a'));
        assert_eq!(glyph_name_to_char("seven"), Some('7'));
        assert_eq!(glyph_name_to_char("uni2022"), Some('\u{2022}'));
        assert_eq!(glyph_name_to_char("notaglyph"), None);
    }

    #[test]
    fn encode_win_ansi_maps_and_replaces() {
        assert_eq!(encode_win_ansi("Jordan Lee"), b"Jordan Lee".to_vec());
        assert_eq!(encode_win_ansi("José"), vec![b'J', b'o', b's', 0xE9]);
        assert_eq!(encode_win_ansi("€"), vec![0x80]);
        assert_eq!(encode_win_ansi("日"), vec![b'?']);
    }
}
