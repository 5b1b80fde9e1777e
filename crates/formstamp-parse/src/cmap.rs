//! ToUnicode CMap parser.
//!
//! Reads the `beginbfchar`/`endbfchar` and `beginbfrange`/`endbfrange`
//! sections of a `/ToUnicode` stream. Destination values are UTF-16BE.

use std::collections::HashMap;

use crate::error::BackendError;

/// Character code to Unicode mapping from a `/ToUnicode` stream.
#[derive(Debug, Clone, Default)]
pub struct ToUnicodeCMap {
    mappings: HashMap<u32, String>,
}

/// Tokens inside a bf section: `<hex>`, `[` and `]`.
#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Hex(&'a str),
    Open,
    Close,
}

impl ToUnicodeCMap {
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);
        let mut mappings = HashMap::new();

        for section in sections(&text, "beginbfchar", "endbfchar") {
            let tokens = tokenize(section);
            for pair in tokens.chunks(2) {
                if let [Token::Hex(src), Token::Hex(dst)] = pair {
                    mappings.insert(parse_hex_code(src)?, decode_utf16be_hex(dst)?);
                }
            }
        }

        for section in sections(&text, "beginbfrange", "endbfrange") {
            let tokens = tokenize(section);
            let mut i = 0;
            while i + 2 < tokens.len() {
                let (Token::Hex(lo), Token::Hex(hi)) = (&tokens[i], &tokens[i + 1]) else {
                    i += 1;
                    continue;
                };
                let lo = parse_hex_code(lo)?;
                let hi = parse_hex_code(hi)?;
                match &tokens[i + 2] {
                    Token::Hex(dst) => {
                        let mut units = utf16_units(dst)?;
                        for code in lo..=hi {
                            mappings.insert(code, String::from_utf16_lossy(&units));
                            if let Some(last) = units.last_mut() {
                                *last = last.wrapping_add(1);
                            }
                        }
                        i += 3;
                    }
                    Token::Open => {
                        let mut j = i + 3;
                        let mut code = lo;
                        while j < tokens.len() && tokens[j] != Token::Close {
                            if let Token::Hex(dst) = tokens[j] {
                                if code <= hi {
                                    mappings.insert(code, decode_utf16be_hex(dst)?);
                                }
                                code += 1;
                            }
                            j += 1;
                        }
                        i = j + 1;
                    }
                    Token::Close => i += 3,
                }
            }
        }

        Ok(Self { mappings })
    }

    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

fn sections<'a>(text: &'a str, begin: &str, end: &str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(begin) {
        let body = &rest[start + begin.len()..];
        let Some(stop) = body.find(end) else {
            break;
        };
        found.push(&body[..stop]);
        rest = &body[stop + end.len()..];
    }
    found
}

fn tokenize(section: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = section;
    while let Some(pos) = rest.find(['<', '[', ']']) {
        match rest.as_bytes()[pos] {
            b'<' => {
                let Some(len) = rest[pos + 1..].find('>') else {
                    break;
                };
                tokens.push(Token::Hex(rest[pos + 1..pos + 1 + len].trim()));
                rest = &rest[pos + len + 2..];
            }
            b'[' => {
                tokens.push(Token::Open);
                rest = &rest[pos + 1..];
            }
            _ => {
                tokens.push(Token::Close);
                rest = &rest[pos + 1..];
            }
        }
    }
    tokens
}

fn parse_hex_code(hex: &str) -> Result<u32, BackendError> {
    u32::from_str_radix(hex, 16)
        .map_err(|e| BackendError::Parse(format!("invalid hex code '{hex}': {e}")))
}

fn utf16_units(hex: &str) -> Result<Vec<u16>, BackendError> {
    // Single-byte destinations like <41> are padded to one code unit.
    let padded;
    let hex = if hex.len() == 2 {
        padded = format!("00{hex}");
        padded.as_str()
    } else {
        hex
    };
    if hex.len() % 4 != 0 {
        return Err(BackendError::Parse(format!(
            "UTF-16BE hex string must have length divisible by 4, got '{hex}'"
        )));
    }
    hex.as_bytes()
        .chunks(4)
        .map(|chunk| {
            let chunk = std::str::from_utf8(chunk)
                .map_err(|e| BackendError::Parse(format!("invalid hex: {e}")))?;
            u16::from_str_radix(chunk, 16)
                .map_err(|e| BackendError::Parse(format!("invalid hex '{chunk}': {e}")))
        })
        .collect()
}

fn decode_utf16be_hex(hex: &str) -> Result<String, BackendError> {
    let units = utf16_units(hex)?;
    String::from_utf16(&units)
        .map_err(|e| BackendError::Parse(format!("invalid UTF-16BE sequence: {e}")))
}
