//! Text showing operators (Tj, TJ, ', ") for the content stream interpreter.
//!
//! Splits string operands into character codes, snapshots the text matrix
//! for each glyph and advances the text position within the [`TextState`].

use crate::text_state::TextState;

/// A character code shown by a text operator, before font decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RawChar {
    pub char_code: u32,
    /// Glyph width in glyph space (1/1000 of text space).
    pub glyph_width: f64,
    /// Advance applied to the text position.
    ///
    /// `((w0 / 1000) * font_size + char_spacing + word_spacing_if_space) * h_scaling`.
    pub displacement: f64,
    /// Text matrix at the moment this character was shown.
    pub text_matrix: [f64; 6],
}

/// An element of a TJ array operand.
#[derive(Debug, Clone, PartialEq)]
pub enum TjElement {
    String(Vec<u8>),
    /// Adjustment in thousandths of text space. Positive values move left.
    Adjustment(f64),
}

/// Bytes per character code: 1 for simple fonts, 2 for Identity-H Type0 fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeWidth {
    #[default]
    Single,
    Double,
}

impl CodeWidth {
    fn codes(self, bytes: &[u8]) -> Vec<u32> {
        match self {
            CodeWidth::Single => bytes.iter().map(|&b| u32::from(b)).collect(),
            CodeWidth::Double => bytes
                .chunks(2)
                .map(|pair| match pair {
                    [hi, lo] => (u32::from(*hi) << 8) | u32::from(*lo),
                    [single] => u32::from(*single),
                    _ => 0,
                })
                .collect(),
        }
    }
}

/// `Tj` operator: show a string.
pub fn show_string(
    text_state: &mut TextState,
    string_bytes: &[u8],
    code_width: CodeWidth,
    get_width: &dyn Fn(u32) -> f64,
) -> Vec<RawChar> {
    let codes = code_width.codes(string_bytes);
    let mut chars = Vec::with_capacity(codes.len());

    for char_code in codes {
        let text_matrix = text_state.text_matrix().to_array();
        let w0 = get_width(char_code);
        // Word spacing applies to the single-byte code 32 only.
        let word_spacing = if char_code == 32 && code_width == CodeWidth::Single {
            text_state.word_spacing
        } else {
            0.0
        };
        let tx = ((w0 / 1000.0) * text_state.font_size + text_state.char_spacing + word_spacing)
            * text_state.h_scaling_normalized();

        chars.push(RawChar {
            char_code,
            glyph_width: w0,
            displacement: tx,
            text_matrix,
        });
        text_state.advance_text_position(tx);
    }

    chars
}

/// `TJ` operator: show strings with positioning adjustments.
pub fn show_string_with_positioning(
    text_state: &mut TextState,
    elements: &[TjElement],
    code_width: CodeWidth,
    get_width: &dyn Fn(u32) -> f64,
) -> Vec<RawChar> {
    let mut chars = Vec::new();

    for element in elements {
        match element {
            TjElement::String(bytes) => {
                chars.extend(show_string(text_state, bytes, code_width, get_width));
            }
            TjElement::Adjustment(adj) => {
                let tx = -(adj / 1000.0) * text_state.font_size * text_state.h_scaling_normalized();
                text_state.advance_text_position(tx);
            }
        }
    }

    chars
}
