use crate::geometry::BBox;

/// A single character extracted from a PDF page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Char {
    /// The text content of this character.
    pub text: String,
    /// Bounding box in top-left origin coordinates.
    pub bbox: BBox,
    /// Font name.
    pub fontname: String,
    /// Font size in points.
    pub size: f64,
    /// Whether the character is upright (not rotated).
    pub upright: bool,
    /// Raw character code from the PDF content stream.
    pub char_code: u32,
}

impl Char {
    /// True for space-like glyphs that separate words.
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(text: &str) -> Char {
        Char {
            text: text.to_string(),
            bbox: BBox::new(10.0, 20.0, 20.0, 32.0),
            fontname: "Helvetica".to_string(),
            size: 12.0,
            upright: true,
            char_code: 65,
        }
    }

    #[test]
    fn test_char_is_blank() {
        assert!(make(" ").is_blank());
        assert!(make("\u{00A0}").is_blank());
        assert!(!make("A").is_blank());
    }
}
