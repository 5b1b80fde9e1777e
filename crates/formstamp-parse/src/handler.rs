//! Content handler callback trait for content stream interpretation.
//!
//! The interpreter calls [`ContentHandler::on_char`] for every glyph shown by
//! Tj, TJ, ' and ". [`CharCollector`] turns those events into page chars.

use formstamp_core::Char;

use crate::char_extraction::char_from_event;

/// Information about a rendered character glyph.
///
/// Carries everything needed to compute the final character bounding box.
#[derive(Debug, Clone)]
pub struct CharEvent {
    /// The character code from the PDF content stream.
    pub char_code: u32,
    /// Unicode text, if the font's encoding or ToUnicode map knows the code.
    pub unicode: Option<String>,
    /// Base font name (e.g., "Helvetica", "BCDFEE+ArialMT").
    pub font_name: String,
    /// Font size in text space units.
    pub font_size: f64,
    /// The text matrix at the time of rendering.
    pub text_matrix: [f64; 6],
    /// The current transformation matrix at the time of rendering.
    pub ctm: [f64; 6],
    /// Glyph width in glyph space units (1/1000 of text space).
    pub displacement: f64,
    /// Horizontal scaling as a fraction (100% = 1.0).
    pub h_scaling: f64,
    /// Text rise (Ts).
    pub rise: f64,
    /// Font ascent in glyph space units.
    pub ascent: f64,
    /// Font descent in glyph space units (negative).
    pub descent: f64,
}

/// Receives events from the content stream interpreter.
pub trait ContentHandler {
    /// Called when a character glyph is rendered.
    fn on_char(&mut self, event: CharEvent);
}

/// Collects [`Char`]s in top-left page coordinates.
#[derive(Debug)]
pub struct CharCollector {
    media_box: [f64; 4],
    chars: Vec<Char>,
}

impl CharCollector {
    /// `media_box` is `[x0, y0, x1, y1]` in PDF user space.
    pub fn new(media_box: [f64; 4]) -> Self {
        Self {
            media_box,
            chars: Vec::new(),
        }
    }

    pub fn into_chars(self) -> Vec<Char> {
        self.chars
    }
}

impl ContentHandler for CharCollector {
    fn on_char(&mut self, event: CharEvent) {
        self.chars.push(char_from_event(&event, self.media_box));
    }
}
