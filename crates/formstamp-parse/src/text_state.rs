//! Text state and text positioning operators.
//!
//! Tracks the parameters set by Tc, Tw, Tz, TL, Tf and Ts together with the
//! text and line matrices maintained by BT, Tm, Td, TD and T*.

use formstamp_core::Ctm;

/// Text state parameters tracked during content stream interpretation.
///
/// The scalar parameters are part of the graphics state and are saved and
/// restored by q/Q; the matrices belong to the current text object.
#[derive(Debug, Clone, PartialEq)]
pub struct TextState {
    /// Character spacing (Tc).
    pub char_spacing: f64,
    /// Word spacing (Tw), applied to code 32.
    pub word_spacing: f64,
    /// Horizontal scaling (Tz) as a percentage.
    pub h_scaling: f64,
    /// Leading (TL).
    pub leading: f64,
    /// Resource name of the current font (Tf).
    pub font_name: String,
    pub font_size: f64,
    /// Text rise (Ts).
    pub rise: f64,
    text_matrix: Ctm,
    line_matrix: Ctm,
}

impl Default for TextState {
    fn default() -> Self {
        Self::new()
    }
}

impl TextState {
    pub fn new() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 100.0,
            leading: 0.0,
            font_name: String::new(),
            font_size: 0.0,
            rise: 0.0,
            text_matrix: Ctm::identity(),
            line_matrix: Ctm::identity(),
        }
    }

    pub fn text_matrix(&self) -> &Ctm {
        &self.text_matrix
    }

    /// Horizontal scaling as a fraction (1.0 = 100%).
    pub fn h_scaling_normalized(&self) -> f64 {
        self.h_scaling / 100.0
    }

    /// `BT`: reset both matrices to identity.
    pub fn begin_text(&mut self) {
        self.text_matrix = Ctm::identity();
        self.line_matrix = Ctm::identity();
    }

    /// `Tm`: replace the text and line matrices.
    pub fn set_text_matrix(&mut self, m: Ctm) {
        self.text_matrix = m;
        self.line_matrix = m;
    }

    /// `Td`: move to the start of the next line, offset from the current line start.
    pub fn move_text_position(&mut self, tx: f64, ty: f64) {
        let translation = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, ty);
        self.line_matrix = translation.concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// `TD`: set leading to `-ty`, then `Td`.
    pub fn move_text_position_and_set_leading(&mut self, tx: f64, ty: f64) {
        self.leading = -ty;
        self.move_text_position(tx, ty);
    }

    /// `T*`: `0 -TL Td`.
    pub fn move_to_next_line(&mut self) {
        let leading = self.leading;
        self.move_text_position(0.0, -leading);
    }

    /// Advance the text matrix by a displacement in text space.
    pub fn advance_text_position(&mut self, tx: f64) {
        let translation = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, 0.0);
        self.text_matrix = translation.concat(&self.text_matrix);
    }

    /// Copy of the graphics-state portion for `q`.
    pub fn save_snapshot(&self) -> TextState {
        self.clone()
    }

    /// Restore the graphics-state portion for `Q`, keeping the matrices.
    pub fn restore_snapshot(&mut self, snapshot: TextState) {
        *self = TextState {
            text_matrix: self.text_matrix,
            line_matrix: self.line_matrix,
            ..snapshot
        };
    }
}
