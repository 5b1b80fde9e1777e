//! Overlay rendering.
//!
//! Drawing operations are expressed in top-left page coordinates (the same
//! system words and anchors use). [`render`] converts them to PDF's
//! bottom-left origin, producing an [`OverlayPage`] the backend can encode
//! into a content stream.

use crate::field::{Anchor, FieldSpec, Mark};

/// Base font used for text marks.
pub const DEFAULT_FONT: &str = "Helvetica";

/// A drawing operation in top-left page coordinates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawOp {
    /// Text whose baseline starts at `(x, top)`.
    Text {
        x: f64,
        top: f64,
        text: String,
        font: String,
        size: f64,
    },
    /// A filled black circle centered at `(x, top)`.
    FilledCircle { x: f64, top: f64, radius: f64 },
}

impl DrawOp {
    /// The operation that draws `mark` for `field` at a resolved anchor.
    pub fn for_mark(anchor: &Anchor, field: &FieldSpec, mark: &Mark) -> DrawOp {
        match mark {
            Mark::Text(text) => DrawOp::Text {
                x: anchor.x,
                top: anchor.y,
                text: text.clone(),
                font: DEFAULT_FONT.to_string(),
                size: field.font_size,
            },
            Mark::Choice(_) => DrawOp::FilledCircle {
                x: anchor.x,
                top: anchor.y,
                radius: field.radius,
            },
        }
    }
}

/// A drawing operation in PDF user space (bottom-left origin).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlacedOp {
    Text {
        x: f64,
        y: f64,
        text: String,
        font: String,
        size: f64,
    },
    FilledCircle { cx: f64, cy: f64, radius: f64 },
}

/// A transparent page-sized drawing surface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayPage {
    pub width: f64,
    pub height: f64,
    pub ops: Vec<PlacedOp>,
}

impl OverlayPage {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Base font names used by text operations, in first-use order.
    pub fn fonts(&self) -> Vec<&str> {
        let mut fonts: Vec<&str> = Vec::new();
        for op in &self.ops {
            if let PlacedOp::Text { font, .. } = op {
                if !fonts.contains(&font.as_str()) {
                    fonts.push(font);
                }
            }
        }
        fonts
    }
}

/// Flip a top-origin y coordinate to PDF's bottom-left origin.
pub fn y_from_bottom(page_height: f64, top: f64) -> f64 {
    page_height - top
}

/// Lay out `ops` on an overlay matching the target page's dimensions.
pub fn render(page_width: f64, page_height: f64, ops: &[DrawOp]) -> OverlayPage {
    let ops = ops
        .iter()
        .map(|op| match op {
            DrawOp::Text {
                x,
                top,
                text,
                font,
                size,
            } => PlacedOp::Text {
                x: *x,
                y: y_from_bottom(page_height, *top),
                text: text.clone(),
                font: font.clone(),
                size: *size,
            },
            DrawOp::FilledCircle { x, top, radius } => PlacedOp::FilledCircle {
                cx: *x,
                cy: y_from_bottom(page_height, *top),
                radius: *radius,
            },
        })
        .collect();

    OverlayPage {
        width: page_width,
        height: page_height,
        ops,
    }
}
