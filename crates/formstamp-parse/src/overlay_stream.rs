//! Encoding an [`OverlayPage`] as PDF content.
//!
//! Text becomes `BT /Font size Tf x y Td (..) Tj ET`; circles become four
//! Bézier arcs filled in black. Everything is wrapped in `q … Q`.

use formstamp_core::{OverlayPage, PlacedOp};
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat, dictionary};

use crate::encoding::encode_win_ansi;
use crate::error::BackendError;

/// Control point distance for approximating a quarter circle with a cubic Bézier.
const KAPPA: f64 = 0.552_284_8;

/// Base font name to resource name bindings used by an overlay stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayFonts {
    entries: Vec<(String, String)>,
}

impl OverlayFonts {
    /// Bind each font of `overlay` to a resource name not in `taken`.
    pub fn allocate(overlay: &OverlayPage, taken: &[Vec<u8>]) -> Self {
        let mut entries = Vec::new();
        let mut n = 1;
        for base in overlay.fonts() {
            let resource = loop {
                let candidate = format!("FsF{n}");
                n += 1;
                if !taken.iter().any(|t| t == candidate.as_bytes()) {
                    break candidate;
                }
            };
            entries.push((base.to_string(), resource));
        }
        Self { entries }
    }

    pub fn resource_name(&self, base_font: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(base, _)| base == base_font)
            .map(|(_, resource)| resource.as_str())
    }

    /// `(base_font, resource_name)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(b, r)| (b.as_str(), r.as_str()))
    }
}

/// A simple WinAnsi Type1 font dictionary for a standard base font.
pub fn standard_font_dict(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Build the overlay operations.
///
/// `origin` is the MediaBox lower-left corner; a non-zero origin translates
/// the overlay so page-relative coordinates land on the visible page.
pub fn overlay_operations(
    overlay: &OverlayPage,
    fonts: &OverlayFonts,
    origin: (f64, f64),
) -> Result<Vec<Operation>, BackendError> {
    let mut ops = vec![Operation::new("q", vec![])];
    if origin != (0.0, 0.0) {
        ops.push(Operation::new(
            "cm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                1.into(),
                real(origin.0),
                real(origin.1),
            ],
        ));
    }
    ops.push(Operation::new("rg", vec![0.into(), 0.into(), 0.into()]));

    for op in &overlay.ops {
        match op {
            PlacedOp::Text {
                x,
                y,
                text,
                font,
                size,
            } => {
                let resource = fonts.resource_name(font).ok_or_else(|| {
                    BackendError::Font(format!("no resource bound for overlay font {font}"))
                })?;
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![Object::Name(resource.as_bytes().to_vec()), real(*size)],
                ));
                ops.push(Operation::new("Td", vec![real(*x), real(*y)]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            PlacedOp::FilledCircle { cx, cy, radius } => {
                circle_path(&mut ops, *cx, *cy, *radius);
                ops.push(Operation::new("f", vec![]));
            }
        }
    }

    ops.push(Operation::new("Q", vec![]));
    Ok(ops)
}

/// Encode the overlay as content stream bytes.
pub fn encode_overlay(
    overlay: &OverlayPage,
    fonts: &OverlayFonts,
    origin: (f64, f64),
) -> Result<Vec<u8>, BackendError> {
    let operations = overlay_operations(overlay, fonts, origin)?;
    Ok(Content { operations }.encode()?)
}

fn circle_path(ops: &mut Vec<Operation>, cx: f64, cy: f64, r: f64) {
    let k = KAPPA * r;
    ops.push(Operation::new("m", vec![real(cx + r), real(cy)]));
    let arcs = [
        [cx + r, cy + k, cx + k, cy + r, cx, cy + r],
        [cx - k, cy + r, cx - r, cy + k, cx - r, cy],
        [cx - r, cy - k, cx - k, cy - r, cx, cy - r],
        [cx + k, cy - r, cx + r, cy - k, cx + r, cy],
    ];
    for arc in arcs {
        ops.push(Operation::new("c", arc.iter().map(|&v| real(v)).collect()));
    }
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}
