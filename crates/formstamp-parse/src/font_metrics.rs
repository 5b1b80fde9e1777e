//! Font metrics extraction from PDF font dictionaries.
//!
//! Parses /Widths, /FirstChar, /FontDescriptor (simple fonts) and /W, /DW
//! (Type0 descendants) to provide glyph widths, ascent, and descent for
//! character bounding box calculation. Fonts with no width data fall back
//! to the built-in standard font tables.

use std::collections::HashMap;

use crate::standard_fonts;

/// Default ascent when not specified (750/1000 of text space).
const DEFAULT_ASCENT: f64 = 750.0;

/// Default descent when not specified (-250/1000 of text space).
const DEFAULT_DESCENT: f64 = -250.0;

/// Default character width when not specified (600/1000 of text space).
const DEFAULT_WIDTH: f64 = 600.0;

/// Default width for CID fonts without /DW.
const DEFAULT_CID_WIDTH: f64 = 1000.0;

/// Glyph widths and vertical metrics, in glyph space (1/1000 of text space).
#[derive(Debug, Clone)]
pub struct FontMetrics {
    widths: HashMap<u32, f64>,
    missing_width: f64,
    ascent: f64,
    descent: f64,
}

impl FontMetrics {
    pub fn new(widths: HashMap<u32, f64>, missing_width: f64, ascent: f64, descent: f64) -> Self {
        Self {
            widths,
            missing_width,
            ascent,
            descent,
        }
    }

    /// Metrics used when a font cannot be resolved at all.
    pub fn default_metrics() -> Self {
        Self::new(HashMap::new(), DEFAULT_WIDTH, DEFAULT_ASCENT, DEFAULT_DESCENT)
    }

    pub fn get_width(&self, char_code: u32) -> f64 {
        self.widths
            .get(&char_code)
            .copied()
            .unwrap_or(self.missing_width)
    }

    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    pub fn descent(&self) -> f64 {
        self.descent
    }
}

/// Extract [`FontMetrics`] from a lopdf font dictionary.
///
/// Missing entries fall back to defaults rather than failing.
pub fn extract_font_metrics(doc: &lopdf::Document, font_dict: &lopdf::Dictionary) -> FontMetrics {
    if is_type0_font(font_dict) {
        return match descendant_font(doc, font_dict) {
            Some(cid_font) => extract_cid_metrics(doc, cid_font),
            None => FontMetrics::new(
                HashMap::new(),
                DEFAULT_CID_WIDTH,
                DEFAULT_ASCENT,
                DEFAULT_DESCENT,
            ),
        };
    }

    let first_char = font_dict
        .get(b"FirstChar")
        .ok()
        .and_then(object_to_f64_opt)
        .map_or(0, |v| v as u32);

    let mut widths: HashMap<u32, f64> = font_dict
        .get(b"Widths")
        .ok()
        .map(|obj| resolve_object(doc, obj))
        .and_then(|obj| obj.as_array().ok())
        .map(|arr| {
            arr.iter()
                .enumerate()
                .map(|(i, o)| {
                    let w = object_to_f64_opt(resolve_object(doc, o)).unwrap_or(0.0);
                    (first_char + i as u32, w)
                })
                .collect()
        })
        .unwrap_or_default();

    if widths.is_empty() {
        if let Some(data) = base_font_name(font_dict).and_then(standard_fonts::lookup) {
            widths = data
                .widths
                .iter()
                .enumerate()
                .map(|(code, &w)| (code as u32, f64::from(w)))
                .collect();
        }
    }

    let desc = parse_font_descriptor(doc, font_dict, DEFAULT_WIDTH);
    FontMetrics::new(widths, desc.missing_width, desc.ascent, desc.descent)
}

/// The /BaseFont name of a font dictionary.
pub fn base_font_name(font_dict: &lopdf::Dictionary) -> Option<&str> {
    font_dict
        .get(b"BaseFont")
        .ok()
        .and_then(|o| o.as_name().ok())
        .and_then(|n| std::str::from_utf8(n).ok())
}

/// Detect whether a font dictionary represents a Type0 (composite) font.
pub fn is_type0_font(font_dict: &lopdf::Dictionary) -> bool {
    font_dict
        .get(b"Subtype")
        .ok()
        .and_then(|o| o.as_name().ok())
        .is_some_and(|s| s == b"Type0")
}

/// The first /DescendantFonts entry of a Type0 font.
pub fn descendant_font<'a>(
    doc: &'a lopdf::Document,
    type0_dict: &'a lopdf::Dictionary,
) -> Option<&'a lopdf::Dictionary> {
    let descendants = resolve_object(doc, type0_dict.get(b"DescendantFonts").ok()?);
    let first = resolve_object(doc, descendants.as_array().ok()?.first()?);
    first.as_dict().ok()
}

fn extract_cid_metrics(doc: &lopdf::Document, cid_font: &lopdf::Dictionary) -> FontMetrics {
    let default_width = cid_font
        .get(b"DW")
        .ok()
        .and_then(object_to_f64_opt)
        .unwrap_or(DEFAULT_CID_WIDTH);
    let widths = cid_font
        .get(b"W")
        .ok()
        .map(|obj| resolve_object(doc, obj))
        .and_then(|obj| obj.as_array().ok())
        .map(|arr| parse_w_array(arr, doc))
        .unwrap_or_default();
    let desc = parse_font_descriptor(doc, cid_font, default_width);
    FontMetrics::new(widths, default_width, desc.ascent, desc.descent)
}

/// Parse a /W array: `c [w1 w2 ...]` or `c_first c_last w` runs.
pub fn parse_w_array(objects: &[lopdf::Object], doc: &lopdf::Document) -> HashMap<u32, f64> {
    let mut widths = HashMap::new();
    let mut i = 0;

    while i < objects.len() {
        let Some(start) = object_to_f64_opt(resolve_object(doc, &objects[i])) else {
            i += 1;
            continue;
        };
        let start = start as u32;
        let Some(next) = objects.get(i + 1).map(|o| resolve_object(doc, o)) else {
            break;
        };

        if let Ok(arr) = next.as_array() {
            for (j, obj) in arr.iter().enumerate() {
                if let Some(w) = object_to_f64_opt(resolve_object(doc, obj)) {
                    widths.insert(start + j as u32, w);
                }
            }
            i += 2;
        } else if let Some(end) = object_to_f64_opt(next) {
            if let Some(w) = objects
                .get(i + 2)
                .and_then(|o| object_to_f64_opt(resolve_object(doc, o)))
            {
                for cid in start..=end as u32 {
                    widths.insert(cid, w);
                }
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    widths
}

struct FontDescriptorInfo {
    ascent: f64,
    descent: f64,
    missing_width: f64,
}

fn parse_font_descriptor(
    doc: &lopdf::Document,
    font_dict: &lopdf::Dictionary,
    fallback_width: f64,
) -> FontDescriptorInfo {
    let desc = font_dict
        .get(b"FontDescriptor")
        .ok()
        .map(|obj| resolve_object(doc, obj))
        .and_then(|obj| obj.as_dict().ok());

    let number = |key: &[u8], default: f64| {
        desc.and_then(|d| d.get(key).ok())
            .and_then(object_to_f64_opt)
            .unwrap_or(default)
    };

    let mut descent = number(b"Descent", DEFAULT_DESCENT);
    // Some producers write a positive descent.
    if descent > 0.0 {
        descent = -descent;
    }

    FontDescriptorInfo {
        ascent: number(b"Ascent", DEFAULT_ASCENT),
        descent,
        missing_width: number(b"MissingWidth", fallback_width),
    }
}

/// Resolve an indirect reference to the actual object.
pub(crate) fn resolve_object<'a>(
    doc: &'a lopdf::Document,
    obj: &'a lopdf::Object,
) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Convert a lopdf object to f64, returning None if not a number.
pub(crate) fn object_to_f64_opt(obj: &lopdf::Object) -> Option<f64> {
    match obj {
        lopdf::Object::Integer(i) => Some(*i as f64),
        lopdf::Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}
