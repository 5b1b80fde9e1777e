//! Character bounding box calculation from content stream events.
//!
//! Combines font metrics, text state, and CTM to calculate the final
//! bounding box for each character in top-left origin coordinates.

use formstamp_core::{BBox, Char, Ctm, Point};

use crate::handler::CharEvent;

/// Convert a [`CharEvent`] into a [`Char`] with a top-left origin bounding box.
///
/// `media_box` is `[x0, y0, x1, y1]`; coordinates are made relative to its
/// lower-left corner and flipped with `top = height - max_y`.
pub fn char_from_event(event: &CharEvent, media_box: [f64; 4]) -> Char {
    let [mb_x0, mb_y0, _, mb_y1] = media_box;
    let page_height = mb_y1 - mb_y0;

    // Trm = [Tfs*Th, 0, 0, Tfs, 0, Trise] x Tm x CTM
    let font_matrix = Ctm::new(
        event.font_size * event.h_scaling,
        0.0,
        0.0,
        event.font_size,
        0.0,
        event.rise,
    );
    let trm = font_matrix
        .concat(&Ctm::from_array(event.text_matrix))
        .concat(&Ctm::from_array(event.ctm));

    // The glyph box spans the advance width only; Tc/Tw move the pen but
    // are not part of the glyph.
    let w_norm = event.displacement / 1000.0;
    let ascent_norm = event.ascent / 1000.0;
    let descent_norm = event.descent / 1000.0;

    let corners = [
        trm.transform_point(Point::new(0.0, descent_norm)),
        trm.transform_point(Point::new(w_norm, descent_norm)),
        trm.transform_point(Point::new(w_norm, ascent_norm)),
        trm.transform_point(Point::new(0.0, ascent_norm)),
    ];

    let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let bbox = BBox::new(
        min_x - mb_x0,
        page_height - (max_y - mb_y0),
        max_x - mb_x0,
        page_height - (min_y - mb_y0),
    );

    let upright = trm.b.abs() < 1e-6 && trm.c.abs() < 1e-6;

    let text = event.unicode.clone().unwrap_or_else(|| {
        char::from_u32(event.char_code)
            .filter(|c| !c.is_control())
            .map_or_else(|| "\u{FFFD}".to_string(), |c| c.to_string())
    });

    Char {
        text,
        bbox,
        fontname: event.font_name.clone(),
        size: event.font_size,
        upright,
        char_code: event.char_code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(text_matrix: [f64; 6]) -> CharEvent {
        CharEvent {
            char_code: u32::from(b'A'),
            unicode: Some("A".to_string()),
            font_name: "Helvetica".to_string(),
            font_size: 12.0,
            text_matrix,
            ctm: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            displacement: 667.0,
            h_scaling: 1.0,
            rise: 0.0,
            ascent: 750.0,
            descent: -250.0,
        }
    }

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn baseline_at_y_maps_to_top_origin() {
        let ch = char_from_event(
            &event([1.0, 0.0, 0.0, 1.0, 72.0, 700.0]),
            [0.0, 0.0, 612.0, 792.0],
        );
        assert_eq!(ch.text, "A");
        assert_approx(ch.bbox.x0, 72.0);
        assert_approx(ch.bbox.x1, 72.0 + 12.0 * 0.667);
        // ascent 9pt above the baseline, descent 3pt below
        assert_approx(ch.bbox.top, 792.0 - 709.0);
        assert_approx(ch.bbox.bottom, 792.0 - 697.0);
        assert!(ch.upright);
    }

    #[test]
    fn ctm_scales_glyph_box() {
        let mut ev = event([1.0, 0.0, 0.0, 1.0, 10.0, 10.0]);
        ev.ctm = [2.0, 0.0, 0.0, 2.0, 0.0, 0.0];
        let ch = char_from_event(&ev, [0.0, 0.0, 612.0, 792.0]);
        assert_approx(ch.bbox.x0, 20.0);
        assert_approx(ch.bbox.width(), 2.0 * 12.0 * 0.667);
        assert_approx(ch.bbox.height(), 2.0 * 12.0);
    }

    #[test]
    fn media_box_origin_is_subtracted() {
        let ch = char_from_event(
            &event([1.0, 0.0, 0.0, 1.0, 172.0, 800.0]),
            [100.0, 100.0, 712.0, 892.0],
        );
        assert_approx(ch.bbox.x0, 72.0);
        assert_approx(ch.bbox.top, 792.0 - 709.0);
    }

    #[test]
    fn rotated_text_is_not_upright() {
        let ch = char_from_event(
            &event([0.0, 1.0, -1.0, 0.0, 100.0, 100.0]),
            [0.0, 0.0, 612.0, 792.0],
        );
        assert!(!ch.upright);
    }

    #[test]
    fn missing_unicode_falls_back_to_code() {
        let mut ev = event([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        ev.unicode = None;
        assert_eq!(char_from_event(&ev, [0.0, 0.0, 10.0, 10.0]).text, "A");
        ev.char_code = 1;
        assert_eq!(char_from_event(&ev, [0.0, 0.0, 10.0, 10.0]).text, "\u{FFFD}");
    }
}
