//! Merging an overlay onto one page of a document.
//!
//! The page's existing content is isolated in `q … Q`, the overlay stream is
//! appended after it and overlay fonts are registered in a page-local copy of
//! the page resources. All other pages are left as they were.

use formstamp_core::OverlayPage;
use lopdf::{Object, Stream, dictionary};

use crate::error::BackendError;
use crate::font_metrics::resolve_object;
use crate::lopdf_backend::{LopdfDocument, get_page_resources, page_media_box};
use crate::overlay_stream::{OverlayFonts, encode_overlay, standard_font_dict};

/// Merge `overlay` onto the page at `page_index`, returning a new document.
///
/// An overlay with no operations returns an identical copy.
///
/// # Errors
///
/// [`BackendError::PageOutOfRange`] if the page does not exist, or a parse
/// error if the page tree is malformed.
pub fn merge_overlay(
    doc: &LopdfDocument,
    page_index: usize,
    overlay: &OverlayPage,
) -> Result<LopdfDocument, BackendError> {
    let page_id = doc.page_id(page_index)?;
    if overlay.is_empty() {
        return Ok(doc.clone());
    }

    let mut inner = doc.inner().clone();
    let media_box = page_media_box(&inner, page_id)?;

    let mut resources = get_page_resources(&inner, page_id)?.clone();
    let mut font_dict = resources
        .get(b"Font")
        .ok()
        .map(|obj| resolve_object(&inner, obj))
        .and_then(|obj| obj.as_dict().ok())
        .cloned()
        .unwrap_or_default();

    let taken: Vec<Vec<u8>> = font_dict.iter().map(|(k, _)| k.clone()).collect();
    let fonts = OverlayFonts::allocate(overlay, &taken);
    for (base, resource) in fonts.iter() {
        let font_id = inner.add_object(standard_font_dict(base));
        font_dict.set(resource, font_id);
    }
    resources.set("Font", font_dict);

    let overlay_bytes = encode_overlay(overlay, &fonts, (media_box.x0, media_box.y0))?;
    let push_id = inner.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
    let pop_id = inner.add_object(Stream::new(dictionary! {}, b"\nQ\n".to_vec()));
    let overlay_id = inner.add_object(Stream::new(dictionary! {}, overlay_bytes));

    let existing = existing_content_refs(&inner, page_id)?;
    let mut contents = Vec::with_capacity(existing.len() + 3);
    if !existing.is_empty() {
        contents.push(Object::Reference(push_id));
        contents.extend(existing);
        contents.push(Object::Reference(pop_id));
    }
    contents.push(Object::Reference(overlay_id));

    let page = inner
        .get_object_mut(page_id)
        .and_then(|o| o.as_dict_mut())
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
    page.set("Resources", resources);
    page.set("Contents", Object::Array(contents));

    #[cfg(feature = "tracing")]
    tracing::debug!(page = page_index, ops = overlay.ops.len(), "merged overlay");

    LopdfDocument::from_document(inner)
}

/// References to the page's current content streams, in drawing order.
fn existing_content_refs(
    doc: &lopdf::Document,
    page_id: lopdf::ObjectId,
) -> Result<Vec<Object>, BackendError> {
    let page = doc
        .get_object(page_id)
        .and_then(|o| o.as_dict())
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

    let refs = match page.get(b"Contents") {
        Err(_) => Vec::new(),
        Ok(Object::Reference(id)) => match doc.get_object(*id)? {
            Object::Array(items) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        Ok(_) => {
            return Err(BackendError::Parse(
                "/Contents is not a reference or array".to_string(),
            ));
        }
    };
    Ok(refs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::PdfBackend;
    use crate::lopdf_backend::{LopdfBackend, extract_page_chars};
    use crate::test_pdf::{run, text_pdf};
    use formstamp_core::{DrawOp, render};

    fn two_page_doc() -> LopdfDocument {
        let bytes = text_pdf(
            600.0,
            800.0,
            &[
                vec![run(72.0, 700.0, "Employee's Name:")],
                vec![run(72.0, 700.0, "Second page")],
            ],
        );
        LopdfBackend::open(&bytes).unwrap()
    }

    fn page_text(doc: &LopdfDocument, index: usize) -> String {
        extract_page_chars(doc, index)
            .unwrap()
            .iter()
            .map(|c| c.text.as_str())
            .collect()
    }

    fn name_overlay() -> OverlayPage {
        render(
            600.0,
            800.0,
            &[DrawOp::Text {
                x: 200.0,
                top: 110.0,
                text: "Jordan".to_string(),
                font: "Helvetica".to_string(),
                size: 12.0,
            }],
        )
    }

    #[test]
    fn overlay_text_follows_original() {
        let doc = two_page_doc();
        let merged = merge_overlay(&doc, 0, &name_overlay()).unwrap();
        assert_eq!(page_text(&merged, 0), "Employee's Name:Jordan");
        assert_eq!(page_text(&merged, 1), "Second page");
        assert_eq!(merged.page_count(), 2);
    }

    #[test]
    fn merged_document_survives_serialization() {
        let doc = two_page_doc();
        let merged = merge_overlay(&doc, 1, &name_overlay()).unwrap();
        let reopened = LopdfBackend::open(&merged.to_bytes().unwrap()).unwrap();
        assert_eq!(page_text(&reopened, 1), "Second pageJordan");
        assert_eq!(page_text(&reopened, 0), "Employee's Name:");
    }

    #[test]
    fn shared_resources_are_not_modified() {
        let doc = two_page_doc();
        let merged = merge_overlay(&doc, 0, &name_overlay()).unwrap();
        let other = merged.page_id(1).unwrap();
        let resources = get_page_resources(merged.inner(), other).unwrap();
        let fonts = resolve_object(merged.inner(), resources.get(b"Font").unwrap())
            .as_dict()
            .unwrap();
        assert!(fonts.get(b"F1").is_ok());
        assert!(fonts.get(b"FsF1").is_err());
    }

    #[test]
    fn empty_overlay_returns_identical_copy() {
        let doc = two_page_doc();
        let merged = merge_overlay(&doc, 0, &render(600.0, 800.0, &[])).unwrap();
        assert_eq!(page_text(&merged, 0), page_text(&doc, 0));
        assert_eq!(merged.to_bytes().unwrap(), doc.to_bytes().unwrap());
    }

    #[test]
    fn page_out_of_range() {
        let doc = two_page_doc();
        let err = merge_overlay(&doc, 2, &name_overlay()).unwrap_err();
        assert!(matches!(
            err,
            BackendError::PageOutOfRange { index: 2, count: 2 }
        ));
    }

    #[test]
    fn repeated_merges_keep_earlier_overlays() {
        let doc = two_page_doc();
        let once = merge_overlay(&doc, 0, &name_overlay()).unwrap();
        let twice = merge_overlay(&once, 0, &name_overlay()).unwrap();
        assert_eq!(page_text(&twice, 0), "Employee's Name:JordanJordan");
    }

    #[test]
    fn offset_media_box_translates_overlay() {
        let mut inner = two_page_doc().into_inner();
        let page_id = *inner.get_pages().get(&1).unwrap();
        inner
            .get_object_mut(page_id)
            .and_then(|o| o.as_dict_mut())
            .unwrap()
            .set(
                "MediaBox",
                vec![
                    Object::Integer(100),
                    Object::Integer(50),
                    Object::Integer(700),
                    Object::Integer(850),
                ],
            );
        let doc = LopdfDocument::from_document(inner).unwrap();

        let merged = merge_overlay(&doc, 0, &name_overlay()).unwrap();
        let chars = extract_page_chars(&merged, 0).unwrap();
        let j = chars.iter().find(|c| c.text == "J").unwrap();
        assert!((j.bbox.x0 - 200.0).abs() < 1e-3);
        assert!((j.bbox.top - 101.0).abs() < 1e-3);
    }
}
