//! PDF builders shared by the integration tests.

#![allow(dead_code)]

use lopdf::content::Content;
use lopdf::{Object, Stream, dictionary};

/// Content stream showing `text` in Helvetica at baseline (`x`, `y`).
pub fn text_op(x: f64, y: f64, size: f64, text: &str) -> String {
    format!("BT /F1 {size} Tf {x} {y} Td ({text}) Tj ET\n")
}

/// Build a PDF with one `width x height` page per content string, sharing a
/// resources dictionary with Helvetica as `F1`.
pub fn form_pdf(width: i64, height: i64, pages: &[String]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for content in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.as_bytes().to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(height),
            ],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// A 600x800 page with the employee and patient name lines. The employee
/// line sits at top of about 500.3.
pub fn name_page() -> String {
    let mut content = String::new();
    content.push_str(&text_op(72.0, 740.0, 12.0, "Health care provider name: Dr. Grey"));
    content.push_str(&text_op(72.0, 291.0, 12.0, "Employee's Name: ____"));
    content.push_str(&text_op(72.0, 191.0, 12.0, "Patient's Name: ____"));
    content
}

/// Second page of the reference form: questions answered with bubbles.
pub fn questions_page() -> String {
    let mut content = String::new();
    content.push_str(&text_op(72.0, 280.0, 12.0, "Is this a serious health condition?"));
    content.push_str(&text_op(72.0, 100.0, 12.0, "Date commenced:"));
    content
}

/// The two-page reference form on 600x800 pages.
pub fn leave_form() -> Vec<u8> {
    form_pdf(600, 800, &[name_page(), questions_page()])
}

/// Operators drawn on `page_index`, in order.
pub fn page_operations(bytes: &[u8], page_index: usize) -> Vec<lopdf::content::Operation> {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    let page_id = *doc.get_pages().values().nth(page_index).unwrap();
    let content = doc.get_page_content(page_id).unwrap();
    Content::decode(&content).unwrap().operations
}

/// Number of filled paths (circles) on `page_index`.
pub fn filled_paths(bytes: &[u8], page_index: usize) -> usize {
    page_operations(bytes, page_index)
        .iter()
        .filter(|op| op.operator == "f")
        .count()
}

pub fn real(object: &Object) -> f64 {
    match object {
        Object::Real(v) => f64::from(*v),
        Object::Integer(v) => *v as f64,
        other => panic!("not a number: {other:?}"),
    }
}
