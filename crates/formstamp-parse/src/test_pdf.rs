//! PDF builders shared by the unit tests.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

/// A line of Helvetica text at a baseline position in PDF user space.
pub(crate) struct TextRun<'a> {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub text: &'a str,
}

pub(crate) fn run(x: f64, y: f64, text: &str) -> TextRun<'_> {
    TextRun {
        x,
        y,
        size: 12.0,
        text,
    }
}

/// Build a PDF with one page per entry, each `width x height`, sharing one
/// resources dictionary with a Helvetica font named `F1`.
pub(crate) fn text_pdf(width: f64, height: f64, pages: &[Vec<TextRun<'_>>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
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
    for runs in pages {
        let mut operations = Vec::new();
        for r in runs {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec!["F1".into(), Object::Real(r.size as f32)],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Real(r.x as f32), Object::Real(r.y as f32)],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(r.text)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let bytes = content.encode().unwrap_or_default();
        let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), Object::Real(width as f32), Object::Real(height as f32)],
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

/// A single-page letter-sized PDF.
pub(crate) fn single_page(runs: Vec<TextRun<'_>>) -> Vec<u8> {
    text_pdf(612.0, 792.0, &[runs])
}
