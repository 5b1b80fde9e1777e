//! Test fixtures for the CLI integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use lopdf::{Object, Stream, dictionary};

pub fn cmd() -> Command {
    Command::cargo_bin("formstamp").unwrap()
}

fn text_op(x: f64, y: f64, text: &str) -> String {
    format!("BT /F1 12 Tf {x} {y} Td ({text}) Tj ET\n")
}

/// Build a multi-page 600x800 PDF with Helvetica text runs at baselines.
pub fn pdf_with_pages(pages: &[&[(f64, f64, &str)]]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids = Vec::new();
    for runs in pages {
        let content: String = runs.iter().map(|(x, y, t)| text_op(*x, *y, t)).collect();
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(600),
                Object::Integer(800),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// The two-page leave form.
pub fn leave_form() -> Vec<u8> {
    pdf_with_pages(&[
        &[
            (72.0, 740.0, "Health care provider name: Dr. Grey"),
            (72.0, 291.0, "Employee's Name: ____"),
            (72.0, 191.0, "Patient's Name: ____"),
        ],
        &[
            (72.0, 280.0, "Is this a serious health condition?"),
            (72.0, 100.0, "Date commenced:"),
        ],
    ])
}

/// Write `bytes` to `name` inside `dir`.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(bytes).unwrap();
    path
}

pub const RECORD: &str = r#"{
    "employeeInformation": { "fullName": "Jordan Lee" },
    "patientInformation": { "isFamilyMember": "No" },
    "medicalCondition": {
        "dateCommenced": "2026-03-02",
        "probableDuration": "six weeks",
        "isSeriousHealthCondition": "yes"
    },
    "workCapacity": { "employeeAbleToWork": "no" },
    "careRequirements": {
        "patientRequiresAssistance": "no",
        "needsFurtherHelp": "yes"
    }
}"#;
