use lopdf::{
    content::{Content, Operation},
    dictionary, Document, Object, Stream,
};
use pdf_brief::{
    engine::{native::LopdfTextLayer, poppler::collect_page_images, TextLayer},
    error::BriefError,
};
use std::error::Error as _;

/// Builds an in-memory PDF with one short line of text per page.
fn pdf_with_pages(n: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for i in 0..n {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("page {}", i + 1))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
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

#[test]
fn lopdf_rejects_garbage_with_a_sourced_extraction_error() {
    let err = LopdfTextLayer.read_pages(b"not a pdf", 50).unwrap_err();
    assert!(matches!(err, BriefError::Extraction { .. }));
    assert!(err.source().is_some());
}

#[test]
fn lopdf_reads_every_page_under_the_cap() {
    let pdf = pdf_with_pages(3);
    let out = LopdfTextLayer.read_pages(&pdf, 50).unwrap();
    assert_eq!(out.page_count, 3);
    assert_eq!(out.pages.len(), 3);
}

#[test]
fn lopdf_page_cap_keeps_the_true_count() {
    let pdf = pdf_with_pages(4);
    let out = LopdfTextLayer.read_pages(&pdf, 2).unwrap();
    assert_eq!(out.page_count, 4);
    assert_eq!(out.pages.len(), 2);
}

#[test]
fn page_images_are_ordered_by_parsed_number() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["page-10.png", "page-02.png", "page-01.png", "page-09.png", "notes.txt"] {
        std::fs::write(dir.path().join(name), b"").unwrap();
    }

    let images = collect_page_images(dir.path()).unwrap();

    let numbers: Vec<u32> = images.iter().map(|i| i.page_number).collect();
    assert_eq!(numbers, vec![1, 2, 9, 10]);
    assert!(images[0].path.ends_with("page-01.png"));
}

#[test]
fn unpadded_page_names_are_read_too() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["page-2.png", "page-1.png"] {
        std::fs::write(dir.path().join(name), b"").unwrap();
    }

    let images = collect_page_images(dir.path()).unwrap();

    let numbers: Vec<u32> = images.iter().map(|i| i.page_number).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[test]
fn no_page_images_is_an_extraction_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = collect_page_images(dir.path()).unwrap_err();
    assert!(matches!(err, BriefError::Extraction { .. }));
}
