//! Shared PDF fixtures for integration tests.

#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// Fonts available on every fixture page.
pub const FONTS: [(&str, &str); 3] = [
    ("F1", "Helvetica"),
    ("F2", "ABCDEF+TimesNewRomanPS-BoldMT"),
    ("F3", "Courier"),
];

/// Build a Letter-size document with one page per content stream.
pub fn document(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for (name, base_font) in FONTS {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base_font,
        });
        fonts.set(name, font_id);
    }
    let resources_id = doc.add_object(dictionary! { "Font" => fonts });

    let kids: Vec<Object> = pages
        .iter()
        .map(|content| {
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.as_bytes().to_vec()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            page_id.into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids.clone(),
            "Count" => kids.len() as i64,
            "Resources" => resources_id,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut output = Vec::new();
    doc.save_to(&mut output).expect("fixture saves");
    output
}

/// Single-page document.
pub fn single_page(content: &str) -> Vec<u8> {
    document(&[content])
}

/// Page object ids of a saved document, in page order.
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Decoded content of page `index` of a saved document.
pub fn content_of(pdf: &[u8], index: usize) -> String {
    let doc = Document::load_mem(pdf).expect("output parses");
    let page_id = page_ids(&doc)[index];
    let bytes = pdf_retext::content::resources::page_content(&doc, page_id);
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Operands of every `rg` operator on page `index`, in stream order.
pub fn fill_colors(pdf: &[u8], index: usize) -> Vec<Vec<f32>> {
    operations(pdf, index)
        .iter()
        .filter(|op| op.operator == "rg")
        .map(|op| {
            op.operands
                .iter()
                .filter_map(pdf_retext::content::operators::object_to_f32)
                .collect()
        })
        .collect()
}

/// Whether `content` shows `text` as a hex string, e.g. `<4869>` for "Hi".
pub fn shows_hex(content: &str, text: &str) -> bool {
    let digits: String = text.bytes().map(|b| format!("{:02X}", b)).collect();
    content.to_uppercase().contains(&format!("<{}>", digits))
}

/// Decoded operations of page `index`.
pub fn operations(pdf: &[u8], index: usize) -> Vec<lopdf::content::Operation> {
    let content = content_of(pdf, index);
    lopdf::content::Content::decode(content.as_bytes())
        .expect("content decodes")
        .operations
}

/// Number of `operator` occurrences on page `index`.
pub fn count_operator(pdf: &[u8], index: usize, operator: &str) -> usize {
    operations(pdf, index)
        .iter()
        .filter(|op| op.operator == operator)
        .count()
}
