//! Object lookups shared by the interpreter and the backend.
//!
//! Pages inherit `/Resources` and `/MediaBox` from their ancestors in the
//! page tree, and most dictionary values may be indirect references; the
//! helpers here hide both.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::content::operators::object_to_f32;
use crate::geometry::PageBox;

/// Longest `/Parent` chain followed before giving up.
const MAX_TREE_DEPTH: usize = 32;

/// Follow an indirect reference; other objects are returned unchanged.
pub fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Dictionary value under `key`, resolved.
pub fn get_resolved<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    dict.get(key).ok().map(|obj| resolve(doc, obj))
}

/// Dictionary under `key`, resolved.
pub fn get_dict<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Dictionary> {
    match get_resolved(doc, dict, key)? {
        Object::Dictionary(d) => Some(d),
        Object::Stream(s) => Some(&s.dict),
        _ => None,
    }
}

/// Name value under `key` as text.
pub fn get_name(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    match get_resolved(doc, dict, key)? {
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

/// Numeric value under `key`.
pub fn get_number(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<f32> {
    get_resolved(doc, dict, key).and_then(object_to_f32)
}

/// Stream bytes, decompressed when a filter is present and supported.
pub fn stream_data(stream: &Stream) -> Vec<u8> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone())
    } else {
        stream.content.clone()
    }
}

/// Attribute of a page, looked up through the `/Parent` chain.
pub fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(resolve(doc, value));
        }
        let parent = match current.get(b"Parent") {
            Ok(Object::Reference(id)) => *id,
            _ => return None,
        };
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Resources dictionary of a page, inherited if needed.
pub fn page_resources<'a>(doc: &'a Document, page_id: ObjectId) -> Option<&'a Dictionary> {
    match inherited(doc, page_id, b"Resources")? {
        Object::Dictionary(d) => Some(d),
        _ => None,
    }
}

/// Media box of a page, defaulting to US Letter.
pub fn media_box(doc: &Document, page_id: ObjectId) -> PageBox {
    let values: Option<Vec<f32>> = match inherited(doc, page_id, b"MediaBox") {
        Some(Object::Array(items)) => items
            .iter()
            .map(|item| object_to_f32(resolve(doc, item)))
            .collect(),
        _ => None,
    };
    match values.as_deref() {
        Some([x0, y0, x1, y1]) => {
            PageBox::new(x0.min(*x1), y0.min(*y1), x0.max(*x1), y0.max(*y1))
        },
        _ => PageBox::new(0.0, 0.0, 612.0, 792.0),
    }
}

/// Concatenated content stream bytes of a page.
///
/// Array contents are joined with a separating space so operators split
/// across streams still tokenize.
pub fn page_content(doc: &Document, page_id: ObjectId) -> Vec<u8> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };
    let streams: Vec<&Stream> = match page.get(b"Contents").map(|c| resolve(doc, c)) {
        Ok(Object::Stream(stream)) => vec![stream],
        Ok(Object::Array(items)) => items
            .iter()
            .filter_map(|item| resolve(doc, item).as_stream().ok())
            .collect(),
        _ => Vec::new(),
    };
    let mut content = Vec::new();
    for stream in streams {
        if !content.is_empty() {
            content.push(b' ');
        }
        content.extend_from_slice(&stream_data(stream));
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn two_level_tree() -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"BT ET".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => vec![content_id.into(), content_id.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 300.into(), 400.into()],
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
            }),
        );
        (doc, page_id)
    }

    #[test]
    fn test_inherited_media_box_and_resources() {
        let (doc, page_id) = two_level_tree();
        assert_eq!(media_box(&doc, page_id), PageBox::new(0.0, 0.0, 300.0, 400.0));

        let resources = page_resources(&doc, page_id).expect("inherited resources");
        let fonts = get_dict(&doc, resources, b"Font").expect("font dict");
        let f1 = get_dict(&doc, fonts, b"F1").expect("F1 resolves");
        assert_eq!(get_name(&doc, f1, b"BaseFont").as_deref(), Some("Helvetica"));
    }

    #[test]
    fn test_content_array_joined() {
        let (doc, page_id) = two_level_tree();
        assert_eq!(page_content(&doc, page_id), b"BT ET BT ET".to_vec());
    }

    #[test]
    fn test_missing_media_box_defaults_to_letter() {
        let mut doc = Document::with_version("1.5");
        let page_id = doc.add_object(dictionary! { "Type" => "Page" });
        assert_eq!(media_box(&doc, page_id), PageBox::new(0.0, 0.0, 612.0, 792.0));
        assert!(page_content(&doc, page_id).is_empty());
    }
}
