//! Text fragments of a page.

use lopdf::{Document, ObjectId};

use crate::content::interpreter::{ContentSink, Interpreter, TextRun};
use crate::edit::normalize_whitespace;
use crate::text::TextFragment;

/// Collects one [`TextFragment`] per text-showing operator.
///
/// Runs whose text is blank after whitespace normalization are dropped.
/// Invisible text (render mode 3) is kept: it is still searchable.
#[derive(Debug, Default)]
pub struct FragmentCollector {
    fragments: Vec<TextFragment>,
}

impl FragmentCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected fragments in content stream order.
    pub fn into_fragments(self) -> Vec<TextFragment> {
        self.fragments
    }
}

impl ContentSink for FragmentCollector {
    fn show_text(&mut self, run: &TextRun) {
        let text = normalize_whitespace(&run.text);
        if text.is_empty() {
            return;
        }
        let (dx, dy) = run.text_to_page.transform_vector(run.advance, 0.0);
        let width = dx.hypot(dy);
        let height = run.rendering_matrix.y_scale();
        let origin = run.rendering_matrix.transform_point(0.0, 0.0);

        self.fragments.push(
            TextFragment::new(text, origin.x, origin.y, width, height, run.font_name.clone())
                .with_transform(run.rendering_matrix),
        );
    }
}

/// Extract the text fragments of a page.
pub fn extract_page_fragments(doc: &Document, page_id: ObjectId) -> Vec<TextFragment> {
    let mut collector = FragmentCollector::new();
    Interpreter::new(doc).run_page(page_id, &mut collector);
    let fragments = collector.into_fragments();
    log::debug!("Extracted {} fragments from page {:?}", fragments.len(), page_id);
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Object, Stream};

    fn page_with(content: &[u8]) -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Times-Bold",
        });
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        (doc, page_id)
    }

    #[test]
    fn test_fragment_geometry() {
        let (doc, page_id) = page_with(b"BT /F1 12 Tf 72 700 Td (Hello   world) Tj ET");
        let fragments = extract_page_fragments(&doc, page_id);
        assert_eq!(fragments.len(), 1);

        let fragment = &fragments[0];
        assert_eq!(fragment.text, "Hello world");
        assert_eq!(fragment.font_name, "Times-Bold");
        assert_eq!(fragment.origin().x, 72.0);
        assert_eq!(fragment.origin().y, 700.0);
        assert_eq!(fragment.height, 12.0);
        assert!(fragment.width > 0.0);
        assert!(fragment.is_upright(0.01));
    }

    #[test]
    fn test_blank_runs_skipped() {
        let (doc, page_id) = page_with(b"BT /F1 12 Tf (   ) Tj (a) Tj ET");
        let fragments = extract_page_fragments(&doc, page_id);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "a");
    }

    #[test]
    fn test_rotated_text_keeps_shear() {
        let (doc, page_id) = page_with(b"BT /F1 12 Tf 0 1 -1 0 300 400 Tm (Up) Tj ET");
        let fragments = extract_page_fragments(&doc, page_id);
        assert!(!fragments[0].is_upright(0.01));
        assert_eq!(fragments[0].height, 12.0);
    }
}
