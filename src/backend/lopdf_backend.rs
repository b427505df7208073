//! Backend over an in-memory `lopdf` document.
//!
//! Drawing never edits existing content streams. Rectangles and text are
//! collected per page as overlay operations and appended on [`save`]: the
//! original contents are wrapped in `q`/`Q` so whatever state they leave
//! behind cannot leak into the overlay, and the overlay stream is appended
//! after them so it paints on top.
//!
//! [`save`]: crate::backend::DocumentMutator::save

use std::collections::{BTreeMap, HashMap};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::backend::{DocumentMutator, FontHandle, Rasterizer, TextExtractor};
use crate::color::{Color, RasterImage};
use crate::content::extract_page_fragments;
use crate::content::resources::{get_dict, page_resources};
use crate::error::{Error, Result};
use crate::fonts::encoding::{encode_winansi, representable};
use crate::fonts::FontVariant;
use crate::geometry::{PageBox, PagePoint, Viewport};
use crate::rendering::render_page;
use crate::text::TextFragment;

/// Prefix of font resource names registered for replacement text.
const FONT_RESOURCE_PREFIX: &str = "RtF";

/// A PDF document loaded with `lopdf`, plus pending overlay drawing.
#[derive(Debug)]
pub struct LopdfBackend {
    doc: Document,
    page_ids: Vec<ObjectId>,
    overlays: BTreeMap<usize, Vec<Operation>>,
    font_objects: HashMap<FontVariant, ObjectId>,
    page_fonts: HashMap<(usize, FontVariant), String>,
}

impl LopdfBackend {
    /// Parse a PDF from memory.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes).map_err(|e| Error::InvalidPdf(e.to_string()))?;
        Ok(Self::from_document(doc))
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: Document) -> Self {
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        log::debug!("Loaded document with {} pages", page_ids.len());
        Self {
            doc,
            page_ids,
            overlays: BTreeMap::new(),
            font_objects: HashMap::new(),
            page_fonts: HashMap::new(),
        }
    }

    /// The underlying document, without pending overlays.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Object id of a zero-based page.
    pub fn page_id(&self, page: usize) -> Result<ObjectId> {
        self.page_ids
            .get(page)
            .copied()
            .ok_or(Error::PageOutOfRange {
                page,
                count: self.page_ids.len(),
            })
    }

    fn overlay(&mut self, page: usize) -> Result<&mut Vec<Operation>> {
        self.page_id(page)?;
        Ok(self.overlays.entry(page).or_default())
    }

    /// Shared Type1 font object for `variant`.
    fn font_object(&mut self, variant: FontVariant) -> ObjectId {
        if let Some(id) = self.font_objects.get(&variant) {
            return *id;
        }
        let id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => variant.base_font_name(),
            "Encoding" => "WinAnsiEncoding",
        });
        self.font_objects.insert(variant, id);
        id
    }

    /// Register `font_id` in the page's own `/Resources /Font`, returning
    /// the resource name.
    ///
    /// Inherited or shared resources are copied onto the page first so other
    /// pages are unaffected.
    fn register_font(&mut self, page_id: ObjectId, font_id: ObjectId) -> Result<String> {
        let mut resources = page_resources(&self.doc, page_id)
            .cloned()
            .unwrap_or_default();
        let mut fonts = get_dict(&self.doc, &resources, b"Font")
            .cloned()
            .unwrap_or_default();

        let name = (1..)
            .map(|n| format!("{}{}", FONT_RESOURCE_PREFIX, n))
            .find(|candidate| !fonts.has(candidate.as_bytes()))
            .unwrap_or_else(|| FONT_RESOURCE_PREFIX.to_string());
        fonts.set(name.as_str(), font_id);
        resources.set("Font", fonts);

        let page = self.doc.get_dictionary_mut(page_id)?;
        page.set("Resources", resources);
        Ok(name)
    }

    /// Append pending overlays to their pages.
    fn apply_overlays(&mut self) -> Result<()> {
        let overlays = std::mem::take(&mut self.overlays);
        for (page, operations) in overlays {
            if operations.is_empty() {
                continue;
            }
            let page_id = self.page_id(page)?;
            let overlay = Content { operations }
                .encode()
                .map_err(|e| Error::Serialize(e.to_string()))?;
            self.append_content(page_id, overlay)?;
            log::debug!("Appended overlay to page {}", page);
        }
        Ok(())
    }

    /// Wrap existing contents in `q`/`Q` and append `overlay` after them.
    fn append_content(&mut self, page_id: ObjectId, overlay: Vec<u8>) -> Result<()> {
        let existing = {
            let page = self.doc.get_dictionary(page_id)?;
            match page.get(b"Contents") {
                Ok(Object::Reference(id)) => match self.doc.get_object(*id) {
                    Ok(Object::Array(items)) => items.clone(),
                    _ => vec![Object::Reference(*id)],
                },
                Ok(Object::Array(items)) => items.clone(),
                Ok(other) => vec![other.clone()],
                Err(_) => Vec::new(),
            }
        };
        // Content streams must be indirect
        let existing: Vec<Object> = existing
            .into_iter()
            .map(|item| match item {
                Object::Stream(stream) => Object::Reference(self.doc.add_object(stream)),
                other => other,
            })
            .collect();

        let open_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let mut closing = b"Q\n".to_vec();
        closing.extend_from_slice(&overlay);
        let overlay_id = self.doc.add_object(Stream::new(Dictionary::new(), closing));

        let mut contents = Vec::with_capacity(existing.len() + 2);
        contents.push(Object::Reference(open_id));
        contents.extend(existing);
        contents.push(Object::Reference(overlay_id));

        let page = self.doc.get_dictionary_mut(page_id)?;
        page.set("Contents", Object::Array(contents));
        Ok(())
    }
}

impl TextExtractor for LopdfBackend {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn extract_fragments(&self, page: usize) -> Result<Vec<TextFragment>> {
        let page_id = self.page_id(page)?;
        Ok(extract_page_fragments(&self.doc, page_id))
    }
}

impl Rasterizer for LopdfBackend {
    fn rasterize(&self, page: usize, scale: f32) -> Result<(RasterImage, Viewport)> {
        let page_id = self.page_id(page)?;
        render_page(&self.doc, page_id, page, scale)
    }
}

impl DocumentMutator for LopdfBackend {
    fn embed_font(&mut self, page: usize, variant: FontVariant) -> Result<FontHandle> {
        let page_id = self.page_id(page)?;
        if let Some(name) = self.page_fonts.get(&(page, variant)) {
            return Ok(FontHandle {
                variant,
                resource_name: name.clone(),
            });
        }

        let font_id = self.font_object(variant);
        let name = self.register_font(page_id, font_id)?;
        log::debug!(
            "Registered {} as /{} on page {}",
            variant.base_font_name(),
            name,
            page
        );
        self.page_fonts.insert((page, variant), name.clone());
        Ok(FontHandle {
            variant,
            resource_name: name,
        })
    }

    /// Measures what will actually be drawn: characters outside WinAnsi
    /// become `?`.
    fn measure_text(&self, variant: FontVariant, text: &str, size: f32) -> f32 {
        variant.measure(&representable(text), size)
    }

    fn draw_rect(&mut self, page: usize, bbox: &PageBox, color: Color) -> Result<()> {
        let ops = self.overlay(page)?;
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new("rg", color_operands(color)));
        ops.push(Operation::new(
            "re",
            vec![
                Object::Real(bbox.min_x),
                Object::Real(bbox.min_y),
                Object::Real(bbox.width()),
                Object::Real(bbox.height()),
            ],
        ));
        ops.push(Operation::new("f", vec![]));
        ops.push(Operation::new("Q", vec![]));
        Ok(())
    }

    fn draw_text(
        &mut self,
        page: usize,
        text: &str,
        origin: PagePoint,
        font: &FontHandle,
        size: f32,
        color: Color,
    ) -> Result<()> {
        let encoded = encode_winansi(text);
        let ops = self.overlay(page)?;
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new("rg", color_operands(color)));
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![
                Object::Name(font.resource_name.as_bytes().to_vec()),
                Object::Real(size),
            ],
        ));
        ops.push(Operation::new(
            "Td",
            vec![Object::Real(origin.x), Object::Real(origin.y)],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encoded, StringFormat::Hexadecimal)],
        ));
        ops.push(Operation::new("ET", vec![]));
        ops.push(Operation::new("Q", vec![]));
        Ok(())
    }

    fn save(&mut self) -> Result<Vec<u8>> {
        self.apply_overlays()?;
        let mut output = Vec::new();
        self.doc
            .save_to(&mut output)
            .map_err(|e| Error::Serialize(e.to_string()))?;
        log::info!("Serialized document ({} bytes)", output.len());
        Ok(output)
    }
}

fn color_operands(color: Color) -> Vec<Object> {
    vec![
        Object::Real(color.r),
        Object::Real(color.g),
        Object::Real(color.b),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::resources::page_content;

    fn fixture(text: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content encodes"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
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

    #[test]
    fn test_load_rejects_garbage() {
        let err = LopdfBackend::load(b"definitely not a pdf").expect_err("invalid");
        assert!(matches!(err, Error::InvalidPdf(_)));
    }

    #[test]
    fn test_extract_and_page_range() {
        let backend = LopdfBackend::load(&fixture("Hello world")).expect("loads");
        assert_eq!(backend.page_count(), 1);

        let fragments = backend.extract_fragments(0).expect("page 0");
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "Hello world");

        let err = backend.extract_fragments(1).expect_err("out of range");
        assert!(matches!(err, Error::PageOutOfRange { page: 1, count: 1 }));
    }

    #[test]
    fn test_rasterize_page() {
        let backend = LopdfBackend::load(&fixture("Hello")).expect("loads");
        let (image, viewport) = backend.rasterize(0, 1.0).expect("renders");
        assert_eq!((image.width(), image.height()), (612, 792));
        assert_eq!(viewport.top_y, 792.0);
    }

    #[test]
    fn test_embed_font_reuses_name() {
        let mut backend = LopdfBackend::load(&fixture("Hello")).expect("loads");
        let variant = FontVariant::default();
        let first = backend.embed_font(0, variant).expect("embeds");
        let second = backend.embed_font(0, variant).expect("embeds again");
        assert_eq!(first, second);
        assert_eq!(first.resource_name, "RtF1");

        // The original font stays available next to the new one
        let page_id = backend.page_id(0).expect("page");
        let resources = page_resources(backend.document(), page_id).expect("resources");
        let fonts = get_dict(backend.document(), resources, b"Font").expect("fonts");
        assert!(fonts.has(b"F1"));
        assert!(fonts.has(b"RtF1"));
    }

    #[test]
    fn test_save_appends_wrapped_overlay() {
        let mut backend = LopdfBackend::load(&fixture("Hello")).expect("loads");
        let font = backend.embed_font(0, FontVariant::default()).expect("font");
        backend
            .draw_rect(0, &PageBox::new(70.0, 696.0, 110.0, 711.0), Color::WHITE)
            .expect("rect");
        backend
            .draw_text(0, "Bye", PagePoint::new(70.0, 700.0), &font, 12.0, Color::BLACK)
            .expect("text");
        let saved = backend.save().expect("saves");

        let reloaded = Document::load_mem(&saved).expect("output parses");
        let page_id = *reloaded.get_pages().values().next().expect("one page");
        let content = String::from_utf8_lossy(&page_content(&reloaded, page_id)).into_owned();
        assert!(content.trim_start().starts_with('q'));
        assert!(content.contains("(Hello) Tj"));
        assert!(content.contains("re"));
        assert!(content.contains("/RtF1 "));
        // "Bye" hex encoded
        assert!(content.contains("<427965>"));
        assert!(content.find("(Hello)") < content.find("<427965>"));
    }

    #[test]
    fn test_draw_on_missing_page() {
        let mut backend = LopdfBackend::load(&fixture("Hello")).expect("loads");
        let err = backend
            .draw_rect(4, &PageBox::new(0.0, 0.0, 1.0, 1.0), Color::WHITE)
            .expect_err("no such page");
        assert!(matches!(err, Error::PageOutOfRange { .. }));
    }
}
