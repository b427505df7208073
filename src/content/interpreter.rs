//! Content stream execution.
//!
//! [`Interpreter`] walks a page's content stream (and the form XObjects it
//! paints), maintains the graphics state, and reports shown text and painted
//! paths to a [`ContentSink`]. Text extraction and rasterization are both
//! sinks over the same walk, so fragment geometry and rendered pixels always
//! agree.

use std::collections::HashMap;
use std::rc::Rc;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::color::Color;
use crate::content::font::PdfFont;
use crate::content::graphics_state::{GraphicsState, GraphicsStateStack};
use crate::content::operators::{
    object_to_f32, parse_content_stream, Operator, PaintMode, TextElement,
};
use crate::content::resources::{get_dict, get_name, page_content, page_resources, resolve, stream_data};
use crate::geometry::Matrix;

/// Deepest form XObject nesting followed.
pub const MAX_FORM_DEPTH: usize = 8;

/// TJ adjustment (thousandths of an em) below which a word gap is assumed.
pub const TJ_SPACE_THRESHOLD: f32 = -120.0;

/// One glyph of a [`TextRun`], positioned along the run's baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedGlyph {
    /// Unicode text of the glyph
    pub text: String,
    /// Start of the glyph in unscaled text space, relative to the run origin
    pub offset: f32,
    /// Advance width of the glyph outline in unscaled text space
    pub width: f32,
}

/// Text shown by a single text-showing operator.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Decoded text, with a space at large TJ gaps
    pub text: String,
    /// Glyphs in showing order
    pub glyphs: Vec<PositionedGlyph>,
    /// Text rendering matrix at the start of the run
    pub rendering_matrix: Matrix,
    /// Unscaled text space to page space at the start of the run
    pub text_to_page: Matrix,
    /// Total advance in unscaled text space
    pub advance: f32,
    /// Font size (Tf)
    pub font_size: f32,
    /// Text rise (Ts)
    pub rise: f32,
    /// Base font name
    pub font_name: String,
    /// Fill color
    pub color: Color,
    /// Whether the run leaves marks on the page
    pub visible: bool,
}

/// Path construction element in user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    /// Begin a subpath
    MoveTo(f32, f32),
    /// Straight line to a point
    LineTo(f32, f32),
    /// Cubic Bezier curve: two control points and the end point
    CurveTo(f32, f32, f32, f32, f32, f32),
    /// Close the current subpath
    Close,
}

/// Receives drawing events from the [`Interpreter`].
pub trait ContentSink {
    /// Text was shown.
    fn show_text(&mut self, _run: &TextRun) {}

    /// A path was painted. Coordinates are in user space; `state.ctm` maps
    /// them to the page.
    fn paint_path(&mut self, _path: &[PathSegment], _mode: PaintMode, _state: &GraphicsState) {}
}

/// Executes content streams of one document.
pub struct Interpreter<'a> {
    doc: &'a Document,
    fonts: HashMap<ObjectId, Rc<PdfFont>>,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter over `doc`.
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            fonts: HashMap::new(),
        }
    }

    /// Execute the content of a page.
    pub fn run_page(&mut self, page_id: ObjectId, sink: &mut dyn ContentSink) {
        let content = page_content(self.doc, page_id);
        let resources = page_resources(self.doc, page_id);
        let mut stack = GraphicsStateStack::new();
        self.run_stream(&content, resources, &mut stack, sink, 0);
    }

    fn run_stream(
        &mut self,
        content: &[u8],
        resources: Option<&'a Dictionary>,
        stack: &mut GraphicsStateStack,
        sink: &mut dyn ContentSink,
        depth: usize,
    ) {
        let operators = match parse_content_stream(content) {
            Ok(ops) => ops,
            Err(e) => {
                log::warn!("Skipping content stream: {}", e);
                return;
            },
        };

        let mut path: Vec<PathSegment> = Vec::new();
        let mut current_point = (0.0f32, 0.0f32);

        for op in operators {
            match op {
                Operator::SaveState => stack.save(),
                Operator::RestoreState => stack.restore(),
                Operator::Cm { matrix } => {
                    let state = stack.current_mut();
                    state.ctm = Matrix::from_slice(&matrix)
                        .unwrap_or_default()
                        .multiply(&state.ctm);
                },
                Operator::SetLineWidth { width } => {
                    stack.current_mut().line_width = width;
                },
                Operator::SetFillColor { components } => {
                    if let Some(color) = color_from_components(&components) {
                        stack.current_mut().fill_color = color;
                    }
                },
                Operator::SetStrokeColor { components } => {
                    if let Some(color) = color_from_components(&components) {
                        stack.current_mut().stroke_color = color;
                    }
                },

                Operator::BeginText => {
                    let state = stack.current_mut();
                    state.text_matrix = Matrix::identity();
                    state.text_line_matrix = Matrix::identity();
                },
                Operator::EndText => {},
                Operator::Td { tx, ty } => stack.current_mut().move_text_position(tx, ty),
                Operator::TD { tx, ty } => {
                    let state = stack.current_mut();
                    state.leading = -ty;
                    state.move_text_position(tx, ty);
                },
                Operator::Tm { matrix } => {
                    let state = stack.current_mut();
                    let m = Matrix::from_slice(&matrix).unwrap_or_default();
                    state.text_matrix = m;
                    state.text_line_matrix = m;
                },
                Operator::TStar => stack.current_mut().next_line(),
                Operator::Tc { char_space } => stack.current_mut().char_space = char_space,
                Operator::Tw { word_space } => stack.current_mut().word_space = word_space,
                Operator::Tz { scale } => stack.current_mut().horizontal_scaling = scale,
                Operator::TL { leading } => stack.current_mut().leading = leading,
                Operator::Ts { rise } => stack.current_mut().text_rise = rise,
                Operator::Tr { render } => stack.current_mut().render_mode = render,
                Operator::Tf { font, size } => {
                    let loaded = self.load_font(resources, &font);
                    let state = stack.current_mut();
                    state.font = Some(loaded);
                    state.font_name = Some(font);
                    state.font_size = size;
                },
                Operator::Tj { text } => {
                    show_text(stack.current_mut(), &[TextElement::String(text)], sink);
                },
                Operator::TJ { array } => show_text(stack.current_mut(), &array, sink),
                Operator::Quote { text } => {
                    let state = stack.current_mut();
                    state.next_line();
                    show_text(state, &[TextElement::String(text)], sink);
                },
                Operator::DoubleQuote {
                    word_space,
                    char_space,
                    text,
                } => {
                    let state = stack.current_mut();
                    state.word_space = word_space;
                    state.char_space = char_space;
                    state.next_line();
                    show_text(state, &[TextElement::String(text)], sink);
                },

                Operator::MoveTo { x, y } => {
                    path.push(PathSegment::MoveTo(x, y));
                    current_point = (x, y);
                },
                Operator::LineTo { x, y } => {
                    path.push(PathSegment::LineTo(x, y));
                    current_point = (x, y);
                },
                Operator::CurveTo { c1, c2, end } => {
                    let (x1, y1) = c1.unwrap_or(current_point);
                    path.push(PathSegment::CurveTo(x1, y1, c2.0, c2.1, end.0, end.1));
                    current_point = end;
                },
                Operator::Rectangle {
                    x,
                    y,
                    width,
                    height,
                } => {
                    path.extend_from_slice(&[
                        PathSegment::MoveTo(x, y),
                        PathSegment::LineTo(x + width, y),
                        PathSegment::LineTo(x + width, y + height),
                        PathSegment::LineTo(x, y + height),
                        PathSegment::Close,
                    ]);
                    current_point = (x, y);
                },
                Operator::ClosePath => path.push(PathSegment::Close),
                Operator::PaintPath { mode, close } => {
                    if close {
                        path.push(PathSegment::Close);
                    }
                    if mode != PaintMode::None && !path.is_empty() {
                        sink.paint_path(&path, mode, stack.current());
                    }
                    path.clear();
                },
                Operator::Clip => {},

                Operator::Do { name } => {
                    self.run_form(resources, &name, stack, sink, depth);
                },
            }
        }
    }

    fn load_font(&mut self, resources: Option<&'a Dictionary>, name: &str) -> Rc<PdfFont> {
        let doc = self.doc;
        let entry = resources
            .and_then(|r| get_dict(doc, r, b"Font"))
            .and_then(|fonts| fonts.get(name.as_bytes()).ok());

        match entry {
            Some(Object::Reference(id)) => {
                if let Some(font) = self.fonts.get(id) {
                    return Rc::clone(font);
                }
                let font = match doc.get_dictionary(*id) {
                    Ok(dict) => Rc::new(PdfFont::load(doc, dict)),
                    Err(_) => {
                        log::debug!("Font /{} does not resolve, using fallback", name);
                        Rc::new(PdfFont::fallback())
                    },
                };
                self.fonts.insert(*id, Rc::clone(&font));
                font
            },
            Some(Object::Dictionary(dict)) => Rc::new(PdfFont::load(doc, dict)),
            _ => {
                log::debug!("Font /{} not in resources, using fallback", name);
                Rc::new(PdfFont::fallback())
            },
        }
    }

    fn run_form(
        &mut self,
        resources: Option<&'a Dictionary>,
        name: &str,
        stack: &mut GraphicsStateStack,
        sink: &mut dyn ContentSink,
        depth: usize,
    ) {
        if depth >= MAX_FORM_DEPTH {
            log::warn!("Form XObject /{} nested too deeply, skipping", name);
            return;
        }
        let doc = self.doc;
        let stream = match resources
            .and_then(|r| get_dict(doc, r, b"XObject"))
            .and_then(|xobjects| xobjects.get(name.as_bytes()).ok())
            .map(|obj| resolve(doc, obj))
        {
            Some(Object::Stream(stream)) => stream,
            _ => return,
        };
        if get_name(doc, &stream.dict, b"Subtype").as_deref() != Some("Form") {
            // Images carry no text and are not part of the background estimate
            return;
        }

        let form_matrix = match stream.dict.get(b"Matrix").map(|m| resolve(doc, m)) {
            Ok(Object::Array(items)) => {
                let values: Vec<f32> = items
                    .iter()
                    .filter_map(|v| object_to_f32(resolve(doc, v)))
                    .collect();
                Matrix::from_slice(&values).unwrap_or_default()
            },
            _ => Matrix::identity(),
        };
        let form_resources = get_dict(doc, &stream.dict, b"Resources").or(resources);
        let content = stream_data(stream);

        stack.save();
        {
            let state = stack.current_mut();
            state.ctm = form_matrix.multiply(&state.ctm);
        }
        self.run_stream(&content, form_resources, stack, sink, depth + 1);
        stack.restore();
    }
}

/// Show a sequence of strings and adjustments, advancing the text matrix.
fn show_text(state: &mut GraphicsState, elements: &[TextElement], sink: &mut dyn ContentSink) {
    let font = state
        .font
        .clone()
        .unwrap_or_else(|| Rc::new(PdfFont::fallback()));
    let font_size = state.font_size;
    let h_scale = state.horizontal_scaling / 100.0;

    let mut text = String::new();
    let mut glyphs = Vec::new();
    let mut offset = 0.0f32;

    for element in elements {
        match element {
            TextElement::String(bytes) => {
                for glyph in font.decode(bytes) {
                    let word_space = if glyph.is_space { state.word_space } else { 0.0 };
                    let advance = (glyph.width * font_size + state.char_space + word_space) * h_scale;
                    text.push_str(&glyph.text);
                    glyphs.push(PositionedGlyph {
                        width: glyph.width * font_size * h_scale,
                        text: glyph.text,
                        offset,
                    });
                    offset += advance;
                }
            },
            TextElement::Offset(adjustment) => {
                if *adjustment < TJ_SPACE_THRESHOLD
                    && !text.is_empty()
                    && !text.ends_with(char::is_whitespace)
                {
                    text.push(' ');
                }
                offset -= adjustment / 1000.0 * font_size * h_scale;
            },
        }
    }

    let run = TextRun {
        text,
        glyphs,
        rendering_matrix: state.text_rendering_matrix(),
        text_to_page: state.text_to_page(),
        advance: offset,
        font_size,
        rise: state.text_rise,
        font_name: font.base_font.clone(),
        color: state.fill_color,
        visible: state.text_visible(),
    };
    state.advance(offset);
    sink.show_text(&run);
}

/// Device color from operand count: 1 gray, 3 RGB, 4 CMYK.
fn color_from_components(components: &[f32]) -> Option<Color> {
    match components {
        [g] => Some(Color::gray(*g)),
        [r, g, b] => Some(Color::new(*r, *g, *b)),
        [c, m, y, k] => Some(Color::from_cmyk(*c, *m, *y, *k)),
        _ => None,
    }
}
