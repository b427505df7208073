//! PDF content stream parsing and execution.
//!
//! Content streams are decoded into [`Operator`]s and executed by the
//! [`Interpreter`], which reports shown text and painted paths to a
//! [`ContentSink`]. Text extraction ([`FragmentCollector`]) and the page
//! rasterizer are both sinks.

pub mod font;
pub mod fragments;
pub mod graphics_state;
pub mod interpreter;
pub mod operators;
pub mod resources;

pub use font::{Glyph, PdfFont};
pub use fragments::{extract_page_fragments, FragmentCollector};
pub use graphics_state::{GraphicsState, GraphicsStateStack};
pub use interpreter::{ContentSink, Interpreter, PathSegment, PositionedGlyph, TextRun};
pub use operators::{parse_content_stream, Operator, PaintMode, TextElement};
