//! PDF content stream operators.
//!
//! Content streams are tokenized by `lopdf` and converted here into a typed
//! [`Operator`] sequence. Operators the interpreter has no use for (marked
//! content, shading, inline images, ...) are dropped during conversion.

use lopdf::content::{Content, Operation};
use lopdf::Object;

use crate::error::{Error, Result};

/// A content stream operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    // Text positioning operators
    /// Move text position (Td)
    Td {
        /// Horizontal offset
        tx: f32,
        /// Vertical offset
        ty: f32,
    },
    /// Move text position and set leading (TD)
    TD {
        /// Horizontal offset
        tx: f32,
        /// Vertical offset
        ty: f32,
    },
    /// Set text matrix (Tm)
    Tm {
        /// Matrix elements `[a b c d e f]`
        matrix: [f32; 6],
    },
    /// Move to start of next line (T*)
    TStar,

    // Text showing operators
    /// Show text string (Tj)
    Tj {
        /// Text to show (byte array)
        text: Vec<u8>,
    },
    /// Show text with individual glyph positioning (TJ)
    TJ {
        /// Array of text strings and positioning adjustments
        array: Vec<TextElement>,
    },
    /// Move to next line and show text (')
    Quote {
        /// Text to show
        text: Vec<u8>,
    },
    /// Set spacing, move to next line and show text (")
    DoubleQuote {
        /// Word spacing
        word_space: f32,
        /// Character spacing
        char_space: f32,
        /// Text to show
        text: Vec<u8>,
    },

    // Text state operators
    /// Set character spacing (Tc)
    Tc {
        /// Character spacing
        char_space: f32,
    },
    /// Set word spacing (Tw)
    Tw {
        /// Word spacing
        word_space: f32,
    },
    /// Set horizontal scaling (Tz)
    Tz {
        /// Horizontal scaling percentage
        scale: f32,
    },
    /// Set text leading (TL)
    TL {
        /// Text leading
        leading: f32,
    },
    /// Set font and size (Tf)
    Tf {
        /// Font resource name
        font: String,
        /// Font size
        size: f32,
    },
    /// Set text rendering mode (Tr)
    Tr {
        /// Rendering mode
        render: u8,
    },
    /// Set text rise (Ts)
    Ts {
        /// Text rise
        rise: f32,
    },
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,

    // Graphics state operators
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Modify current transformation matrix (cm)
    Cm {
        /// Matrix elements `[a b c d e f]`
        matrix: [f32; 6],
    },
    /// Set line width (w)
    SetLineWidth {
        /// Line width in user space
        width: f32,
    },

    // Color operators
    /// Set fill color (g, rg, k, sc, scn)
    SetFillColor {
        /// Color components, interpreted by count
        components: Vec<f32>,
    },
    /// Set stroke color (G, RG, K, SC, SCN)
    SetStrokeColor {
        /// Color components, interpreted by count
        components: Vec<f32>,
    },

    // Path construction operators
    /// Begin new subpath (m)
    MoveTo {
        /// X coordinate
        x: f32,
        /// Y coordinate
        y: f32,
    },
    /// Append straight line (l)
    LineTo {
        /// X coordinate
        x: f32,
        /// Y coordinate
        y: f32,
    },
    /// Append cubic Bezier curve (c, v, y)
    ///
    /// `v` and `y` are normalized to the full form: a missing first control
    /// point is `None` and resolved against the current point, a missing
    /// second control point equals the end point.
    CurveTo {
        /// First control point, or the current point when `None`
        c1: Option<(f32, f32)>,
        /// Second control point
        c2: (f32, f32),
        /// End point
        end: (f32, f32),
    },
    /// Append rectangle (re)
    Rectangle {
        /// X coordinate
        x: f32,
        /// Y coordinate
        y: f32,
        /// Width
        width: f32,
        /// Height
        height: f32,
    },
    /// Close current subpath (h)
    ClosePath,

    // Path painting operators
    /// Paint the current path
    PaintPath {
        /// How the path is painted
        mode: PaintMode,
        /// Close the current subpath first (s, b, b*)
        close: bool,
    },
    /// Set clipping path (W, W*); the path itself is painted by the next operator
    Clip,

    // XObject operator
    /// Paint external object (Do)
    Do {
        /// XObject resource name
        name: String,
    },
}

/// How a path painting operator paints the current path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    /// Stroke only (S, s)
    Stroke,
    /// Fill only (f, F, f*)
    Fill {
        /// Even-odd rule instead of nonzero winding
        even_odd: bool,
    },
    /// Fill then stroke (B, B*, b, b*)
    FillStroke {
        /// Even-odd rule instead of nonzero winding
        even_odd: bool,
    },
    /// End path without painting (n)
    None,
}

impl PaintMode {
    /// Whether the path interior is filled.
    pub fn fills(&self) -> bool {
        matches!(self, PaintMode::Fill { .. } | PaintMode::FillStroke { .. })
    }

    /// Whether the path outline is stroked.
    pub fn strokes(&self) -> bool {
        matches!(self, PaintMode::Stroke | PaintMode::FillStroke { .. })
    }
}

/// Element of a TJ array.
#[derive(Debug, Clone, PartialEq)]
pub enum TextElement {
    /// Text string to show
    String(Vec<u8>),
    /// Position adjustment in thousandths of text space (positive moves left)
    Offset(f32),
}

/// Numeric value of an operand.
pub fn object_to_f32(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Decode a content stream into typed operators.
///
/// Malformed operators (wrong operand count or types) are skipped; only a
/// stream that cannot be tokenized at all is an error.
pub fn parse_content_stream(data: &[u8]) -> Result<Vec<Operator>> {
    let content = Content::decode(data)
        .map_err(|e| Error::InvalidPdf(format!("undecodable content stream: {}", e)))?;
    Ok(content
        .operations
        .iter()
        .filter_map(Operator::from_operation)
        .collect())
}

fn numbers(operands: &[Object]) -> Option<Vec<f32>> {
    operands.iter().map(object_to_f32).collect()
}

fn matrix_operands(operands: &[Object]) -> Option<[f32; 6]> {
    let values = numbers(operands)?;
    if values.len() != 6 {
        return None;
    }
    let mut matrix = [0.0; 6];
    matrix.copy_from_slice(&values);
    Some(matrix)
}

fn pair(operands: &[Object]) -> Option<(f32, f32)> {
    match operands {
        [x, y] => Some((object_to_f32(x)?, object_to_f32(y)?)),
        _ => None,
    }
}

fn single(operands: &[Object]) -> Option<f32> {
    operands.first().and_then(object_to_f32)
}

fn string_bytes(obj: &Object) -> Option<Vec<u8>> {
    match obj {
        Object::String(bytes, _) => Some(bytes.clone()),
        _ => None,
    }
}

fn name_string(obj: &Object) -> Option<String> {
    match obj {
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

/// Numeric components of a color operator; a trailing pattern name is ignored.
fn color_components(operands: &[Object]) -> Vec<f32> {
    operands.iter().filter_map(object_to_f32).collect()
}

impl Operator {
    /// Convert a tokenized operation, returning `None` for unsupported or
    /// malformed ones.
    pub fn from_operation(op: &Operation) -> Option<Operator> {
        let operands = op.operands.as_slice();
        let operator = match op.operator.as_str() {
            "BT" => Operator::BeginText,
            "ET" => Operator::EndText,
            "Td" => {
                let (tx, ty) = pair(operands)?;
                Operator::Td { tx, ty }
            },
            "TD" => {
                let (tx, ty) = pair(operands)?;
                Operator::TD { tx, ty }
            },
            "Tm" => Operator::Tm {
                matrix: matrix_operands(operands)?,
            },
            "T*" => Operator::TStar,
            "Tj" => Operator::Tj {
                text: string_bytes(operands.first()?)?,
            },
            "'" => Operator::Quote {
                text: string_bytes(operands.first()?)?,
            },
            "\"" => match operands {
                [aw, ac, text] => Operator::DoubleQuote {
                    word_space: object_to_f32(aw)?,
                    char_space: object_to_f32(ac)?,
                    text: string_bytes(text)?,
                },
                _ => return None,
            },
            "TJ" => {
                let items = operands.first()?.as_array().ok()?;
                let array = items
                    .iter()
                    .filter_map(|item| match item {
                        Object::String(bytes, _) => Some(TextElement::String(bytes.clone())),
                        other => object_to_f32(other).map(TextElement::Offset),
                    })
                    .collect();
                Operator::TJ { array }
            },
            "Tc" => Operator::Tc {
                char_space: single(operands)?,
            },
            "Tw" => Operator::Tw {
                word_space: single(operands)?,
            },
            "Tz" => Operator::Tz {
                scale: single(operands)?,
            },
            "TL" => Operator::TL {
                leading: single(operands)?,
            },
            "Tf" => match operands {
                [font, size] => Operator::Tf {
                    font: name_string(font)?,
                    size: object_to_f32(size)?,
                },
                _ => return None,
            },
            "Tr" => Operator::Tr {
                render: single(operands)?.clamp(0.0, 7.0) as u8,
            },
            "Ts" => Operator::Ts {
                rise: single(operands)?,
            },
            "q" => Operator::SaveState,
            "Q" => Operator::RestoreState,
            "cm" => Operator::Cm {
                matrix: matrix_operands(operands)?,
            },
            "w" => Operator::SetLineWidth {
                width: single(operands)?,
            },
            "g" | "rg" | "k" | "sc" | "scn" => Operator::SetFillColor {
                components: color_components(operands),
            },
            "G" | "RG" | "K" | "SC" | "SCN" => Operator::SetStrokeColor {
                components: color_components(operands),
            },
            "m" => {
                let (x, y) = pair(operands)?;
                Operator::MoveTo { x, y }
            },
            "l" => {
                let (x, y) = pair(operands)?;
                Operator::LineTo { x, y }
            },
            "c" => {
                let v = numbers(operands)?;
                if v.len() != 6 {
                    return None;
                }
                Operator::CurveTo {
                    c1: Some((v[0], v[1])),
                    c2: (v[2], v[3]),
                    end: (v[4], v[5]),
                }
            },
            "v" => {
                let v = numbers(operands)?;
                if v.len() != 4 {
                    return None;
                }
                Operator::CurveTo {
                    c1: None,
                    c2: (v[0], v[1]),
                    end: (v[2], v[3]),
                }
            },
            "y" => {
                let v = numbers(operands)?;
                if v.len() != 4 {
                    return None;
                }
                Operator::CurveTo {
                    c1: Some((v[0], v[1])),
                    c2: (v[2], v[3]),
                    end: (v[2], v[3]),
                }
            },
            "re" => {
                let v = numbers(operands)?;
                if v.len() != 4 {
                    return None;
                }
                Operator::Rectangle {
                    x: v[0],
                    y: v[1],
                    width: v[2],
                    height: v[3],
                }
            },
            "h" => Operator::ClosePath,
            "S" | "s" | "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" | "n" => {
                let mode = match op.operator.as_str() {
                    "S" | "s" => PaintMode::Stroke,
                    "f" | "F" => PaintMode::Fill { even_odd: false },
                    "f*" => PaintMode::Fill { even_odd: true },
                    "B" | "b" => PaintMode::FillStroke { even_odd: false },
                    "B*" | "b*" => PaintMode::FillStroke { even_odd: true },
                    _ => PaintMode::None,
                };
                Operator::PaintPath {
                    mode,
                    close: matches!(op.operator.as_str(), "s" | "b" | "b*"),
                }
            },
            "W" | "W*" => Operator::Clip,
            "Do" => Operator::Do {
                name: name_string(operands.first()?)?,
            },
            _ => return None,
        };
        Some(operator)
    }
}
