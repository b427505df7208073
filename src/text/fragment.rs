//! Positioned text runs and the bookkeeping of which runs have been used.

use crate::geometry::{Matrix, PageBox, PagePoint};
use std::collections::BTreeSet;

/// Share of the run height added below the baseline for descenders.
pub const DESCENT_RATIO: f32 = 0.3;
/// Share of the run height added above the baseline for ascenders.
pub const ASCENT_RATIO: f32 = 0.9;

/// One atomic run of text as reported by text extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    /// Decoded text of the run
    pub text: String,
    /// Text rendering matrix; `(e, f)` is the baseline origin in page space
    pub transform: Matrix,
    /// Advance width in page units
    pub width: f32,
    /// Run height (font size) in page units
    pub height: f32,
    /// Font name as found in the document, subset tag removed
    pub font_name: String,
}

impl TextFragment {
    /// Create an upright fragment with its baseline origin at `(x, y)`.
    pub fn new(
        text: impl Into<String>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        font_name: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            transform: Matrix::new(height, 0.0, 0.0, height, x, y),
            width,
            height,
            font_name: font_name.into(),
        }
    }

    /// Replace the transform, keeping everything else.
    pub fn with_transform(mut self, transform: Matrix) -> Self {
        self.transform = transform;
        self
    }

    /// Baseline origin in page space.
    pub fn origin(&self) -> PagePoint {
        PagePoint::new(self.transform.e, self.transform.f)
    }

    /// Whether the run is free of rotation and shear.
    pub fn is_upright(&self, tolerance: f32) -> bool {
        self.transform.is_upright(tolerance)
    }

    /// Box around the run including descender and ascender room:
    /// `[x, x + width] x [y - 0.3 h, y + 0.9 h]`.
    pub fn padded_box(&self) -> PageBox {
        let origin = self.origin();
        PageBox::new(
            origin.x,
            origin.y - DESCENT_RATIO * self.height,
            origin.x + self.width,
            origin.y + ASCENT_RATIO * self.height,
        )
    }

    /// Box from the baseline up to the run height, without padding.
    pub fn glyph_box(&self) -> PageBox {
        let origin = self.origin();
        PageBox::from_origin(origin.x, origin.y, self.width, self.height)
    }
}

/// The fragments collectively spelling out one occurrence of a search string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpan {
    /// Indices of the covered fragments, ascending and contiguous
    pub fragments: Vec<usize>,
    /// Candidate start index whose window produced this span
    pub scan_start: usize,
}

impl MatchSpan {
    /// Index of the first covered fragment.
    pub fn first(&self) -> Option<usize> {
        self.fragments.first().copied()
    }

    /// Index of the last covered fragment.
    pub fn last(&self) -> Option<usize> {
        self.fragments.last().copied()
    }

    /// Cursor position for the next scan once this span has been applied.
    pub fn resume_after_consumed(&self) -> usize {
        self.last().map_or(self.scan_start + 1, |last| last + 1)
    }

    /// Cursor position for the next scan when this span was not applied.
    pub fn resume_after_rejected(&self) -> usize {
        self.scan_start + 1
    }
}

/// Fragment indices already replaced on one page.
///
/// A fragment enters the set at most once and never leaves it while the page
/// is being processed.
#[derive(Debug, Clone, Default)]
pub struct ConsumedSet {
    indices: BTreeSet<usize>,
}

impl ConsumedSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether fragment `index` has been used by a match.
    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Mark every fragment of `span` as used.
    ///
    /// Returns `false` if any of them was already used; the set is left
    /// unchanged in that case.
    pub fn consume(&mut self, span: &MatchSpan) -> bool {
        if span.fragments.iter().any(|i| self.indices.contains(i)) {
            return false;
        }
        self.indices.extend(span.fragments.iter().copied());
        true
    }

    /// Number of used fragments.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no fragment has been used yet.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Used indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}
