//! Text fragments and cross-run matching.
//!
//! Extraction delivers a page as a flat, ordered list of [`TextFragment`]s.
//! [`MatchFinder`] locates a search string across neighbouring fragments and
//! reports each occurrence as a [`MatchSpan`]; a per-page [`ConsumedSet`]
//! guarantees that no fragment is ever part of two spans.

pub mod fragment;
pub mod matcher;

pub use fragment::{ConsumedSet, MatchSpan, TextFragment};
pub use matcher::MatchFinder;
