// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::new_without_default)]

//! # PDF Retext
//!
//! Visually replace text in existing PDF documents.
//!
//! Given a document and a list of find/replace pairs, every occurrence of a
//! find string is covered with a rectangle in the sampled background color
//! and the replacement is drawn on top in a matching standard font, size and
//! color. The original content streams are never rewritten.
//!
//! ## Core Features
//!
//! - **Cross-run matching**: finds strings split across independently
//!   positioned text runs (`"Hel"` + `"lo world"` matches `"Hello"`)
//! - **Color sampling**: background from the corners around the match,
//!   foreground from the glyph center, on a rasterized page
//! - **Font inference**: sans/serif/mono and bold/italic from the font name
//! - **Layout fitting**: replacement shrinks to fit the original width
//! - **Skip, don't fail**: rotated text and unrenderable pages are reported
//!   and left untouched
//!
//! ## Quick Start
//!
//! ```ignore
//! use pdf_retext::{replace_text, Edit};
//!
//! let input = std::fs::read("invoice.pdf")?;
//! let edits = vec![Edit::new("ACME Corp", "Globex Inc")];
//! let output = replace_text(&input, &edits)?;
//! std::fs::write("invoice-edited.pdf", output)?;
//! ```
//!
//! ## Architecture
//!
//! - [`backend`]: the three capabilities the engine needs from a document
//!   (text extraction, rasterization, mutation) and the `lopdf` implementation
//! - [`content`]: content stream interpreter shared by extraction and rendering
//! - [`rendering`]: `tiny-skia` rasterizer
//! - [`text`]: fragments and the cross-run match finder
//! - [`layout`], [`color`], [`fonts`]: match geometry, color estimation and
//!   font selection
//! - [`replace`]: the per-page orchestrator and its report

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration and input
pub mod config;
pub mod edit;

// Geometry and color
pub mod color;
pub mod geometry;

// Text and fonts
pub mod fonts;
pub mod text;

// Match layout
pub mod layout;

// PDF content and rendering
pub mod content;
pub mod rendering;

// Document access
pub mod backend;

// Orchestration
pub mod replace;

pub use backend::{DocumentMutator, LopdfBackend, Rasterizer, TextExtractor};
pub use config::ReplaceConfig;
pub use edit::Edit;
pub use error::{Error, Result};
pub use replace::{MatchOutcome, PageReport, ReplaceReport, Replacer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Replace text in a PDF with the default configuration.
///
/// Edits with an empty `find` are ignored.
pub fn replace_text(pdf: &[u8], edits: &[Edit]) -> Result<Vec<u8>> {
    replace_text_with_config(pdf, edits, &ReplaceConfig::default()).map(|(bytes, _)| bytes)
}

/// Replace text in a PDF and report what happened to every match.
///
/// Fails only when the document cannot be loaded or serialized; matches
/// that cannot be replaced and pages that cannot be rendered are recorded
/// in the report.
pub fn replace_text_with_config(
    pdf: &[u8],
    edits: &[Edit],
    config: &ReplaceConfig,
) -> Result<(Vec<u8>, ReplaceReport)> {
    let edits = edit::filter_empty(edits.to_vec());
    let mut backend = LopdfBackend::load(pdf)?;
    let report = Replacer::new(config.clone()).run(&mut backend, &edits)?;
    let output = backend.save()?;
    log::info!(
        "{} replacements, {} rejected, {} pages skipped",
        report.mutated_count(),
        report.rejected_count(),
        report.skipped_pages().len()
    );
    Ok((output, report))
}
