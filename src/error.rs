//! Error types for the text replacement engine.
//!
//! Only document-level failures surface as errors. Per-match failures
//! (rotated text, degenerate geometry) are reported as
//! [`MatchOutcome`](crate::replace::MatchOutcome) variants instead.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while replacing text in a PDF.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input could not be decoded as a PDF document
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    /// The mutated document could not be serialized
    #[error("Failed to serialize PDF: {0}")]
    Serialize(String),

    /// Error reported by the PDF container library
    #[error("PDF object error: {0}")]
    Lopdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A page could not be rasterized; the page is skipped, not fatal
    #[error("Page {page} cannot be rendered: {reason}")]
    Unrenderable {
        /// Zero-based page index
        page: usize,
        /// Why no drawing surface could be produced
        reason: String,
    },

    /// Page index outside the document
    #[error("Page {page} out of range (document has {count} pages)")]
    PageOutOfRange {
        /// Requested zero-based page index
        page: usize,
        /// Number of pages in the document
        count: usize,
    },

    /// The edit list could not be parsed
    #[error("Invalid edit list: {0}")]
    InvalidEdits(String),

    /// Font resource could not be read or registered
    #[error("Font error: {0}")]
    Font(String),
}

impl Error {
    /// Whether this error only affects a single page.
    ///
    /// Page-local errors are logged and the page is left untouched;
    /// everything else aborts the whole document.
    pub fn is_page_local(&self) -> bool {
        matches!(self, Error::Unrenderable { .. })
    }
}
