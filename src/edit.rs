//! Find/replace edits and whitespace normalization.

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("valid whitespace regex");
}

/// One find/replace pair.
///
/// Edits are applied in list order: each edit scans a whole page for every
/// occurrence before the next edit starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// Text to locate
    pub find: String,
    /// Text drawn in place of every located occurrence
    pub replace: String,
    /// Caller-side identifier, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Edit {
    /// Create an edit without an identifier.
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
            id: None,
        }
    }

    /// The `find` text with whitespace runs collapsed and ends trimmed.
    pub fn normalized_find(&self) -> String {
        normalize_whitespace(&self.find)
    }

    /// Whether this edit can never match anything.
    pub fn is_empty(&self) -> bool {
        self.normalized_find().is_empty()
    }
}

/// Collapse every run of whitespace to a single space and trim both ends.
///
/// # Examples
///
/// ```
/// use pdf_retext::edit::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("  Hello \t\n  world "), "Hello world");
/// ```
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Drop edits whose `find` is empty after normalization.
pub fn filter_empty(edits: Vec<Edit>) -> Vec<Edit> {
    edits.into_iter().filter(|edit| !edit.is_empty()).collect()
}

/// Parse an edit list from JSON: `[{"find": "...", "replace": "..."}, ...]`.
pub fn parse_edit_list(json: &str) -> Result<Vec<Edit>> {
    serde_json::from_str(json).map_err(|e| Error::InvalidEdits(e.to_string()))
}

/// Parse a `FIND=REPLACE` command-line pair.
///
/// The first `=` separates the two halves, so the replacement may itself
/// contain `=`.
pub fn parse_edit_pair(pair: &str) -> Result<Edit> {
    match pair.split_once('=') {
        Some((find, replace)) => Ok(Edit::new(find, replace)),
        None => Err(Error::InvalidEdits(format!(
            "expected FIND=REPLACE, got '{}'",
            pair
        ))),
    }
}
