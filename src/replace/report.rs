//! Per-match outcomes and the document report.

use crate::fonts::FontVariant;
use crate::geometry::PageBox;

/// What happened to one match attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// The match was redacted and the replacement drawn
    Mutated {
        /// Consumed fragment indices
        fragments: Vec<usize>,
        /// Redacted area
        bbox: PageBox,
        /// Variant the replacement was set in
        font: FontVariant,
        /// Size the replacement was set at
        font_size: f32,
    },
    /// A covered fragment is rotated or sheared
    RejectedRotated {
        /// Fragment indices of the rejected span
        fragments: Vec<usize>,
    },
    /// The match box has no area
    RejectedDegenerate {
        /// Fragment indices of the rejected span
        fragments: Vec<usize>,
    },
    /// The replacement would be drawn below the minimum font size
    RejectedTooSmall {
        /// Fragment indices of the rejected span
        fragments: Vec<usize>,
        /// Size the replacement would have needed
        font_size: f32,
    },
    /// The edit does not occur on the page
    NoMatch,
}

impl MatchOutcome {
    /// Whether the page was changed.
    pub fn is_mutated(&self) -> bool {
        matches!(self, MatchOutcome::Mutated { .. })
    }

    /// Whether a match was found but not applied.
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            MatchOutcome::RejectedRotated { .. }
                | MatchOutcome::RejectedDegenerate { .. }
                | MatchOutcome::RejectedTooSmall { .. }
        )
    }

    /// Fragments the match covered.
    pub fn fragments(&self) -> &[usize] {
        match self {
            MatchOutcome::Mutated { fragments, .. }
            | MatchOutcome::RejectedRotated { fragments }
            | MatchOutcome::RejectedDegenerate { fragments }
            | MatchOutcome::RejectedTooSmall { fragments, .. } => fragments,
            MatchOutcome::NoMatch => &[],
        }
    }
}

/// Processing summary of one page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageReport {
    /// Zero-based page index
    pub page: usize,
    /// Whether the page could not be rendered and was left untouched
    pub skipped: bool,
    /// Number of extracted fragments
    pub fragment_count: usize,
    /// Number of fragments consumed by applied matches
    pub consumed_count: usize,
    /// Outcomes in processing order, tagged with the edit index
    pub outcomes: Vec<(usize, MatchOutcome)>,
}

impl PageReport {
    /// Create an empty report for a page.
    pub fn new(page: usize) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }

    /// Number of applied matches.
    pub fn mutated_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_mutated()).count()
    }

    /// Number of found but rejected matches.
    pub fn rejected_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_rejected()).count()
    }
}

/// Processing summary of a whole document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplaceReport {
    /// One entry per page, in page order
    pub pages: Vec<PageReport>,
}

impl ReplaceReport {
    /// Number of applied matches across all pages.
    pub fn mutated_count(&self) -> usize {
        self.pages.iter().map(PageReport::mutated_count).sum()
    }

    /// Number of rejected matches across all pages.
    pub fn rejected_count(&self) -> usize {
        self.pages.iter().map(PageReport::rejected_count).sum()
    }

    /// Pages left untouched because they could not be rendered.
    pub fn skipped_pages(&self) -> Vec<usize> {
        self.pages
            .iter()
            .filter(|p| p.skipped)
            .map(|p| p.page)
            .collect()
    }

    /// Applied matches of one edit across all pages.
    pub fn mutations_for_edit(&self, edit_index: usize) -> usize {
        self.pages
            .iter()
            .flat_map(|p| p.outcomes.iter())
            .filter(|(i, o)| *i == edit_index && o.is_mutated())
            .count()
    }
}
