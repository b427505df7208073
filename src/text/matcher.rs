//! Cross-run search for a string spread over several text fragments.
//!
//! Fragments are concatenated in extraction order, each trimmed, with a
//! separator between neighbours. The separator is soft: it stands for a
//! space in the search string, or for nothing at all, so that both
//! `"Hello" + "world"` against `"Hello world"` and `"Hel" + "lo"` against
//! `"Hello"` are found.

use super::fragment::{ConsumedSet, MatchSpan, TextFragment};
use crate::edit::normalize_whitespace;

/// One position in the concatenated window.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Unit {
    /// A character of fragment `.1`
    Char(char, usize),
    /// Soft separator between two fragments
    Joiner,
}

/// Locates successive occurrences of one normalized search string.
#[derive(Debug, Clone)]
pub struct MatchFinder {
    needle: Vec<char>,
}

impl MatchFinder {
    /// Create a finder; `find` is whitespace-normalized first.
    pub fn new(find: &str) -> Self {
        Self {
            needle: normalize_whitespace(find).chars().collect(),
        }
    }

    /// Whether the normalized search string is empty.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// The normalized search string.
    pub fn needle(&self) -> String {
        self.needle.iter().collect()
    }

    /// Find the next span starting at or after fragment `from`.
    ///
    /// For each unconsumed candidate start, the window grows one fragment at
    /// a time and stops at the first consumed fragment. The first window
    /// containing the search string yields the span: every fragment whose
    /// characters overlap the matched range.
    pub fn find_next(
        &self,
        fragments: &[TextFragment],
        consumed: &ConsumedSet,
        from: usize,
    ) -> Option<MatchSpan> {
        if self.needle.is_empty() {
            return None;
        }

        // A match covers at most one unit per needle char plus one joiner
        // between each pair.
        let reach = self.needle.len() * 2;
        let mut units: Vec<Unit> = Vec::new();

        for start in from..fragments.len() {
            if consumed.contains(start) {
                continue;
            }

            units.clear();
            let mut window_limit = None;

            for (index, fragment) in fragments.iter().enumerate().skip(start) {
                if index > start && consumed.contains(index) {
                    break;
                }

                let old_len = units.len();
                let piece = normalize_whitespace(&fragment.text);
                if !piece.is_empty() {
                    if !units.is_empty() {
                        units.push(Unit::Joiner);
                    }
                    units.extend(piece.chars().map(|c| Unit::Char(c, index)));
                }
                let limit = *window_limit.get_or_insert(units.len() + reach);

                if units.len() > old_len {
                    if let Some((match_start, match_end)) =
                        self.search(&units, old_len.saturating_sub(reach))
                    {
                        return Some(MatchSpan {
                            fragments: covered_fragments(&units[match_start..match_end]),
                            scan_start: start,
                        });
                    }
                }

                // Past this point no new match can touch the start fragment;
                // later candidates will find anything further right.
                if units.len() > limit {
                    break;
                }
            }
        }

        None
    }

    /// Leftmost match beginning at or after unit `lo`, as a unit range.
    fn search(&self, units: &[Unit], lo: usize) -> Option<(usize, usize)> {
        (lo..units.len())
            .filter(|&p| matches!(units[p], Unit::Char(..)))
            .find_map(|p| self.match_at(units, p).map(|end| (p, end)))
    }

    /// Try to match the whole needle starting at unit `pos`.
    fn match_at(&self, units: &[Unit], pos: usize) -> Option<usize> {
        let mut i = pos;
        let mut j = 0;
        while j < self.needle.len() {
            match units.get(i)? {
                Unit::Char(c, _) => {
                    if *c != self.needle[j] {
                        return None;
                    }
                    j += 1;
                },
                Unit::Joiner => {
                    if self.needle[j] == ' ' {
                        j += 1;
                    }
                },
            }
            i += 1;
        }
        Some(i)
    }
}

/// Fragment indices with at least one character in `units`, ascending.
fn covered_fragments(units: &[Unit]) -> Vec<usize> {
    let mut indices: Vec<usize> = Vec::new();
    for unit in units {
        if let Unit::Char(_, index) = unit {
            if indices.last() != Some(index) {
                indices.push(*index);
            }
        }
    }
    indices
}
