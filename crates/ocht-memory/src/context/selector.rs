//! Importance selection: which turns survive verbatim when the full history
//! cannot.
//!
//! Code-bearing turns are always selected. Prose turns compete on recency:
//! only the `recent_count` most recent ones are selected. Indices are
//! returned in chronological order so downstream formatting stays readable.

use super::code::contains_code;
use crate::Turn;

/// Result of [`select_important`]: history indices split by reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportanceSelection {
    /// Indices of code-bearing turns, ascending.
    pub code: Vec<usize>,
    /// Indices of the most recent prose turns, ascending.
    pub recent: Vec<usize>,
}

impl ImportanceSelection {
    /// All selected indices, ascending and deduplicated.
    pub fn indices(&self) -> Vec<usize> {
        let mut all: Vec<usize> = self.code.iter().chain(&self.recent).copied().collect();
        all.sort_unstable();
        all.dedup();
        all
    }

    /// True if `index` was selected for either reason.
    pub fn contains(&self, index: usize) -> bool {
        self.code.binary_search(&index).is_ok() || self.recent.binary_search(&index).is_ok()
    }

    /// Number of selected turns.
    pub fn len(&self) -> usize {
        self.code.len() + self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty() && self.recent.is_empty()
    }

    /// Clone the selected turns out of `history`, in chronological order.
    pub fn turns(&self, history: &[Turn]) -> Vec<Turn> {
        self.indices()
            .into_iter()
            .filter_map(|i| history.get(i).cloned())
            .collect()
    }
}

/// Select the turns of `history` worth keeping verbatim.
pub fn select_important(history: &[Turn], recent_count: usize) -> ImportanceSelection {
    let mut code = Vec::new();
    let mut prose = Vec::new();
    for (i, turn) in history.iter().enumerate() {
        if contains_code(&turn.content) {
            code.push(i);
        } else {
            prose.push(i);
        }
    }

    let skip = prose.len().saturating_sub(recent_count);
    let recent = prose.split_off(skip);

    ImportanceSelection { code, recent }
}
