//! Token estimation without a tokenizer.
//!
//! Estimates are character-count based and deterministic. Code tokenizes
//! less efficiently than prose (punctuation, operators, indentation), so
//! text classified by [`contains_code`](super::code::contains_code) is costed
//! at a denser characters-per-token ratio.

use super::code::contains_code;
use crate::Turn;

/// Characters per token for plain prose.
pub const PROSE_CHARS_PER_TOKEN: usize = 4;

/// Characters per token for code-bearing text.
pub const CODE_CHARS_PER_TOKEN: usize = 3;

/// Estimate the token cost of `text`.
///
/// Counts Unicode scalar values and rounds up, so any non-empty text costs at
/// least one token and empty text costs nothing.
pub fn estimate_tokens(text: &str) -> usize {
    let chars = text.chars().count();
    let ratio = if contains_code(text) {
        CODE_CHARS_PER_TOKEN
    } else {
        PROSE_CHARS_PER_TOKEN
    };
    chars.div_ceil(ratio)
}

/// Estimate the total token cost of a sequence of turns.
pub fn estimate_turns(turns: &[Turn]) -> usize {
    turns.iter().map(|t| estimate_tokens(&t.content)).sum()
}

/// Snapshot of a prepared context's size relative to its budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextUsage {
    /// Estimated tokens consumed.
    pub estimated_tokens: usize,
    /// Token budget.
    pub max_tokens: usize,
    /// Usage as a fraction (0.0 to 1.0+).
    pub usage_pct: f64,
}

impl ContextUsage {
    /// Measure `turns` against a budget of `max_tokens`.
    pub fn measure(turns: &[Turn], max_tokens: usize) -> Self {
        let estimated_tokens = estimate_turns(turns);
        let usage_pct = if max_tokens > 0 {
            estimated_tokens as f64 / max_tokens as f64
        } else {
            1.0
        };
        Self {
            estimated_tokens,
            max_tokens,
            usage_pct,
        }
    }

    /// True when the estimate exceeds the budget.
    pub fn is_over_budget(&self) -> bool {
        self.estimated_tokens > self.max_tokens
    }

    /// Format as a short log-friendly string.
    pub fn to_log_string(&self) -> String {
        format!(
            "context: ~{} tokens ({:.0}% of {})",
            self.estimated_tokens,
            self.usage_pct * 100.0,
            self.max_tokens,
        )
    }
}
