//! Token-limit trimming.
//!
//! Walks a turn sequence from newest to oldest and keeps turns while the
//! running estimate fits the budget. The first turn that would overflow ends
//! the walk, so everything older than it is dropped too. The newest turn (the
//! prompt about to be sent) is always kept, even when it alone exceeds the
//! budget: delivering the request matters more than the budget.

use super::tokens::estimate_tokens;
use crate::Turn;
use tracing::debug;

/// Trim `turns` to at most `max_tokens` estimated tokens.
///
/// The result is either within budget or consists of exactly the final input
/// turn. Chronological order is preserved.
pub fn trim_to_token_limit(turns: &[Turn], max_tokens: usize) -> Vec<Turn> {
    let Some((last, earlier)) = turns.split_last() else {
        return Vec::new();
    };

    let mut total = estimate_tokens(&last.content);
    if total > max_tokens {
        debug!(
            "Newest turn alone exceeds budget ({} > {} tokens); sending it anyway",
            total, max_tokens
        );
    }

    let mut keep_from = turns.len() - 1;
    if total <= max_tokens {
        for (i, turn) in earlier.iter().enumerate().rev() {
            let cost = estimate_tokens(&turn.content);
            if total + cost > max_tokens {
                break;
            }
            total += cost;
            keep_from = i;
        }
    }

    if keep_from > 0 {
        debug!(
            "Trimmed {} oldest turn(s) to fit {} tokens (~{} kept)",
            keep_from, max_tokens, total
        );
    }

    turns[keep_from..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tokens::estimate_turns;

    #[test]
    fn trims_oldest_first() {
        let turns = vec![
            Turn::human("x".repeat(200)),
            Turn::ai("y".repeat(200)),
            Turn::human("z".repeat(200)),
            Turn::ai("w".repeat(200)),
            Turn::human("final prompt"),
        ];

        let result = trim_to_token_limit(&turns, 100);
        assert_eq!(result.last(), Some(&Turn::human("final prompt")));
        assert!(result.len() < turns.len());
        assert_eq!(result.len(), 2);
        assert_eq!(result[0], Turn::ai("w".repeat(200)));
        assert!(estimate_turns(&result) <= 100);
    }

    #[test]
    fn everything_fits() {
        let turns = vec![Turn::human("hi"), Turn::ai("hello"), Turn::human("bye")];
        assert_eq!(trim_to_token_limit(&turns, 1000), turns);
    }

    #[test]
    fn oversize_prompt_kept_alone() {
        let turns = vec![Turn::ai("short"), Turn::human("x".repeat(1000))];
        let result = trim_to_token_limit(&turns, 10);
        assert_eq!(result, vec![Turn::human("x".repeat(1000))]);
    }

    #[test]
    fn stops_at_first_overflow() {
        // A small old turn behind a large one is not resurrected.
        let turns = vec![
            Turn::human("tiny"),
            Turn::ai("x".repeat(400)),
            Turn::human("prompt"),
        ];
        let result = trim_to_token_limit(&turns, 50);
        assert_eq!(result, vec![Turn::human("prompt")]);
    }

    #[test]
    fn exact_budget_is_inclusive() {
        let turns = vec![Turn::ai("x".repeat(40)), Turn::human("y".repeat(40))];
        assert_eq!(trim_to_token_limit(&turns, 20).len(), 2);
        assert_eq!(trim_to_token_limit(&turns, 19).len(), 1);
    }

    #[test]
    fn empty_input() {
        assert!(trim_to_token_limit(&[], 100).is_empty());
    }
}
