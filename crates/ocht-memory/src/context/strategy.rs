//! The hybrid memory strategy.
//!
//! Every prepared context is assembled from three zones:
//!
//! 1. **Summary**: one system turn condensing older prose turns. Only
//!    present once the history is longer than the summarization threshold.
//! 2. **Preserved code**: code-bearing turns older than the recency window,
//!    kept verbatim at their original relative position.
//! 3. **Recency window**: the last `recent_messages_count` turns, verbatim,
//!    followed by the new prompt.
//!
//! The assembled sequence is then trimmed newest-first to the token budget.
//! The strategy holds nothing but its config and summarizer, so calls are
//! independent and the caller's history is only ever borrowed.

use super::selector::select_important;
use super::summarizer::{ExtractiveSummarizer, SUMMARY_HEADING, Summarizer};
use super::tokens::{ContextUsage, estimate_tokens};
use super::trimmer::trim_to_token_limit;
use crate::Turn;
use crate::config::MemoryConfig;
use tracing::{debug, info, warn};

/// Which history turns are kept verbatim and which are summarized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextPlan {
    /// History indices copied verbatim, ascending.
    pub keep: Vec<usize>,
    /// History indices collapsed into the summary turn, ascending.
    pub summarize: Vec<usize>,
}

impl ContextPlan {
    /// Plan that keeps every one of `len` turns.
    fn keep_all(len: usize) -> Self {
        Self {
            keep: (0..len).collect(),
            summarize: Vec::new(),
        }
    }

    /// True if a summary turn will be emitted.
    pub fn needs_summary(&self) -> bool {
        !self.summarize.is_empty()
    }
}

/// Context ready to send to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedContext {
    /// Turns in send order. The last one is always the new human prompt.
    pub turns: Vec<Turn>,
    /// Estimated tokens of `turns`.
    pub estimated_tokens: usize,
    /// History turns collapsed into the summary turn.
    pub summarized_count: usize,
    /// Assembled turns dropped by the token trimmer.
    pub trimmed_count: usize,
}

impl PreparedContext {
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn into_turns(self) -> Vec<Turn> {
        self.turns
    }
}

impl std::ops::Deref for PreparedContext {
    type Target = [Turn];

    fn deref(&self) -> &[Turn] {
        &self.turns
    }
}

/// Hybrid memory strategy: recency window + preserved code + summary, fitted
/// to a token budget.
///
/// # Example
///
/// ```
/// use ocht_memory::prelude::*;
///
/// let strategy = HybridMemoryStrategy::new(MemoryConfig::new(1000, 5, 10).unwrap());
/// let history: Vec<Turn> = (0..15).map(|i| Turn::human(format!("Message {i}"))).collect();
///
/// assert!(strategy.should_summarize(&history));
/// let plan = strategy.plan_context(&history);
/// assert_eq!(plan.keep, vec![10, 11, 12, 13, 14]);
/// assert_eq!(plan.summarize.len(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct HybridMemoryStrategy<S = ExtractiveSummarizer> {
    config: MemoryConfig,
    summarizer: S,
}

impl HybridMemoryStrategy<ExtractiveSummarizer> {
    /// Strategy with the extractive summarizer.
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            config,
            summarizer: ExtractiveSummarizer,
        }
    }
}

impl<S: Summarizer> HybridMemoryStrategy<S> {
    /// Strategy with a custom summarizer.
    pub fn with_summarizer(config: MemoryConfig, summarizer: S) -> Self {
        Self { config, summarizer }
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Estimate the token cost of `text`.
    pub fn estimate_tokens(&self, text: &str) -> usize {
        estimate_tokens(text)
    }

    /// True when `history` is strictly longer than the summarization
    /// threshold.
    pub fn should_summarize(&self, history: &[Turn]) -> bool {
        history.len() > self.config.summarization_threshold()
    }

    /// Turns worth keeping verbatim: all code turns plus the most recent
    /// prose turns, in chronological order.
    pub fn select_important_messages(&self, history: &[Turn]) -> Vec<Turn> {
        select_important(history, self.config.recent_messages_count()).turns(history)
    }

    /// Trim `turns` to the configured budget. See [`trim_to_token_limit`].
    pub fn trim_to_token_limit(&self, turns: &[Turn]) -> Vec<Turn> {
        trim_to_token_limit(turns, self.config.max_context_tokens())
    }

    /// Decide which history turns to keep verbatim and which to summarize.
    ///
    /// Below the threshold everything is kept. Above it the last
    /// `recent_messages_count` turns are kept, as are older code-bearing
    /// turns; the remaining older turns are summarized.
    pub fn plan_context(&self, history: &[Turn]) -> ContextPlan {
        if !self.should_summarize(history) {
            return ContextPlan::keep_all(history.len());
        }

        let window_start = history
            .len()
            .saturating_sub(self.config.recent_messages_count());
        let older = &history[..window_start];

        // Only the code half of the selection matters here: older prose turns
        // are summarized regardless of how recent they are.
        let selection = select_important(older, self.config.recent_messages_count());

        let mut plan = ContextPlan::default();
        let mut code = selection.code.iter().copied().peekable();
        for i in 0..window_start {
            if code.next_if_eq(&i).is_some() {
                plan.keep.push(i);
            } else {
                plan.summarize.push(i);
            }
        }
        plan.keep.extend(window_start..history.len());

        debug!(
            "History of {} turns exceeds threshold {}: keeping {} ({} code), summarizing {}",
            history.len(),
            self.config.summarization_threshold(),
            plan.keep.len(),
            selection.code.len(),
            plan.summarize.len(),
        );
        plan
    }

    /// Build the context to send for `new_prompt` given `history`.
    ///
    /// The result always ends with `(human, new_prompt)` and fits the token
    /// budget unless the prompt alone exceeds it.
    pub async fn prepare_context(&self, history: &[Turn], new_prompt: &str) -> PreparedContext {
        let prompt = Turn::human(new_prompt);
        if history.is_empty() {
            return PreparedContext {
                estimated_tokens: estimate_tokens(new_prompt),
                turns: vec![prompt],
                summarized_count: 0,
                trimmed_count: 0,
            };
        }

        let plan = self.plan_context(history);
        let mut assembled = Vec::with_capacity(plan.keep.len() + 2);

        if plan.needs_summary() {
            let span: Vec<Turn> = plan.summarize.iter().map(|&i| history[i].clone()).collect();
            let summary = self.summarize_span(&span).await;
            assembled.push(Turn::system(format!("{SUMMARY_HEADING}\n{summary}")));
        }
        assembled.extend(plan.keep.iter().map(|&i| history[i].clone()));
        assembled.push(prompt);

        let turns = self.trim_to_token_limit(&assembled);
        let usage = ContextUsage::measure(&turns, self.config.max_context_tokens());
        let trimmed_count = assembled.len() - turns.len();

        info!(
            "Prepared {} turn(s) from {} history turn(s); {} ({} summarized, {} trimmed)",
            turns.len(),
            history.len(),
            usage.to_log_string(),
            plan.summarize.len(),
            trimmed_count,
        );

        PreparedContext {
            turns,
            estimated_tokens: usage.estimated_tokens,
            summarized_count: plan.summarize.len(),
            trimmed_count,
        }
    }

    /// Run the configured summarizer, falling back to the extractive summary
    /// if it fails so context preparation itself never fails.
    async fn summarize_span(&self, span: &[Turn]) -> String {
        match self.summarizer.summarize(span).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Summarizer failed ({e}); falling back to extractive summary");
                ExtractiveSummarizer::condense(span)
            }
        }
    }
}
