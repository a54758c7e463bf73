//! Summarization of turns that fall out of the verbatim window.
//!
//! When a history grows past the summarization threshold, older prose turns
//! are collapsed into one system turn. How the condensed text is produced is
//! pluggable through [`Summarizer`]:
//!
//! - [`ExtractiveSummarizer`] (default) keeps the first line of every turn,
//!   capped in length. Deterministic, no model call.
//! - [`ModelSummarizer`] asks a [`ChatModel`] to write the summary.

use crate::Turn;
use crate::model::ChatModel;
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

/// Boxed future returned by [`Summarizer::summarize`].
pub type SummaryFuture<'a> = Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>>;

/// Heading of every summary turn the strategy inserts.
pub const SUMMARY_HEADING: &str = "Summary of earlier conversation:";

/// Maximum characters per bullet in an extractive summary.
pub const SNIPPET_MAX_CHARS: usize = 160;

/// The prompt used for model-backed summarization.
const SUMMARIZATION_PROMPT: &str = "\
Summarize the following chat messages concisely so the conversation can \
continue without them. Focus on:
- Questions the user asked and the answers given
- Decisions, preferences and constraints the user stated
- Names of files, functions, libraries and commands mentioned

Rules:
- Only include facts explicitly stated in the messages.
- Preserve identifiers and error messages verbatim.
- Reply with the summary only, no preamble.";

/// Produces the condensed text for a span of turns.
pub trait Summarizer: Send + Sync {
    /// Summarize `turns` (chronological). The returned text becomes the body
    /// of the summary turn.
    fn summarize<'a>(&'a self, turns: &'a [Turn]) -> SummaryFuture<'a>;
}

/// Deterministic summarizer: one bullet per turn with its first line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractiveSummarizer;

impl ExtractiveSummarizer {
    /// Build the summary synchronously.
    pub fn condense(turns: &[Turn]) -> String {
        turns
            .iter()
            .map(|t| format!("- [{}] {}", t.role, snippet(&t.content, SNIPPET_MAX_CHARS)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Summarizer for ExtractiveSummarizer {
    fn summarize<'a>(&'a self, turns: &'a [Turn]) -> SummaryFuture<'a> {
        let summary = Self::condense(turns);
        Box::pin(async move { Ok(summary) })
    }
}

/// Summarizer that delegates to a chat model.
#[derive(Debug, Clone)]
pub struct ModelSummarizer<M> {
    model: M,
}

impl<M: ChatModel> ModelSummarizer<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Build the (system, human) request pair for a span of turns.
    pub fn build_request(turns: &[Turn]) -> [Turn; 2] {
        let mut content = String::new();
        for turn in turns {
            content.push_str(&format!("[{}]: {}\n\n", turn.role, turn.content));
        }
        [
            Turn::system(SUMMARIZATION_PROMPT),
            Turn::human(content.trim_end()),
        ]
    }
}

impl<M: ChatModel> Summarizer for ModelSummarizer<M> {
    fn summarize<'a>(&'a self, turns: &'a [Turn]) -> SummaryFuture<'a> {
        Box::pin(async move {
            let request = Self::build_request(turns);
            debug!(
                "Requesting summary of {} turn(s) from model {}",
                turns.len(),
                self.model.name()
            );
            let summary = self.model.complete(&request).await?;
            let summary = summary.trim();
            if summary.is_empty() {
                return Err("model returned an empty summary".to_string());
            }
            Ok(summary.to_string())
        })
    }
}

/// First non-blank line of `text`, cut to `max_chars` with an ellipsis.
fn snippet(text: &str, max_chars: usize) -> String {
    let line = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");
    let more_lines = text.trim().lines().count() > 1;

    if line.chars().count() > max_chars {
        let cut: String = line.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{cut}…")
    } else if more_lines {
        format!("{line} …")
    } else {
        line.to_string()
    }
}
