//! Chat orchestration around the memory strategy.
//!
//! A [`ChatSession`] owns the conversation history, prepares the context for
//! every prompt with a [`HybridMemoryStrategy`], sends it to a [`ChatModel`]
//! and folds the exchange back into the history once the model has replied.
//! Persisting the history is left to the caller; [`ChatSession::history`]
//! and [`ChatSession::with_history`] are the hand-off points.

use crate::Turn;
use crate::context::strategy::{HybridMemoryStrategy, PreparedContext};
use crate::context::summarizer::{ExtractiveSummarizer, Summarizer};
use crate::model::ChatModel;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors returned by [`ChatSession::send`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("prompt is empty")]
    EmptyPrompt,
    #[error("model {model} failed: {message}")]
    Model { model: String, message: String },
}

/// Append a completed exchange to `history`.
pub fn fold_exchange(history: &mut Vec<Turn>, prompt: impl Into<String>, reply: impl Into<String>) {
    history.push(Turn::human(prompt));
    history.push(Turn::ai(reply));
}

/// A conversation with one model.
pub struct ChatSession<M, S = ExtractiveSummarizer> {
    model: M,
    strategy: HybridMemoryStrategy<S>,
    history: Vec<Turn>,
}

impl<M: ChatModel, S: Summarizer> ChatSession<M, S> {
    /// Start an empty session.
    pub fn new(model: M, strategy: HybridMemoryStrategy<S>) -> Self {
        Self {
            model,
            strategy,
            history: Vec::new(),
        }
    }

    /// Resume a session from stored history.
    pub fn with_history(mut self, history: Vec<Turn>) -> Self {
        self.history = history;
        self
    }

    /// The conversation so far, oldest first.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Take the history out of the session, e.g. to persist it.
    pub fn into_history(self) -> Vec<Turn> {
        self.history
    }

    pub fn strategy(&self) -> &HybridMemoryStrategy<S> {
        &self.strategy
    }

    /// Context that [`send`](Self::send) would submit for `prompt`.
    pub async fn preview(&self, prompt: &str) -> PreparedContext {
        self.strategy.prepare_context(&self.history, prompt).await
    }

    /// Send `prompt` and return the model's reply.
    ///
    /// The prompt is sent and stored exactly as given. The exchange is
    /// appended to the history only if the model call succeeds; on failure
    /// the history is unchanged and the prompt can be retried.
    pub async fn send(&mut self, prompt: &str) -> Result<String, ChatError> {
        if prompt.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }

        let context = self.preview(prompt).await;
        debug!(
            "Sending {} turn(s) (~{} tokens) to {}",
            context.len(),
            context.estimated_tokens,
            self.model.name()
        );

        let start = Instant::now();
        let reply = match self.model.complete(&context).await {
            Ok(reply) => reply,
            Err(message) => {
                warn!("Model {} failed: {message}", self.model.name());
                return Err(ChatError::Model {
                    model: self.model.name().to_string(),
                    message,
                });
            }
        };
        debug!(
            "Model {} replied with {} chars in {:.1}s",
            self.model.name(),
            reply.len(),
            start.elapsed().as_secs_f64()
        );

        fold_exchange(&mut self.history, prompt, reply.clone());
        Ok(reply)
    }
}
