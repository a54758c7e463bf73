//! Convenience re-exports for common `ocht-memory` types.
//!
//! Meant to be glob-imported by chat frontends:
//!
//! ```
//! use ocht_memory::prelude::*;
//! ```
//!
//! This pulls in the turn types, the config, the strategy with its
//! summarizers, and the chat session. Building blocks used on their own
//! (the code detector, the trimmer, the status-log layer) stay in their
//! modules.

// ── Core types ──────────────────────────────────────────────────────
pub use crate::{Role, Turn};

// ── Configuration ───────────────────────────────────────────────────
pub use crate::config::{ConfigError, MemoryConfig};

// ── Context management ──────────────────────────────────────────────
pub use crate::context::{
    ContextPlan, ExtractiveSummarizer, HybridMemoryStrategy, ModelSummarizer, PreparedContext,
    Summarizer, SummaryFuture,
};

// ── Chat ────────────────────────────────────────────────────────────
pub use crate::chat::{ChatError, ChatSession, fold_exchange};
pub use crate::model::{ChatModel, ModelFuture};
pub use crate::normalize::{NormalizeError, normalize_history, normalize_message};
