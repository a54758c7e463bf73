//! Context window management for chat turns.
//!
//! The context window is the scarcest resource a chat client spends. This
//! module splits the hybrid memory policy into small, separately testable
//! pieces:
//!
//! 1. **[`tokens`]**: deterministic token estimates. Code is costed denser
//!    than prose.
//!
//! 2. **[`code`]**: heuristic classifier for code-bearing text (fences,
//!    inline spans, keyword rules).
//!
//! 3. **[`selector`]**: picks the turns worth keeping verbatim: all code
//!    turns plus the most recent prose turns.
//!
//! 4. **[`summarizer`]**: collapses older turns into one summary turn.
//!    Extractive by default, model-backed on request.
//!
//! 5. **[`trimmer`]**: newest-first greedy fit into the token budget.
//!
//! 6. **[`strategy`]**: [`HybridMemoryStrategy`] ties the pieces together
//!    into `prepare_context`.

pub mod code;
pub mod selector;
pub mod strategy;
pub mod summarizer;
pub mod tokens;
pub mod trimmer;

// Re-export commonly used items at the module level.
pub use code::{CodeSignal, contains_code, detect_code};
pub use selector::{ImportanceSelection, select_important};
pub use strategy::{ContextPlan, HybridMemoryStrategy, PreparedContext};
pub use summarizer::{ExtractiveSummarizer, ModelSummarizer, Summarizer, SummaryFuture};
pub use tokens::{ContextUsage, estimate_tokens, estimate_turns};
pub use trimmer::trim_to_token_limit;
