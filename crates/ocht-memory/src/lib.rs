//! Hybrid conversation memory for terminal LLM chat clients.
//!
//! `ocht-memory` decides what part of a chat history is sent to the model on
//! each turn. The core abstraction is the
//! [`HybridMemoryStrategy`](context::strategy::HybridMemoryStrategy): given the
//! stored history and a new prompt it keeps recent turns verbatim, keeps
//! code-bearing turns wherever they are, collapses everything else into a
//! single summary turn and trims the result to a token budget.
//!
//! # Getting started
//!
//! ```
//! use ocht_memory::prelude::*;
//!
//! # tokio_test_block_on(async {
//! let config = MemoryConfig::new(4000, 10, 20).expect("valid config");
//! let strategy = HybridMemoryStrategy::new(config);
//!
//! let history = vec![
//!     Turn::human("What is Python?"),
//!     Turn::ai("Python is a programming language."),
//! ];
//! let context = strategy.prepare_context(&history, "Show me an example.").await;
//! assert_eq!(context.last(), Some(&Turn::human("Show me an example.")));
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```
//!
//! # Where to find things
//!
//! - **Budget the context window:** [`context::tokens`] estimates token cost,
//!   [`context::trimmer`] enforces the budget.
//! - **Decide what is important:** [`context::code`] classifies code-bearing
//!   text, [`context::selector`] picks the turns worth keeping verbatim.
//! - **Summarize old turns:** implement [`Summarizer`](context::summarizer::Summarizer)
//!   or use the built-in extractive and model-backed summarizers.
//! - **Talk to a model:** implement [`ChatModel`](model::ChatModel) and drive
//!   it with a [`ChatSession`](chat::ChatSession).
//! - **Accept provider messages:** [`normalize`] converts provider-native JSON
//!   messages into [`Turn`]s.
//! - **Show engine decisions in a UI:** [`logging::StatusLogLayer`].
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | [`MemoryConfig`](config::MemoryConfig) and its validation |
//! | [`context`] | Token estimation, code detection, selection, summarization, trimming, the strategy |
//! | [`model`] | [`ChatModel`](model::ChatModel) seam for model providers |
//! | [`chat`] | [`ChatSession`](chat::ChatSession) orchestration |
//! | [`normalize`] | Provider message normalization |
//! | [`logging`] | Tracing layer for a status pane |

pub mod chat;
pub mod config;
pub mod context;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod prelude;

use serde::{Deserialize, Serialize};

// ── Turn types ─────────────────────────────────────────────────────

/// Who authored a turn.
///
/// Provider roles that are neither human nor AI (tool output, developer
/// instructions, ...) are folded into [`Role::System`] at the boundary.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Ai,
    System,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Human => "human",
            Role::Ai => "ai",
            Role::System => "system",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role-tagged message in a conversation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::new(Role::Human, content)
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::new(Role::Ai, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Borrow the turn as a `(role, content)` pair.
    pub fn as_pair(&self) -> (Role, &str) {
        (self.role, &self.content)
    }
}

impl<S: Into<String>> From<(Role, S)> for Turn {
    fn from((role, content): (Role, S)) -> Self {
        Self::new(role, content)
    }
}

impl From<Turn> for (Role, String) {
    fn from(turn: Turn) -> Self {
        (turn.role, turn.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_constructors() {
        let human = Turn::human("hello");
        assert_eq!(human.role, Role::Human);
        assert_eq!(human.content, "hello");

        assert_eq!(Turn::ai("hi").role, Role::Ai);
        assert_eq!(Turn::system("rules").role, Role::System);
    }

    #[test]
    fn turn_pair_conversions() {
        let turn: Turn = (Role::Ai, "answer").into();
        assert_eq!(turn, Turn::ai("answer"));
        assert_eq!(turn.as_pair(), (Role::Ai, "answer"));

        let (role, content): (Role, String) = turn.into();
        assert_eq!(role, Role::Ai);
        assert_eq!(content, "answer");
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_value(Turn::human("x")).unwrap();
        assert_eq!(json["role"], "human");
        assert_eq!(serde_json::to_value(Role::Ai).unwrap(), "ai");
        assert_eq!(Role::System.to_string(), "system");
    }

    #[test]
    fn turn_round_trips_through_json() {
        let turn: Turn =
            serde_json::from_str(r#"{"role":"ai","content":"```rust\nfn main() {}\n```"}"#)
                .unwrap();
        assert_eq!(turn.role, Role::Ai);
        assert!(turn.content.starts_with("```rust"));
    }
}
