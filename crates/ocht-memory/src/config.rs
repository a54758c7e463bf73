//! Memory strategy configuration.
//!
//! [`MemoryConfig`] holds the three tunables that govern every policy
//! decision: the token budget, the size of the verbatim recency window, and
//! the history length above which older turns are summarized. A config is
//! validated on construction and immutable afterwards; the `with_*` builders
//! consume the config and re-validate.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Default token budget for a prepared context.
pub const DEFAULT_MAX_CONTEXT_TOKENS: usize = 4000;

/// Default number of most recent turns kept verbatim.
pub const DEFAULT_RECENT_MESSAGES_COUNT: usize = 10;

/// Default history length above which summarization kicks in.
pub const DEFAULT_SUMMARIZATION_THRESHOLD: usize = 20;

/// Environment variable overriding [`MemoryConfig::max_context_tokens`].
pub const ENV_MAX_CONTEXT_TOKENS: &str = "OCHT_MAX_CONTEXT_TOKENS";
/// Environment variable overriding [`MemoryConfig::recent_messages_count`].
pub const ENV_RECENT_MESSAGES: &str = "OCHT_RECENT_MESSAGES";
/// Environment variable overriding [`MemoryConfig::summarization_threshold`].
pub const ENV_SUMMARIZATION_THRESHOLD: &str = "OCHT_SUMMARIZATION_THRESHOLD";

/// Errors raised while building a [`MemoryConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },
    #[error("invalid value {value:?} for {var}: expected a positive integer")]
    InvalidEnv { var: &'static str, value: String },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for the hybrid memory strategy.
///
/// # Example
///
/// ```
/// use ocht_memory::config::MemoryConfig;
///
/// let config = MemoryConfig::default()
///     .with_max_context_tokens(8000)
///     .and_then(|c| c.with_recent_messages_count(6))
///     .expect("positive values");
/// assert_eq!(config.max_context_tokens(), 8000);
/// assert_eq!(config.recent_messages_count(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawMemoryConfig")]
pub struct MemoryConfig {
    max_context_tokens: usize,
    recent_messages_count: usize,
    summarization_threshold: usize,
}

/// Unvalidated shape of a config file. Missing keys take the defaults.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMemoryConfig {
    #[serde(default = "default_max_context_tokens")]
    max_context_tokens: usize,
    #[serde(default = "default_recent_messages_count")]
    recent_messages_count: usize,
    #[serde(default = "default_summarization_threshold")]
    summarization_threshold: usize,
}

fn default_max_context_tokens() -> usize {
    DEFAULT_MAX_CONTEXT_TOKENS
}
fn default_recent_messages_count() -> usize {
    DEFAULT_RECENT_MESSAGES_COUNT
}
fn default_summarization_threshold() -> usize {
    DEFAULT_SUMMARIZATION_THRESHOLD
}

impl TryFrom<RawMemoryConfig> for MemoryConfig {
    type Error = ConfigError;

    fn try_from(raw: RawMemoryConfig) -> Result<Self, Self::Error> {
        Self::new(
            raw.max_context_tokens,
            raw.recent_messages_count,
            raw.summarization_threshold,
        )
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_context_tokens: DEFAULT_MAX_CONTEXT_TOKENS,
            recent_messages_count: DEFAULT_RECENT_MESSAGES_COUNT,
            summarization_threshold: DEFAULT_SUMMARIZATION_THRESHOLD,
        }
    }
}

impl MemoryConfig {
    /// Build a validated config. Every value must be positive.
    pub fn new(
        max_context_tokens: usize,
        recent_messages_count: usize,
        summarization_threshold: usize,
    ) -> Result<Self, ConfigError> {
        positive("max_context_tokens", max_context_tokens)?;
        positive("recent_messages_count", recent_messages_count)?;
        positive("summarization_threshold", summarization_threshold)?;
        Ok(Self {
            max_context_tokens,
            recent_messages_count,
            summarization_threshold,
        })
    }

    /// Parse a JSON config document, e.g. `{"max_context_tokens": 2048}`.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Build a config from the `OCHT_*` environment variables, falling back
    /// to the defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from an arbitrary variable lookup. Used by
    /// [`from_env`](Self::from_env); handy for tests and for callers that keep
    /// settings in their own store.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |var: &'static str, default: usize| -> Result<usize, ConfigError> {
            match lookup(var) {
                None => Ok(default),
                Some(value) => value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidEnv { var, value }),
            }
        };
        Self::new(
            read(ENV_MAX_CONTEXT_TOKENS, DEFAULT_MAX_CONTEXT_TOKENS)?,
            read(ENV_RECENT_MESSAGES, DEFAULT_RECENT_MESSAGES_COUNT)?,
            read(ENV_SUMMARIZATION_THRESHOLD, DEFAULT_SUMMARIZATION_THRESHOLD)?,
        )
    }

    /// Replace the token budget.
    pub fn with_max_context_tokens(self, tokens: usize) -> Result<Self, ConfigError> {
        Self::new(
            tokens,
            self.recent_messages_count,
            self.summarization_threshold,
        )
    }

    /// Replace the verbatim recency window size.
    pub fn with_recent_messages_count(self, count: usize) -> Result<Self, ConfigError> {
        Self::new(self.max_context_tokens, count, self.summarization_threshold)
    }

    /// Replace the summarization threshold.
    pub fn with_summarization_threshold(self, threshold: usize) -> Result<Self, ConfigError> {
        Self::new(
            self.max_context_tokens,
            self.recent_messages_count,
            threshold,
        )
    }

    /// Token budget for a prepared context.
    pub fn max_context_tokens(&self) -> usize {
        self.max_context_tokens
    }

    /// Number of most recent turns kept verbatim.
    pub fn recent_messages_count(&self) -> usize {
        self.recent_messages_count
    }

    /// History length that must be exceeded before summarizing.
    pub fn summarization_threshold(&self) -> usize {
        self.summarization_threshold
    }
}

fn positive(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::NonPositive { field })
    } else {
        Ok(())
    }
}
