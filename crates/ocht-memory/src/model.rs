//! Model provider seam.
//!
//! A [`ChatModel`] takes an ordered list of turns and returns the model's
//! text reply. Transport (HTTP, local inference, a test script) lives in the
//! implementor; this crate only prepares what gets sent.

use crate::Turn;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by [`ChatModel::complete`].
pub type ModelFuture<'a> = Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>>;

/// A chat model the session can send prepared context to.
///
/// # Example
///
/// ```
/// use ocht_memory::Turn;
/// use ocht_memory::model::{ChatModel, ModelFuture};
///
/// struct Echo;
///
/// impl ChatModel for Echo {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     fn complete<'a>(&'a self, turns: &'a [Turn]) -> ModelFuture<'a> {
///         Box::pin(async move {
///             turns
///                 .last()
///                 .map(|t| t.content.clone())
///                 .ok_or_else(|| "no turns".to_string())
///         })
///     }
/// }
/// ```
pub trait ChatModel: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Send `turns` to the model and return its reply text.
    fn complete<'a>(&'a self, turns: &'a [Turn]) -> ModelFuture<'a>;
}

impl<M: ChatModel + ?Sized> ChatModel for Arc<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn complete<'a>(&'a self, turns: &'a [Turn]) -> ModelFuture<'a> {
        (**self).complete(turns)
    }
}

impl<M: ChatModel + ?Sized> ChatModel for &M {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn complete<'a>(&'a self, turns: &'a [Turn]) -> ModelFuture<'a> {
        (**self).complete(turns)
    }
}
