//! Normalization of provider-native messages into [`Turn`]s.
//!
//! Chat histories arrive in several shapes: OpenAI-style
//! `{"role": "user", "content": "..."}`, content given as an array of typed
//! parts, or LangChain-style `{"type": "human", "data": {"content": "..."}}`.
//! The memory strategy only understands `(role, content)` pairs, so messages
//! are normalized here, at the boundary, before they reach it.

use crate::{Role, Turn};
use serde_json::Value;
use thiserror::Error;

/// Why a message could not be normalized.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("message {index}: not a JSON object")]
    NotAnObject { index: usize },
    #[error("message {index}: missing role")]
    MissingRole { index: usize },
    #[error("message {index}: missing text content")]
    MissingContent { index: usize },
}

/// Map a provider role name onto a [`Role`].
///
/// Unrecognized roles (tool, function, developer, ...) become
/// [`Role::System`]: they are neither the user nor the assistant.
pub fn parse_role(name: &str) -> Role {
    match name.trim().to_ascii_lowercase().as_str() {
        "user" | "human" => Role::Human,
        "assistant" | "ai" | "model" | "bot" => Role::Ai,
        _ => Role::System,
    }
}

/// Normalize a single provider message.
pub fn normalize_message(message: &Value) -> Result<Turn, NormalizeError> {
    normalize_at(0, message)
}

/// Normalize a whole history. Fails on the first malformed message, whose
/// index is reported in the error.
pub fn normalize_history(messages: &[Value]) -> Result<Vec<Turn>, NormalizeError> {
    messages
        .iter()
        .enumerate()
        .map(|(index, message)| normalize_at(index, message))
        .collect()
}

fn normalize_at(index: usize, message: &Value) -> Result<Turn, NormalizeError> {
    let obj = message
        .as_object()
        .ok_or(NormalizeError::NotAnObject { index })?;

    let role = obj
        .get("role")
        .or_else(|| obj.get("type"))
        .and_then(Value::as_str)
        .ok_or(NormalizeError::MissingRole { index })?;

    let content = obj
        .get("content")
        .or_else(|| obj.get("data").and_then(|d| d.get("content")))
        .and_then(content_text)
        .ok_or(NormalizeError::MissingContent { index })?;

    Ok(Turn::new(parse_role(role), content))
}

/// Extract text from a string or from an array of content parts.
fn content_text(content: &Value) -> Option<String> {
    match content {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => {
            let texts: Vec<&str> = parts
                .iter()
                .filter_map(|part| match part {
                    Value::String(s) => Some(s.as_str()),
                    Value::Object(o) => o.get("text").and_then(Value::as_str),
                    _ => None,
                })
                .collect();
            if texts.is_empty() {
                None
            } else {
                Some(texts.join("\n"))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn openai_roles() {
        let history = normalize_history(&[
            json!({"role": "system", "content": "be brief"}),
            json!({"role": "user", "content": "hi"}),
            json!({"role": "assistant", "content": "hello"}),
        ])
        .unwrap();
        assert_eq!(
            history,
            vec![Turn::system("be brief"), Turn::human("hi"), Turn::ai("hello")]
        );
    }

    #[test]
    fn unknown_roles_become_system() {
        let turn = normalize_message(&json!({"role": "tool", "content": "42"})).unwrap();
        assert_eq!(turn.role, Role::System);
        assert_eq!(parse_role("Developer"), Role::System);
        assert_eq!(parse_role(" Human "), Role::Human);
        assert_eq!(parse_role("model"), Role::Ai);
    }

    #[test]
    fn langchain_shape() {
        let turn =
            normalize_message(&json!({"type": "ai", "data": {"content": "```py\nx = 1\n```"}}))
                .unwrap();
        assert_eq!(turn, Turn::ai("```py\nx = 1\n```"));
    }

    #[test]
    fn content_parts_are_joined() {
        let turn = normalize_message(&json!({
            "role": "user",
            "content": [
                {"type": "text", "text": "look at this"},
                {"type": "image_url", "image_url": {"url": "http://x"}},
                {"type": "text", "text": "`main.rs`"}
            ]
        }))
        .unwrap();
        assert_eq!(turn.content, "look at this\n`main.rs`");
    }

    #[test]
    fn malformed_messages_rejected_with_index() {
        let err = normalize_history(&[
            json!({"role": "user", "content": "ok"}),
            json!({"content": "no role"}),
        ])
        .unwrap_err();
        assert_eq!(err, NormalizeError::MissingRole { index: 1 });

        assert_eq!(
            normalize_message(&json!({"role": "user"})),
            Err(NormalizeError::MissingContent { index: 0 })
        );
        assert_eq!(
            normalize_message(&json!({"role": "user", "content": [{"type": "image_url"}]})),
            Err(NormalizeError::MissingContent { index: 0 })
        );
        assert_eq!(
            normalize_message(&json!("just text")),
            Err(NormalizeError::NotAnObject { index: 0 })
        );
    }
}
