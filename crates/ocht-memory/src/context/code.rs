//! Heuristic detection of code-bearing text.
//!
//! Code turns carry high-value, low-redundancy information (the snippet the
//! user is iterating on), so the memory strategy keeps them verbatim. This is
//! a classifier, not a parser: it looks for markdown code markup and for a
//! fixed list of line-level keyword rules.

use regex::Regex;
use std::sync::LazyLock;

/// Markdown fence delimiter.
const FENCE: &str = "```";

/// Why a text was classified as code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSignal {
    /// Triple-backtick fenced block.
    FencedBlock,
    /// Single-backtick inline span.
    InlineSpan,
    /// A line matched the named keyword rule.
    Keyword(&'static str),
}

/// Non-empty single-line span between backticks.
static INLINE_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`\n]+`").expect("inline span pattern"));

/// Keyword rules, checked in order. Every rule is anchored to a line start
/// (definitions also to a `: ` or `; ` clause break) or requires trailing
/// syntax, so ordinary sentences that merely mention a keyword do not match.
const KEYWORD_RULES: &[(&str, &str)] = &[
    ("def", r"(?m)(?:^|[:;]\s)\s*(?:async\s+)?def\s+\w+\s*\("),
    (
        "class",
        r"(?m)(?:^|[:;]\s)\s*(?:export\s+)?class\s+[A-Za-z_]\w*(?:\s*[(:{]|\s+extends\s)",
    ),
    // Module list with optional aliases and a trailing comment, or an ES import.
    (
        "import",
        r#"(?m)^\s*import\s+(?:[\w.]+(?:\s+as\s+\w+)?(?:\s*,\s*[\w.]+(?:\s+as\s+\w+)?)*;?\s*(?:(?:#|//).*)?$|\{|\*|\w+\s+from\s+['"])"#,
    ),
    ("from-import", r"(?m)^\s*from\s+[\w.]+\s+import\s+[\w*(]"),
    (
        "binding",
        r"(?m)^\s*(?:export\s+)?(?:const|let|var)\s+(?:mut\s+)?[A-Za-z_$][\w$]*\s*(?::[^=\n]+)?=",
    ),
    (
        "function",
        r"\bfunction(?:\s+[A-Za-z_$][\w$]*)?\s*\([^)\n]*\)\s*\{",
    ),
    (
        "fn",
        r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?(?:async\s+)?fn\s+\w+\s*[<(]",
    ),
    (
        "struct",
        r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?struct\s+[A-Z]\w*\s*(?:<[^>\n]*>\s*)?[{(;]",
    ),
    (
        "enum",
        r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?enum\s+[A-Z]\w*\s*(?:<[^>\n]*>\s*)?\{",
    ),
    ("impl", r"(?m)^\s*impl(?:<[^>\n]*>)?\s+[\w:<>, ]+\{"),
    ("include", r#"(?m)^\s*#include\s*[<"]"#),
    (
        "access-modifier",
        r"(?m)^\s*(?:public|private|protected)\s+(?:static\s+)?(?:class|void|int|String|final)\b",
    ),
    ("sql", r"(?m)^\s*SELECT\s+.+\s+FROM\s+\w+"),
];

static KEYWORD_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    KEYWORD_RULES
        .iter()
        .map(|(name, pattern)| (*name, Regex::new(pattern).expect("keyword rule pattern")))
        .collect()
});

/// Return the first signal that marks `text` as code, if any.
///
/// Fences are checked first, then inline spans, then keyword rules in
/// declaration order.
pub fn detect_code(text: &str) -> Option<CodeSignal> {
    if text.contains(FENCE) {
        return Some(CodeSignal::FencedBlock);
    }
    if INLINE_SPAN_RE.is_match(text) {
        return Some(CodeSignal::InlineSpan);
    }
    KEYWORD_RES
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(name, _)| CodeSignal::Keyword(*name))
}

/// True if `text` likely contains source code.
pub fn contains_code(text: &str) -> bool {
    detect_code(text).is_some()
}
