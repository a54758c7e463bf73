//! End-to-end behavior of the hybrid memory strategy through the public API.

use ocht_memory::context::{contains_code, estimate_turns, select_important, trim_to_token_limit};
use ocht_memory::prelude::*;
use proptest::prelude::*;

fn strategy(max: usize, recent: usize, threshold: usize) -> HybridMemoryStrategy {
    HybridMemoryStrategy::new(MemoryConfig::new(max, recent, threshold).unwrap())
}

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(f)
}

#[tokio::test]
async fn empty_history_returns_single_prompt() {
    let s = strategy(1000, 5, 10);
    let result = s.prepare_context(&[], "Hello, how are you?").await;
    assert_eq!(result.into_turns(), vec![Turn::human("Hello, how are you?")]);
}

#[tokio::test]
async fn trimming_example_from_small_budget() {
    let s = strategy(100, 5, 10);
    let history = vec![
        Turn::human("x".repeat(200)),
        Turn::ai("y".repeat(200)),
        Turn::human("z".repeat(200)),
        Turn::ai("w".repeat(200)),
    ];
    let result = s.prepare_context(&history, "final prompt").await;

    assert_eq!(result.last(), Some(&Turn::human("final prompt")));
    assert!(result.len() < 5);
    assert!(estimate_turns(&result) <= 100);
}

#[test]
fn threshold_examples() {
    let s = strategy(1000, 5, 10);
    let few: Vec<Turn> = (0..5).map(|i| Turn::human(format!("Message {i}"))).collect();
    let many: Vec<Turn> = (0..15).map(|i| Turn::human(format!("Message {i}"))).collect();
    assert!(!s.should_summarize(&few));
    assert!(s.should_summarize(&many));
}

#[tokio::test]
async fn code_survives_a_long_conversation() {
    let s = strategy(4000, 4, 8);
    let mut history = vec![
        Turn::human("Can you write a helper?"),
        Turn::ai("```rust\nfn add(a: i32, b: i32) -> i32 { a + b }\n```"),
    ];
    for i in 0..20 {
        history.push(Turn::human(format!("Small talk number {i}")));
    }

    let result = s.prepare_context(&history, "Now make it generic").await;
    assert!(result.iter().any(|t| t.content.contains("fn add")));
    assert!(!result.iter().any(|t| t.content == "Small talk number 0"));
    assert_eq!(result[0].role, Role::System);
    assert_eq!(result.last(), Some(&Turn::human("Now make it generic")));
}

#[tokio::test]
async fn normalized_provider_history_feeds_the_strategy() {
    let raw = serde_json::json!([
        {"role": "system", "content": "You are helpful."},
        {"role": "user", "content": "hi"},
        {"role": "assistant", "content": "hello"},
        {"role": "tool", "content": "{\"ok\": true}"}
    ]);
    let history = normalize_history(raw.as_array().unwrap()).unwrap();
    let result = strategy(1000, 5, 10).prepare_context(&history, "next").await;

    assert_eq!(result.len(), 5);
    assert_eq!(result[3].role, Role::System);
}

fn arb_turn() -> impl Strategy<Value = Turn> {
    let content = prop_oneof![
        "[a-z ]{0,120}",
        "[a-z]{1,10}".prop_map(|w| format!("```\n{w}\n```")),
        "[a-z]{1,10}".prop_map(|w| format!("use `{w}` here")),
        "[a-z]{1,10}".prop_map(|w| format!("def {w}():")),
    ];
    (0..3u8, content).prop_map(|(r, c)| match r {
        0 => Turn::human(c),
        1 => Turn::ai(c),
        _ => Turn::system(c),
    })
}

proptest! {
    #[test]
    fn should_summarize_is_strict_threshold(len in 0usize..40, threshold in 1usize..30) {
        let s = strategy(1000, 5, threshold);
        let history: Vec<Turn> = (0..len).map(|i| Turn::ai(format!("m{i}"))).collect();
        prop_assert_eq!(s.should_summarize(&history), len > threshold);
    }

    #[test]
    fn prepared_context_ends_with_prompt(
        history in proptest::collection::vec(arb_turn(), 0..30),
        prompt in "[a-zA-Z ?]{0,80}",
        max in 1usize..400,
        recent in 1usize..8,
        threshold in 1usize..15,
    ) {
        let s = strategy(max, recent, threshold);
        let result = block_on(s.prepare_context(&history, &prompt));
        prop_assert_eq!(result.last(), Some(&Turn::human(prompt.clone())));
        prop_assert!(result.estimated_tokens <= max || result.len() == 1);

        let again = block_on(s.prepare_context(&history, &prompt));
        prop_assert_eq!(result, again);
    }

    #[test]
    fn trimmer_within_budget_or_single(
        turns in proptest::collection::vec(arb_turn(), 1..30),
        max in 1usize..300,
    ) {
        let trimmed = trim_to_token_limit(&turns, max);
        prop_assert!(estimate_turns(&trimmed) <= max || trimmed.len() == 1);
        prop_assert_eq!(trimmed.last(), turns.last());
        // Retained turns are a suffix of the input.
        prop_assert_eq!(&turns[turns.len() - trimmed.len()..], &trimmed[..]);
    }

    #[test]
    fn selector_keeps_code_and_drops_old_prose(
        history in proptest::collection::vec(arb_turn(), 0..30),
        recent in 1usize..6,
    ) {
        let selection = select_important(&history, recent);
        let prose: Vec<usize> = (0..history.len())
            .filter(|&i| !contains_code(&history[i].content))
            .collect();

        for (i, turn) in history.iter().enumerate() {
            if contains_code(&turn.content) {
                prop_assert!(selection.contains(i));
            }
        }
        let cutoff = prose.len().saturating_sub(recent);
        for &i in &prose[..cutoff] {
            prop_assert!(!selection.contains(i));
        }
        let indices = selection.indices();
        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }
}
