//! End-to-end conversation over the math tool host.

mod common;

use common::{ScriptedModel, final_text, math_host, tool_call};
use mcp_llm_bridge::{Bridge, BridgeConfig, MAX_ROUNDS_MESSAGE, MessageRole};
use serde_json::json;

#[tokio::test]
async fn sequential_calculations_compose_across_rounds() {
    let (_registry, host) = math_host();
    let model = ScriptedModel::new(vec![
        tool_call("add", json!({ "numbers": [3, 5] })),
        tool_call("multiply", json!({ "numbers": [8, 4] })),
        final_text("(3 + 5) * 4 = 32"),
    ]);
    let bridge = Bridge::new(model, host);

    let outcome = bridge
        .run_conversation("Compute (3 + 5) * 4 using available tools and explain briefly.")
        .await
        .expect("conversation succeeds");

    assert_eq!(outcome.final_response, "(3 + 5) * 4 = 32");
    assert_eq!(outcome.tool_calls_made, 2);
    assert_eq!(outcome.rounds, 3);

    let transcript: Vec<&str> = outcome
        .messages
        .iter()
        .map(|msg| msg.content.as_str())
        .collect();
    assert!(transcript.contains(&"TOOL RESULT (add): 8.0"));
    assert!(transcript.contains(&"TOOL RESULT (multiply): 32.0"));
    assert_eq!(outcome.messages[0].role, MessageRole::System);
    assert_eq!(
        outcome.messages.last().map(|msg| msg.role),
        Some(MessageRole::Assistant)
    );
}

#[tokio::test]
async fn handler_validation_errors_feed_back_as_tool_errors() {
    let (_registry, host) = math_host();
    let model = ScriptedModel::new(vec![
        tool_call("add", json!({ "numbers": [] })),
        final_text("I cannot add an empty list."),
    ]);
    let bridge = Bridge::new(model, host);

    let outcome = bridge
        .run_conversation("Add nothing.")
        .await
        .expect("conversation succeeds");

    assert!(
        outcome
            .messages
            .iter()
            .any(|msg| msg.content == "TOOL ERROR (add): Cannot add an empty list of numbers")
    );
    assert_eq!(outcome.final_response, "I cannot add an empty list.");
}

#[tokio::test]
async fn looping_model_hits_the_round_budget() {
    let (_registry, host) = math_host();
    let model = ScriptedModel::new(vec![tool_call("add", json!({ "numbers": [1, 1] }))]);
    let bridge = Bridge::with_config(
        model,
        host,
        BridgeConfig {
            max_rounds: 3,
            ..BridgeConfig::default()
        },
    );

    let outcome = bridge
        .run_conversation("Never stop adding.")
        .await
        .expect("conversation succeeds");

    assert_eq!(outcome.final_response, MAX_ROUNDS_MESSAGE);
    assert_eq!(outcome.rounds, 3);
    assert_eq!(outcome.tool_calls_made, 3);
}
