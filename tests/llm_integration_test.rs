//! Integration test for LLM oracle connectivity.

use codenames_spymaster::{
    ChatMessage, CompletionRequest, HintOracle, LlmClient, LlmConfig, LlmProvider, parse_hint,
};
use codenames_core::MessageKind;

fn hint_request(model: &str) -> CompletionRequest {
    CompletionRequest::new(
        model.to_string(),
        vec![
            ChatMessage::new(
                MessageKind::Instruction,
                codenames_core::DEFAULT_INSTRUCTION,
            ),
            ChatMessage::new(
                MessageKind::Prompt,
                "Your words to guess are: OCEAN, WAVE.\nYour opponent's words to avoid are: FIRE.\n\
                 The neutral words to avoid are: TABLE.\nThe forbidden word to really avoid is: SHARK.\n\nGive a hint.",
            ),
        ],
    )
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_anthropic_hint() {
    dotenvy::dotenv().ok();

    let api_key = std::env::var("ANTHROPIC_API_KEY").expect("ANTHROPIC_API_KEY not set");
    let model = "claude-3-5-haiku-20241022";
    let client = LlmClient::new(LlmConfig::new(
        LlmProvider::Anthropic,
        api_key,
        model.to_string(),
        50,
    ));

    let reply = client
        .request_completion(&hint_request(model))
        .await
        .expect("Failed to generate");
    eprintln!("Reply: {}", reply);
    assert!(parse_hint(&reply).is_ok(), "Reply should parse as a hint");
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_openai_hint_and_models() {
    dotenvy::dotenv().ok();

    let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");
    let model = "gpt-4o-mini";
    let client = LlmClient::new(LlmConfig::new(
        LlmProvider::OpenAI,
        api_key,
        model.to_string(),
        50,
    ));

    let models = client.list_models().await.expect("Failed to list models");
    assert!(models.iter().any(|m| m == model));

    let reply = client
        .request_completion(&hint_request(model))
        .await
        .expect("Failed to generate");
    eprintln!("Reply: {}", reply);
    assert!(parse_hint(&reply).is_ok(), "Reply should parse as a hint");
}
