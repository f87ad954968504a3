//! Tests for configuration loading.

use codenames_spymaster::{LlmProvider, SpymasterConfig};
use std::io::Write;
use std::time::Duration;

#[test]
fn test_defaults_from_empty_file() {
    let config = SpymasterConfig::from_toml("").expect("config");
    assert_eq!(*config.llm_provider(), LlmProvider::OpenAI);
    assert_eq!(config.llm_model(), "gpt-3.5-turbo-0125");
    assert_eq!(config.language(), "en");
    assert_eq!(*config.side_length(), 5);
    assert_eq!(*config.seed(), None);
    assert!(*config.use_full_history());
    assert_eq!(*config.retry_budget(), 2);

    let settings = config.spymaster_settings();
    assert_eq!(*settings.oracle_timeout(), Duration::from_secs(30));
    assert_eq!(settings.prompt().as_str(), codenames_spymaster::PromptTemplate::default().as_str());
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
llm_provider = "anthropic"
llm_model = "claude-3-5-haiku-20241022"
language = "fr"
side_length = 6
seed = 99
oracle_timeout_secs = 5
"#
    )
    .expect("write");

    let config = SpymasterConfig::from_file(file.path()).expect("config");
    assert_eq!(*config.llm_provider(), LlmProvider::Anthropic);
    assert_eq!(config.language(), "fr");
    assert_eq!(*config.side_length(), 6);
    assert_eq!(*config.seed(), Some(99));
    assert_eq!(
        *config.spymaster_settings().oracle_timeout(),
        Duration::from_secs(5)
    );
}

#[test]
fn test_invalid_template_rejected() {
    let err = SpymasterConfig::from_toml(r#"prompt_template = "Guess {SELF}""#).unwrap_err();
    assert!(err.message.contains("Invalid prompt template"));
}

#[test]
fn test_small_board_rejected() {
    let err = SpymasterConfig::from_toml("side_length = 3").unwrap_err();
    assert!(err.message.contains("side_length"));
}

#[test]
fn test_missing_file() {
    let err = SpymasterConfig::from_file("/definitely/not/here.toml").unwrap_err();
    assert!(err.message.contains("Failed to read config file"));
}

#[test]
fn test_malformed_toml() {
    assert!(SpymasterConfig::from_toml("side_length = \"five\"").is_err());
}
