//! Spymaster configuration loaded from TOML.

use crate::llm_client::{LlmConfig, LlmProvider};
use codenames_core::{DEFAULT_INSTRUCTION, DEFAULT_PROMPT, PromptTemplate, SpymasterSettings};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration for a spymaster game.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct SpymasterConfig {
    /// LLM provider (openai or anthropic).
    #[serde(default = "default_provider")]
    llm_provider: LlmProvider,

    /// LLM model name (e.g., "gpt-4o-mini", "claude-3-5-haiku-20241022").
    #[serde(default = "default_model")]
    llm_model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// Language code of the board word list.
    #[serde(default = "default_language")]
    language: String,

    /// Directory of `<language>.txt` word lists, overriding the built-ins.
    #[serde(default)]
    words_dir: Option<PathBuf>,

    /// Board side length.
    #[serde(default = "default_side_length")]
    side_length: usize,

    /// Fixed board seed. A fresh seed is drawn per game when absent.
    #[serde(default)]
    seed: Option<u64>,

    /// Send the whole log to the oracle instead of the latest prompt only.
    #[serde(default = "default_use_full_history")]
    use_full_history: bool,

    /// Prompt template with `{SLF}`, `{OPP}`, `{NTR}` and `{KLL}`.
    #[serde(default = "default_prompt_template")]
    prompt_template: String,

    /// System instruction for the spymaster.
    #[serde(default = "default_instruction")]
    instruction: String,

    /// Retries after a failed hint attempt.
    #[serde(default = "default_retry_budget")]
    retry_budget: u32,

    /// Limit for a single oracle call, in seconds.
    #[serde(default = "default_oracle_timeout_secs")]
    oracle_timeout_secs: u64,
}

fn default_provider() -> LlmProvider {
    LlmProvider::OpenAI
}

fn default_model() -> String {
    "gpt-3.5-turbo-0125".to_string()
}

fn default_max_tokens() -> u32 {
    50
}

fn default_language() -> String {
    "en".to_string()
}

fn default_side_length() -> usize {
    5
}

fn default_use_full_history() -> bool {
    true
}

fn default_prompt_template() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_instruction() -> String {
    DEFAULT_INSTRUCTION.to_string()
}

fn default_retry_budget() -> u32 {
    codenames_core::DEFAULT_RETRY_BUDGET
}

fn default_oracle_timeout_secs() -> u64 {
    codenames_core::DEFAULT_ORACLE_TIMEOUT.as_secs()
}

impl Default for SpymasterConfig {
    fn default() -> Self {
        Self {
            llm_provider: default_provider(),
            llm_model: default_model(),
            llm_max_tokens: default_max_tokens(),
            language: default_language(),
            words_dir: None,
            side_length: default_side_length(),
            seed: None,
            use_full_history: default_use_full_history(),
            prompt_template: default_prompt_template(),
            instruction: default_instruction(),
            retry_budget: default_retry_budget(),
            oracle_timeout_secs: default_oracle_timeout_secs(),
        }
    }
}

impl SpymasterConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text and validates it.
    #[instrument(skip(content), fields(len = content.len()))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        info!(model = %config.llm_model, language = %config.language, "Config loaded successfully");
        Ok(config)
    }

    /// Checks the prompt template and board size.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        PromptTemplate::new(self.prompt_template.as_str())
            .validate()
            .map_err(|e| ConfigError::new(format!("Invalid prompt template: {}", e)))?;
        if self.side_length < codenames_core::MIN_SIDE_LENGTH {
            return Err(ConfigError::new(format!(
                "side_length {} is below the minimum of {}",
                self.side_length,
                codenames_core::MIN_SIDE_LENGTH
            )));
        }
        Ok(())
    }

    /// Builds the core spymaster settings.
    #[instrument(skip(self))]
    pub fn spymaster_settings(&self) -> SpymasterSettings {
        SpymasterSettings::new(
            PromptTemplate::new(self.prompt_template.as_str()),
            self.instruction.as_str(),
            self.use_full_history,
            self.retry_budget,
            Duration::from_secs(self.oracle_timeout_secs),
        )
    }

    /// Creates LLM configuration from this config.
    /// Requires OPENAI_API_KEY or ANTHROPIC_API_KEY, read after loading `.env`.
    #[instrument(skip(self), fields(provider = ?self.llm_provider, model = %self.llm_model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");
        dotenvy::dotenv().ok();

        let var = self.llm_provider.api_key_var();
        let api_key = std::env::var(var)
            .map_err(|_| ConfigError::new(format!("{} environment variable not set", var)))?;

        Ok(LlmConfig::new(
            self.llm_provider,
            api_key,
            self.llm_model.clone(),
            self.llm_max_tokens,
        ))
    }

    /// Overrides the seed, e.g. for a restart with a fresh board.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
