//! LLM hint oracle over OpenAI and Anthropic.

use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
};
use codenames_core::{ChatMessage, CompletionRequest, HintOracle, OracleError, Role};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

const OPENAI_MODELS_URL: &str = "https://api.openai.com/v1/models";
const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_MODELS_URL: &str = "https://api.anthropic.com/v1/models";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI (GPT models).
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

impl LlmProvider {
    /// Environment variable holding this provider's API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// Configuration for LLM client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl LlmConfig {
    /// Creates a new LLM configuration.
    #[instrument(skip(api_key), fields(provider = ?provider, model = %model))]
    pub fn new(provider: LlmProvider, api_key: String, model: String, max_tokens: u32) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
        }
    }

    /// Gets the provider.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Gets the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Gets the default model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Gets the max tokens.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

/// Hint oracle backed by a hosted LLM.
///
/// The model named in each [`CompletionRequest`] wins over the configured
/// default, so a session can switch models without a new client.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Creates a new LLM client.
    #[instrument(skip(config), fields(provider = ?config.provider()))]
    pub fn new(config: LlmConfig) -> Self {
        info!("Creating LLM client");
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Lists the model identifiers available to the configured key.
    #[instrument(skip(self), fields(provider = ?self.config.provider))]
    pub async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        debug!("Listing models");
        let request = match self.config.provider {
            LlmProvider::OpenAI => self
                .http
                .get(OPENAI_MODELS_URL)
                .bearer_auth(&self.config.api_key),
            LlmProvider::Anthropic => self
                .http
                .get(ANTHROPIC_MODELS_URL)
                .header("x-api-key", self.config.api_key.clone())
                .header("anthropic-version", ANTHROPIC_VERSION),
        };

        let response = request.send().await.map_err(|e| {
            error!(error = ?e, "Model listing request failed");
            LlmError::new(format!("Model listing request failed: {}", e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            LlmError::new(format!("Failed to read model listing: {}", e))
        })?;
        if !status.is_success() {
            return Err(LlmError::new(format!(
                "Model listing error {}: {}",
                status, body
            )));
        }

        let mut models = parse_model_ids(&body)?;
        models.sort();
        info!(count = models.len(), "Listed models");
        Ok(models)
    }

    /// Generates a completion using Anthropic Claude.
    #[instrument(skip(self, messages), fields(messages = messages.len()))]
    async fn generate_anthropic(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, OracleError> {
        debug!("Building Anthropic API request");
        let (system, turns) = anthropic_turns(messages);
        let request_body = serde_json::json!({
            "model": model,
            "max_tokens": self.config.max_tokens,
            "system": system,
            "messages": turns,
        });

        debug!("Sending request to Anthropic");
        let response = self
            .http
            .post(ANTHROPIC_MESSAGES_URL)
            .header("x-api-key", self.config.api_key.clone())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Anthropic API request failed");
                OracleError::Transport(format!("Anthropic API request failed: {}", e))
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read Anthropic response");
            OracleError::Transport(format!("Failed to read response: {}", e))
        })?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            error!(status = %status, "Anthropic rejected credentials");
            return Err(OracleError::Auth(format!(
                "Anthropic API error {}: {}",
                status, response_text
            )));
        }
        if !status.is_success() {
            error!(status = %status, response = %response_text, "Anthropic API error");
            return Err(OracleError::Transport(format!(
                "Anthropic API error {}: {}",
                status, response_text
            )));
        }

        debug!(response_length = response_text.len(), "Parsing Anthropic response");
        let response_json: serde_json::Value =
            serde_json::from_str(&response_text).map_err(|e| {
                error!(error = ?e, response = %response_text, "Failed to parse Anthropic response");
                OracleError::Transport(format!("Failed to parse response: {}", e))
            })?;

        let content = response_json["content"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                error!(response = %response_json, "No text content in Anthropic response");
                OracleError::EmptyResponse("No text content in Anthropic response".to_string())
            })?
            .to_string();

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }

    /// Generates a completion using OpenAI.
    #[instrument(skip(self, messages), fields(messages = messages.len()))]
    async fn generate_openai(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, OracleError> {
        debug!("Creating OpenAI client");

        let client = OpenAIClient::with_config(
            OpenAIConfig::new().with_api_key(self.config.api_key.clone()),
        );

        debug!("Building chat completion request");
        let messages = messages
            .iter()
            .map(openai_message)
            .collect::<Result<Vec<_>, _>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .max_tokens(self.config.max_tokens)
            .build()
            .map_err(|e| {
                error!(error = ?e, "Failed to build request");
                OracleError::Transport(format!("Failed to build request: {}", e))
            })?;

        debug!("Sending request to OpenAI");
        let response = client.chat().create(request).await.map_err(|e| {
            error!(error = ?e, "OpenAI API error");
            classify_openai_error(e.to_string())
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                error!("No content in OpenAI response");
                OracleError::EmptyResponse("No content in OpenAI response".to_string())
            })?;

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }
}

#[async_trait::async_trait]
impl HintOracle for LlmClient {
    #[instrument(skip(self, request), fields(provider = ?self.config.provider, model = %request.model))]
    async fn request_completion(&self, request: &CompletionRequest) -> Result<String, OracleError> {
        let model = if request.model.is_empty() {
            self.config.model.as_str()
        } else {
            request.model.as_str()
        };
        debug!(messages = request.messages.len(), "Requesting hint completion");
        match self.config.provider {
            LlmProvider::OpenAI => self.generate_openai(model, &request.messages).await,
            LlmProvider::Anthropic => self.generate_anthropic(model, &request.messages).await,
        }
    }
}

fn openai_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage, OracleError> {
    let build_error = |e: async_openai::error::OpenAIError| {
        error!(error = ?e, role = %message.role, "Failed to build message");
        OracleError::Transport(format!("Failed to build {} message: {}", message.role, e))
    };
    let text = message.text.as_str();
    Ok(match message.role {
        Role::System => ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(text)
                .build()
                .map_err(build_error)?,
        ),
        Role::User => ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(text)
                .build()
                .map_err(build_error)?,
        ),
        Role::Assistant => ChatCompletionRequestMessage::Assistant(
            ChatCompletionRequestAssistantMessageArgs::default()
                .content(text)
                .build()
                .map_err(build_error)?,
        ),
    })
}

fn classify_openai_error(message: String) -> OracleError {
    let lowered = message.to_lowercase();
    if lowered.contains("api key") || lowered.contains("invalid_api_key") || lowered.contains("401")
    {
        OracleError::Auth(message)
    } else {
        OracleError::Transport(format!("OpenAI API error: {}", message))
    }
}

/// Splits a conversation into Anthropic's `system` string and message turns.
///
/// Anthropic takes system text separately and expects alternating roles, so
/// consecutive messages with the same role are joined.
pub(crate) fn anthropic_turns(messages: &[ChatMessage]) -> (String, Vec<serde_json::Value>) {
    let system = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut turns: Vec<(Role, String)> = Vec::new();
    for message in messages.iter().filter(|m| m.role != Role::System) {
        match turns.last_mut() {
            Some((role, text)) if *role == message.role => {
                text.push_str("\n\n");
                text.push_str(&message.text);
            }
            _ => turns.push((message.role, message.text.clone())),
        }
    }

    let turns = turns
        .into_iter()
        .map(|(role, content)| serde_json::json!({ "role": role.to_string(), "content": content }))
        .collect();
    (system, turns)
}

fn parse_model_ids(body: &str) -> Result<Vec<String>, LlmError> {
    #[derive(Deserialize)]
    struct ModelList {
        data: Vec<ModelEntry>,
    }
    #[derive(Deserialize)]
    struct ModelEntry {
        id: String,
    }

    let list: ModelList = serde_json::from_str(body)
        .map_err(|e| LlmError::new(format!("Failed to parse model listing: {}", e)))?;
    Ok(list.data.into_iter().map(|m| m.id).collect())
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "LLM error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
