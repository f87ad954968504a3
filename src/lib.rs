//! Codenames Spymaster - an LLM gives the hints
//!
//! This library wires the pure game logic of [`codenames_core`] to hosted
//! language models and to the configuration a board UI needs.
//!
//! # Architecture
//!
//! - **Core**: board generation, hint parsing and the turn state machine (re-exported)
//! - **LLM client**: OpenAI and Anthropic implementations of [`HintOracle`]
//! - **Config**: TOML settings plus API keys from the environment
//! - **Words**: built-in and on-disk language word lists
//! - **Session**: one board plus one spymaster, driven by card index
//!
//! # Example
//!
//! ```no_run
//! use codenames_spymaster::{GameSession, LlmClient, SpymasterConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = SpymasterConfig::from_file("spymaster.toml")?;
//! let oracle = Arc::new(LlmClient::new(config.create_llm_config()?));
//! let mut session = GameSession::from_config("game-1".to_string(), &config, oracle)?;
//!
//! let (hint, status) = session.play().await?;
//! session.guess(7)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod llm_client;
mod session;
mod words;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

// Crate-level exports - Configuration
pub use config::{ConfigError, SpymasterConfig};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Session management
pub use session::{Card, GameSession, SessionError, SessionId};

// Crate-level exports - Word lists
pub use words::{WordList, WordListError, available_languages};

// Crate-level exports - Core game types
pub use codenames_core::{
    Board, ChatMessage, CompletionRequest, GameStatus, Hint, HintGenerationError, HintOracle,
    MembershipError, OracleError, PromptTemplate, Relation, ScriptedOracle, Side, Spymaster,
    SpymasterSettings, Team, generate_board, parse_hint,
};

/// Installs a global `tracing` subscriber for embedding applications.
///
/// Honours `RUST_LOG`, defaulting to debug output for this crate and the core.
/// Does nothing if a subscriber is already installed.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,codenames_spymaster=debug,codenames_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
