//! Codenames spymaster core - pure game logic
//!
//! # Architecture
//!
//! - **Board**: seeded, reproducible word/team assignment
//! - **Hint**: parsing of `WORD - NUMBER` oracle replies
//! - **Prompt**: placeholder templates rendered from the live pools
//! - **Conversation**: per-team oracle logs
//! - **Oracle**: the seam to whatever produces hint text
//! - **Spymaster**: the turn state machine driving all of the above
//!
//! # Example
//!
//! ```no_run
//! use codenames_core::{ScriptedOracle, Spymaster, generate_board};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let words: Vec<String> = (0..40).map(|i| format!("WORD{i}")).collect();
//! let board = generate_board(&words, 5, 42)?;
//! let oracle = Arc::new(ScriptedOracle::new(["OCEAN - 2"]));
//! let mut spymaster = Spymaster::new(&board, "gpt-4o-mini", oracle);
//! let (text, status) = spymaster.play().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod conversation;
mod hint;
mod oracle;
mod prompt;
mod settings;
mod spymaster;
mod team;

pub use board::{
    Board, BoardError, KILLER_COUNT, MIN_SIDE_LENGTH, NEUTRAL_COUNT, TEAM_B_COUNT, TeamCounts,
    generate_board, normalize_words,
};
pub use conversation::{ChatMessage, Conversation, MessageKind, Role};
pub use hint::{Hint, MalformedHintError, parse_hint};
pub use oracle::{CompletionRequest, HintOracle, OracleError, ScriptedOracle};
pub use prompt::{DEFAULT_INSTRUCTION, DEFAULT_PROMPT, PromptTemplate, PromptWords, TemplateError};
pub use settings::{DEFAULT_ORACLE_TIMEOUT, DEFAULT_RETRY_BUDGET, SpymasterSettings};
pub use spymaster::{
    AttemptFailure, GameStatus, HintGenerationError, MembershipError, Pools, Spymaster,
};
pub use team::{Relation, Side, Team};
