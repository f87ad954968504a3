//! Spymaster behaviour settings.

use crate::prompt::{DEFAULT_INSTRUCTION, PromptTemplate};
use derive_getters::Getters;
use std::time::Duration;

/// Default number of retries after a failed hint attempt.
pub const DEFAULT_RETRY_BUDGET: u32 = 2;

/// Default limit for one oracle call.
pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings applied to each new hint request.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct SpymasterSettings {
    /// Prompt rendered before each hint request.
    prompt: PromptTemplate,
    /// System instruction heading each team's log.
    instruction: String,
    /// Send the whole log rather than instruction plus latest prompt.
    use_full_history: bool,
    /// Retries after the first failed attempt.
    retry_budget: u32,
    /// Limit for a single oracle call.
    oracle_timeout: Duration,
}

impl SpymasterSettings {
    /// Creates settings from explicit values.
    pub fn new(
        prompt: PromptTemplate,
        instruction: impl Into<String>,
        use_full_history: bool,
        retry_budget: u32,
        oracle_timeout: Duration,
    ) -> Self {
        Self {
            prompt,
            instruction: instruction.into(),
            use_full_history,
            retry_budget,
            oracle_timeout,
        }
    }

    pub(crate) fn set_prompt(&mut self, prompt: PromptTemplate) {
        self.prompt = prompt;
    }

    pub(crate) fn set_instruction(&mut self, instruction: String) {
        self.instruction = instruction;
    }

    pub(crate) fn set_use_full_history(&mut self, use_full_history: bool) {
        self.use_full_history = use_full_history;
    }

    pub(crate) fn set_retry_budget(&mut self, retry_budget: u32) {
        self.retry_budget = retry_budget;
    }

    pub(crate) fn set_oracle_timeout(&mut self, oracle_timeout: Duration) {
        self.oracle_timeout = oracle_timeout;
    }
}

impl Default for SpymasterSettings {
    fn default() -> Self {
        Self {
            prompt: PromptTemplate::default(),
            instruction: DEFAULT_INSTRUCTION.to_string(),
            use_full_history: true,
            retry_budget: DEFAULT_RETRY_BUDGET,
            oracle_timeout: DEFAULT_ORACLE_TIMEOUT,
        }
    }
}
