//! Per-team conversation logs with the oracle.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Chat role understood by the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction.
    #[display("system")]
    System,
    /// Game-side messages.
    #[display("user")]
    User,
    /// Oracle replies.
    #[display("assistant")]
    Assistant,
}

/// What a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// The system instruction; always the first entry.
    Instruction,
    /// A rendered board prompt.
    Prompt,
    /// A card picked by the guessing team.
    Guess,
    /// A hint accepted from the oracle.
    Hint,
}

impl MessageKind {
    /// Role this kind of entry is sent with.
    pub fn role(self) -> Role {
        match self {
            Self::Instruction => Role::System,
            Self::Prompt | Self::Guess => Role::User,
            Self::Hint => Role::Assistant,
        }
    }

    /// Whether the entry shows up in the user-visible history.
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Guess | Self::Hint)
    }
}

/// One log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Entry kind.
    pub kind: MessageKind,
    /// Role sent to the oracle.
    pub role: Role,
    /// Message text.
    pub text: String,
}

impl ChatMessage {
    /// Creates a message, deriving the role from the kind.
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            role: kind.role(),
            text: text.into(),
        }
    }
}

/// Append-only log whose first entry is the instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Starts a log with the given instruction.
    #[instrument(skip(instruction))]
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::new(MessageKind::Instruction, instruction)],
        }
    }

    /// All entries, instruction first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of entries including the instruction.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: the instruction is never removed.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Appends an entry. Instruction entries are only ever the first one.
    pub(crate) fn push(&mut self, kind: MessageKind, text: impl Into<String>) {
        debug_assert_ne!(kind, MessageKind::Instruction);
        self.messages.push(ChatMessage::new(kind, text));
    }

    /// Rewrites the instruction entry in place.
    #[instrument(skip(self, instruction))]
    pub(crate) fn set_instruction(&mut self, instruction: &str) {
        if let Some(first) = self.messages.first_mut() {
            first.text = instruction.to_string();
        }
    }

    /// The instruction entry.
    pub fn instruction(&self) -> &ChatMessage {
        &self.messages[0]
    }

    /// The most recent prompt entry, if any.
    pub fn last_prompt(&self) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.kind == MessageKind::Prompt)
    }

    /// Messages to send to the oracle under the given history policy.
    ///
    /// Full history sends the whole log; otherwise only the instruction and
    /// the latest prompt.
    #[instrument(skip(self))]
    pub fn outgoing(&self, use_full_history: bool) -> Vec<ChatMessage> {
        let outgoing: Vec<ChatMessage> = if use_full_history {
            self.messages.clone()
        } else {
            std::iter::once(self.instruction())
                .chain(self.last_prompt())
                .cloned()
                .collect()
        };
        debug!(count = outgoing.len(), use_full_history, "Built oracle conversation");
        outgoing
    }

    /// Guess and hint texts in order, for display.
    pub fn visible(&self) -> Vec<String> {
        self.messages
            .iter()
            .filter(|m| m.kind.is_visible())
            .map(|m| m.text.clone())
            .collect()
    }
}
