//! Spymaster prompt templates.
//!
//! Templates use `{SLF}`, `{OPP}`, `{NTR}` and `{KLL}` placeholders for the
//! own, opponent, neutral and killer word lists. `{{` and `}}` produce
//! literal braces.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Default prompt sent before each hint request.
pub const DEFAULT_PROMPT: &str = "Your words to guess are: {SLF}.
Your opponent's words to avoid are: {OPP}.
The neutral words to avoid are: {NTR}.
The forbidden word to really avoid is: {KLL}.

Give a hint.";

/// Default system instruction.
pub const DEFAULT_INSTRUCTION: &str = "You are playing the game Codenames as the spymaster to give hints.
Your answers should be in the format WORD - NUMBER.";

/// Template rendering failures.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TemplateError {
    /// A placeholder name the template engine does not know.
    #[display("Unknown placeholder {{{}}} in prompt template", _0)]
    UnknownPlaceholder(#[error(not(source))] String),
    /// A `{` without a closing `}`.
    #[display("Unclosed '{{' at byte {}", _0)]
    UnclosedBrace(#[error(not(source))] usize),
    /// A lone `}`.
    #[display("Unmatched '}}' at byte {}", _0)]
    UnmatchedBrace(#[error(not(source))] usize),
}

/// Word lists substituted into a template.
#[derive(Debug, Clone, Copy)]
pub struct PromptWords<'a> {
    /// Words of the side holding the turn.
    pub own: &'a [String],
    /// Words of the other side.
    pub opponent: &'a [String],
    /// Neutral words.
    pub neutral: &'a [String],
    /// Killer words.
    pub killer: &'a [String],
}

impl PromptWords<'_> {
    fn lookup(&self, name: &str) -> Option<String> {
        let words = match name {
            "SLF" => self.own,
            "OPP" => self.opponent,
            "NTR" => self.neutral,
            "KLL" => self.killer,
            _ => return None,
        };
        Some(words.join(", "))
    }
}

/// A prompt template string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    /// Wraps a template string. Placeholders are checked at render time.
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// The raw template text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks every placeholder and brace without rendering.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), TemplateError> {
        let empty: [String; 0] = [];
        self.render(&PromptWords {
            own: &empty,
            opponent: &empty,
            neutral: &empty,
            killer: &empty,
        })
        .map(|_| ())
    }

    /// Renders the template with sample words, for settings previews.
    #[instrument(skip(self))]
    pub fn preview(&self) -> Result<String, TemplateError> {
        let own = ["King".to_string(), "Apple".to_string(), "Bank".to_string()];
        let opponent = [
            "Octopus".to_string(),
            "Frankenstein".to_string(),
            "Eagle".to_string(),
        ];
        let neutral = ["Slip".to_string(), "Bee".to_string(), "Ivory".to_string()];
        let killer = ["Platypus".to_string()];
        self.render(&PromptWords {
            own: &own,
            opponent: &opponent,
            neutral: &neutral,
            killer: &killer,
        })
    }

    /// Substitutes the word lists into the template.
    #[instrument(skip(self, words))]
    pub fn render(&self, words: &PromptWords<'_>) -> Result<String, TemplateError> {
        let src = self.0.as_str();
        let mut out = String::with_capacity(src.len());
        let mut chars = src.char_indices().peekable();

        while let Some((idx, ch)) = chars.next() {
            match ch {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    out.push('{');
                }
                '{' => {
                    let rest = &src[idx + 1..];
                    let end = rest.find('}').ok_or(TemplateError::UnclosedBrace(idx))?;
                    let name = &rest[..end];
                    let value = words.lookup(name).ok_or_else(|| {
                        warn!(placeholder = %name, "Unknown prompt placeholder");
                        TemplateError::UnknownPlaceholder(name.to_string())
                    })?;
                    out.push_str(&value);
                    // Skip the name and the closing brace.
                    for _ in 0..=name.chars().count() {
                        chars.next();
                    }
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    out.push('}');
                }
                '}' => return Err(TemplateError::UnmatchedBrace(idx)),
                other => out.push(other),
            }
        }

        debug!(rendered_len = out.len(), "Rendered prompt");
        Ok(out)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT)
    }
}

impl From<&str> for PromptTemplate {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PromptTemplate {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
