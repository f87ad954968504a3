//! Parsing of oracle replies into hints.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A spymaster hint: a clue word and how many cards it points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Hint {
    /// Clue word, upper-cased.
    pub word: String,
    /// Number of cards the clue refers to (at least 1).
    pub count: u32,
}

impl std::fmt::Display for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.word, self.count)
    }
}

/// Reasons an oracle reply is not a usable hint.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MalformedHintError {
    /// No `-` separating word and count.
    #[display("Reply has no '-' delimiter: {:?}", _0)]
    MissingDelimiter(#[error(not(source))] String),
    /// Nothing before the delimiter.
    #[display("Reply has an empty hint word")]
    EmptyWord,
    /// The count is not an integer.
    #[display("Hint count {:?} is not an integer", _0)]
    InvalidCount(#[error(not(source))] String),
    /// The count is zero or negative.
    #[display("Hint count {} is below 1", _0)]
    CountTooLow(#[error(not(source))] i64),
}

/// Parses a `WORD - NUMBER` reply.
///
/// Splits on the last `-`, so hyphenated clue words are kept whole. The word
/// is trimmed and upper-cased; the count is trimmed and stripped of trailing
/// periods. Board membership of the word is not checked.
#[instrument(skip(text), fields(len = text.len()))]
pub fn parse_hint(text: &str) -> Result<Hint, MalformedHintError> {
    let (word, count) = text
        .rsplit_once('-')
        .ok_or_else(|| MalformedHintError::MissingDelimiter(text.to_string()))?;

    let word = word.trim().to_uppercase();
    if word.is_empty() {
        return Err(MalformedHintError::EmptyWord);
    }

    let raw_count = count.trim().trim_end_matches('.').trim();
    let count: i64 = raw_count
        .parse()
        .map_err(|_| MalformedHintError::InvalidCount(raw_count.to_string()))?;
    if count < 1 {
        return Err(MalformedHintError::CountTooLow(count));
    }
    let count =
        u32::try_from(count).map_err(|_| MalformedHintError::InvalidCount(raw_count.to_string()))?;

    debug!(word = %word, count, "Parsed hint");
    Ok(Hint { word, count })
}
