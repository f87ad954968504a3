//! Language-tagged board word lists.
//!
//! English and French lists are built in. A directory of `<lang>.txt` files
//! (one word per line) can add languages or replace the built-ins.

use derive_getters::Getters;
use derive_more::{Display, Error};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

const BUILTIN: &[(&str, &str)] = &[
    ("en", include_str!("../words/en.txt")),
    ("fr", include_str!("../words/fr.txt")),
];

/// A list of candidate board words for one language.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct WordList {
    /// Language code, e.g. `en`.
    language: String,
    /// Trimmed, non-empty, distinct words in file order.
    words: Vec<String>,
}

impl WordList {
    /// Parses newline-separated words.
    #[instrument(skip(language, text), fields(len = text.len()))]
    pub fn parse(language: impl Into<String>, text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let words = codenames_core::normalize_words(&lines);
        let language = language.into();
        debug!(language = %language, words = words.len(), "Parsed word list");
        Self { language, words }
    }

    /// The built-in list for a language.
    #[instrument]
    pub fn default_for(language: &str) -> Result<Self, WordListError> {
        BUILTIN
            .iter()
            .find(|(code, _)| *code == language)
            .map(|(code, text)| Self::parse(*code, text))
            .ok_or_else(|| WordListError::new(format!("No built-in word list for {:?}", language)))
    }

    /// Reads a list from a file.
    #[instrument(skip(language, path), fields(path = %path.as_ref().display()))]
    pub fn from_file(language: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, WordListError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| WordListError::new(format!("Failed to read word list: {}", e)))?;
        Ok(Self::parse(language, &text))
    }

    /// Loads `language` from `dir` when the file exists there, else the built-in.
    #[instrument(skip(dir))]
    pub fn load(language: &str, dir: Option<&Path>) -> Result<Self, WordListError> {
        if let Some(dir) = dir {
            let path = dir.join(format!("{}.txt", language));
            if path.is_file() {
                info!(path = %path.display(), "Loading word list from directory");
                return Self::from_file(language, path);
            }
            debug!(path = %path.display(), "No word list file, falling back to built-in");
        }
        Self::default_for(language)
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Languages available built in and from `dir`, sorted and deduplicated.
#[instrument(skip(dir))]
pub fn available_languages(dir: Option<&Path>) -> Vec<String> {
    let mut languages: Vec<String> = BUILTIN.iter().map(|(code, _)| code.to_string()).collect();

    if let Some(dir) = dir {
        match std::fs::read_dir(dir) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                        continue;
                    }
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        languages.push(stem.to_string());
                    }
                }
            }
            Err(e) => warn!(error = %e, dir = %dir.display(), "Cannot read word list directory"),
        }
    }

    languages.sort();
    languages.dedup();
    languages
}

/// Word list error.
#[derive(Debug, Clone, Display, Error)]
#[display("Word list error: {} at {}:{}", message, file, line)]
pub struct WordListError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl WordListError {
    /// Creates a new word list error.
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
