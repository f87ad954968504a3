//! Seeded board generation.
//!
//! A board is `side_length²` distinct words, each owned by exactly one
//! [`Team`]. Both the word draw and the team permutation come from one
//! ChaCha stream seeded once, so a `(word_list, side_length, seed)` triple
//! always yields the same board on every platform.

use crate::team::Team;
use derive_getters::Getters;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Killer cards on every board.
pub const KILLER_COUNT: usize = 1;
/// Neutral cards on every board.
pub const NEUTRAL_COUNT: usize = 7;
/// Cards owned by the second team on every board.
pub const TEAM_B_COUNT: usize = 8;
/// Smallest side length for which the fixed counts fit on the board.
pub const MIN_SIDE_LENGTH: usize = 4;

/// Number of cards per label on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct TeamCounts {
    killer: usize,
    neutral: usize,
    team_a: usize,
    team_b: usize,
}

impl TeamCounts {
    /// Fixed counts for a board of the given side length.
    ///
    /// Team A takes the remainder, clamped at zero.
    #[instrument]
    pub fn for_side_length(side_length: usize) -> Self {
        let cells = side_length * side_length;
        Self {
            killer: KILLER_COUNT,
            neutral: NEUTRAL_COUNT,
            team_b: TEAM_B_COUNT,
            team_a: cells.saturating_sub(KILLER_COUNT + NEUTRAL_COUNT + TEAM_B_COUNT),
        }
    }

    /// Total number of cards.
    pub fn total(&self) -> usize {
        self.killer + self.neutral + self.team_a + self.team_b
    }

    /// Count for one label.
    pub fn get(&self, team: Team) -> usize {
        match team {
            Team::Killer => self.killer,
            Team::Neutral => self.neutral,
            Team::TeamA => self.team_a,
            Team::TeamB => self.team_b,
        }
    }

    fn tally(assignment: &[Team]) -> Self {
        let count = |team| assignment.iter().filter(|t| **t == team).count();
        Self {
            killer: count(Team::Killer),
            neutral: count(Team::Neutral),
            team_a: count(Team::TeamA),
            team_b: count(Team::TeamB),
        }
    }

    fn template(&self) -> Vec<Team> {
        let mut template = Vec::with_capacity(self.total());
        template.extend(std::iter::repeat_n(Team::Killer, self.killer));
        template.extend(std::iter::repeat_n(Team::Neutral, self.neutral));
        template.extend(std::iter::repeat_n(Team::TeamB, self.team_b));
        template.extend(std::iter::repeat_n(Team::TeamA, self.team_a));
        template
    }
}

/// Errors from board generation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    /// The side length is below [`MIN_SIDE_LENGTH`].
    #[display("Board side length {} is too small (minimum {})", side_length, MIN_SIDE_LENGTH)]
    TooSmall {
        /// Requested side length.
        side_length: usize,
    },
    /// The word list has fewer distinct words than cells.
    #[display("Need {} distinct words, word list has {}", needed, available)]
    NotEnoughWords {
        /// Cells on the board.
        needed: usize,
        /// Distinct non-empty words supplied.
        available: usize,
    },
    /// Word and assignment sequences differ in length.
    #[display("{} words but {} assignments", words, assignments)]
    LengthMismatch {
        /// Number of words.
        words: usize,
        /// Number of labels.
        assignments: usize,
    },
    /// A word appears twice on the board.
    #[display("Word {:?} appears more than once", _0)]
    DuplicateWord(#[error(not(source))] String),
    /// Label counts differ from the fixed counts for the board size.
    #[display("Board has counts {:?}, expected {:?}", found, expected)]
    WrongCounts {
        /// Counts required for the side length.
        expected: TeamCounts,
        /// Counts found on the board.
        found: TeamCounts,
    },
}

/// A generated board: words in display order with their owners.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Board {
    /// Words in row-major order.
    words: Vec<String>,
    /// Owner of each word, index-aligned with `words`.
    assignment: Vec<Team>,
}

impl Board {
    /// Builds a board from explicit words and labels.
    ///
    /// The board must be square, at least [`MIN_SIDE_LENGTH`] wide, and carry
    /// exactly the label counts [`TeamCounts::for_side_length`] gives.
    #[instrument(skip(words, assignment), fields(words = words.len()))]
    pub fn new(words: Vec<String>, assignment: Vec<Team>) -> Result<Self, BoardError> {
        if words.len() != assignment.len() {
            warn!(
                words = words.len(),
                assignments = assignment.len(),
                "Word and assignment lengths differ"
            );
            return Err(BoardError::LengthMismatch {
                words: words.len(),
                assignments: assignment.len(),
            });
        }
        let mut seen = HashSet::with_capacity(words.len());
        for word in &words {
            if !seen.insert(word.as_str()) {
                warn!(word = %word, "Duplicate word on board");
                return Err(BoardError::DuplicateWord(word.clone()));
            }
        }

        let side_length = words.len().isqrt();
        if side_length < MIN_SIDE_LENGTH {
            warn!(side_length, "Rejecting undersized board");
            return Err(BoardError::TooSmall { side_length });
        }
        let expected = TeamCounts::for_side_length(side_length);
        let found = TeamCounts::tally(&assignment);
        if found != expected {
            warn!(?found, ?expected, "Board label counts are off");
            return Err(BoardError::WrongCounts { expected, found });
        }
        Ok(Self { words, assignment })
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the board has no cards.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Side length of the square grid.
    pub fn side_length(&self) -> usize {
        self.words.len().isqrt()
    }

    /// Word and owner at a board index.
    pub fn card(&self, index: usize) -> Option<(&str, Team)> {
        let word = self.words.get(index)?;
        let team = self.assignment.get(index)?;
        Some((word.as_str(), *team))
    }

    /// Owner of a word, if it is on the board.
    pub fn team_of(&self, word: &str) -> Option<Team> {
        self.words
            .iter()
            .position(|w| w == word)
            .and_then(|idx| self.assignment.get(idx).copied())
    }

    /// Words owned by `team`, in board order.
    pub fn words_of(&self, team: Team) -> Vec<String> {
        self.words
            .iter()
            .zip(&self.assignment)
            .filter(|(_, t)| **t == team)
            .map(|(w, _)| w.clone())
            .collect()
    }

    /// Counts the cards per label.
    pub fn counts(&self) -> TeamCounts {
        TeamCounts::tally(&self.assignment)
    }

    /// Consumes the board into its word and label vectors.
    pub fn into_parts(self) -> (Vec<String>, Vec<Team>) {
        (self.words, self.assignment)
    }
}

/// Trims entries, drops empties and removes duplicates keeping first-seen order.
#[instrument(skip(word_list), fields(entries = word_list.len()))]
pub fn normalize_words<S: AsRef<str>>(word_list: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let words: Vec<String> = word_list
        .iter()
        .map(|w| w.as_ref().trim())
        .filter(|w| !w.is_empty())
        .filter(|w| seen.insert(w.to_string()))
        .map(str::to_string)
        .collect();
    debug!(distinct = words.len(), "Normalized word list");
    words
}

/// Generates a reproducible board.
///
/// The word list is shuffled and truncated to `side_length²`, then the team
/// template is shuffled with the next draws from the same stream.
///
/// # Errors
///
/// Returns [`BoardError::TooSmall`] for side lengths below
/// [`MIN_SIDE_LENGTH`] and [`BoardError::NotEnoughWords`] when the list has
/// too few distinct entries.
#[instrument(skip(word_list), fields(entries = word_list.len()))]
pub fn generate_board<S: AsRef<str>>(
    word_list: &[S],
    side_length: usize,
    seed: u64,
) -> Result<Board, BoardError> {
    if side_length < MIN_SIDE_LENGTH {
        warn!(side_length, "Rejecting undersized board");
        return Err(BoardError::TooSmall { side_length });
    }

    let needed = side_length * side_length;
    let mut words = normalize_words(word_list);
    if words.len() < needed {
        warn!(needed, available = words.len(), "Word list too short");
        return Err(BoardError::NotEnoughWords {
            needed,
            available: words.len(),
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    words.shuffle(&mut rng);
    words.truncate(needed);

    let counts = TeamCounts::for_side_length(side_length);
    let mut assignment = counts.template();
    assignment.shuffle(&mut rng);

    info!(side_length, seed, "Generated board");
    Ok(Board { words, assignment })
}
