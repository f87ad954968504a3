//! Game sessions driven by a board UI.
//!
//! A [`GameSession`] pairs one generated board with one [`Spymaster`]. The
//! UI renders [`GameSession::cards`], forwards clicks as board indices and
//! calls [`GameSession::play`] once per refresh.

use crate::config::SpymasterConfig;
use crate::words::WordList;
use codenames_core::{
    Board, GameStatus, HintGenerationError, HintOracle, MembershipError, Side, Spymaster, Team,
    generate_board,
};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// One card as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Board index, row-major.
    pub index: usize,
    /// The word on the card.
    pub word: String,
    /// Owner, known to the spymaster but only shown once revealed.
    pub team: Team,
    /// Whether the card has been guessed.
    pub revealed: bool,
}

impl Card {
    /// Colour to paint the card, if it has been revealed.
    pub fn color(&self) -> Option<&'static str> {
        self.revealed.then(|| self.team.color())
    }
}

/// A single game: board, revealed cards and the spymaster.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    seed: u64,
    words: WordList,
    side_length: usize,
    board: Board,
    revealed: Vec<bool>,
    status: GameStatus,
    spymaster: Spymaster,
}

impl GameSession {
    /// Creates a session from a word list and configuration.
    ///
    /// Uses the configured seed, or a random one when none is set.
    #[instrument(skip(config, words, oracle), fields(session_id = %id))]
    pub fn new(
        id: SessionId,
        config: &SpymasterConfig,
        words: WordList,
        oracle: Arc<dyn HintOracle>,
    ) -> Result<Self, SessionError> {
        let seed = (*config.seed()).unwrap_or_else(rand::random);
        let side_length = *config.side_length();
        let board = generate_board(words.words(), side_length, seed)
            .map_err(|e| SessionError::new(format!("Failed to generate board: {}", e)))?;
        let spymaster = Spymaster::with_settings(
            &board,
            config.llm_model(),
            oracle,
            config.spymaster_settings(),
        );

        info!(seed, language = %words.language(), "Created game session");
        Ok(Self {
            id,
            seed,
            words,
            side_length,
            revealed: vec![false; board.len()],
            board,
            status: GameStatus::Continue,
            spymaster,
        })
    }

    /// Creates a session, loading the configured language's word list.
    #[instrument(skip(config, oracle), fields(session_id = %id))]
    pub fn from_config(
        id: SessionId,
        config: &SpymasterConfig,
        oracle: Arc<dyn HintOracle>,
    ) -> Result<Self, SessionError> {
        let words = WordList::load(config.language(), config.words_dir().as_deref())
            .map_err(|e| SessionError::new(format!("Failed to load word list: {}", e)))?;
        Self::new(id, config, words, oracle)
    }

    /// Reveals the card at `index` and resolves the guess.
    ///
    /// Returns the card's owner. Refuses once the board shows an ended game,
    /// even before `play()` has reported it.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn guess(&mut self, index: usize) -> Result<Team, SessionError> {
        if let Some(status) = self.spymaster.evaluate() {
            self.status = status;
        }
        if self.status.is_over() {
            warn!(index, status = %self.status, "Guess after game end");
            return Err(SessionError::new(format!("Game is over ({})", self.status)));
        }
        let (word, team) = self
            .board
            .card(index)
            .ok_or_else(|| SessionError::new(format!("No card at index {}", index)))?;
        if self.revealed[index] {
            warn!(index, word, "Card already revealed");
            return Err(SessionError::new(format!("{:?} is already revealed", word)));
        }

        self.spymaster
            .remove(word, team)
            .map_err(|e| SessionError::membership(e))?;
        self.revealed[index] = true;
        debug!(index, word, %team, "Card revealed");
        Ok(team)
    }

    /// Passes the turn.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn pass(&mut self) {
        self.spymaster.end_turn();
    }

    /// Evaluates the game and fetches a hint when needed.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn play(&mut self) -> Result<(String, GameStatus), HintGenerationError> {
        let (text, status) = self.spymaster.play().await?;
        self.status = status;
        Ok((text, status))
    }

    /// Starts a new game on a new board. Settings carry over.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn restart(&mut self, seed: Option<u64>) -> Result<(), SessionError> {
        let seed = seed.unwrap_or_else(rand::random);
        let board = generate_board(self.words.words(), self.side_length, seed)
            .map_err(|e| SessionError::new(format!("Failed to generate board: {}", e)))?;
        self.spymaster.restart(&board);
        self.revealed = vec![false; board.len()];
        self.board = board;
        self.seed = seed;
        self.status = GameStatus::Continue;
        info!(seed, "Session restarted");
        Ok(())
    }

    /// Cards in board order.
    pub fn cards(&self) -> Vec<Card> {
        self.board
            .words()
            .iter()
            .zip(self.board.assignment())
            .zip(&self.revealed)
            .enumerate()
            .map(|(index, ((word, team), revealed))| Card {
                index,
                word: word.clone(),
                team: *team,
                revealed: *revealed,
            })
            .collect()
    }

    /// Session ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Seed of the current board.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Status from the last `play()`.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Side holding the turn.
    pub fn current_team(&self) -> Side {
        self.spymaster.current_team()
    }

    /// Hint and guess history for a side.
    pub fn history(&self, side: Side) -> Vec<String> {
        self.spymaster.history(side)
    }

    /// The spymaster, for reading state.
    pub fn spymaster(&self) -> &Spymaster {
        &self.spymaster
    }

    /// The spymaster, for changing prompt, instruction or history policy.
    pub fn spymaster_mut(&mut self) -> &mut Spymaster {
        &mut self.spymaster
    }
}

/// Session error.
#[derive(Debug, Clone, Display, Error)]
#[display("Session error: {} at {}:{}", message, file, line)]
pub struct SessionError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
    /// Rejected guess from the spymaster, if that is the cause.
    #[error(source)]
    pub membership: Option<MembershipError>,
}

impl SessionError {
    /// Creates a new session error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
            membership: None,
        }
    }

    /// Wraps a guess the spymaster rejected.
    #[track_caller]
    #[instrument(skip(source))]
    pub fn membership(source: MembershipError) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: format!("Guess rejected: {}", source.message),
            line: loc.line(),
            file: loc.file(),
            membership: Some(source),
        }
    }
}
