//! The spymaster state machine.
//!
//! A [`Spymaster`] owns one game: the live word pools, whose turn it is, the
//! active hint and a conversation log per side. The collaborator forwards
//! guesses through [`Spymaster::remove`] and calls [`Spymaster::play`] once
//! per render to learn the current hint or the game result.
//!
//! Losses and wins are only detected in `play()`. A killer guess removes the
//! card and leaves the turn alone; the next `play()` reports the loss.

use crate::board::Board;
use crate::conversation::{Conversation, MessageKind};
use crate::hint::{Hint, MalformedHintError, parse_hint};
use crate::oracle::{CompletionRequest, HintOracle, OracleError};
use crate::prompt::{PromptTemplate, PromptWords, TemplateError};
use crate::settings::SpymasterSettings;
use crate::team::{Relation, Side, Team};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Result of evaluating the board in [`Spymaster::play`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum GameStatus {
    /// The game goes on; a hint is active.
    #[display("continue")]
    Continue,
    /// The side holding the turn found all its words.
    #[display("won")]
    Won,
    /// The killer word was guessed.
    #[display("lost (killer)")]
    LostKiller,
    /// The opposing side has no words left.
    #[display("lost (no opponent words)")]
    LostNoOpponentWords,
}

impl GameStatus {
    /// Whether the game has ended.
    pub fn is_over(self) -> bool {
        !matches!(self, Self::Continue)
    }
}

/// A guess named a word that is not in the pool of its claimed owner.
#[derive(Debug, Clone, Display, Error)]
#[display("Membership error: {} at {}:{}", message, file, line)]
pub struct MembershipError {
    /// Error message.
    pub message: String,
    /// The guessed word.
    pub word: String,
    /// The owner the caller claimed.
    pub team: Team,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl MembershipError {
    /// Creates a new membership error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(word: &str, team: Team) -> Self {
        let loc = std::panic::Location::caller();
        let message = format!("{:?} is not a remaining {} word", word, team);
        error!(error_message = %message, "Membership error created");
        Self {
            message,
            word: word.to_string(),
            team,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Why a single hint attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum AttemptFailure {
    /// The reply did not parse.
    #[display("{}", _0)]
    Malformed(MalformedHintError),
    /// The oracle call failed or timed out.
    #[display("{}", _0)]
    Oracle(OracleError),
}

/// No hint could be produced for the current turn.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum HintGenerationError {
    /// Every attempt within the retry budget failed.
    #[display("No valid hint after {} attempts: {}", attempts, last)]
    RetriesExhausted {
        /// Attempts made, including the first.
        attempts: u32,
        /// The final failure.
        #[error(source)]
        last: AttemptFailure,
    },
    /// The prompt template could not be rendered.
    #[display("Prompt template error: {}", _0)]
    Template(#[error(source)] TemplateError),
}

/// Live words per label, in board order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pools {
    killer: Vec<String>,
    neutral: Vec<String>,
    team_a: Vec<String>,
    team_b: Vec<String>,
}

impl Pools {
    /// Splits a board into pools.
    #[instrument(skip(board), fields(cards = board.len()))]
    pub fn from_board(board: &Board) -> Self {
        Self {
            killer: board.words_of(Team::Killer),
            neutral: board.words_of(Team::Neutral),
            team_a: board.words_of(Team::TeamA),
            team_b: board.words_of(Team::TeamB),
        }
    }

    /// Words remaining for a label.
    pub fn get(&self, team: Team) -> &[String] {
        match team {
            Team::Killer => &self.killer,
            Team::Neutral => &self.neutral,
            Team::TeamA => &self.team_a,
            Team::TeamB => &self.team_b,
        }
    }

    fn get_mut(&mut self, team: Team) -> &mut Vec<String> {
        match team {
            Team::Killer => &mut self.killer,
            Team::Neutral => &mut self.neutral,
            Team::TeamA => &mut self.team_a,
            Team::TeamB => &mut self.team_b,
        }
    }

    /// Total words not yet guessed.
    pub fn total(&self) -> usize {
        self.killer.len() + self.neutral.len() + self.team_a.len() + self.team_b.len()
    }
}

/// LLM-driven spymaster for one game.
pub struct Spymaster {
    pools: Pools,
    current: Side,
    hint: Option<Hint>,
    remaining: i64,
    logs: [Conversation; 2],
    settings: SpymasterSettings,
    model: String,
    oracle: Arc<dyn HintOracle>,
}

impl std::fmt::Debug for Spymaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spymaster")
            .field("pools", &self.pools)
            .field("current", &self.current)
            .field("hint", &self.hint)
            .field("remaining", &self.remaining)
            .field("logs", &self.logs)
            .field("settings", &self.settings)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl Spymaster {
    /// Starts a game on `board` with default settings.
    #[instrument(skip(board, model, oracle), fields(model = %model.as_ref()))]
    pub fn new(board: &Board, model: impl AsRef<str>, oracle: Arc<dyn HintOracle>) -> Self {
        Self::with_settings(board, model, oracle, SpymasterSettings::default())
    }

    /// Starts a game on `board` with explicit settings.
    #[instrument(skip(board, model, oracle, settings), fields(model = %model.as_ref()))]
    pub fn with_settings(
        board: &Board,
        model: impl AsRef<str>,
        oracle: Arc<dyn HintOracle>,
        settings: SpymasterSettings,
    ) -> Self {
        info!(cards = board.len(), "Creating spymaster");
        let instruction = settings.instruction().clone();
        Self {
            pools: Pools::from_board(board),
            current: Side::A,
            hint: None,
            remaining: 0,
            logs: [
                Conversation::new(instruction.clone()),
                Conversation::new(instruction),
            ],
            settings,
            model: model.as_ref().to_string(),
            oracle,
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Configuration
    // ─────────────────────────────────────────────────────────────

    /// Replaces the pools with a fresh board. Logs and turn state are kept.
    #[instrument(skip(self, board), fields(cards = board.len()))]
    pub fn update_words(&mut self, board: &Board) {
        info!("Updating board words");
        self.pools = Pools::from_board(board);
    }

    /// Replaces the prompt template for later hint requests.
    #[instrument(skip(self, template))]
    pub fn update_prompt(&mut self, template: impl Into<PromptTemplate>) {
        debug!("Updating prompt template");
        self.settings.set_prompt(template.into());
    }

    /// Replaces the instruction and rewrites it at the head of both logs.
    #[instrument(skip(self, instruction))]
    pub fn update_instruction(&mut self, instruction: impl Into<String>) {
        let instruction = instruction.into();
        for log in &mut self.logs {
            log.set_instruction(&instruction);
        }
        self.settings.set_instruction(instruction);
        debug!("Instruction updated");
    }

    /// Chooses between sending the full log or instruction plus latest prompt.
    #[instrument(skip(self))]
    pub fn set_history_policy(&mut self, use_full_history: bool) {
        self.settings.set_use_full_history(use_full_history);
    }

    /// Sets how many retries follow a failed hint attempt.
    #[instrument(skip(self))]
    pub fn set_retry_budget(&mut self, retry_budget: u32) {
        self.settings.set_retry_budget(retry_budget);
    }

    /// Sets the limit for a single oracle call.
    #[instrument(skip(self))]
    pub fn set_oracle_timeout(&mut self, timeout: Duration) {
        self.settings.set_oracle_timeout(timeout);
    }

    /// Switches the model used for later requests.
    #[instrument(skip(self, model), fields(model = %model.as_ref()))]
    pub fn set_model(&mut self, model: impl AsRef<str>) {
        self.model = model.as_ref().to_string();
    }

    /// Starts over on a new board: pools, turn state and both logs.
    #[instrument(skip(self, board), fields(cards = board.len()))]
    pub fn restart(&mut self, board: &Board) {
        info!("Restarting game");
        self.pools = Pools::from_board(board);
        self.current = Side::A;
        self.hint = None;
        self.remaining = 0;
        let instruction = self.settings.instruction().as_str();
        self.logs = [Conversation::new(instruction), Conversation::new(instruction)];
    }

    // ─────────────────────────────────────────────────────────────
    //  Turn actions
    // ─────────────────────────────────────────────────────────────

    /// Resolves a guess of `word`, owned by `team`.
    ///
    /// Neutral and opponent words end the turn. Own words spend one guess
    /// and end the turn once the budget drops below zero, so a hint for N
    /// words allows N + 1 correct guesses. Killer words only leave the pool.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError`] when `word` is not a remaining word of
    /// `team`. Nothing is changed in that case.
    #[instrument(skip(self), fields(current = %self.current))]
    pub fn remove(&mut self, word: &str, team: Team) -> Result<(), MembershipError> {
        let position = self
            .pools
            .get(team)
            .iter()
            .position(|w| w == word)
            .ok_or_else(|| MembershipError::new(word, team))?;

        self.logs[self.current.index()].push(
            MessageKind::Guess,
            format!("Your teammates guessed the word {}", word),
        );
        self.pools.get_mut(team).remove(position);
        debug!(word, %team, "Removed word from pool");

        match team {
            Team::Killer => {
                info!(word, "Killer word guessed");
            }
            Team::Neutral => {
                info!(word, "Neutral word guessed, ending turn");
                self.end_turn();
            }
            _ if team != self.current.team() => {
                info!(word, "Opponent word guessed, ending turn");
                self.end_turn();
            }
            _ => {
                self.remaining -= 1;
                debug!(remaining = self.remaining, "Correct guess");
                if self.remaining < 0 {
                    info!("Guesses used up, ending turn");
                    self.end_turn();
                }
            }
        }
        Ok(())
    }

    /// Passes the turn to the other side.
    #[instrument(skip(self), fields(current = %self.current))]
    pub fn end_turn(&mut self) {
        self.hint = None;
        self.remaining = 0;
        self.current = self.current.opponent();
        info!(next = %self.current, "Turn ended");
    }

    /// Checks for a finished game without touching the oracle.
    #[instrument(skip(self), fields(current = %self.current))]
    pub fn evaluate(&self) -> Option<GameStatus> {
        if self.pools.killer.is_empty() {
            Some(GameStatus::LostKiller)
        } else if self.pool(Relation::Opponent).is_empty() {
            Some(GameStatus::LostNoOpponentWords)
        } else if self.pool(Relation::Own).is_empty() {
            Some(GameStatus::Won)
        } else {
            None
        }
    }

    /// Evaluates the board and returns the text to show with the status.
    ///
    /// When no hint is active the oracle is asked for one first. With a hint
    /// active, repeated calls return the same result without a new request.
    ///
    /// # Errors
    ///
    /// Returns [`HintGenerationError`] when the template does not render or
    /// every attempt within the retry budget fails.
    #[instrument(skip(self), fields(current = %self.current))]
    pub async fn play(&mut self) -> Result<(String, GameStatus), HintGenerationError> {
        let color = self.current.color();

        if let Some(status) = self.evaluate() {
            let (headline, verdict) = match status {
                GameStatus::LostKiller => ("You guessed the killer card.", "You lost ☠️"),
                GameStatus::LostNoOpponentWords => {
                    ("Your opponent has no words left.", "You lost ☠️")
                }
                _ => ("You found all your cards.", "You win 🪩 !"),
            };
            info!(%status, side = %self.current, "Game over");
            return Ok((banner(color, headline, verdict), status));
        }

        let hint = match &self.hint {
            Some(hint) => hint.clone(),
            None => self.give_hint().await?,
        };

        Ok((banner(color, &hint.word, hint.count), GameStatus::Continue))
    }

    // ─────────────────────────────────────────────────────────────
    //  Hint generation
    // ─────────────────────────────────────────────────────────────

    #[instrument(skip(self), fields(current = %self.current))]
    async fn give_hint(&mut self) -> Result<Hint, HintGenerationError> {
        let prompt = self.render_prompt().map_err(|e| {
            error!(error = %e, "Prompt template failed to render");
            HintGenerationError::Template(e)
        })?;

        let side = self.current;
        self.logs[side.index()].push(MessageKind::Prompt, prompt);
        let request = CompletionRequest::new(
            self.model.clone(),
            self.logs[side.index()].outgoing(*self.settings.use_full_history()),
        );

        let mut attempts = 0;
        let hint = loop {
            attempts += 1;
            match self.attempt(&request).await {
                Ok(hint) => break hint,
                Err(failure) if attempts > *self.settings.retry_budget() => {
                    error!(attempts, error = %failure, "Hint retries exhausted");
                    return Err(HintGenerationError::RetriesExhausted {
                        attempts,
                        last: failure,
                    });
                }
                Err(failure) => {
                    warn!(attempts, error = %failure, "Hint attempt failed, retrying");
                }
            }
        };

        self.remaining = i64::from(hint.count);
        self.logs[side.index()].push(MessageKind::Hint, hint.to_string());
        self.hint = Some(hint.clone());
        info!(word = %hint.word, count = hint.count, attempts, "New hint");
        Ok(hint)
    }

    async fn attempt(&self, request: &CompletionRequest) -> Result<Hint, AttemptFailure> {
        let limit = *self.settings.oracle_timeout();
        let reply = tokio::time::timeout(limit, self.oracle.request_completion(request))
            .await
            .map_err(|_| OracleError::Timeout(limit.as_millis()))??;
        debug!(reply = %reply, "Oracle reply");
        Ok(parse_hint(&reply)?)
    }

    /// Renders the prompt for the side holding the turn.
    #[instrument(skip(self))]
    pub fn render_prompt(&self) -> Result<String, TemplateError> {
        self.settings.prompt().render(&PromptWords {
            own: self.pool(Relation::Own),
            opponent: self.pool(Relation::Opponent),
            neutral: self.pool(Relation::Neutral),
            killer: self.pool(Relation::Killer),
        })
    }

    // ─────────────────────────────────────────────────────────────
    //  Accessors
    // ─────────────────────────────────────────────────────────────

    /// Side holding the turn.
    pub fn current_team(&self) -> Side {
        self.current
    }

    /// The active hint, if any.
    pub fn active_hint(&self) -> Option<&Hint> {
        self.hint.as_ref()
    }

    /// Correct guesses left before the turn ends; negative ends it.
    pub fn remaining_guesses(&self) -> i64 {
        self.remaining
    }

    /// Pool named relative to the side holding the turn.
    pub fn pool(&self, relation: Relation) -> &[String] {
        self.pools.get(relation.resolve(self.current))
    }

    /// All live pools.
    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    /// Words left for a label.
    pub fn words_remaining(&self, team: Team) -> usize {
        self.pools.get(team).len()
    }

    /// Guesses and hints shown to a side, oldest first.
    pub fn history(&self, side: Side) -> Vec<String> {
        self.logs[side.index()].visible()
    }

    /// Full oracle log of a side.
    pub fn conversation(&self, side: Side) -> &Conversation {
        &self.logs[side.index()]
    }

    /// Current settings.
    pub fn settings(&self) -> &SpymasterSettings {
        &self.settings
    }

    /// Model used for hint requests.
    pub fn model(&self) -> &str {
        &self.model
    }
}

fn banner(color: &str, left: &str, right: impl std::fmt::Display) -> String {
    format!(":{}[{} - {}]", color, left, right)
}
