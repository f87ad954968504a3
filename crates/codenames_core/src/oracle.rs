//! The hint oracle seam.
//!
//! The state machine only needs "send this conversation, get text back".
//! Network clients live outside this crate and implement [`HintOracle`].

use crate::conversation::ChatMessage;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, instrument};

/// A completion request: the model to use and the conversation so far.
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct CompletionRequest {
    /// Model identifier passed through to the provider.
    pub model: String,
    /// Role-tagged messages, oldest first.
    pub messages: Vec<ChatMessage>,
}

/// Oracle failures. None of these are retried by the oracle itself.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum OracleError {
    /// Network or provider failure.
    #[display("Oracle transport error: {}", _0)]
    Transport(#[error(not(source))] String),
    /// The credentials were rejected.
    #[display("Oracle authentication error: {}", _0)]
    Auth(#[error(not(source))] String),
    /// No reply within the configured timeout.
    #[display("Oracle timed out after {} ms", _0)]
    Timeout(#[error(not(source))] u128),
    /// The provider replied without any text.
    #[display("Oracle returned no content: {}", _0)]
    EmptyResponse(#[error(not(source))] String),
}

/// Something that turns a conversation into a hint reply.
#[async_trait::async_trait]
pub trait HintOracle: Send + Sync {
    /// Returns the completion text for the request.
    async fn request_completion(&self, request: &CompletionRequest) -> Result<String, OracleError>;
}

/// Oracle that replays queued replies in order.
///
/// Useful for tests and offline play. Once the script runs out every call
/// fails with [`OracleError::EmptyResponse`].
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<Result<String, OracleError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    calls: AtomicUsize,
}

impl ScriptedOracle {
    /// Creates an oracle returning the given texts in order.
    #[instrument(skip(replies))]
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            ..Self::default()
        }
    }

    /// Queues a successful reply.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.lock_replies().push_back(Ok(reply.into()));
    }

    /// Queues a failure.
    pub fn push_error(&self, error: OracleError) {
        self.lock_replies().push_back(Err(error));
    }

    /// Number of completed calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, OracleError>>> {
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl HintOracle for ScriptedOracle {
    #[instrument(skip(self, request), fields(messages = request.messages.len()))]
    async fn request_completion(&self, request: &CompletionRequest) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());
        let reply = self
            .lock_replies()
            .pop_front()
            .unwrap_or_else(|| Err(OracleError::EmptyResponse("script exhausted".to_string())));
        debug!(ok = reply.is_ok(), "Scripted reply");
        reply
    }
}
