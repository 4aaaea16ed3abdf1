use crate::config::DEFAULT_REPLY_DELAY;
use crate::conversation::mock_reply;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error("completion backend unavailable: {0}")]
    Unavailable(String),

    #[error("completion failed: {0}")]
    Failed(String),
}

pub type CompletionResult<T> = Result<T, CompletionError>;

/// One accepted submission handed to a backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionRequest {
    pub user_input: String,
    /// When the user submitted; reply deadlines are measured from here.
    pub submitted_at: Instant,
}

impl CompletionRequest {
    pub fn new(user_input: impl Into<String>, submitted_at: Instant) -> Self {
        Self {
            user_input: user_input.into(),
            submitted_at,
        }
    }
}

/// Produces the assistant text for a submitted message.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult<String>;
}

/// Templated echo returned `delay` after the submission.
#[derive(Clone, Debug)]
pub struct MockBackend {
    delay: Duration,
}

impl MockBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_DELAY)
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult<String> {
        tokio::time::sleep_until(request.submitted_at + self.delay).await;
        Ok(mock_reply(&request.user_input))
    }
}
