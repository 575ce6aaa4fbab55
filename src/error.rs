use thiserror::Error;

/// Errors surfaced by the capital optimizer and its invocation wrapper.
///
/// The greedy computation itself can only fail with [`OptimizerError::InvalidInput`],
/// and only before the first selection round. The remaining variants are
/// produced by the cancellation and worker-pool layer around it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimizerError {
    /// The query, a project, or one of their fields violates an invariant.
    #[error("{0}")]
    InvalidInput(String),

    /// A catalog lookup did not match any record.
    #[error("{0}")]
    NotFound(String),

    /// The run observed its cancellation flag between selection rounds.
    #[error("capital maximization cancelled after {completed_rounds} selection rounds")]
    Cancelled { completed_rounds: usize },

    /// The caller stopped waiting for a pooled run.
    #[error("capital maximization timed out")]
    TimedOut,

    /// Runtime settings could not be read or are out of range.
    #[error("configuration error: {0}")]
    Config(String),

    /// The dedicated worker pool could not be built or lost a job.
    #[error("optimizer worker pool failure: {0}")]
    WorkerPool(String),
}

impl OptimizerError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// True for failures caused by the caller's input rather than the runtime.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
