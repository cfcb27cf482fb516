use thiserror::Error;

/// Errors produced by task operations.
///
/// Validation failures are recoverable and reported to the user as notices;
/// storage failures carry the underlying I/O context.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Please enter the task text")]
    EmptyText,

    #[error("Invalid deadline '{0}'. Use YYYY-MM-DD HH:MM or HH:MM")]
    InvalidDeadline(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl TaskError {
    /// True for errors caused by user input rather than the environment
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::EmptyText | TaskError::InvalidDeadline(_))
    }
}

pub type TaskResult<T> = std::result::Result<T, TaskError>;
