use thiserror::Error;
use uuid::Uuid;

/// Failures of the title macro parser.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MacroError {
    #[error("invalid date format, expected dd.mm.yyyy")]
    InvalidDateFormat,

    #[error("deadline has already passed")]
    DeadlineInPast,
}

/// Failures of task operations, surfaced to API callers by kind.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("title must be between {min} and {max} characters", min = crate::lifecycle::TITLE_MIN_LEN, max = crate::lifecycle::TITLE_MAX_LEN)]
    InvalidTitle,

    #[error("invalid date format, expected dd.mm.yyyy")]
    InvalidDateFormat,

    #[error("deadline cannot be in the past")]
    DeadlineInPast,

    #[error("task not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<MacroError> for TaskError {
    fn from(err: MacroError) -> Self {
        match err {
            MacroError::InvalidDateFormat => Self::InvalidDateFormat,
            MacroError::DeadlineInPast => Self::DeadlineInPast,
        }
    }
}

pub type TaskResult<T> = Result<T, TaskError>;
