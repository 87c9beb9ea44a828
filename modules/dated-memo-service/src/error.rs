//! Error types for the memo store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoError {
    #[error("invalid date '{0}', expected MM/DD/YYYY")]
    InvalidDate(String),

    #[error("invalid memo id '{0}'")]
    InvalidId(String),

    #[error("stored record {id} has unreadable date '{raw}'")]
    CorruptRecord { id: i64, raw: String },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("database connection lock poisoned")]
    LockPoisoned,
}

impl MemoError {
    /// True when the caller sent bad input, as opposed to a backend fault.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidDate(_) | Self::InvalidId(_))
    }
}

pub type Result<T> = std::result::Result<T, MemoError>;
