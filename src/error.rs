use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort the report. Skippable rows never end up here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("line {line}: unsupported month value {month:?}")]
    UnknownMonth { line: usize, month: String },

    #[error("line {line}: malformed date {text:?}")]
    InvalidDate { line: usize, text: String },

    #[error("line {line}: malformed time {text:?}")]
    InvalidTime { line: usize, text: String },

    #[error("line {line}: malformed period {text:?}")]
    InvalidPeriod { line: usize, text: String },

    #[error("unknown moon period: {0} weeks")]
    UnknownPeriod(u32),

    #[error("failed to fetch sheet: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
