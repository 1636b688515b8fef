//! Ignore rule errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid ignore rule on line {line}: expected at least 2 segments, got {segments}: {content}")]
    RuleParse {
        line: usize,
        content: String,
        segments: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FilterError>;
