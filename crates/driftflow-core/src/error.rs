//! Core error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading declared state or schemas
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("State file error: {path}: {message}")]
    StateError { path: PathBuf, message: String },

    #[error("State file {path} has version {version}, newer than supported version {supported}")]
    UnsupportedStateVersion {
        path: PathBuf,
        version: u32,
        supported: u32,
    },

    #[error("No state file found matching: {0}")]
    NoStateFiles(String),

    #[error("Invalid glob pattern")]
    Glob(#[from] glob::PatternError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
