use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("min_support must be in (0, 1], got {0}")]
    InvalidMinSupport(f64),
    #[error("max_len must be at least 1")]
    InvalidMaxLen,
    #[error("max_entries must be at least 1")]
    InvalidMaxEntries,
    #[error("code prefix must not contain whitespace, got {0:?}")]
    InvalidCodePrefix(String),
    #[error("invalid dictionary: {0}")]
    Dictionary(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
