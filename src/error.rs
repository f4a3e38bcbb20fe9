use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot extract day/month/year from pdf file {}", .file.display())]
    MissingPeriod { file: PathBuf },

    #[error("auto detection of account failed for {}", .file.display())]
    AccountDetection { file: PathBuf },

    #[error("account {found} does not match account {expected} of previous statements")]
    AccountMismatch { expected: String, found: String },

    #[error("Cannot decide whether credit or debit ({spacing} spacing characters) for line {line:?}")]
    AmbiguousSpacing { line: String, spacing: usize },

    #[error("Impossible date in line {line:?}")]
    InvalidDate { line: String },

    #[error("invalid layout: {0}")]
    Layout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
