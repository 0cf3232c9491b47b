//! Error types.
//!
//! - `EtlError`: what a single pipeline stage can fail with. Stages return it
//!   explicitly; the ETL pipeline decides to log it and carry on.
//! - `AppError`: process-level failure carrying the exit code `main` reports.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the extract/load stages and of the database reader.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("response body from {url} is empty")]
    EmptyBody { url: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("CSV line {line} has {found} fields, header has {expected}")]
    RaggedRecord {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("inconsistent table: {0}")]
    Shape(#[from] crate::domain::LengthMismatch),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("failed to start storage runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("database '{}' not found", .0.display())]
    MissingDatabase(PathBuf),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<EtlError> for AppError {
    fn from(err: EtlError) -> Self {
        Self::new(1, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
