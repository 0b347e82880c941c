//! Error type shared by the engine's fallible plumbing.
//!
//! The calculators and validators never fail; errors only arise when
//! loading the payment ledger, reading configuration or rejecting a
//! malformed HTTP request.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read ledger file {path:?}: {source}")]
    LedgerIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ledger file {path:?} is not a JSON array: {source}")]
    LedgerFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
