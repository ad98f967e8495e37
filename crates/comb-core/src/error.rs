//! Error types for program generation.
//!
//! These are fatal conditions. A candidate program being rejected is not an
//! error; see `Rejection` in `comb-gen`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The generator was asked for something it can never produce, e.g. an
    /// instruction while no type has two values to pick from.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error("Invalid IR: {0}")]
    InvalidIr(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
