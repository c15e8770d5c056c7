use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during tokenization or parser acquisition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("language `{0}` is not supported")]
    UnsupportedLanguage(String),
    #[error("no parser became available within {waited:?} (pool size {capacity})")]
    PoolExhausted { waited: Duration, capacity: usize },
}
