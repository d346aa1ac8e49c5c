use thiserror::Error;

/// Failures surfaced by the store engine and its backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store is not open")]
    NotOpen,

    #[error("store connection failed: {0}")]
    Connection(String),

    #[error("store protocol error: {0}")]
    Protocol(String),

    #[error("store i/o error: {0}")]
    Io(#[from] std::io::Error),
}
