use thiserror::Error;

use flightfeed_store::StoreError;

/// Domain construction failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("flight must contain at least one slice")]
    EmptyItinerary,

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("invalid source spec: {0}")]
    InvalidSource(String),
}

/// One failed fetch attempt.
///
/// Every variant feeds the occurrence's retry counter, store write failures
/// included — a response that cannot be cached is treated the same as one
/// that never arrived.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("source returned status {status}")]
    Http { status: u16 },

    #[error("malformed source response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
