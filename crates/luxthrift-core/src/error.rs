//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A submission was malformed and rejected before persistence.
    #[error("validation error: {0}")]
    Validation(String),

    /// The submitted action is not one of the tracked activity kinds.
    #[error("invalid event kind: {0}")]
    InvalidEventKind(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),

    /// One of the CRM insight queries failed; the whole insight set is void.
    #[error("aggregation error: {0}")]
    Aggregation(String),
}
