//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Endpoint label is malformed
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// An endpoint set needs at least one member
    #[error("Endpoint set must not be empty")]
    EmptyEndpointSet,
}
