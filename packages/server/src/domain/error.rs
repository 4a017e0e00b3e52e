//! Domain validation errors.

use thiserror::Error;

/// Errors raised by domain value-object constructors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Client id must be a non-empty string
    #[error("client id must not be empty")]
    EmptyClientId,

    /// Room id must be a non-empty string
    #[error("room id must not be empty")]
    EmptyRoomId,
}
