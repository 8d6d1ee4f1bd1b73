//! # AppError
//!
//! Centralized error handling for mongobnb.
//! Every failure is local to the request that produced it.

use thiserror::Error;

/// The primary error type for all mb-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// Resource not found (e.g., Listing, Booking)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// The `filter` query parameter is not one of the known selectors
    #[error("unrecognized filter: {0}")]
    UnrecognizedFilter(String),

    /// Infrastructure failure (e.g., database down, query rejected)
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A stored document lacks a field the display record needs
    #[error("document {id} is malformed: missing or invalid field `{field}`")]
    MalformedDocument { id: String, field: String },

    /// The outbound booking event could not be delivered
    #[error("notification failed: {0}")]
    Notification(String),

    /// A template failed to render
    #[error("render error: {0}")]
    Render(String),
}

impl AppError {
    pub fn listing_not_found(id: impl Into<String>) -> Self {
        Self::NotFound("Listing".to_string(), id.into())
    }

    pub fn malformed(id: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MalformedDocument {
            id: id.into(),
            field: field.into(),
        }
    }
}

/// A specialized Result type for mongobnb logic.
pub type Result<T> = std::result::Result<T, AppError>;
