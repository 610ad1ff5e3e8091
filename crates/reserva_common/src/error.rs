// --- File: crates/reserva_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Reserva errors.
///
/// This enum provides a common set of error variants that can be used across all crates.
/// Each crate can extend this by implementing From<SpecificError> for ReservaError.
#[derive(Error, Debug)]
pub enum ReservaError {
    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred while reading from or writing to the schedule store
    #[error("Store error: {0}")]
    StoreError(String),

    /// Error occurred due to a conflict (e.g., slot already booked)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
///
/// This trait can be implemented by error types to provide a consistent way
/// to convert errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for ReservaError {
    fn status_code(&self) -> u16 {
        match self {
            ReservaError::ParseError(_) => 400,
            ReservaError::ConfigError(_) => 500,
            ReservaError::ValidationError(_) => 400,
            ReservaError::StoreError(_) => 503,
            ReservaError::ConflictError(_) => 409,
            ReservaError::NotFoundError(_) => 404,
            ReservaError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
///
/// This trait can be implemented by error types to provide a consistent way
/// to add context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, ReservaError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, ReservaError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, ReservaError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| ReservaError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, ReservaError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| ReservaError::InternalError(format!("{}: {}", f(), error)))
    }
}

// Common error conversions
impl From<serde_json::Error> for ReservaError {
    fn from(err: serde_json::Error) -> Self {
        ReservaError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for ReservaError {
    fn from(err: std::io::Error) -> Self {
        ReservaError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> ReservaError {
    ReservaError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> ReservaError {
    ReservaError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> ReservaError {
    ReservaError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> ReservaError {
    ReservaError::ConflictError(message.to_string())
}

pub fn store_error<T: fmt::Display>(message: T) -> ReservaError {
    ReservaError::StoreError(message.to_string())
}

pub fn internal_error<T: fmt::Display>(message: T) -> ReservaError {
    ReservaError::InternalError(message.to_string())
}
