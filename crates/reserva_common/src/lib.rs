// --- File: crates/reserva_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod logging; // Logging utilities
pub mod services; // Data-source abstractions and shared domain model

// Re-export error types and utilities for easier access
pub use error::{
    config_error, conflict, internal_error, not_found, store_error, validation_error, Context,
    HttpStatusCode, ReservaError,
};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level};

// This crate provides common functionality that can be used across the application.
// It includes the shared scheduling domain model, the data-source traits the
// validation pipeline consumes, error handling, and logging utilities.
