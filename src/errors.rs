//! Unified error types for the solshare core.
//!
//! All operations are request-scoped: every failure is surfaced as a value
//! with a human-readable message, never as a process-fatal condition.

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or parsing failure
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Input failed domain validation (bad month reference, empty item list, ...)
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the validation failure
        message: String,
    },

    /// A numeric quantity was out of range or non-finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The offending value
        amount: f64,
    },

    /// No generator with the given identifier
    #[error("Generator not found: {id}")]
    GeneratorNotFound {
        /// Identifier used in the lookup
        id: String,
    },

    /// No subscriber with the given identifier
    #[error("Subscriber not found: {id}")]
    SubscriberNotFound {
        /// Identifier used in the lookup
        id: String,
    },

    /// No allocation record with the given identifier
    #[error("Rateio not found: {id}")]
    RateioNotFound {
        /// Header id used in the lookup
        id: i64,
    },

    /// No invoice-validation record with the given identifier
    #[error("Invoice validation record not found: {id}")]
    ValidationRecordNotFound {
        /// Record id used in the lookup
        id: i64,
    },

    /// Attempted a lifecycle transition the state machine does not allow
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition {
        /// Current persisted status
        from: String,
        /// Requested status
        to: String,
    },

    /// The external invoice scraper failed; the upstream message is preserved verbatim
    #[error("Upstream scraper error: {message}")]
    Upstream {
        /// Message reported by the upstream service
        message: String,
    },

    /// The interactive consumption prompt was cancelled before a value was supplied
    #[error("Consumption resolution abandoned for {month_reference}")]
    ResolutionAbandoned {
        /// Month the value was requested for, "MM/AAAA"
        month_reference: String,
    },

    /// Database error from the underlying store
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
