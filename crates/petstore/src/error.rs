//! Error types for petstore.
//!
//! This module defines all error types used throughout the petstore crate,
//! separating payload validation failures from addressing mistakes and from
//! persistence failures that are passed up unmodified.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for petstore operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// A column value failed a business rule.
    #[error("invalid value for `{column}`: {message}")]
    Validation {
        /// Column that carried the offending value.
        column: &'static str,
        /// Description of the rule that was broken.
        message: String,
    },

    /// A column required by the operation was not supplied.
    #[error("missing required column `{column}`")]
    MissingColumn {
        /// Name of the missing column.
        column: &'static str,
    },

    /// A payload or projection named a column the contract does not define.
    #[error("unknown column `{column}`")]
    UnknownColumn {
        /// The offending column name.
        column: String,
    },

    // === Addressing Errors ===
    /// The address does not match any pattern served by the provider.
    #[error("unknown address: {address}")]
    UnknownAddress {
        /// The address as supplied by the caller.
        address: String,
    },

    /// The address is valid but the operation is not defined for it.
    #[error("{operation} is not supported for {address}")]
    UnsupportedOperation {
        /// Name of the rejected operation.
        operation: &'static str,
        /// The address the operation targeted.
        address: String,
    },

    /// The addressed record does not exist.
    #[error("no pet found at {address}")]
    NotFound {
        /// The address that was looked up.
        address: String,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for petstore operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error for a column.
    #[must_use]
    pub fn validation(column: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            column,
            message: message.into(),
        }
    }

    /// Create a new unknown address error.
    #[must_use]
    pub fn unknown_address(address: impl Into<String>) -> Self {
        Self::UnknownAddress {
            address: address.into(),
        }
    }

    /// Create a new unsupported operation error.
    #[must_use]
    pub fn unsupported(operation: &'static str, address: impl ToString) -> Self {
        Self::UnsupportedOperation {
            operation,
            address: address.to_string(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error rejected the caller's payload.
    ///
    /// Covers business-rule failures, missing required columns and columns
    /// outside the contract.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::MissingColumn { .. } | Self::UnknownColumn { .. }
        )
    }

    /// Check if this error reports a missing record.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
