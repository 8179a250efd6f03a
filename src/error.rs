// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for cpuisfast

use std::io;
use thiserror::Error;

/// Result type alias for cpuisfast operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for cpuisfast
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML configuration could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport-level HTTP failure
    #[cfg(feature = "remote")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The collection endpoint answered with a non-success status
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Template placeholder problem
    #[error("Template error: {0}")]
    Template(String),

    /// Command execution failed
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// Invalid value
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
