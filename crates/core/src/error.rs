//! Error types for the polling path, the command path, and configuration.

use thiserror::Error;

/// A single snapshot fetch failed. Never fatal to the polling loop.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure (connect refused, reset, timeout from the client).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        message: String,
    },

    /// The body did not have the expected shape.
    #[error("unexpected response shape: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    /// Coarse class used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Http(_) | FetchError::Status { .. } => "transport",
            FetchError::Parse(_) => "parse",
        }
    }
}

/// A start or stop command did not go through.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The server could not be reached or its answer was unreadable.
    #[error("could not reach training server: {0}")]
    Unreachable(#[from] FetchError),

    /// The server refused the command.
    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// A config file named on the command line does not exist.
    #[error("Config file not found: {0}")]
    MissingFile(String),

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Figment(Box::new(e))
    }
}
