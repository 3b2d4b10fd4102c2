//! Unified error handling for the ado-workitems library.
//!
//! This module provides the error hierarchy using `thiserror` so callers can
//! tell transport failures, unparseable bodies and rejected statuses apart.
//!
//! ## Error Categories
//!
//! - [`ApiError`]: Errors from Azure DevOps work item API interactions
//! - [`ConfigError`]: Errors from configuration loading and validation
//!
//! ## Example
//!
//! ```rust,no_run
//! use ado_workitems::error::{WorkItemsError, ConfigError};
//!
//! fn example() -> Result<(), WorkItemsError> {
//!     // Errors are automatically converted via From trait
//!     Err(ConfigError::MissingRequired {
//!         field: "pat".to_string(),
//!         env_var: "ADO_WORKITEMS_PAT".to_string(),
//!     })?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the ado-workitems library.
#[derive(Error, Debug)]
pub enum WorkItemsError {
    /// An error occurred while interacting with the Azure DevOps API.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// An error occurred while loading or validating configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A generic error for cases not covered by specific error types.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Errors that can occur when interacting with the work item API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request URL could not be built from the configured base URL.
    #[error("Invalid request URL '{url}': {message}")]
    InvalidUrl {
        /// The URL (or base URL) that was rejected.
        url: String,
        /// Why it was rejected.
        message: String,
    },

    /// A default header could not be constructed from the supplied token.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// The patch document could not be serialized.
    #[error("Failed to serialize patch document: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The response body was not valid JSON.
    #[error("Failed to parse API response (status {status}): {message}")]
    Parse {
        /// HTTP status code of the response whose body failed to parse.
        status: u16,
        /// Description of the parse error.
        message: String,
    },

    /// The API returned a non-success status and strict status checking is on.
    #[error("API request failed with status {status}: {message}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Response body returned by the API.
        message: String,
    },
}

impl ApiError {
    /// Returns the HTTP status associated with this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Parse { status, .. } | Self::RequestFailed { status, .. } => Some(*status),
            Self::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Errors that can occur during configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration field is missing.
    #[error("{field} is required (use --{field}, {env_var} env var, or config file)")]
    MissingRequired {
        /// Name of the missing field.
        field: String,
        /// Environment variable name for this field.
        env_var: String,
    },

    /// An invalid value was provided for a configuration field.
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        /// Name of the field with invalid value.
        field: String,
        /// Description of why the value is invalid.
        message: String,
    },

    /// Failed to read the configuration file.
    #[error("Failed to read config file at {path}: {message}")]
    FileReadError {
        /// Path to the config file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Failed to parse the configuration file.
    #[error("Failed to parse config file at {path}: {message}")]
    ParseError {
        /// Path to the config file.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Failed to create config directory.
    #[error("Failed to create config directory at {path}: {message}")]
    DirectoryCreationError {
        /// Path where directory creation failed.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Neither XDG_CONFIG_HOME nor a home directory is available.
    #[error("Could not determine a configuration directory")]
    NoConfigDirectory,
}

/// Result type for work item API calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Type alias for Results using WorkItemsError.
///
/// Note: This is not re-exported from the crate root to avoid shadowing `anyhow::Result`.
pub type WorkItemsResult<T> = std::result::Result<T, WorkItemsError>;
