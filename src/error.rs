//! Structured error types for settings resolution.

use serde::Serialize;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // User input errors
    UnknownField,
    MissingRequiredField,
    MissingPropertiesResource,
    MalformedPropertiesStream,
    EmptyInput,

    // Internal mapping errors
    FieldAccessError,
    DefaultLookupFailure,
    DuplicateField,
}

/// Errors raised while parsing a properties stream.
#[derive(Debug, Error)]
pub enum PropertiesError {
    #[error("I/O error reading properties: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed \\uXXXX encoding on line {line}")]
    MalformedUnicodeEscape { line: usize },
}

/// Errors raised while building, populating or resolving a field registry.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown parameter: '{0}'")]
    UnknownField(String),

    #[error("Cannot access field '{key}': {reason}")]
    FieldAccess { key: String, reason: String },

    #[error("Cannot read default value for '{key}': {reason}")]
    DefaultLookup { key: String, reason: String },

    #[error("Could not load the properties file '{path}'")]
    MalformedPropertiesStream {
        path: String,
        #[source]
        source: PropertiesError,
    },

    #[error("Failed to resolve the properties file '{0}'")]
    MissingPropertiesResource(String),

    #[error("Properties file input stream is missing")]
    EmptyInput,

    #[error("Duplicate field name: '{0}'")]
    DuplicateField(String),

    #[error("Required parameter '{0}' is not set")]
    MissingRequired(String),
}

impl ConfigError {
    pub fn field_access(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::FieldAccess {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn default_lookup(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::DefaultLookup {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable code for machine-readable output.
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigError::UnknownField(_) => ErrorCode::UnknownField,
            ConfigError::FieldAccess { .. } => ErrorCode::FieldAccessError,
            ConfigError::DefaultLookup { .. } => ErrorCode::DefaultLookupFailure,
            ConfigError::MalformedPropertiesStream { .. } => ErrorCode::MalformedPropertiesStream,
            ConfigError::MissingPropertiesResource(_) => ErrorCode::MissingPropertiesResource,
            ConfigError::EmptyInput => ErrorCode::EmptyInput,
            ConfigError::DuplicateField(_) => ErrorCode::DuplicateField,
            ConfigError::MissingRequired(_) => ErrorCode::MissingRequiredField,
        }
    }

    /// The field name or resource path this error points at, if any.
    pub fn subject(&self) -> Option<&str> {
        match self {
            ConfigError::UnknownField(key)
            | ConfigError::FieldAccess { key, .. }
            | ConfigError::DefaultLookup { key, .. }
            | ConfigError::DuplicateField(key)
            | ConfigError::MissingRequired(key) => Some(key.as_str()),
            ConfigError::MalformedPropertiesStream { path, .. }
            | ConfigError::MissingPropertiesResource(path) => Some(path.as_str()),
            ConfigError::EmptyInput => None,
        }
    }
}

/// Serializable error report for CLI output.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl From<&ConfigError> for ErrorReport {
    fn from(err: &ConfigError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            subject: err.subject().map(str::to_string),
        }
    }
}

/// Result type for settings operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
