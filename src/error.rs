//! Error types for the audio device API
//!
//! [`AppError`] is the closed set of failures the API reports to clients
//! verbatim. Everything else wrapped by [`Error`] is treated as an internal
//! failure and rendered as a generic 500 by the central translator in
//! [`crate::api::translator`].

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The application error carried by this error, if it is one the
    /// client is allowed to see.
    pub fn as_app_error(&self) -> Option<&AppError> {
        match self {
            Error::App(err) => Some(err),
            Error::Audio(_) | Error::Config(_) | Error::Task(_) | Error::Io(_) => None,
        }
    }
}

/// A single violated validation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub field: String,
    pub rule: String,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// Errors raised deliberately by request handling
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("{message}")]
    Application {
        message: String,
        status: StatusCode,
        operational: bool,
    },

    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<ValidationFailure>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),
}

impl AppError {
    /// Operational error with an explicit status code
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        AppError::Application {
            message: message.into(),
            status,
            operational: true,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::BAD_REQUEST)
    }

    pub fn validation(details: Vec<ValidationFailure>) -> Self {
        AppError::Validation {
            message: "Validation failed".to_string(),
            details,
        }
    }

    pub fn not_found() -> Self {
        AppError::NotFound("Resource not found".to_string())
    }

    pub fn unauthorized() -> Self {
        AppError::Unauthorized("Unauthorized access".to_string())
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Application { message, .. } | AppError::Validation { message, .. } => message,
            AppError::NotFound(message) | AppError::Unauthorized(message) => message,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Application { status, .. } => *status,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn is_operational(&self) -> bool {
        match self {
            AppError::Application { operational, .. } => *operational,
            AppError::Validation { .. } | AppError::NotFound(_) | AppError::Unauthorized(_) => true,
        }
    }

    /// Field-level detail, only present for validation failures
    pub fn details(&self) -> Option<&[ValidationFailure]> {
        match self {
            AppError::Validation { details, .. } => Some(details),
            _ => None,
        }
    }
}

/// Audio capability errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("No default playback device")]
    NoDefaultDevice,

    #[error("Audio host unavailable: {0}")]
    HostUnavailable(String),

    #[error("Device selection is not supported on this platform")]
    Unsupported,

    #[error("Device selection failed: {0}")]
    SelectionFailed(String),

    #[error("Audio command failed: {0}")]
    CommandFailed(String),

    #[error("cpal error: {0}")]
    CpalError(String),
}

/// Bootstrap configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Prompt failed: {0}")]
    Prompt(#[source] std::io::Error),
}

/// Route registration errors, contained by the registry
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Dependency unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid endpoint {0:?}")]
    InvalidEndpoint(String),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;
