//! JSON envelope shared by every response

use serde::Serialize;

use crate::error::ValidationFailure;

/// `{status, message?, data?, errors?}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T = ()> {
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationFailure>>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: true,
            message: Some(message.into()),
            data: Some(data),
            errors: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: Some(message.into()),
            data: None,
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: Some(message.into()),
            data: None,
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: Option<&[ValidationFailure]>) -> Self {
        self.errors = errors.map(<[ValidationFailure]>::to_vec);
        self
    }
}
