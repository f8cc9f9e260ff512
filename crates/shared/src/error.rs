use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body sent for any failed request: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    PayloadTooLarge,
    Unavailable,
    Internal,
}

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{code:?}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// Internal failure detail stays in the logs; clients get the generic text.
    pub fn public_message(&self) -> &str {
        match self.code {
            ErrorCode::Internal => INTERNAL_ERROR_MESSAGE,
            ErrorCode::Validation | ErrorCode::PayloadTooLarge | ErrorCode::Unavailable => {
                &self.message
            }
        }
    }
}

impl From<&ApiError> for ErrorResponse {
    fn from(value: &ApiError) -> Self {
        Self::new(value.public_message())
    }
}
