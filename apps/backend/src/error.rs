use serde::Serialize;
use thiserror::Error;

use crate::errors::domain::DomainError;
use crate::errors::ErrorCode;

/// Rejection body sent to table clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemDetails {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Forbidden: {detail}")]
    Forbidden { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Conflict { code, .. }
            | AppError::BadRequest { code, .. } => *code,
            AppError::Forbidden { .. } => ErrorCode::Forbidden,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            AppError::Validation { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Conflict { detail, .. }
            | AppError::BadRequest { detail, .. }
            | AppError::Forbidden { detail }
            | AppError::Internal { detail }
            | AppError::Config { detail } => detail,
        }
    }

    /// Whether a client caused this error (as opposed to the server).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AppError::Internal { .. } | AppError::Config { .. })
    }

    pub fn problem(&self) -> ProblemDetails {
        ProblemDetails {
            code: self.code(),
            message: self.detail().to_string(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code: ErrorCode::BadRequest,
            detail: detail.into(),
        }
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::Forbidden {
            detail: detail.into(),
        }
    }

    pub fn table_not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            code: ErrorCode::TableNotFound,
            detail: detail.into(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let code = ErrorCode::from(&err);
        match err {
            DomainError::Validation(_, detail) => AppError::Validation { code, detail },
            DomainError::NotFound(_, detail) => AppError::NotFound { code, detail },
            DomainError::Conflict(_, detail) => AppError::Conflict { code, detail },
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::bad_request(format!("Malformed message: {err}"))
    }
}
