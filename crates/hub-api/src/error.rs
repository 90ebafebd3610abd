//! HTTP error envelope.
//!
//! Every failure is rendered as `{"error": {"code", "message", "details"?}}`.
//! Only caller mistakes get a specific message; anything else is reported
//! as a generic internal error and the cause stays in the logs.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

const INTERNAL_MESSAGE: &str = "An internal error occurred while processing the request";

/// Which request field was rejected and why.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ErrorDetails {
    pub field: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

/// Error response envelope.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<ErrorDetails>,
    },
    #[error("{}", INTERNAL_MESSAGE)]
    Internal,
}

impl ApiError {
    pub fn validation_field(field: &str, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        ApiError::Validation {
            message: format!("Invalid parameter '{}': {}", field, reason),
            details: Some(ErrorDetails {
                field: field.to_string(),
                reason,
            }),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => VALIDATION_ERROR,
            ApiError::Internal => INTERNAL_ERROR,
        }
    }
}

impl From<hub_core::Error> for ApiError {
    fn from(err: hub_core::Error) -> Self {
        match err {
            hub_core::Error::InvalidInput {
                field: Some(field),
                message,
            } => ApiError::validation_field(&field, message),
            hub_core::Error::InvalidInput {
                field: None,
                message,
            } => ApiError::Validation {
                message,
                details: None,
            },
            other => {
                error!(error = %other, "Request failed");
                ApiError::Internal
            }
        }
    }
}

/// A query string that cannot be decoded, e.g. a repeated parameter.
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation {
            message: rejection.body_text(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();
        let (message, details) = match self {
            ApiError::Validation { message, details } => (message, details),
            ApiError::Internal => (INTERNAL_MESSAGE.to_string(), None),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message,
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}
