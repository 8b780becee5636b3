//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use core_kernel::PortError;
use domain_jumpstart::JumpstartError;
use domain_loss::LossError;
use domain_proof::ProofError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation failed")]
    Validation(Vec<String>),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unauthorized".to_string(),
                None,
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg, None)
            }
            ApiError::Internal(msg) => {
                // Real cause goes to the log, not to the client
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::Validation(items) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Validation failed".to_string(),
                Some(items),
            ),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl ApiError {
    /// Maps a port-level failure onto the matching HTTP error
    fn from_port(err: PortError) -> Self {
        let message = err.to_string();
        match err {
            PortError::NotFound { .. } => ApiError::NotFound(message),
            PortError::Validation { .. } => ApiError::BadRequest(message),
            PortError::Conflict { .. } => ApiError::Conflict(message),
            PortError::Unauthorized { .. } => ApiError::Unauthorized,
            PortError::Connection { .. }
            | PortError::Timeout { .. }
            | PortError::ServiceUnavailable { .. } => ApiError::ServiceUnavailable(message),
            PortError::Internal { .. } => ApiError::Internal(message),
        }
    }
}

impl From<LossError> for ApiError {
    fn from(err: LossError) -> Self {
        let message = err.to_string();
        match err {
            LossError::EventNotFound(_) => ApiError::NotFound(message),
            LossError::MissingField(_) | LossError::InvalidField { .. } => {
                ApiError::BadRequest(message)
            }
            LossError::EventClosed => ApiError::Conflict(message),
            LossError::Port(port) => ApiError::from_port(port),
        }
    }
}

impl From<ProofError> for ApiError {
    fn from(err: ProofError) -> Self {
        let message = err.to_string();
        match err {
            ProofError::EventNotFound(_) | ProofError::FormNotFound(_) => {
                ApiError::NotFound(message)
            }
            ProofError::MissingSignature
            | ProofError::MissingField(_)
            | ProofError::AlreadyAtFirstStep
            | ProofError::AlreadyAtFinalStep
            | ProofError::SubmitUnavailable => ApiError::BadRequest(message),
            // Mixed currencies in stored inventory is a data problem, not user input
            ProofError::ValueAggregation(_) => ApiError::Internal(message),
            ProofError::Port(port) => ApiError::from_port(port),
        }
    }
}

impl From<JumpstartError> for ApiError {
    fn from(err: JumpstartError) -> Self {
        let message = err.to_string();
        match err {
            JumpstartError::SessionNotFound(_) => ApiError::NotFound(message),
            JumpstartError::UnknownMode(_) | JumpstartError::Value(_) => {
                ApiError::BadRequest(message)
            }
            JumpstartError::NoCurrentPrompt | JumpstartError::SessionClosed => {
                ApiError::Conflict(message)
            }
            JumpstartError::Port(port) => ApiError::from_port(port),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<String> = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                match &error.message {
                    Some(message) => details.push(format!("{}: {}", field, message)),
                    None => details.push(format!("{}: {}", field, error.code)),
                }
            }
        }
        details.sort();
        ApiError::Validation(details)
    }
}
