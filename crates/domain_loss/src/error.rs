//! Loss event domain errors

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur in the loss event domain
#[derive(Debug, Error)]
pub enum LossError {
    #[error("Loss event not found: {0}")]
    EventNotFound(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid field value for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("Loss event is closed")]
    EventClosed,

    #[error(transparent)]
    Port(#[from] PortError),
}

impl LossError {
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        LossError::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// Returns true if this error should surface as a 404 to callers
    pub fn is_not_found(&self) -> bool {
        match self {
            LossError::EventNotFound(_) => true,
            LossError::Port(e) => e.is_not_found(),
            _ => false,
        }
    }
}
