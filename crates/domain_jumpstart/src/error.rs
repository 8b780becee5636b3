//! Jumpstart domain errors

use core_kernel::{MoneyError, PortError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JumpstartError {
    #[error("Jumpstart session not found: {0}")]
    SessionNotFound(String),

    #[error("Unknown jumpstart mode: {0}")]
    UnknownMode(String),

    #[error("Session has no current prompt; every prompt is already completed or skipped")]
    NoCurrentPrompt,

    #[error("Session is already completed or dismissed")]
    SessionClosed,

    #[error("Invalid item value: {0}")]
    Value(#[from] MoneyError),

    #[error(transparent)]
    Port(#[from] PortError),
}

impl JumpstartError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, JumpstartError::SessionNotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            JumpstartError::UnknownMode(_)
                | JumpstartError::NoCurrentPrompt
                | JumpstartError::SessionClosed
                | JumpstartError::Value(_)
        )
    }
}
