//! Proof of Loss domain errors

use core_kernel::{MoneyError, PortError};
use thiserror::Error;

/// Errors that can occur in the Proof of Loss domain
#[derive(Debug, Error)]
pub enum ProofError {
    #[error("Signature is required before submission")]
    MissingSignature,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Already at the first step")]
    AlreadyAtFirstStep,

    #[error("Already at the final step")]
    AlreadyAtFinalStep,

    #[error("Submission is only available from the signature step")]
    SubmitUnavailable,

    #[error("Loss event not found: {0}")]
    EventNotFound(String),

    #[error("No submitted form for loss event: {0}")]
    FormNotFound(String),

    #[error("Asset values could not be totalled: {0}")]
    ValueAggregation(#[from] MoneyError),

    #[error(transparent)]
    Port(#[from] PortError),
}

impl ProofError {
    /// Returns true if this error should surface as a 404 to callers
    pub fn is_not_found(&self) -> bool {
        match self {
            ProofError::EventNotFound(_) | ProofError::FormNotFound(_) => true,
            ProofError::Port(e) => e.is_not_found(),
            _ => false,
        }
    }

    /// Returns true for input problems the user can correct and retry
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ProofError::MissingSignature | ProofError::MissingField(_)
        )
    }
}
