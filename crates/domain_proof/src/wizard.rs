//! Proof of Loss wizard state machine
//!
//! A linear three-step flow. Steps gate nothing against each other while
//! navigating; every requirement is enforced once, at submission. The
//! wizard holds no persisted state, abandoning it discards all input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::LossEventId;

use crate::error::ProofError;

/// Boilerplate sworn statement pre-filled into step two
///
/// The owner may edit it freely before signing.
pub const DEFAULT_SWORN_STATEMENT: &str = "I hereby make claim against the above-named \
insurance company under the referenced policy for loss and damage to the property \
described in the attached inventory. I declare that the loss did not originate by any \
act, design, or procurement on my part, and that the statements contained herein, \
together with the supporting documentation, are true and complete to the best of my \
knowledge and belief.";

/// The wizard's three steps in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofOfLossStep {
    InsuranceInfo,
    SwornStatement,
    Signature,
}

impl ProofOfLossStep {
    /// The step after this one, if any
    pub fn next(&self) -> Option<ProofOfLossStep> {
        match self {
            ProofOfLossStep::InsuranceInfo => Some(ProofOfLossStep::SwornStatement),
            ProofOfLossStep::SwornStatement => Some(ProofOfLossStep::Signature),
            ProofOfLossStep::Signature => None,
        }
    }

    /// The step before this one, if any
    pub fn previous(&self) -> Option<ProofOfLossStep> {
        match self {
            ProofOfLossStep::InsuranceInfo => None,
            ProofOfLossStep::SwornStatement => Some(ProofOfLossStep::InsuranceInfo),
            ProofOfLossStep::Signature => Some(ProofOfLossStep::SwornStatement),
        }
    }
}

/// Validated terminal output of the wizard, ready for the submission service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOfLossSubmission {
    pub loss_event_id: LossEventId,
    pub insurer_name: String,
    pub policy_number: String,
    pub claim_number: Option<String>,
    pub sworn_statement: String,
    /// Opaque encoded signature image
    pub signature_data: String,
    pub signed_at: DateTime<Utc>,
}

impl ProofOfLossSubmission {
    /// Re-checks the submission invariants
    ///
    /// The submission service calls this before touching any collaborator,
    /// so an empty signature is rejected without a single network call.
    pub fn validate(&self) -> Result<(), ProofError> {
        if self.signature_data.trim().is_empty() {
            return Err(ProofError::MissingSignature);
        }
        if self.insurer_name.trim().is_empty() {
            return Err(ProofError::MissingField("insurer_name"));
        }
        if self.policy_number.trim().is_empty() {
            return Err(ProofError::MissingField("policy_number"));
        }
        if self.sworn_statement.trim().is_empty() {
            return Err(ProofError::MissingField("sworn_statement"));
        }
        Ok(())
    }
}

/// Driver for the three-step Proof of Loss flow
///
/// Field setters are usable from any step; the original flow lets the
/// user page back and forth to revise earlier answers.
#[derive(Debug, Clone)]
pub struct ProofOfLossWizard {
    step: ProofOfLossStep,
    loss_event_id: LossEventId,
    insurer_name: String,
    policy_number: String,
    claim_number: Option<String>,
    sworn_statement: String,
    signature_data: Option<String>,
    signed_at: Option<DateTime<Utc>>,
}

impl ProofOfLossWizard {
    /// Starts the wizard for one loss event, sworn statement pre-filled
    pub fn start(loss_event_id: LossEventId) -> Self {
        Self {
            step: ProofOfLossStep::InsuranceInfo,
            loss_event_id,
            insurer_name: String::new(),
            policy_number: String::new(),
            claim_number: None,
            sworn_statement: DEFAULT_SWORN_STATEMENT.to_string(),
            signature_data: None,
            signed_at: None,
        }
    }

    pub fn step(&self) -> ProofOfLossStep {
        self.step
    }

    pub fn loss_event_id(&self) -> LossEventId {
        self.loss_event_id
    }

    pub fn sworn_statement(&self) -> &str {
        &self.sworn_statement
    }

    /// Moves to the next step; unconditional except off the end
    pub fn advance(&mut self) -> Result<ProofOfLossStep, ProofError> {
        match self.step.next() {
            Some(next) => {
                self.step = next;
                Ok(next)
            }
            None => Err(ProofError::AlreadyAtFinalStep),
        }
    }

    /// Moves to the previous step; available everywhere but step one
    pub fn back(&mut self) -> Result<ProofOfLossStep, ProofError> {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                Ok(previous)
            }
            None => Err(ProofError::AlreadyAtFirstStep),
        }
    }

    pub fn set_insurance_info(
        &mut self,
        insurer_name: impl Into<String>,
        policy_number: impl Into<String>,
        claim_number: Option<String>,
    ) {
        self.insurer_name = insurer_name.into();
        self.policy_number = policy_number.into();
        self.claim_number = claim_number;
    }

    pub fn set_sworn_statement(&mut self, text: impl Into<String>) {
        self.sworn_statement = text.into();
    }

    /// Captures the signature and stamps the signing time
    pub fn sign(&mut self, signature_data: impl Into<String>) {
        self.signature_data = Some(signature_data.into());
        self.signed_at = Some(Utc::now());
    }

    /// Discards a captured signature
    pub fn clear_signature(&mut self) {
        self.signature_data = None;
        self.signed_at = None;
    }

    pub fn has_signature(&self) -> bool {
        self.signature_data
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }

    /// Produces the validated submission
    ///
    /// Only available from the Signature step with a captured signature
    /// and the submit-time required fields present. Purely in-memory; no
    /// collaborator is involved.
    pub fn submission(&self) -> Result<ProofOfLossSubmission, ProofError> {
        if self.step != ProofOfLossStep::Signature {
            return Err(ProofError::SubmitUnavailable);
        }

        let (signature_data, signed_at) = match (&self.signature_data, self.signed_at) {
            (Some(data), Some(at)) if !data.trim().is_empty() => (data.clone(), at),
            _ => return Err(ProofError::MissingSignature),
        };

        let submission = ProofOfLossSubmission {
            loss_event_id: self.loss_event_id,
            insurer_name: self.insurer_name.clone(),
            policy_number: self.policy_number.clone(),
            claim_number: self.claim_number.clone(),
            sworn_statement: self.sworn_statement.clone(),
            signature_data,
            signed_at,
        };
        submission.validate()?;
        Ok(submission)
    }
}
