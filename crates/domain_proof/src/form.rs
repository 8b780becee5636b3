//! Submitted Proof of Loss form record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use core_kernel::{LossEventId, ProofOfLossFormId, UserId};

use crate::error::ProofError;
use crate::wizard::ProofOfLossSubmission;

/// Form status
///
/// Forms only exist once submitted; drafts are never persisted. The
/// enum leaves room for later review states without a schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofOfLossStatus {
    Submitted,
}

impl ProofOfLossStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProofOfLossStatus::Submitted => "submitted",
        }
    }
}

impl FromStr for ProofOfLossStatus {
    type Err = ProofError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(ProofOfLossStatus::Submitted),
            _ => Err(ProofError::MissingField("status")),
        }
    }
}

/// A submitted Proof of Loss form
///
/// One row per (user, loss event); a resubmission overwrites the prior
/// form in place, keeping its identifier. Never mutated after that
/// except by another resubmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofOfLossForm {
    /// Unique identifier
    pub id: ProofOfLossFormId,
    /// Submitting user
    pub user_id: UserId,
    /// Loss event the claim is filed against
    pub loss_event_id: LossEventId,
    /// Insurance company name
    pub insurer_name: String,
    /// Policy number
    pub policy_number: String,
    /// Insurer-issued claim number, when already assigned
    pub claim_number: Option<String>,
    /// Sworn statement text as signed
    pub sworn_statement: String,
    /// Opaque encoded signature image
    pub signature_data: String,
    /// When the signature was captured
    pub signed_at: DateTime<Utc>,
    /// Status
    pub status: ProofOfLossStatus,
    /// When the form was submitted
    pub submitted_at: DateTime<Utc>,
    /// Snapshot of the submission payload as received
    pub payload: serde_json::Value,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl ProofOfLossForm {
    /// Builds the form record for a validated submission
    pub fn from_submission(user_id: UserId, submission: &ProofOfLossSubmission) -> Self {
        let now = Utc::now();
        // Serialization of the submission struct cannot fail
        let payload =
            serde_json::to_value(submission).unwrap_or(serde_json::Value::Null);

        Self {
            id: ProofOfLossFormId::new_v7(),
            user_id,
            loss_event_id: submission.loss_event_id,
            insurer_name: submission.insurer_name.clone(),
            policy_number: submission.policy_number.clone(),
            claim_number: submission.claim_number.clone(),
            sworn_statement: submission.sworn_statement.clone(),
            signature_data: submission.signature_data.clone(),
            signed_at: submission.signed_at,
            status: ProofOfLossStatus::Submitted,
            submitted_at: now,
            payload,
            created_at: now,
            updated_at: now,
        }
    }
}
