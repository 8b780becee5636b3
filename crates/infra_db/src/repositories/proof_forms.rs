//! Proof of Loss form repository
//!
//! One form row per (user, loss event), enforced by a unique constraint.
//! A resubmission lands on the same row via upsert, which keeps the
//! original identifier and creation time while overwriting the content.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use core_kernel::{LossEventId, ProofOfLossFormId, UserId};
use domain_proof::{ProofOfLossForm, ProofOfLossStatus};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;

const PROOF_FORM_COLUMNS: &str = "form_id, user_id, loss_event_id, insurer_name, policy_number, \
     claim_number, sworn_statement, signature_data, signed_at, status, submitted_at, payload, \
     created_at, updated_at";

/// Database row for a Proof of Loss form
#[derive(Debug, Clone, FromRow)]
pub struct ProofFormRow {
    pub form_id: Uuid,
    pub user_id: Uuid,
    pub loss_event_id: Uuid,
    pub insurer_name: String,
    pub policy_number: String,
    pub claim_number: Option<String>,
    pub sworn_statement: String,
    pub signature_data: String,
    pub signed_at: DateTime<Utc>,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProofFormRow {
    /// Maps the row into the domain form
    pub fn into_domain(self) -> Result<ProofOfLossForm, DatabaseError> {
        let status = ProofOfLossStatus::from_str(&self.status)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

        Ok(ProofOfLossForm {
            id: ProofOfLossFormId::from_uuid(self.form_id),
            user_id: UserId::from_uuid(self.user_id),
            loss_event_id: LossEventId::from_uuid(self.loss_event_id),
            insurer_name: self.insurer_name,
            policy_number: self.policy_number,
            claim_number: self.claim_number,
            sworn_statement: self.sworn_statement,
            signature_data: self.signature_data,
            signed_at: self.signed_at,
            status,
            submitted_at: self.submitted_at,
            payload: self.payload,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for Proof of Loss form data access
#[derive(Debug, Clone)]
pub struct ProofFormRepository {
    pool: DatabasePool,
}

impl ProofFormRepository {
    /// Creates a new repository with the given connection pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Inserts or overwrites the form for (user, loss event)
    ///
    /// On conflict the existing row keeps its `form_id` and `created_at`;
    /// everything else is replaced by the incoming submission. Returns the
    /// stored row, which is the source of truth for identity.
    pub async fn upsert(&self, form: &ProofOfLossForm) -> Result<ProofOfLossForm, DatabaseError> {
        let query = format!(
            "INSERT INTO proof_of_loss_forms ({PROOF_FORM_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             ON CONFLICT (user_id, loss_event_id) DO UPDATE SET \
                 insurer_name = EXCLUDED.insurer_name, \
                 policy_number = EXCLUDED.policy_number, \
                 claim_number = EXCLUDED.claim_number, \
                 sworn_statement = EXCLUDED.sworn_statement, \
                 signature_data = EXCLUDED.signature_data, \
                 signed_at = EXCLUDED.signed_at, \
                 status = EXCLUDED.status, \
                 submitted_at = EXCLUDED.submitted_at, \
                 payload = EXCLUDED.payload, \
                 updated_at = EXCLUDED.updated_at \
             RETURNING {PROOF_FORM_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ProofFormRow>(&query)
            .bind(Uuid::from(form.id))
            .bind(Uuid::from(form.user_id))
            .bind(Uuid::from(form.loss_event_id))
            .bind(&form.insurer_name)
            .bind(&form.policy_number)
            .bind(&form.claim_number)
            .bind(&form.sworn_statement)
            .bind(&form.signature_data)
            .bind(form.signed_at)
            .bind(form.status.as_str())
            .bind(form.submitted_at)
            .bind(&form.payload)
            .bind(form.created_at)
            .bind(form.updated_at)
            .fetch_one(&self.pool)
            .await?;

        row.into_domain()
    }

    /// The stored form for (user, loss event), if any
    pub async fn find_for_event(
        &self,
        user_id: UserId,
        loss_event_id: LossEventId,
    ) -> Result<Option<ProofOfLossForm>, DatabaseError> {
        let query = format!(
            "SELECT {PROOF_FORM_COLUMNS} FROM proof_of_loss_forms \
             WHERE user_id = $1 AND loss_event_id = $2"
        );

        let row = sqlx::query_as::<_, ProofFormRow>(&query)
            .bind(Uuid::from(user_id))
            .bind(Uuid::from(loss_event_id))
            .fetch_optional(&self.pool)
            .await?;

        row.map(ProofFormRow::into_domain).transpose()
    }
}
