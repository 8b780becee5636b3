//! Jumpstart session repository
//!
//! Sessions and their prompt checklists persist after every step so a
//! session survives reloads and comes back days later. Completing a
//! prompt is transactional: the prompt flips to completed and the
//! session's counters advance as server-side arithmetic on the stored
//! row, so two tabs racing on the same prompt cannot double-count.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use core_kernel::{AssetId, JumpstartPromptId, JumpstartSessionId, Money, UserId};
use domain_jumpstart::{JumpstartMode, JumpstartPrompt, JumpstartSession};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;
use crate::repositories::money_from_required_columns;

const SESSION_COLUMNS: &str = "session_id, user_id, mode, items_target, items_completed, \
     total_value_amount, total_value_currency, completed, skipped, started_at, completed_at";

const PROMPT_COLUMNS: &str =
    "prompt_id, session_id, prompt_index, prompt_key, completed, skipped, asset_id, completed_at";

/// Database row for a jumpstart session
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub mode: String,
    pub items_target: i32,
    pub items_completed: i32,
    pub total_value_amount: Decimal,
    pub total_value_currency: String,
    pub completed: bool,
    pub skipped: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionRow {
    /// Maps the row into the domain session
    pub fn into_domain(self) -> Result<JumpstartSession, DatabaseError> {
        let mode = JumpstartMode::from_str(&self.mode)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
        let total_value =
            money_from_required_columns(self.total_value_amount, &self.total_value_currency)?;

        Ok(JumpstartSession {
            id: JumpstartSessionId::from_uuid(self.session_id),
            user_id: UserId::from_uuid(self.user_id),
            mode,
            items_target: self.items_target,
            items_completed: self.items_completed,
            total_value,
            completed: self.completed,
            skipped: self.skipped,
            started_at: self.started_at,
            completed_at: self.completed_at,
        })
    }
}

/// Database row for a jumpstart prompt
#[derive(Debug, Clone, FromRow)]
pub struct PromptRow {
    pub prompt_id: Uuid,
    pub session_id: Uuid,
    pub prompt_index: i32,
    pub prompt_key: String,
    pub completed: bool,
    pub skipped: bool,
    pub asset_id: Option<Uuid>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl PromptRow {
    /// Maps the row into the domain prompt
    pub fn into_domain(self) -> JumpstartPrompt {
        JumpstartPrompt {
            id: JumpstartPromptId::from_uuid(self.prompt_id),
            session_id: JumpstartSessionId::from_uuid(self.session_id),
            prompt_index: self.prompt_index,
            prompt_key: self.prompt_key,
            completed: self.completed,
            skipped: self.skipped,
            asset_id: self.asset_id.map(AssetId::from_uuid),
            completed_at: self.completed_at,
        }
    }
}

/// Guard row for resolving a prompt inside a transaction
#[derive(Debug, FromRow)]
struct PromptStateRow {
    completed: bool,
    skipped: bool,
}

/// Repository for jumpstart session data access
#[derive(Debug, Clone)]
pub struct JumpstartRepository {
    pool: DatabasePool,
}

impl JumpstartRepository {
    /// Creates a new repository with the given connection pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Persists a new session with its full prompt checklist
    pub async fn create_session(
        &self,
        session: &JumpstartSession,
        prompts: &[JumpstartPrompt],
    ) -> Result<(), DatabaseError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        let session_query = format!(
            "INSERT INTO jumpstart_sessions ({SESSION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"
        );

        sqlx::query(&session_query)
            .bind(Uuid::from(session.id))
            .bind(Uuid::from(session.user_id))
            .bind(session.mode.as_str())
            .bind(session.items_target)
            .bind(session.items_completed)
            .bind(session.total_value.amount())
            .bind(session.total_value.currency().code())
            .bind(session.completed)
            .bind(session.skipped)
            .bind(session.started_at)
            .bind(session.completed_at)
            .execute(&mut *tx)
            .await?;

        let prompt_query = format!(
            "INSERT INTO jumpstart_prompts ({PROMPT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        );

        for prompt in prompts {
            sqlx::query(&prompt_query)
                .bind(Uuid::from(prompt.id))
                .bind(Uuid::from(prompt.session_id))
                .bind(prompt.prompt_index)
                .bind(&prompt.prompt_key)
                .bind(prompt.completed)
                .bind(prompt.skipped)
                .bind(prompt.asset_id.map(Uuid::from))
                .bind(prompt.completed_at)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Fetches one session with its prompts, ordered by prompt index
    pub async fn find_by_id(
        &self,
        id: JumpstartSessionId,
    ) -> Result<(JumpstartSession, Vec<JumpstartPrompt>), DatabaseError> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM jumpstart_sessions WHERE session_id = $1"
        );

        let row = sqlx::query_as::<_, SessionRow>(&query)
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("JumpstartSession", id))?;

        let session = row.into_domain()?;
        let prompts = self.prompts_for(id).await?;
        Ok((session, prompts))
    }

    /// The user's most recently started open session, if any
    ///
    /// Open means neither completed nor dismissed; the query walks the
    /// partial index on (user_id, started_at).
    pub async fn find_resumable(
        &self,
        user_id: UserId,
    ) -> Result<Option<(JumpstartSession, Vec<JumpstartPrompt>)>, DatabaseError> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM jumpstart_sessions \
             WHERE user_id = $1 AND NOT completed AND NOT skipped \
             ORDER BY started_at DESC \
             LIMIT 1"
        );

        let row = sqlx::query_as::<_, SessionRow>(&query)
            .bind(Uuid::from(user_id))
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let session = row.into_domain()?;
        let prompts = self.prompts_for(session.id).await?;
        Ok(Some((session, prompts)))
    }

    /// Completes one prompt and advances the session counters
    ///
    /// Runs in a transaction. The prompt row is locked and checked first,
    /// so a prompt already completed or skipped fails as a duplicate and
    /// the counters never move twice for one prompt. The counter update is
    /// arithmetic on the stored row; the caller never supplies computed
    /// totals. Returns the post-increment session.
    pub async fn complete_prompt(
        &self,
        session_id: JumpstartSessionId,
        prompt_index: i32,
        asset_id: Option<AssetId>,
        value: Money,
        completed_at: DateTime<Utc>,
    ) -> Result<JumpstartSession, DatabaseError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        self.lock_pending_prompt(&mut tx, session_id, prompt_index)
            .await?;

        sqlx::query(
            "UPDATE jumpstart_prompts \
             SET completed = TRUE, asset_id = $3, completed_at = $4 \
             WHERE session_id = $1 AND prompt_index = $2",
        )
        .bind(Uuid::from(session_id))
        .bind(prompt_index)
        .bind(asset_id.map(Uuid::from))
        .bind(completed_at)
        .execute(&mut *tx)
        .await?;

        let session_query = format!(
            "UPDATE jumpstart_sessions \
             SET items_completed = items_completed + 1, \
                 total_value_amount = total_value_amount + $2 \
             WHERE session_id = $1 AND total_value_currency = $3 \
             RETURNING {SESSION_COLUMNS}"
        );

        let row = sqlx::query_as::<_, SessionRow>(&session_query)
            .bind(Uuid::from(session_id))
            .bind(value.amount())
            .bind(value.currency().code())
            .fetch_optional(&mut *tx)
            .await?
            // The session row exists (the prompt's FK proved it), so the
            // only way to miss is a currency mismatch.
            .ok_or_else(|| {
                DatabaseError::ConstraintViolation(format!(
                    "item value currency {} does not match the session total",
                    value.currency().code()
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        row.into_domain()
    }

    /// Skips one prompt without touching the session counters
    pub async fn skip_prompt(
        &self,
        session_id: JumpstartSessionId,
        prompt_index: i32,
        skipped_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        self.lock_pending_prompt(&mut tx, session_id, prompt_index)
            .await?;

        sqlx::query(
            "UPDATE jumpstart_prompts \
             SET skipped = TRUE, completed_at = $3 \
             WHERE session_id = $1 AND prompt_index = $2",
        )
        .bind(Uuid::from(session_id))
        .bind(prompt_index)
        .bind(skipped_at)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Marks a session finished
    ///
    /// The first call stamps `completed_at`; later calls keep the stored
    /// timestamp, so finishing is idempotent.
    pub async fn complete_session(
        &self,
        session_id: JumpstartSessionId,
        completed_at: DateTime<Utc>,
    ) -> Result<JumpstartSession, DatabaseError> {
        let query = format!(
            "UPDATE jumpstart_sessions \
             SET completed = TRUE, completed_at = COALESCE(completed_at, $2) \
             WHERE session_id = $1 \
             RETURNING {SESSION_COLUMNS}"
        );

        let row = sqlx::query_as::<_, SessionRow>(&query)
            .bind(Uuid::from(session_id))
            .bind(completed_at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("JumpstartSession", session_id))?;

        row.into_domain()
    }

    /// Marks a session dismissed so it no longer offers to resume
    pub async fn dismiss_session(
        &self,
        session_id: JumpstartSessionId,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE jumpstart_sessions SET skipped = TRUE WHERE session_id = $1")
            .bind(Uuid::from(session_id))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("JumpstartSession", session_id));
        }

        Ok(())
    }

    async fn prompts_for(
        &self,
        session_id: JumpstartSessionId,
    ) -> Result<Vec<JumpstartPrompt>, DatabaseError> {
        let query = format!(
            "SELECT {PROMPT_COLUMNS} FROM jumpstart_prompts \
             WHERE session_id = $1 \
             ORDER BY prompt_index"
        );

        let rows = sqlx::query_as::<_, PromptRow>(&query)
            .bind(Uuid::from(session_id))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PromptRow::into_domain).collect())
    }

    /// Locks the prompt row and verifies it is still pending
    ///
    /// `FOR UPDATE` serializes concurrent resolutions of the same prompt;
    /// the loser of the race observes the winner's terminal state here and
    /// fails before any counter moves.
    async fn lock_pending_prompt(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        session_id: JumpstartSessionId,
        prompt_index: i32,
    ) -> Result<(), DatabaseError> {
        let state = sqlx::query_as::<_, PromptStateRow>(
            "SELECT completed, skipped FROM jumpstart_prompts \
             WHERE session_id = $1 AND prompt_index = $2 \
             FOR UPDATE",
        )
        .bind(Uuid::from(session_id))
        .bind(prompt_index)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| {
            DatabaseError::not_found(
                "JumpstartPrompt",
                format!("{}#{}", session_id, prompt_index),
            )
        })?;

        if state.completed || state.skipped {
            return Err(DatabaseError::DuplicateEntry(format!(
                "prompt {} of session {} is already resolved",
                prompt_index, session_id
            )));
        }

        Ok(())
    }
}
