//! Jumpstart Domain Adapter
//!
//! Implements the `JumpstartStore` port against PostgreSQL. Counter
//! updates happen inside the repository's transactions as server-side
//! arithmetic; a prompt resolved twice surfaces as a conflict here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use core_kernel::{AssetId, DomainPort, JumpstartSessionId, Money, PortError, UserId};
use domain_jumpstart::{JumpstartPrompt, JumpstartSession, JumpstartStore};

use crate::adapters::db_to_port_error;
use crate::pool::DatabasePool;
use crate::repositories::JumpstartRepository;

/// PostgreSQL adapter for the `JumpstartStore` port
#[derive(Debug, Clone)]
pub struct PostgresJumpstartAdapter {
    repository: JumpstartRepository,
}

impl PostgresJumpstartAdapter {
    /// Creates a new adapter with the given connection pool
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            repository: JumpstartRepository::new(pool),
        }
    }
}

impl DomainPort for PostgresJumpstartAdapter {}

#[async_trait]
impl JumpstartStore for PostgresJumpstartAdapter {
    #[instrument(skip(self, session, prompts), fields(session_id = %session.id, mode = %session.mode))]
    async fn create_session(
        &self,
        session: &JumpstartSession,
        prompts: &[JumpstartPrompt],
    ) -> Result<(), PortError> {
        debug!("Creating jumpstart session");

        self.repository
            .create_session(session, prompts)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(session_id = %id))]
    async fn find_session(
        &self,
        id: JumpstartSessionId,
    ) -> Result<(JumpstartSession, Vec<JumpstartPrompt>), PortError> {
        debug!("Fetching jumpstart session");

        self.repository
            .find_by_id(id)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn find_resumable_session(
        &self,
        user_id: UserId,
    ) -> Result<Option<(JumpstartSession, Vec<JumpstartPrompt>)>, PortError> {
        debug!("Looking up resumable jumpstart session");

        self.repository
            .find_resumable(user_id)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self, value), fields(session_id = %session_id, prompt_index))]
    async fn complete_prompt(
        &self,
        session_id: JumpstartSessionId,
        prompt_index: i32,
        asset_id: Option<AssetId>,
        value: Money,
        completed_at: DateTime<Utc>,
    ) -> Result<JumpstartSession, PortError> {
        debug!("Completing jumpstart prompt");

        self.repository
            .complete_prompt(session_id, prompt_index, asset_id, value, completed_at)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(session_id = %session_id, prompt_index))]
    async fn skip_prompt(
        &self,
        session_id: JumpstartSessionId,
        prompt_index: i32,
        skipped_at: DateTime<Utc>,
    ) -> Result<(), PortError> {
        debug!("Skipping jumpstart prompt");

        self.repository
            .skip_prompt(session_id, prompt_index, skipped_at)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(session_id = %session_id))]
    async fn complete_session(
        &self,
        session_id: JumpstartSessionId,
        completed_at: DateTime<Utc>,
    ) -> Result<JumpstartSession, PortError> {
        debug!("Completing jumpstart session");

        self.repository
            .complete_session(session_id, completed_at)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(session_id = %session_id))]
    async fn dismiss_session(&self, session_id: JumpstartSessionId) -> Result<(), PortError> {
        debug!("Dismissing jumpstart session");

        self.repository
            .dismiss_session(session_id)
            .await
            .map_err(db_to_port_error)
    }
}
