//! Jumpstart application service

use std::sync::Arc;

use chrono::Utc;

use core_kernel::{AssetId, JumpstartSessionId, Money, MoneyError, UserId};

use crate::error::JumpstartError;
use crate::mode::JumpstartMode;
use crate::ports::JumpstartStore;
use crate::session::{ActiveSession, JumpstartSession};

/// Use-case layer for the guided capture flow
///
/// Every operation loads the session fresh from the store, scoped to the
/// requesting user; a session belonging to someone else is reported as
/// not found. Counter updates are delegated to the store's transactional
/// operations, and the in-memory view adopts stored state only after the
/// write has succeeded.
pub struct JumpstartService {
    store: Arc<dyn JumpstartStore>,
}

impl JumpstartService {
    pub fn new(store: Arc<dyn JumpstartStore>) -> Self {
        Self { store }
    }

    /// Starts a new session for the chosen mode
    pub async fn start_session(
        &self,
        user_id: UserId,
        mode: JumpstartMode,
    ) -> Result<ActiveSession, JumpstartError> {
        let (session, prompts) = JumpstartSession::start(user_id, mode);
        self.store.create_session(&session, &prompts).await?;

        tracing::info!(
            session_id = %session.id,
            user_id = %user_id,
            mode = %mode,
            items_target = session.items_target,
            "jumpstart session started"
        );

        Ok(ActiveSession::new(session, prompts))
    }

    /// The user's resumable session, if one exists
    ///
    /// Most recently started session that is neither completed nor
    /// dismissed, positioned at its first pending prompt.
    pub async fn resume_active_session(
        &self,
        user_id: UserId,
    ) -> Result<Option<ActiveSession>, JumpstartError> {
        Ok(self
            .store
            .find_resumable_session(user_id)
            .await?
            .map(|(session, prompts)| ActiveSession::new(session, prompts)))
    }

    /// Completes the current prompt, linking the captured asset
    ///
    /// The value joins the session total through the store's server-side
    /// arithmetic; this method never writes a counter value it computed.
    pub async fn complete_prompt(
        &self,
        user_id: UserId,
        session_id: JumpstartSessionId,
        asset_id: Option<AssetId>,
        value: Money,
    ) -> Result<ActiveSession, JumpstartError> {
        let mut active = self.load_owned(user_id, session_id).await?;
        if !active.session.is_resumable() {
            return Err(JumpstartError::SessionClosed);
        }
        let prompt_index = active
            .current_prompt()
            .map(|p| p.prompt_index)
            .ok_or(JumpstartError::NoCurrentPrompt)?;

        if value.is_negative() {
            return Err(JumpstartError::Value(MoneyError::InvalidAmount(format!(
                "item value cannot be negative: {}",
                value
            ))));
        }
        if value.currency() != active.session.total_value.currency() {
            return Err(JumpstartError::Value(MoneyError::CurrencyMismatch(
                active.session.total_value.currency().to_string(),
                value.currency().to_string(),
            )));
        }

        let completed_at = Utc::now();
        let updated = self
            .store
            .complete_prompt(session_id, prompt_index, asset_id, value, completed_at)
            .await?;

        if let Some(prompt) = active
            .prompts
            .iter_mut()
            .find(|p| p.prompt_index == prompt_index)
        {
            prompt.completed = true;
            prompt.asset_id = asset_id;
            prompt.completed_at = Some(completed_at);
        }
        active.session = updated;

        tracing::info!(
            session_id = %session_id,
            prompt_index,
            items_completed = active.session.items_completed,
            "jumpstart prompt completed"
        );

        Ok(active)
    }

    /// Skips the current prompt; counters are unchanged
    pub async fn skip_prompt(
        &self,
        user_id: UserId,
        session_id: JumpstartSessionId,
    ) -> Result<ActiveSession, JumpstartError> {
        let mut active = self.load_owned(user_id, session_id).await?;
        if !active.session.is_resumable() {
            return Err(JumpstartError::SessionClosed);
        }
        let prompt_index = active
            .current_prompt()
            .map(|p| p.prompt_index)
            .ok_or(JumpstartError::NoCurrentPrompt)?;

        let skipped_at = Utc::now();
        self.store
            .skip_prompt(session_id, prompt_index, skipped_at)
            .await?;

        if let Some(prompt) = active
            .prompts
            .iter_mut()
            .find(|p| p.prompt_index == prompt_index)
        {
            prompt.skipped = true;
            prompt.completed_at = Some(skipped_at);
        }

        tracing::info!(
            session_id = %session_id,
            prompt_index,
            "jumpstart prompt skipped"
        );

        Ok(active)
    }

    /// Marks the session completed; repeat calls are a no-op
    pub async fn complete_session(
        &self,
        user_id: UserId,
        session_id: JumpstartSessionId,
    ) -> Result<JumpstartSession, JumpstartError> {
        let active = self.load_owned(user_id, session_id).await?;
        if active.session.completed {
            return Ok(active.session);
        }
        if active.session.skipped {
            return Err(JumpstartError::SessionClosed);
        }

        let stored = self.store.complete_session(session_id, Utc::now()).await?;

        tracing::info!(
            session_id = %session_id,
            items_completed = stored.items_completed,
            total_value = %stored.total_value,
            "jumpstart session completed"
        );

        Ok(stored)
    }

    /// Dismisses the session ("skip for now"), removing it from resumption
    pub async fn dismiss_session(
        &self,
        user_id: UserId,
        session_id: JumpstartSessionId,
    ) -> Result<(), JumpstartError> {
        let active = self.load_owned(user_id, session_id).await?;
        if active.session.completed {
            return Err(JumpstartError::SessionClosed);
        }
        if active.session.skipped {
            return Ok(());
        }

        self.store.dismiss_session(session_id).await?;
        tracing::info!(session_id = %session_id, "jumpstart session dismissed");
        Ok(())
    }

    async fn load_owned(
        &self,
        user_id: UserId,
        session_id: JumpstartSessionId,
    ) -> Result<ActiveSession, JumpstartError> {
        let (session, prompts) = self.store.find_session(session_id).await.map_err(|e| {
            if e.is_not_found() {
                JumpstartError::SessionNotFound(session_id.to_string())
            } else {
                JumpstartError::Port(e)
            }
        })?;

        if session.user_id != user_id {
            return Err(JumpstartError::SessionNotFound(session_id.to_string()));
        }
        Ok(ActiveSession::new(session, prompts))
    }
}
