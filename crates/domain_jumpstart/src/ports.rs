//! Jumpstart Domain Ports
//!
//! Single persistence port for sessions and their prompt rows. The
//! counter-bearing operations are deliberately coarse: the store applies
//! prompt mutation and session counter increments together, so two
//! browser tabs racing on the same prompt cannot lose an update. One tab
//! wins; the other receives a conflict.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{AssetId, DomainPort, JumpstartSessionId, Money, PortError, UserId};

use crate::session::{JumpstartPrompt, JumpstartSession};

/// Persistence port for jumpstart sessions
#[async_trait]
pub trait JumpstartStore: DomainPort {
    /// Persists a new session together with all of its prompt rows
    async fn create_session(
        &self,
        session: &JumpstartSession,
        prompts: &[JumpstartPrompt],
    ) -> Result<(), PortError>;

    /// Loads a session and its prompts
    ///
    /// Returns `PortError::NotFound` when no such session exists.
    /// Ownership checks are the caller's responsibility.
    async fn find_session(
        &self,
        id: JumpstartSessionId,
    ) -> Result<(JumpstartSession, Vec<JumpstartPrompt>), PortError>;

    /// The user's most recently started session that is neither completed
    /// nor dismissed, with its prompts
    async fn find_resumable_session(
        &self,
        user_id: UserId,
    ) -> Result<Option<(JumpstartSession, Vec<JumpstartPrompt>)>, PortError>;

    /// Marks a pending prompt completed and increments both session
    /// counters in the same transaction
    ///
    /// The increments are server-side arithmetic against the stored row,
    /// never a value computed by the caller. Returns the session with its
    /// post-increment counters. Fails with `PortError::Conflict` when the
    /// prompt has already been completed or skipped.
    async fn complete_prompt(
        &self,
        session_id: JumpstartSessionId,
        prompt_index: i32,
        asset_id: Option<AssetId>,
        value: Money,
        completed_at: DateTime<Utc>,
    ) -> Result<JumpstartSession, PortError>;

    /// Marks a pending prompt skipped; session counters are unchanged
    ///
    /// Fails with `PortError::Conflict` when the prompt has already been
    /// completed or skipped.
    async fn skip_prompt(
        &self,
        session_id: JumpstartSessionId,
        prompt_index: i32,
        skipped_at: DateTime<Utc>,
    ) -> Result<(), PortError>;

    /// Sets the session's completed flag
    ///
    /// The first call stamps `completed_at`; repeat calls leave the stored
    /// timestamp untouched and return the session as is.
    async fn complete_session(
        &self,
        session_id: JumpstartSessionId,
        completed_at: DateTime<Utc>,
    ) -> Result<JumpstartSession, PortError>;

    /// Sets the session-level skipped flag, removing it from resumption
    async fn dismiss_session(&self, session_id: JumpstartSessionId) -> Result<(), PortError>;
}

/// In-memory mock implementation for testing
///
/// Mirrors the transactional contract of the real store: prompt mutation
/// and counter increments happen under one write lock, and writes can be
/// switched to fail for error-path tests.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    type SessionRecord = (JumpstartSession, Vec<JumpstartPrompt>);

    /// In-memory mock implementation of JumpstartStore
    #[derive(Debug, Default)]
    pub struct MockJumpstartStore {
        sessions: Arc<RwLock<HashMap<JumpstartSessionId, SessionRecord>>>,
        fail_writes: AtomicBool,
    }

    impl MockJumpstartStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// All subsequent write operations fail with a connection error
        pub fn fail_writes(&self) {
            self.fail_writes.store(true, Ordering::SeqCst);
        }

        pub fn restore_writes(&self) {
            self.fail_writes.store(false, Ordering::SeqCst);
        }

        fn check_writable(&self) -> Result<(), PortError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PortError::service_unavailable("database"));
            }
            Ok(())
        }

        /// Snapshot of a stored session, for asserting persisted state
        pub async fn get(&self, id: JumpstartSessionId) -> Option<SessionRecord> {
            self.sessions.read().await.get(&id).cloned()
        }

        pub async fn session_count(&self) -> usize {
            self.sessions.read().await.len()
        }
    }

    impl DomainPort for MockJumpstartStore {}

    #[async_trait]
    impl JumpstartStore for MockJumpstartStore {
        async fn create_session(
            &self,
            session: &JumpstartSession,
            prompts: &[JumpstartPrompt],
        ) -> Result<(), PortError> {
            self.check_writable()?;
            let mut sessions = self.sessions.write().await;
            if sessions.contains_key(&session.id) {
                return Err(PortError::conflict(format!(
                    "jumpstart session {} already exists",
                    session.id
                )));
            }
            sessions.insert(session.id, (session.clone(), prompts.to_vec()));
            Ok(())
        }

        async fn find_session(
            &self,
            id: JumpstartSessionId,
        ) -> Result<(JumpstartSession, Vec<JumpstartPrompt>), PortError> {
            self.sessions
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("JumpstartSession", id))
        }

        async fn find_resumable_session(
            &self,
            user_id: UserId,
        ) -> Result<Option<(JumpstartSession, Vec<JumpstartPrompt>)>, PortError> {
            Ok(self
                .sessions
                .read()
                .await
                .values()
                .filter(|(s, _)| s.user_id == user_id && s.is_resumable())
                .max_by_key(|(s, _)| s.started_at)
                .cloned())
        }

        async fn complete_prompt(
            &self,
            session_id: JumpstartSessionId,
            prompt_index: i32,
            asset_id: Option<AssetId>,
            value: Money,
            completed_at: DateTime<Utc>,
        ) -> Result<JumpstartSession, PortError> {
            self.check_writable()?;
            let mut sessions = self.sessions.write().await;
            let (session, prompts) = sessions
                .get_mut(&session_id)
                .ok_or_else(|| PortError::not_found("JumpstartSession", session_id))?;

            let prompt = prompts
                .iter_mut()
                .find(|p| p.prompt_index == prompt_index)
                .ok_or_else(|| {
                    PortError::not_found(
                        "JumpstartPrompt",
                        format!("{} index {}", session_id, prompt_index),
                    )
                })?;
            if !prompt.is_pending() {
                return Err(PortError::conflict(format!(
                    "prompt {} of session {} is already resolved",
                    prompt_index, session_id
                )));
            }

            // Total first so a currency error leaves nothing half-applied
            let new_total = session
                .total_value
                .checked_add(&value)
                .map_err(|e| PortError::validation(e.to_string()))?;

            prompt.completed = true;
            prompt.asset_id = asset_id;
            prompt.completed_at = Some(completed_at);
            session.items_completed += 1;
            session.total_value = new_total;
            Ok(session.clone())
        }

        async fn skip_prompt(
            &self,
            session_id: JumpstartSessionId,
            prompt_index: i32,
            skipped_at: DateTime<Utc>,
        ) -> Result<(), PortError> {
            self.check_writable()?;
            let mut sessions = self.sessions.write().await;
            let (_, prompts) = sessions
                .get_mut(&session_id)
                .ok_or_else(|| PortError::not_found("JumpstartSession", session_id))?;

            let prompt = prompts
                .iter_mut()
                .find(|p| p.prompt_index == prompt_index)
                .ok_or_else(|| {
                    PortError::not_found(
                        "JumpstartPrompt",
                        format!("{} index {}", session_id, prompt_index),
                    )
                })?;
            if !prompt.is_pending() {
                return Err(PortError::conflict(format!(
                    "prompt {} of session {} is already resolved",
                    prompt_index, session_id
                )));
            }

            prompt.skipped = true;
            prompt.completed_at = Some(skipped_at);
            Ok(())
        }

        async fn complete_session(
            &self,
            session_id: JumpstartSessionId,
            completed_at: DateTime<Utc>,
        ) -> Result<JumpstartSession, PortError> {
            self.check_writable()?;
            let mut sessions = self.sessions.write().await;
            let (session, _) = sessions
                .get_mut(&session_id)
                .ok_or_else(|| PortError::not_found("JumpstartSession", session_id))?;

            if !session.completed {
                session.completed = true;
                session.completed_at = Some(completed_at);
            }
            Ok(session.clone())
        }

        async fn dismiss_session(&self, session_id: JumpstartSessionId) -> Result<(), PortError> {
            self.check_writable()?;
            let mut sessions = self.sessions.write().await;
            let (session, _) = sessions
                .get_mut(&session_id)
                .ok_or_else(|| PortError::not_found("JumpstartSession", session_id))?;
            session.skipped = true;
            Ok(())
        }
    }
}
