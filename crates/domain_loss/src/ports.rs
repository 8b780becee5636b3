//! Loss Event Domain Ports
//!
//! This module defines the port interfaces the loss event domain needs from
//! the outside world, enabling swappable implementations (internal database,
//! SMTP relay, mock, etc.).
//!
//! # Architecture
//!
//! Three ports cover the domain's collaborators:
//!
//! - **`LossEventStore`**: persistence for events and their reminder trails
//! - **`RecipientDirectory`**: resolves an owner's notification address
//! - **`ReminderMailer`**: dispatches a rendered reminder
//!
//! The reminder scanner runs with elevated access: `find_reminder_candidates`
//! scans across all users' events, unlike the per-user read paths.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_loss::ports::LossEventStore;
//! use std::sync::Arc;
//!
//! pub struct LossEventService {
//!     store: Arc<dyn LossEventStore>,
//! }
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;

use core_kernel::{DomainPort, LossEventId, PortError, UserId};

use crate::event::LossEvent;
use crate::reminder::ReminderEmail;
use crate::threshold::ReminderThreshold;

/// A resolved notification target for a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    /// Email address reminders are sent to
    pub email: String,
    /// Display name for the To header and greeting, when known
    pub display_name: Option<String>,
}

impl Recipient {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
        }
    }

    pub fn with_name(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: Some(name.into()),
        }
    }
}

/// Persistence port for loss events
#[async_trait]
pub trait LossEventStore: DomainPort {
    /// Persists a newly reported event
    async fn insert_event(&self, event: &LossEvent) -> Result<(), PortError>;

    /// Retrieves an event by ID
    ///
    /// Returns `PortError::NotFound` when no such event exists. Ownership
    /// checks are the caller's responsibility.
    async fn find_event(&self, id: LossEventId) -> Result<LossEvent, PortError>;

    /// Lists a user's events, most recently discovered first
    async fn list_events_for_user(&self, user_id: UserId) -> Result<Vec<LossEvent>, PortError>;

    /// Events the reminder scan should consider as of `today`
    ///
    /// Active events whose filing deadline has not passed and that still
    /// have at least one unfired threshold. The list spans all users; the
    /// scanner is a batch process, not a per-user request.
    async fn find_reminder_candidates(&self, today: NaiveDate)
        -> Result<Vec<LossEvent>, PortError>;

    /// Marks the given thresholds fired for an event
    ///
    /// Each marker is set independently; already-fired markers are left
    /// untouched.
    async fn record_reminders(
        &self,
        id: LossEventId,
        thresholds: &[ReminderThreshold],
    ) -> Result<(), PortError>;
}

/// Resolves a user's notification address
#[async_trait]
pub trait RecipientDirectory: DomainPort {
    /// Returns the recipient for a user, or `PortError::NotFound` when the
    /// user has no deliverable address
    async fn recipient_for(&self, user_id: UserId) -> Result<Recipient, PortError>;
}

/// Dispatches rendered reminder notifications
#[async_trait]
pub trait ReminderMailer: DomainPort {
    /// Sends one reminder to one recipient
    ///
    /// A failure here must be isolated by the caller; it aborts only the
    /// current event, never the batch.
    async fn send(&self, recipient: &Recipient, email: &ReminderEmail) -> Result<(), PortError>;
}

/// In-memory mock implementations for testing
///
/// These adapters keep everything in memory and are useful for unit testing
/// the scanner and services without a database or SMTP relay.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory mock implementation of LossEventStore
    #[derive(Debug, Default)]
    pub struct MockLossEventStore {
        events: Arc<RwLock<HashMap<LossEventId, LossEvent>>>,
    }

    impl MockLossEventStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with events for testing
        pub async fn with_events(events: Vec<LossEvent>) -> Self {
            let store = Self::new();
            for event in events {
                store.events.write().await.insert(event.id, event);
            }
            store
        }

        /// Snapshot of a stored event, for asserting persisted state
        pub async fn get(&self, id: LossEventId) -> Option<LossEvent> {
            self.events.read().await.get(&id).cloned()
        }
    }

    impl DomainPort for MockLossEventStore {}

    #[async_trait]
    impl LossEventStore for MockLossEventStore {
        async fn insert_event(&self, event: &LossEvent) -> Result<(), PortError> {
            let mut events = self.events.write().await;
            if events.contains_key(&event.id) {
                return Err(PortError::conflict(format!(
                    "loss event {} already exists",
                    event.id
                )));
            }
            events.insert(event.id, event.clone());
            Ok(())
        }

        async fn find_event(&self, id: LossEventId) -> Result<LossEvent, PortError> {
            self.events
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("LossEvent", id))
        }

        async fn list_events_for_user(&self, user_id: UserId) -> Result<Vec<LossEvent>, PortError> {
            let mut events: Vec<_> = self
                .events
                .read()
                .await
                .values()
                .filter(|e| e.user_id == user_id)
                .cloned()
                .collect();
            events.sort_by(|a, b| b.discovery_date.cmp(&a.discovery_date));
            Ok(events)
        }

        async fn find_reminder_candidates(
            &self,
            today: NaiveDate,
        ) -> Result<Vec<LossEvent>, PortError> {
            Ok(self
                .events
                .read()
                .await
                .values()
                .filter(|e| {
                    e.is_active() && e.filing_deadline >= today && !e.reminders.all_fired()
                })
                .cloned()
                .collect())
        }

        async fn record_reminders(
            &self,
            id: LossEventId,
            thresholds: &[ReminderThreshold],
        ) -> Result<(), PortError> {
            let mut events = self.events.write().await;
            let event = events
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("LossEvent", id))?;
            event.mark_reminded(thresholds);
            Ok(())
        }
    }

    /// In-memory mock implementation of RecipientDirectory
    #[derive(Debug, Default)]
    pub struct MockRecipientDirectory {
        recipients: Arc<RwLock<HashMap<UserId, Recipient>>>,
    }

    impl MockRecipientDirectory {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn register(&self, user_id: UserId, recipient: Recipient) {
            self.recipients.write().await.insert(user_id, recipient);
        }
    }

    impl DomainPort for MockRecipientDirectory {}

    #[async_trait]
    impl RecipientDirectory for MockRecipientDirectory {
        async fn recipient_for(&self, user_id: UserId) -> Result<Recipient, PortError> {
            self.recipients
                .read()
                .await
                .get(&user_id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Recipient", user_id))
        }
    }

    /// Mailer mock that records every send and can be told to fail
    #[derive(Debug, Default)]
    pub struct RecordingMailer {
        sent: Arc<RwLock<Vec<(Recipient, ReminderEmail)>>>,
        fail_for: Arc<RwLock<Vec<String>>>,
    }

    impl RecordingMailer {
        pub fn new() -> Self {
            Self::default()
        }

        /// All sends are rejected for this address
        pub async fn fail_for(&self, email: impl Into<String>) {
            self.fail_for.write().await.push(email.into());
        }

        pub async fn sent(&self) -> Vec<(Recipient, ReminderEmail)> {
            self.sent.read().await.clone()
        }

        pub async fn sent_count(&self) -> usize {
            self.sent.read().await.len()
        }
    }

    impl DomainPort for RecordingMailer {}

    #[async_trait]
    impl ReminderMailer for RecordingMailer {
        async fn send(
            &self,
            recipient: &Recipient,
            email: &ReminderEmail,
        ) -> Result<(), PortError> {
            if self.fail_for.read().await.contains(&recipient.email) {
                return Err(PortError::service_unavailable("smtp"));
            }
            self.sent
                .write()
                .await
                .push((recipient.clone(), email.clone()));
            Ok(())
        }
    }
}
