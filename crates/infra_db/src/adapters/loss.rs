//! Loss Event Domain Adapter
//!
//! Implements the loss domain's persistence and directory ports against
//! PostgreSQL: `LossEventStore` for events and reminder markers, and
//! `RecipientDirectory` for resolving notification addresses.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::time::Instant;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, LossEventId, PortError, UserId,
};
use domain_loss::{
    LossEvent, LossEventStore, Recipient, RecipientDirectory, ReminderThreshold,
};

use crate::adapters::db_to_port_error;
use crate::pool::DatabasePool;
use crate::repositories::{InventoryRepository, LossEventRepository};

/// PostgreSQL adapter for the `LossEventStore` port
#[derive(Debug, Clone)]
pub struct PostgresLossEventAdapter {
    repository: LossEventRepository,
    pool: DatabasePool,
}

impl PostgresLossEventAdapter {
    /// Creates a new adapter with the given connection pool
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            repository: LossEventRepository::new(pool.clone()),
            pool,
        }
    }

    /// Access to the underlying repository for operations outside the port
    pub fn repository(&self) -> &LossEventRepository {
        &self.repository
    }
}

impl DomainPort for PostgresLossEventAdapter {}

#[async_trait]
impl LossEventStore for PostgresLossEventAdapter {
    #[instrument(skip(self, event), fields(loss_event_id = %event.id))]
    async fn insert_event(&self, event: &LossEvent) -> Result<(), PortError> {
        debug!("Inserting loss event");

        self.repository
            .insert(event)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(loss_event_id = %id))]
    async fn find_event(&self, id: LossEventId) -> Result<LossEvent, PortError> {
        debug!("Fetching loss event");

        self.repository
            .find_by_id(id)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_events_for_user(&self, user_id: UserId) -> Result<Vec<LossEvent>, PortError> {
        debug!("Listing loss events for user");

        self.repository
            .list_for_user(user_id)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(today = %today))]
    async fn find_reminder_candidates(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<LossEvent>, PortError> {
        debug!("Scanning for reminder candidates");

        self.repository
            .find_reminder_candidates(today)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self, thresholds), fields(loss_event_id = %id, count = thresholds.len()))]
    async fn record_reminders(
        &self,
        id: LossEventId,
        thresholds: &[ReminderThreshold],
    ) -> Result<(), PortError> {
        debug!("Recording fired reminder thresholds");

        self.repository
            .record_reminders(id, thresholds)
            .await
            .map_err(db_to_port_error)
    }
}

#[async_trait]
impl HealthCheckable for PostgresLossEventAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();

        let status = match sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
        {
            Ok(_) => AdapterHealth::Healthy,
            Err(_) => AdapterHealth::Unhealthy,
        };

        HealthCheckResult {
            adapter_id: "postgres-loss-events".to_string(),
            status,
            latency_ms: start.elapsed().as_millis() as u64,
            message: None,
            checked_at: Utc::now(),
        }
    }
}

/// PostgreSQL adapter for the `RecipientDirectory` port
///
/// Resolves a user's notification address from the accounts table. Every
/// account carries an email, so the only miss is an unknown user.
#[derive(Debug, Clone)]
pub struct PostgresRecipientDirectory {
    repository: InventoryRepository,
}

impl PostgresRecipientDirectory {
    /// Creates a new directory with the given connection pool
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            repository: InventoryRepository::new(pool),
        }
    }
}

impl DomainPort for PostgresRecipientDirectory {}

#[async_trait]
impl RecipientDirectory for PostgresRecipientDirectory {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn recipient_for(&self, user_id: UserId) -> Result<Recipient, PortError> {
        debug!("Resolving notification recipient");

        let user = self.repository.find_user(user_id).await.map_err(|e| {
            if e.is_not_found() {
                PortError::not_found("Recipient", user_id)
            } else {
                db_to_port_error(e)
            }
        })?;

        Ok(Recipient::with_name(user.email, user.display_name))
    }
}
