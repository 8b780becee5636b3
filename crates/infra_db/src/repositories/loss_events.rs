//! Loss event repository
//!
//! Handles persistence for loss events and their reminder trails. Each
//! reminder threshold has its own boolean column so a fired marker is
//! durable on its own and repeated scans stay idempotent.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use core_kernel::{LossEventId, PropertyId, UserId};
use domain_loss::{LossEvent, LossEventStatus, LossEventType, ReminderThreshold, ReminderTrail};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;
use crate::repositories::money_from_columns;

const LOSS_EVENT_COLUMNS: &str = "loss_event_id, user_id, property_id, event_type, event_date, \
     discovery_date, description, police_report_number, fire_report_number, \
     estimated_loss_amount, estimated_loss_currency, status, filing_deadline, \
     reminded_60_day, reminded_45_day, reminded_30_day, reminded_7_day, \
     created_at, updated_at";

/// Database row for a loss event
#[derive(Debug, Clone, FromRow)]
pub struct LossEventRow {
    pub loss_event_id: Uuid,
    pub user_id: Uuid,
    pub property_id: Option<Uuid>,
    pub event_type: String,
    pub event_date: NaiveDate,
    pub discovery_date: NaiveDate,
    pub description: String,
    pub police_report_number: Option<String>,
    pub fire_report_number: Option<String>,
    pub estimated_loss_amount: Option<Decimal>,
    pub estimated_loss_currency: Option<String>,
    pub status: String,
    pub filing_deadline: NaiveDate,
    pub reminded_60_day: bool,
    pub reminded_45_day: bool,
    pub reminded_30_day: bool,
    pub reminded_7_day: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LossEventRow {
    /// Maps the row into the domain aggregate
    ///
    /// Fails with a serialization error when stored text does not parse
    /// back into a domain enum, which indicates corrupt data rather than
    /// a caller mistake.
    pub fn into_domain(self) -> Result<LossEvent, DatabaseError> {
        let event_type = LossEventType::from_str(&self.event_type)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
        let status = LossEventStatus::from_str(&self.status)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
        let estimated_loss = money_from_columns(
            self.estimated_loss_amount,
            self.estimated_loss_currency.as_deref(),
        )?;

        Ok(LossEvent {
            id: LossEventId::from_uuid(self.loss_event_id),
            user_id: UserId::from_uuid(self.user_id),
            property_id: self.property_id.map(PropertyId::from_uuid),
            event_type,
            event_date: self.event_date,
            discovery_date: self.discovery_date,
            description: self.description,
            police_report_number: self.police_report_number,
            fire_report_number: self.fire_report_number,
            estimated_loss,
            status,
            filing_deadline: self.filing_deadline,
            reminders: ReminderTrail {
                sixty_day: self.reminded_60_day,
                forty_five_day: self.reminded_45_day,
                thirty_day: self.reminded_30_day,
                seven_day: self.reminded_7_day,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for loss event data access
#[derive(Debug, Clone)]
pub struct LossEventRepository {
    pool: DatabasePool,
}

impl LossEventRepository {
    /// Creates a new repository with the given connection pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Inserts a newly reported event
    pub async fn insert(&self, event: &LossEvent) -> Result<(), DatabaseError> {
        let query = format!(
            "INSERT INTO loss_events ({LOSS_EVENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)"
        );

        sqlx::query(&query)
            .bind(Uuid::from(event.id))
            .bind(Uuid::from(event.user_id))
            .bind(event.property_id.map(Uuid::from))
            .bind(event.event_type.as_str())
            .bind(event.event_date)
            .bind(event.discovery_date)
            .bind(&event.description)
            .bind(&event.police_report_number)
            .bind(&event.fire_report_number)
            .bind(event.estimated_loss.map(|m| m.amount()))
            .bind(event.estimated_loss.map(|m| m.currency().code()))
            .bind(event.status.as_str())
            .bind(event.filing_deadline)
            .bind(event.reminders.sixty_day)
            .bind(event.reminders.forty_five_day)
            .bind(event.reminders.thirty_day)
            .bind(event.reminders.seven_day)
            .bind(event.created_at)
            .bind(event.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Fetches one event by ID
    pub async fn find_by_id(&self, id: LossEventId) -> Result<LossEvent, DatabaseError> {
        let query = format!(
            "SELECT {LOSS_EVENT_COLUMNS} FROM loss_events WHERE loss_event_id = $1"
        );

        let row = sqlx::query_as::<_, LossEventRow>(&query)
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("LossEvent", id))?;

        row.into_domain()
    }

    /// Lists a user's events, most recently discovered first
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<LossEvent>, DatabaseError> {
        let query = format!(
            "SELECT {LOSS_EVENT_COLUMNS} FROM loss_events \
             WHERE user_id = $1 \
             ORDER BY discovery_date DESC, created_at DESC"
        );

        let rows = sqlx::query_as::<_, LossEventRow>(&query)
            .bind(Uuid::from(user_id))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(LossEventRow::into_domain).collect()
    }

    /// Events the reminder scan should consider as of `today`
    ///
    /// Active events within their filing window that still have at least
    /// one unfired threshold. Spans all users. The filter mirrors the
    /// partial index in the schema so the scan stays an index walk.
    pub async fn find_reminder_candidates(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<LossEvent>, DatabaseError> {
        let query = format!(
            "SELECT {LOSS_EVENT_COLUMNS} FROM loss_events \
             WHERE status = 'active' \
               AND filing_deadline >= $1 \
               AND NOT (reminded_60_day AND reminded_45_day AND reminded_30_day AND reminded_7_day) \
             ORDER BY filing_deadline"
        );

        let rows = sqlx::query_as::<_, LossEventRow>(&query)
            .bind(today)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(LossEventRow::into_domain).collect()
    }

    /// Sets the fired marker for the given thresholds on one event
    ///
    /// Markers only ever move from unfired to fired; setting an
    /// already-fired marker again is a no-op.
    pub async fn record_reminders(
        &self,
        id: LossEventId,
        thresholds: &[ReminderThreshold],
    ) -> Result<(), DatabaseError> {
        if thresholds.is_empty() {
            return Ok(());
        }

        let mut assignments = Vec::with_capacity(thresholds.len() + 1);
        for threshold in thresholds {
            assignments.push(match threshold {
                ReminderThreshold::SixtyDay => "reminded_60_day = TRUE",
                ReminderThreshold::FortyFiveDay => "reminded_45_day = TRUE",
                ReminderThreshold::ThirtyDay => "reminded_30_day = TRUE",
                ReminderThreshold::SevenDay => "reminded_7_day = TRUE",
            });
        }
        assignments.push("updated_at = $2");

        let query = format!(
            "UPDATE loss_events SET {} WHERE loss_event_id = $1",
            assignments.join(", ")
        );

        let result = sqlx::query(&query)
            .bind(Uuid::from(id))
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("LossEvent", id));
        }

        Ok(())
    }
}
