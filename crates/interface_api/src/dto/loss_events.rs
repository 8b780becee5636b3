//! Loss event DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::Money;
use domain_loss::{LossEvent, ReminderThreshold};

#[derive(Debug, Deserialize, Validate)]
pub struct ReportLossEventRequest {
    pub property_id: Option<Uuid>,
    pub event_type: String,
    pub event_date: NaiveDate,
    pub discovery_date: NaiveDate,
    #[validate(length(min = 1, max = 4000, message = "must be between 1 and 4000 characters"))]
    pub description: String,
    #[validate(length(max = 120, message = "must be at most 120 characters"))]
    pub police_report_number: Option<String>,
    #[validate(length(max = 120, message = "must be at most 120 characters"))]
    pub fire_report_number: Option<String>,
    pub estimated_loss: Option<Money>,
}

#[derive(Debug, Serialize)]
pub struct LossEventResponse {
    pub id: Uuid,
    pub property_id: Option<Uuid>,
    pub event_type: String,
    pub event_label: String,
    pub event_date: NaiveDate,
    pub discovery_date: NaiveDate,
    pub description: String,
    pub police_report_number: Option<String>,
    pub fire_report_number: Option<String>,
    pub estimated_loss: Option<Money>,
    pub status: String,
    pub filing_deadline: NaiveDate,
    pub days_remaining: i64,
    pub urgency: String,
    /// Reminder thresholds that have already fired, in descending order
    pub reminders_sent: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl LossEventResponse {
    /// Projects an event with deadline figures computed as of `today`
    pub fn from_event(event: LossEvent, today: NaiveDate) -> Self {
        let days_remaining = event.days_remaining(today);
        let urgency = event.urgency(today).as_str().to_string();
        let reminders_sent = ReminderThreshold::ALL
            .iter()
            .filter(|t| event.reminders.has_fired(**t))
            .map(|t| t.as_str().to_string())
            .collect();

        Self {
            id: Uuid::from(event.id),
            property_id: event.property_id.map(Uuid::from),
            event_type: event.event_type.as_str().to_string(),
            event_label: event.event_type.label().to_string(),
            event_date: event.event_date,
            discovery_date: event.discovery_date,
            description: event.description,
            police_report_number: event.police_report_number,
            fire_report_number: event.fire_report_number,
            estimated_loss: event.estimated_loss,
            status: event.status.as_str().to_string(),
            filing_deadline: event.filing_deadline,
            days_remaining,
            urgency,
            reminders_sent,
            created_at: event.created_at,
        }
    }
}
