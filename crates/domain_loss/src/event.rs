//! Loss event aggregate

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use core_kernel::{
    days_until, filing_deadline, DeadlineUrgency, LossEventId, Money, PropertyId, UserId,
};

use crate::error::LossError;
use crate::threshold::{ReminderThreshold, ReminderTrail};

/// Category of insurable incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossEventType {
    Fire,
    Theft,
    Flood,
    WaterDamage,
    Storm,
    Vandalism,
    Other,
}

impl LossEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LossEventType::Fire => "fire",
            LossEventType::Theft => "theft",
            LossEventType::Flood => "flood",
            LossEventType::WaterDamage => "water_damage",
            LossEventType::Storm => "storm",
            LossEventType::Vandalism => "vandalism",
            LossEventType::Other => "other",
        }
    }

    /// Human-readable label for notification copy
    pub fn label(&self) -> &'static str {
        match self {
            LossEventType::Fire => "Fire",
            LossEventType::Theft => "Theft",
            LossEventType::Flood => "Flood",
            LossEventType::WaterDamage => "Water damage",
            LossEventType::Storm => "Storm",
            LossEventType::Vandalism => "Vandalism",
            LossEventType::Other => "Other incident",
        }
    }
}

impl FromStr for LossEventType {
    type Err = LossError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fire" => Ok(LossEventType::Fire),
            "theft" => Ok(LossEventType::Theft),
            "flood" => Ok(LossEventType::Flood),
            "water_damage" => Ok(LossEventType::WaterDamage),
            "storm" => Ok(LossEventType::Storm),
            "vandalism" => Ok(LossEventType::Vandalism),
            "other" => Ok(LossEventType::Other),
            other => Err(LossError::invalid_field(
                "event_type",
                format!("unknown event type: {}", other),
            )),
        }
    }
}

/// Loss event status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossEventStatus {
    /// Open incident inside or past its filing window
    Active,
    /// No longer tracked by the reminder scanner
    Closed,
}

impl LossEventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LossEventStatus::Active => "active",
            LossEventStatus::Closed => "closed",
        }
    }
}

impl FromStr for LossEventStatus {
    type Err = LossError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(LossEventStatus::Active),
            "closed" => Ok(LossEventStatus::Closed),
            other => Err(LossError::invalid_field(
                "status",
                format!("unknown status: {}", other),
            )),
        }
    }
}

/// Validated input for reporting a new loss event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLossEvent {
    /// Owning user
    pub user_id: UserId,
    /// Property where the loss occurred, if recorded
    pub property_id: Option<PropertyId>,
    /// Category of incident
    pub event_type: LossEventType,
    /// Date the incident occurred
    pub event_date: NaiveDate,
    /// Date the owner discovered the loss, anchors the filing window
    pub discovery_date: NaiveDate,
    /// Free-text account of what happened
    pub description: String,
    /// Police report reference, if filed
    pub police_report_number: Option<String>,
    /// Fire department report reference, if filed
    pub fire_report_number: Option<String>,
    /// Owner's estimate of the total loss
    pub estimated_loss: Option<Money>,
}

impl NewLossEvent {
    /// Validates the input before an event is created from it
    pub fn validate(&self) -> Result<(), LossError> {
        if self.description.trim().is_empty() {
            return Err(LossError::MissingField("description"));
        }
        if self.discovery_date < self.event_date {
            return Err(LossError::invalid_field(
                "discovery_date",
                "discovery date cannot precede the event date",
            ));
        }
        if let Some(loss) = &self.estimated_loss {
            if loss.is_negative() {
                return Err(LossError::invalid_field(
                    "estimated_loss",
                    "estimated loss cannot be negative",
                ));
            }
        }
        Ok(())
    }
}

/// A reported insurable incident with its filing deadline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LossEvent {
    /// Unique identifier
    pub id: LossEventId,
    /// Owning user
    pub user_id: UserId,
    /// Property where the loss occurred
    pub property_id: Option<PropertyId>,
    /// Category of incident
    pub event_type: LossEventType,
    /// Date the incident occurred
    pub event_date: NaiveDate,
    /// Date the owner discovered the loss
    pub discovery_date: NaiveDate,
    /// Free-text account of what happened
    pub description: String,
    /// Police report reference
    pub police_report_number: Option<String>,
    /// Fire department report reference
    pub fire_report_number: Option<String>,
    /// Owner's estimate of the total loss
    pub estimated_loss: Option<Money>,
    /// Status
    pub status: LossEventStatus,
    /// Deadline for filing a sworn Proof of Loss, discovery date + 60 days
    ///
    /// Computed once at creation and immutable thereafter.
    pub filing_deadline: NaiveDate,
    /// Which reminder thresholds have fired for this event
    pub reminders: ReminderTrail,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl LossEvent {
    /// Creates a new active event from validated input
    ///
    /// The filing deadline is derived here from the discovery date and
    /// never recomputed.
    pub fn report(input: NewLossEvent) -> Result<Self, LossError> {
        input.validate()?;

        let now = Utc::now();
        let deadline = filing_deadline(input.discovery_date);

        Ok(Self {
            id: LossEventId::new_v7(),
            user_id: input.user_id,
            property_id: input.property_id,
            event_type: input.event_type,
            event_date: input.event_date,
            discovery_date: input.discovery_date,
            description: input.description,
            police_report_number: input.police_report_number,
            fire_report_number: input.fire_report_number,
            estimated_loss: input.estimated_loss,
            status: LossEventStatus::Active,
            filing_deadline: deadline,
            reminders: ReminderTrail::none(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Signed days from `today` until the filing deadline
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        days_until(self.filing_deadline, today)
    }

    /// Urgency band for the deadline as of `today`
    pub fn urgency(&self, today: NaiveDate) -> DeadlineUrgency {
        DeadlineUrgency::for_days_remaining(self.days_remaining(today))
    }

    pub fn is_active(&self) -> bool {
        self.status == LossEventStatus::Active
    }

    /// Reminder thresholds due as of `today` that have not yet fired
    pub fn due_thresholds(&self, today: NaiveDate) -> Vec<ReminderThreshold> {
        self.reminders.due(self.days_remaining(today))
    }

    /// Records that reminders fired for the given thresholds
    pub fn mark_reminded(&mut self, thresholds: &[ReminderThreshold]) {
        for threshold in thresholds {
            self.reminders.mark_fired(*threshold);
        }
        self.updated_at = Utc::now();
    }
}
