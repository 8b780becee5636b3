//! Filing-deadline date arithmetic
//!
//! This module provides the temporal rules that anchor the claim
//! lifecycle:
//! - The fixed 60-day filing window measured from the discovery date
//! - Signed days-remaining computation against a scan date
//! - Urgency banding used by reminder templates and the deadline banner

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of days an insured has to file after discovering a loss
///
/// Standard homeowner policies require a sworn Proof of Loss within 60
/// days of discovery. The window is fixed; jurisdictional variations are
/// out of scope.
pub const FILING_WINDOW_DAYS: i64 = 60;

/// Computes the filing deadline for a loss discovered on the given date
///
/// The deadline is exactly `discovery_date + 60 days` using calendar day
/// arithmetic (2025-01-01 discovers to a 2025-03-02 deadline). Computed
/// once at loss-event creation and immutable thereafter.
pub fn filing_deadline(discovery_date: NaiveDate) -> NaiveDate {
    discovery_date + Duration::days(FILING_WINDOW_DAYS)
}

/// Signed number of whole days from `today` until `deadline`
///
/// Positive while the deadline is ahead, zero on the deadline day,
/// negative once it has passed.
pub fn days_until(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

/// Urgency band for a deadline given its days remaining
///
/// Drives both the reminder email template tone and the deadline
/// warning banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineUrgency {
    /// 7 days or fewer remain (including past-due)
    Urgent,
    /// Between 8 and 30 days remain
    Warning,
    /// More than 30 days remain
    Informational,
}

impl DeadlineUrgency {
    /// Bands a signed days-remaining value
    pub fn for_days_remaining(days_remaining: i64) -> Self {
        if days_remaining <= 7 {
            DeadlineUrgency::Urgent
        } else if days_remaining <= 30 {
            DeadlineUrgency::Warning
        } else {
            DeadlineUrgency::Informational
        }
    }

    /// Bands the deadline directly against a scan date
    pub fn for_deadline(deadline: NaiveDate, today: NaiveDate) -> Self {
        Self::for_days_remaining(days_until(deadline, today))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeadlineUrgency::Urgent => "urgent",
            DeadlineUrgency::Warning => "warning",
            DeadlineUrgency::Informational => "informational",
        }
    }
}

impl fmt::Display for DeadlineUrgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
