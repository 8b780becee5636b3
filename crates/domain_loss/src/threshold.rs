//! Reminder thresholds and per-event firing state
//!
//! Reminders fire at fixed day-counts before the filing deadline. Each
//! threshold carries its own fired marker on the event, so every threshold
//! fires independently and exactly once. Due-ness is computed as
//! `days_remaining <= threshold` rather than an exact date match, which
//! lets a scan that missed the exact mark (scheduler downtime) catch up on
//! the next run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed day-count before the filing deadline at which a reminder fires
///
/// Variants are ordered from least to most urgent so that `Ord` ranks
/// `SixtyDay < FortyFiveDay < ThirtyDay < SevenDay` by proximity to the
/// deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderThreshold {
    /// 60 days out: the window has just opened
    SixtyDay,
    /// 45 days out
    FortyFiveDay,
    /// 30 days out
    ThirtyDay,
    /// 7 days out: final warning
    SevenDay,
}

impl ReminderThreshold {
    /// All thresholds, least urgent first
    pub const ALL: [ReminderThreshold; 4] = [
        ReminderThreshold::SixtyDay,
        ReminderThreshold::FortyFiveDay,
        ReminderThreshold::ThirtyDay,
        ReminderThreshold::SevenDay,
    ];

    /// Days before the deadline at which this threshold becomes due
    pub fn days(&self) -> i64 {
        match self {
            ReminderThreshold::SixtyDay => 60,
            ReminderThreshold::FortyFiveDay => 45,
            ReminderThreshold::ThirtyDay => 30,
            ReminderThreshold::SevenDay => 7,
        }
    }

    /// Whether this threshold is due for the given days remaining
    pub fn is_due(&self, days_remaining: i64) -> bool {
        days_remaining <= self.days()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderThreshold::SixtyDay => "sixty_day",
            ReminderThreshold::FortyFiveDay => "forty_five_day",
            ReminderThreshold::ThirtyDay => "thirty_day",
            ReminderThreshold::SevenDay => "seven_day",
        }
    }
}

impl fmt::Display for ReminderThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-event record of which reminder thresholds have fired
///
/// One independent marker per threshold. Markers only ever move from
/// unfired to fired; there is no reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTrail {
    pub sixty_day: bool,
    pub forty_five_day: bool,
    pub thirty_day: bool,
    pub seven_day: bool,
}

impl ReminderTrail {
    /// A trail with no thresholds fired, the state of a freshly reported event
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether the given threshold has already fired
    pub fn has_fired(&self, threshold: ReminderThreshold) -> bool {
        match threshold {
            ReminderThreshold::SixtyDay => self.sixty_day,
            ReminderThreshold::FortyFiveDay => self.forty_five_day,
            ReminderThreshold::ThirtyDay => self.thirty_day,
            ReminderThreshold::SevenDay => self.seven_day,
        }
    }

    /// Marks the given threshold as fired
    pub fn mark_fired(&mut self, threshold: ReminderThreshold) {
        match threshold {
            ReminderThreshold::SixtyDay => self.sixty_day = true,
            ReminderThreshold::FortyFiveDay => self.forty_five_day = true,
            ReminderThreshold::ThirtyDay => self.thirty_day = true,
            ReminderThreshold::SevenDay => self.seven_day = true,
        }
    }

    /// Whether any threshold has fired
    pub fn any_fired(&self) -> bool {
        self.sixty_day || self.forty_five_day || self.thirty_day || self.seven_day
    }

    /// Whether every threshold has fired
    pub fn all_fired(&self) -> bool {
        self.sixty_day && self.forty_five_day && self.thirty_day && self.seven_day
    }

    /// Thresholds that are due but have not yet fired, least urgent first
    ///
    /// Several thresholds can come due at once when scans were missed; the
    /// caller fires them all in one pass so the owner receives a single
    /// notification rather than a backlog.
    pub fn due(&self, days_remaining: i64) -> Vec<ReminderThreshold> {
        ReminderThreshold::ALL
            .into_iter()
            .filter(|t| t.is_due(days_remaining) && !self.has_fired(*t))
            .collect()
    }
}
