//! Loss Event Domain
//!
//! This crate implements the loss-event lifecycle from incident reporting
//! through the 60-day filing window and its staged reminder notifications.
//!
//! # Lifecycle
//!
//! ```text
//! Reported (active) -> reminders at 60/45/30/7 days before the deadline -> Closed
//! ```
//!
//! Each event computes its filing deadline once at creation. A periodic
//! scanner compares the deadline to the scan date and fires each reminder
//! threshold at most once per event, catching up on missed thresholds when
//! the scanner was down on the exact mark.

pub mod adapters;
pub mod error;
pub mod event;
pub mod ports;
pub mod reminder;
pub mod service;
pub mod threshold;

pub use error::LossError;
pub use event::{LossEvent, LossEventStatus, LossEventType, NewLossEvent};
pub use ports::{LossEventStore, Recipient, RecipientDirectory, ReminderMailer};
pub use reminder::{ReminderEmail, ReminderScanner, ScanSummary};
pub use service::LossEventService;
pub use threshold::{ReminderThreshold, ReminderTrail};
