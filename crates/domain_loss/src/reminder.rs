//! Deadline reminder scanning and notification rendering
//!
//! The scanner is invoked on a recurring schedule, compares every active
//! event's filing deadline to the scan date, and fires each reminder
//! threshold at most once per event. Dispatch failures are isolated per
//! event so one bad address or relay hiccup never aborts the batch.

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use core_kernel::DeadlineUrgency;

use crate::error::LossError;
use crate::event::LossEvent;
use crate::ports::{LossEventStore, Recipient, RecipientDirectory, ReminderMailer};
use crate::threshold::ReminderThreshold;

/// A rendered reminder ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderEmail {
    pub subject: String,
    pub html_body: String,
}

/// Outcome of one reminder scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Date the scan evaluated deadlines against
    pub scan_date: NaiveDate,
    /// Candidate events examined
    pub scanned: usize,
    /// Events with at least one threshold due
    pub qualifying: usize,
    /// Reminders dispatched and recorded
    pub reminders_sent: usize,
    /// Events where dispatch or recording failed
    pub failures: usize,
}

/// Periodic batch process that notifies owners of approaching deadlines
///
/// One scan sends at most one email per event: when several thresholds
/// come due together (missed scans), they are all marked fired but the
/// owner receives a single notification reflecting the current days
/// remaining.
pub struct ReminderScanner {
    store: Arc<dyn LossEventStore>,
    directory: Arc<dyn RecipientDirectory>,
    mailer: Arc<dyn ReminderMailer>,
    portal_base_url: String,
}

impl ReminderScanner {
    pub fn new(
        store: Arc<dyn LossEventStore>,
        directory: Arc<dyn RecipientDirectory>,
        mailer: Arc<dyn ReminderMailer>,
        portal_base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            directory,
            mailer,
            portal_base_url: portal_base_url.into(),
        }
    }

    /// Runs one scan against the given date
    ///
    /// Fails only when the candidate query itself fails; per-event errors
    /// are logged, counted, and skipped.
    pub async fn scan(&self, today: NaiveDate) -> Result<ScanSummary, LossError> {
        let candidates = self.store.find_reminder_candidates(today).await?;

        let mut summary = ScanSummary {
            scan_date: today,
            scanned: candidates.len(),
            qualifying: 0,
            reminders_sent: 0,
            failures: 0,
        };

        for event in &candidates {
            let due = event.due_thresholds(today);
            if due.is_empty() {
                continue;
            }
            summary.qualifying += 1;

            match self.dispatch_reminder(event, &due, today).await {
                Ok(()) => {
                    summary.reminders_sent += 1;
                    tracing::info!(
                        event_id = %event.id,
                        days_remaining = event.days_remaining(today),
                        thresholds = ?due,
                        "deadline reminder sent"
                    );
                }
                Err(error) => {
                    summary.failures += 1;
                    tracing::warn!(
                        event_id = %event.id,
                        error = %error,
                        "deadline reminder failed, continuing scan"
                    );
                }
            }
        }

        tracing::info!(
            scan_date = %summary.scan_date,
            scanned = summary.scanned,
            qualifying = summary.qualifying,
            sent = summary.reminders_sent,
            failures = summary.failures,
            "deadline reminder scan complete"
        );

        Ok(summary)
    }

    /// Sends one reminder and records the fired thresholds
    ///
    /// Recording happens only after a successful dispatch, so a failed send
    /// leaves every threshold unfired for the next scan to retry.
    async fn dispatch_reminder(
        &self,
        event: &LossEvent,
        due: &[ReminderThreshold],
        today: NaiveDate,
    ) -> Result<(), LossError> {
        let recipient = self.directory.recipient_for(event.user_id).await?;
        let email = render_reminder(
            event,
            &recipient,
            event.days_remaining(today),
            &self.portal_base_url,
        );

        self.mailer.send(&recipient, &email).await?;
        self.store.record_reminders(event.id, due).await?;
        Ok(())
    }
}

/// Renders the reminder notification for one event
pub fn render_reminder(
    event: &LossEvent,
    recipient: &Recipient,
    days_remaining: i64,
    portal_base_url: &str,
) -> ReminderEmail {
    let subject = match DeadlineUrgency::for_days_remaining(days_remaining) {
        DeadlineUrgency::Urgent if days_remaining <= 0 => {
            "Your Proof of Loss filing deadline is today".to_string()
        }
        DeadlineUrgency::Urgent => format!(
            "Final notice: {} day{} left to file your claim",
            days_remaining,
            if days_remaining == 1 { "" } else { "s" }
        ),
        DeadlineUrgency::Warning => {
            format!("Reminder: {} days left to file your claim", days_remaining)
        }
        DeadlineUrgency::Informational => format!(
            "Your claim filing window is open: {} days to file",
            days_remaining
        ),
    };

    let greeting = match &recipient.display_name {
        Some(name) => format!("Hi {},", name),
        None => "Hello,".to_string(),
    };
    let claim_url = format!(
        "{}/loss-events/{}/proof-of-loss",
        portal_base_url.trim_end_matches('/'),
        event.id
    );

    let html_body = format!(
        concat!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">",
            "<h2 style=\"color: #1a1a2e;\">Filing deadline approaching</h2>",
            "<p>{greeting}</p>",
            "<p>Your <strong>{event_label}</strong> loss from {event_date} has ",
            "<strong>{days} day{plural}</strong> remaining in its filing window.</p>",
            "<p>Most insurance policies require a sworn Proof of Loss within 60 days of ",
            "discovery. Your deadline is <strong>{deadline}</strong>.</p>",
            "<p style=\"margin: 24px 0;\">",
            "<a href=\"{claim_url}\" style=\"background: #0f3460; color: #ffffff; ",
            "padding: 12px 24px; text-decoration: none; border-radius: 4px;\">",
            "Start your Proof of Loss</a></p>",
            "<p style=\"color: #666; font-size: 12px;\">You are receiving this because you ",
            "reported a loss event. Deadlines are computed from your discovery date.</p>",
            "</div>"
        ),
        greeting = greeting,
        event_label = event.event_type.label(),
        event_date = event.event_date.format("%B %d, %Y"),
        days = days_remaining,
        plural = if days_remaining == 1 { "" } else { "s" },
        deadline = event.filing_deadline.format("%B %d, %Y"),
        claim_url = claim_url,
    );

    ReminderEmail { subject, html_body }
}
