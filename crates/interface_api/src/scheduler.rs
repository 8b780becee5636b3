//! Background reminder scan loop

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use domain_loss::ReminderScanner;

/// Runs the reminder scan on a fixed interval until cancelled
///
/// The first tick fires immediately, so a restart never extends the gap
/// since the last scan by more than the interval. Each tick evaluates
/// deadlines against that day's date, so a loop running across midnight
/// picks up newly due thresholds without restarting.
pub async fn run_reminder_loop(
    scanner: Arc<ReminderScanner>,
    interval: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    info!(interval_secs = interval.as_secs(), "reminder scan loop started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let today = Utc::now().date_naive();
                match scanner.scan(today).await {
                    Ok(summary) => {
                        info!(
                            scan_date = %summary.scan_date,
                            scanned = summary.scanned,
                            qualifying = summary.qualifying,
                            reminders_sent = summary.reminders_sent,
                            failures = summary.failures,
                            "reminder scan finished"
                        );
                    }
                    Err(e) => {
                        error!(error = %e, "reminder scan failed");
                    }
                }
            }
            _ = shutdown.cancelled() => {
                info!("reminder scan loop stopped");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_loss::ports::mock::{MockLossEventStore, MockRecipientDirectory, RecordingMailer};
    use domain_loss::{LossEventService, LossEventType, NewLossEvent, Recipient};
    use core_kernel::UserId;

    #[tokio::test]
    async fn test_loop_scans_then_stops_on_cancel() {
        let store = Arc::new(MockLossEventStore::new());
        let directory = Arc::new(MockRecipientDirectory::new());
        let mailer = Arc::new(RecordingMailer::new());

        let user_id = UserId::new();
        directory
            .register(user_id, Recipient::new("owner@example.com"))
            .await;

        // Discovered today, so the sixty-day threshold is already due
        // on the first tick regardless of the wall clock
        let today = Utc::now().date_naive();
        let service = LossEventService::new(store.clone());
        service
            .report_event(NewLossEvent {
                user_id,
                property_id: None,
                event_type: LossEventType::Fire,
                event_date: today,
                discovery_date: today,
                description: "Kitchen fire".to_string(),
                police_report_number: None,
                fire_report_number: None,
                estimated_loss: None,
            })
            .await
            .unwrap();

        let scanner = Arc::new(ReminderScanner::new(
            store,
            directory,
            mailer.clone(),
            "https://app.example.com",
        ));

        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(run_reminder_loop(
            scanner,
            Duration::from_secs(3600),
            shutdown.clone(),
        ));

        // The first tick fires immediately; give it a moment to land
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();
        handle.await.unwrap();

        assert_eq!(mailer.sent_count().await, 1);
        let sent = mailer.sent().await;
        assert_eq!(sent[0].0.email, "owner@example.com");
    }
}
