//! Loss event application service

use std::sync::Arc;

use core_kernel::{LossEventId, UserId};

use crate::error::LossError;
use crate::event::{LossEvent, NewLossEvent};
use crate::ports::LossEventStore;

/// Use-case layer for reporting and reading loss events
///
/// All reads are scoped to the requesting user. An event belonging to a
/// different user is reported as not found rather than forbidden, so the
/// API does not leak which identifiers exist.
pub struct LossEventService {
    store: Arc<dyn LossEventStore>,
}

impl LossEventService {
    pub fn new(store: Arc<dyn LossEventStore>) -> Self {
        Self { store }
    }

    /// Reports a new loss event
    ///
    /// Validates the input, derives the filing deadline, and persists the
    /// event. Returns the stored record including the computed deadline so
    /// the caller can display it immediately.
    pub async fn report_event(&self, input: NewLossEvent) -> Result<LossEvent, LossError> {
        let event = LossEvent::report(input)?;
        self.store.insert_event(&event).await?;

        tracing::info!(
            event_id = %event.id,
            user_id = %event.user_id,
            event_type = %event.event_type.as_str(),
            filing_deadline = %event.filing_deadline,
            "loss event reported"
        );

        Ok(event)
    }

    /// Fetches one of the user's events
    pub async fn get_event(
        &self,
        user_id: UserId,
        event_id: LossEventId,
    ) -> Result<LossEvent, LossError> {
        let event = self.store.find_event(event_id).await.map_err(|e| {
            if e.is_not_found() {
                LossError::EventNotFound(event_id.to_string())
            } else {
                LossError::Port(e)
            }
        })?;

        if event.user_id != user_id {
            return Err(LossError::EventNotFound(event_id.to_string()));
        }
        Ok(event)
    }

    /// Lists the user's events, most recently discovered first
    pub async fn list_events(&self, user_id: UserId) -> Result<Vec<LossEvent>, LossError> {
        Ok(self.store.list_events_for_user(user_id).await?)
    }
}
