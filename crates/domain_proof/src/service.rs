//! Proof of Loss application service

use std::sync::Arc;

use core_kernel::{LossEventId, UserId};

use crate::error::ProofError;
use crate::form::ProofOfLossForm;
use crate::packet::ClaimPacket;
use crate::ports::{AssetCatalog, LossEventGateway, ProofOfLossStore};
use crate::wizard::ProofOfLossSubmission;

/// Use-case layer for submitting and reading Proof of Loss forms
///
/// Submission validates locally before any port is touched, so an
/// incomplete form never triggers a catalog read or a store write.
/// Ownership mismatches are reported as not found, matching the loss
/// event service.
pub struct ProofOfLossService {
    events: Arc<dyn LossEventGateway>,
    assets: Arc<dyn AssetCatalog>,
    store: Arc<dyn ProofOfLossStore>,
}

impl ProofOfLossService {
    pub fn new(
        events: Arc<dyn LossEventGateway>,
        assets: Arc<dyn AssetCatalog>,
        store: Arc<dyn ProofOfLossStore>,
    ) -> Self {
        Self {
            events,
            assets,
            store,
        }
    }

    /// Submits a completed Proof of Loss and assembles the claim packet
    ///
    /// Resubmitting for the same loss event overwrites the stored form;
    /// the returned packet reflects the inventory at this submission.
    pub async fn submit(
        &self,
        user_id: UserId,
        submission: ProofOfLossSubmission,
    ) -> Result<ClaimPacket, ProofError> {
        submission.validate()?;

        let loss_event_id = submission.loss_event_id;
        let event = self
            .events
            .loss_event_context(loss_event_id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    ProofError::EventNotFound(loss_event_id.to_string())
                } else {
                    ProofError::Port(e)
                }
            })?;

        if event.user_id != user_id {
            return Err(ProofError::EventNotFound(loss_event_id.to_string()));
        }

        let assets = match event.property_id {
            Some(property_id) => self.assets.assets_for_property(property_id).await?,
            None => Vec::new(),
        };

        let form = ProofOfLossForm::from_submission(user_id, &submission);
        let stored = self.store.upsert_form(&form).await?;

        tracing::info!(
            form_id = %stored.id,
            user_id = %user_id,
            loss_event_id = %loss_event_id,
            asset_count = assets.len(),
            "proof of loss submitted"
        );

        ClaimPacket::assemble(stored, event, assets)
    }

    /// Fetches the user's stored form for a loss event
    pub async fn get_form(
        &self,
        user_id: UserId,
        loss_event_id: LossEventId,
    ) -> Result<ProofOfLossForm, ProofError> {
        self.store
            .find_form_for_event(user_id, loss_event_id)
            .await?
            .ok_or_else(|| ProofError::FormNotFound(loss_event_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::{MockAssetCatalog, MockLossEventGateway, MockProofOfLossStore};
    use crate::ports::{CatalogAsset, LossEventContext};
    use chrono::{NaiveDate, Utc};
    use core_kernel::{AssetId, Currency, Money, PropertyId};
    use rust_decimal_macros::dec;

    struct Harness {
        events: Arc<MockLossEventGateway>,
        assets: Arc<MockAssetCatalog>,
        store: Arc<MockProofOfLossStore>,
        service: ProofOfLossService,
    }

    fn harness() -> Harness {
        let events = Arc::new(MockLossEventGateway::new());
        let assets = Arc::new(MockAssetCatalog::new());
        let store = Arc::new(MockProofOfLossStore::new());
        let service = ProofOfLossService::new(events.clone(), assets.clone(), store.clone());
        Harness {
            events,
            assets,
            store,
            service,
        }
    }

    fn context(user_id: UserId, property_id: Option<PropertyId>) -> LossEventContext {
        LossEventContext {
            id: LossEventId::new(),
            user_id,
            property_id,
            event_label: "Fire".to_string(),
            event_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            discovery_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            filing_deadline: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
        }
    }

    fn submission(loss_event_id: LossEventId) -> ProofOfLossSubmission {
        ProofOfLossSubmission {
            loss_event_id,
            insurer_name: "Acme Mutual".to_string(),
            policy_number: "HO-2291".to_string(),
            claim_number: Some("CLM-88".to_string()),
            sworn_statement: "I hereby make claim.".to_string(),
            signature_data: "data:image/png;base64,iVBORw0KGgo=".to_string(),
            signed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_submit_stores_form_and_assembles_packet() {
        let h = harness();
        let user_id = UserId::new();
        let property_id = PropertyId::new();
        let event = context(user_id, Some(property_id));
        let event_id = event.id;
        h.events.register(event).await;
        h.assets
            .register(
                property_id,
                vec![CatalogAsset {
                    id: AssetId::new(),
                    name: "Laptop".to_string(),
                    category: None,
                    estimated_value: Some(Money::new(dec!(1500.00), Currency::USD)),
                    photos: vec![],
                }],
            )
            .await;

        let packet = h.service.submit(user_id, submission(event_id)).await.unwrap();

        assert_eq!(packet.asset_count(), 1);
        assert_eq!(
            packet.total_documented_value.unwrap().amount(),
            dec!(1500.00)
        );
        assert_eq!(h.store.form_count().await, 1);

        let stored = h.service.get_form(user_id, event_id).await.unwrap();
        assert_eq!(stored.id, packet.form.id);
    }

    #[tokio::test]
    async fn test_submit_without_signature_touches_no_ports() {
        let h = harness();
        let user_id = UserId::new();
        let event = context(user_id, Some(PropertyId::new()));
        let event_id = event.id;
        h.events.register(event).await;

        let mut incomplete = submission(event_id);
        incomplete.signature_data = String::new();

        let result = h.service.submit(user_id, incomplete).await;
        assert!(matches!(result, Err(ProofError::MissingSignature)));
        assert_eq!(h.assets.call_count().await, 0);
        assert_eq!(h.store.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_submit_hides_other_users_events() {
        let h = harness();
        let owner = UserId::new();
        let event = context(owner, None);
        let event_id = event.id;
        h.events.register(event).await;

        let result = h.service.submit(UserId::new(), submission(event_id)).await;
        assert!(matches!(result, Err(ProofError::EventNotFound(_))));
        assert_eq!(h.store.form_count().await, 0);
    }

    #[tokio::test]
    async fn test_submit_without_property_skips_catalog() {
        let h = harness();
        let user_id = UserId::new();
        let event = context(user_id, None);
        let event_id = event.id;
        h.events.register(event).await;

        let packet = h.service.submit(user_id, submission(event_id)).await.unwrap();
        assert_eq!(packet.asset_count(), 0);
        assert!(packet.total_documented_value.is_none());
        assert_eq!(h.assets.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_get_form_before_submission_is_not_found() {
        let h = harness();
        let result = h.service.get_form(UserId::new(), LossEventId::new()).await;
        assert!(matches!(result, Err(ProofError::FormNotFound(_))));
    }
}
