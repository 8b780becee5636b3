//! Comprehensive tests for domain_proof
//!
//! Covers the three-step wizard, submission validation ordering, the
//! upsert semantics of resubmission, and claim packet assembly.

use std::sync::Arc;

use chrono::NaiveDate;

use core_kernel::{AssetId, Currency, LossEventId, Money, PhotoId, PropertyId, UserId};

use domain_proof::ports::mock::{MockAssetCatalog, MockLossEventGateway, MockProofOfLossStore};
use domain_proof::ports::{CatalogAsset, CatalogPhoto, LossEventContext};
use domain_proof::wizard::{ProofOfLossStep, ProofOfLossWizard, DEFAULT_SWORN_STATEMENT};
use domain_proof::{ProofError, ProofOfLossService, ProofOfLossStatus};
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn context_for(user_id: UserId, property_id: Option<PropertyId>) -> LossEventContext {
    LossEventContext {
        id: LossEventId::new(),
        user_id,
        property_id,
        event_label: "Water Damage".to_string(),
        event_date: date(2025, 1, 1),
        discovery_date: date(2025, 1, 1),
        filing_deadline: date(2025, 3, 2),
    }
}

fn valued_asset(name: &str, value: &str) -> CatalogAsset {
    CatalogAsset {
        id: AssetId::new(),
        name: name.to_string(),
        category: Some("Electronics".to_string()),
        estimated_value: Some(Money::new(value.parse().unwrap(), Currency::USD)),
        photos: vec![CatalogPhoto {
            id: PhotoId::new(),
            url: format!("https://cdn.example.com/{}.jpg", name),
        }],
    }
}

struct ProofHarness {
    events: Arc<MockLossEventGateway>,
    assets: Arc<MockAssetCatalog>,
    store: Arc<MockProofOfLossStore>,
    service: ProofOfLossService,
}

impl ProofHarness {
    fn new() -> Self {
        let events = Arc::new(MockLossEventGateway::new());
        let assets = Arc::new(MockAssetCatalog::new());
        let store = Arc::new(MockProofOfLossStore::new());
        let service = ProofOfLossService::new(events.clone(), assets.clone(), store.clone());
        Self {
            events,
            assets,
            store,
            service,
        }
    }
}

/// Drives a wizard from start to a signed, submit-ready state
fn completed_wizard(loss_event_id: LossEventId) -> ProofOfLossWizard {
    let mut wizard = ProofOfLossWizard::start(loss_event_id);
    wizard.set_insurance_info("Acme Mutual", "HO-2291", Some("CLM-88".to_string()));
    wizard.advance().unwrap();
    wizard.advance().unwrap();
    wizard.sign("data:image/png;base64,iVBORw0KGgo=");
    wizard
}

// ============================================================================
// Wizard Navigation Tests
// ============================================================================

mod wizard_tests {
    use super::*;

    #[test]
    fn test_wizard_starts_with_boilerplate_statement() {
        let wizard = ProofOfLossWizard::start(LossEventId::new());
        assert_eq!(wizard.step(), ProofOfLossStep::InsuranceInfo);
        assert_eq!(wizard.sworn_statement(), DEFAULT_SWORN_STATEMENT);
    }

    #[test]
    fn test_steps_can_be_traversed_with_nothing_filled_in() {
        let mut wizard = ProofOfLossWizard::start(LossEventId::new());

        assert_eq!(wizard.advance().unwrap(), ProofOfLossStep::SwornStatement);
        assert_eq!(wizard.advance().unwrap(), ProofOfLossStep::Signature);
        assert_eq!(wizard.back().unwrap(), ProofOfLossStep::SwornStatement);
        assert_eq!(wizard.back().unwrap(), ProofOfLossStep::InsuranceInfo);
    }

    #[test]
    fn test_navigation_stops_at_both_ends() {
        let mut wizard = ProofOfLossWizard::start(LossEventId::new());
        assert!(matches!(
            wizard.back(),
            Err(ProofError::AlreadyAtFirstStep)
        ));

        wizard.advance().unwrap();
        wizard.advance().unwrap();
        assert!(matches!(
            wizard.advance(),
            Err(ProofError::AlreadyAtFinalStep)
        ));
    }

    #[test]
    fn test_submission_only_available_on_final_step() {
        let mut wizard = ProofOfLossWizard::start(LossEventId::new());
        wizard.set_insurance_info("Acme Mutual", "HO-1", None);
        wizard.sign("sig");

        assert!(matches!(
            wizard.submission(),
            Err(ProofError::SubmitUnavailable)
        ));

        wizard.advance().unwrap();
        wizard.advance().unwrap();
        assert!(wizard.submission().is_ok());
    }

    #[test]
    fn test_going_back_to_fix_a_field_keeps_the_rest() {
        let event_id = LossEventId::new();
        let mut wizard = completed_wizard(event_id);

        wizard.back().unwrap();
        wizard.back().unwrap();
        wizard.set_insurance_info("Acme Mutual", "HO-2291-CORRECTED", None);
        wizard.advance().unwrap();
        wizard.advance().unwrap();

        let submission = wizard.submission().unwrap();
        assert_eq!(submission.policy_number, "HO-2291-CORRECTED");
        assert_eq!(submission.sworn_statement, DEFAULT_SWORN_STATEMENT);
        assert!(!submission.signature_data.is_empty());
    }

    #[test]
    fn test_edited_statement_survives_navigation() {
        let mut wizard = completed_wizard(LossEventId::new());
        wizard.back().unwrap();
        wizard.set_sworn_statement("My own account of the loss.");
        wizard.advance().unwrap();

        let submission = wizard.submission().unwrap();
        assert_eq!(submission.sworn_statement, "My own account of the loss.");
    }

    #[test]
    fn test_cleared_signature_blocks_submission() {
        let mut wizard = completed_wizard(LossEventId::new());
        assert!(wizard.has_signature());

        wizard.clear_signature();
        assert!(!wizard.has_signature());
        assert!(matches!(
            wizard.submission(),
            Err(ProofError::MissingSignature)
        ));
    }
}

// ============================================================================
// Submission Validation Tests
// ============================================================================

mod validation_tests {
    use super::*;

    #[test]
    fn test_blank_required_fields_reported_individually() {
        let mut wizard = ProofOfLossWizard::start(LossEventId::new());
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        wizard.sign("sig");

        assert!(matches!(
            wizard.submission(),
            Err(ProofError::MissingField("insurer_name"))
        ));

        wizard.set_insurance_info("Acme Mutual", "", None);
        assert!(matches!(
            wizard.submission(),
            Err(ProofError::MissingField("policy_number"))
        ));

        wizard.set_insurance_info("Acme Mutual", "HO-1", None);
        wizard.set_sworn_statement("   ");
        assert!(matches!(
            wizard.submission(),
            Err(ProofError::MissingField("sworn_statement"))
        ));
    }

    #[test]
    fn test_whitespace_signature_is_missing() {
        let mut wizard = completed_wizard(LossEventId::new());
        wizard.sign("   ");
        assert!(matches!(
            wizard.submission(),
            Err(ProofError::MissingSignature)
        ));
    }

    #[test]
    fn test_claim_number_is_optional() {
        let mut wizard = completed_wizard(LossEventId::new());
        wizard.back().unwrap();
        wizard.back().unwrap();
        wizard.set_insurance_info("Acme Mutual", "HO-1", None);
        wizard.advance().unwrap();
        wizard.advance().unwrap();

        let submission = wizard.submission().unwrap();
        assert!(submission.claim_number.is_none());
    }
}

// ============================================================================
// Submission Service Tests
// ============================================================================

mod service_tests {
    use super::*;

    #[tokio::test]
    async fn test_wizard_driven_submission_produces_stored_form_and_packet() {
        let h = ProofHarness::new();
        let user_id = UserId::new();
        let property_id = PropertyId::new();
        let event = context_for(user_id, Some(property_id));
        let event_id = event.id;
        h.events.register(event).await;
        h.assets
            .register(
                property_id,
                vec![
                    valued_asset("camera", "899.99"),
                    valued_asset("lens", "450.00"),
                ],
            )
            .await;

        let wizard = completed_wizard(event_id);
        let submission = wizard.submission().unwrap();
        let packet = h.service.submit(user_id, submission).await.unwrap();

        assert_eq!(packet.form.status, ProofOfLossStatus::Submitted);
        assert_eq!(packet.form.insurer_name, "Acme Mutual");
        assert_eq!(packet.event.id, event_id);
        assert_eq!(packet.asset_count(), 2);
        assert_eq!(packet.photo_count(), 2);
        assert_eq!(
            packet.total_documented_value.unwrap().amount(),
            dec!(1349.99)
        );

        let stored = h.service.get_form(user_id, event_id).await.unwrap();
        assert_eq!(stored.id, packet.form.id);
        assert!(stored.submitted_at >= stored.signed_at);
    }

    #[tokio::test]
    async fn test_resubmission_overwrites_but_keeps_form_identity() {
        let h = ProofHarness::new();
        let user_id = UserId::new();
        let event = context_for(user_id, None);
        let event_id = event.id;
        h.events.register(event).await;

        let first = h
            .service
            .submit(user_id, completed_wizard(event_id).submission().unwrap())
            .await
            .unwrap();

        let mut wizard = completed_wizard(event_id);
        wizard.back().unwrap();
        wizard.back().unwrap();
        wizard.set_insurance_info("Acme Mutual", "HO-2291-AMENDED", None);
        wizard.advance().unwrap();
        wizard.advance().unwrap();

        let second = h
            .service
            .submit(user_id, wizard.submission().unwrap())
            .await
            .unwrap();

        assert_eq!(second.form.id, first.form.id);
        assert_eq!(second.form.created_at, first.form.created_at);
        assert_eq!(second.form.policy_number, "HO-2291-AMENDED");
        assert_eq!(h.store.form_count().await, 1);
    }

    #[tokio::test]
    async fn test_invalid_submission_makes_no_port_calls() {
        let h = ProofHarness::new();
        let user_id = UserId::new();
        let event = context_for(user_id, Some(PropertyId::new()));
        let event_id = event.id;
        h.events.register(event).await;

        let mut submission = completed_wizard(event_id).submission().unwrap();
        submission.signature_data = String::new();

        let result = h.service.submit(user_id, submission).await;
        assert!(matches!(result, Err(ProofError::MissingSignature)));
        assert_eq!(h.assets.call_count().await, 0);
        assert_eq!(h.store.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_event_is_not_found() {
        let h = ProofHarness::new();
        let submission = completed_wizard(LossEventId::new()).submission().unwrap();

        let result = h.service.submit(UserId::new(), submission).await;
        assert!(matches!(result, Err(ProofError::EventNotFound(_))));
    }
}

// ============================================================================
// Claim Packet Tests
// ============================================================================

mod packet_tests {
    use super::*;

    #[tokio::test]
    async fn test_unvalued_assets_appear_without_affecting_total() {
        let h = ProofHarness::new();
        let user_id = UserId::new();
        let property_id = PropertyId::new();
        let event = context_for(user_id, Some(property_id));
        let event_id = event.id;
        h.events.register(event).await;

        let mut heirloom = valued_asset("heirloom", "100.00");
        heirloom.estimated_value = None;
        h.assets
            .register(property_id, vec![heirloom, valued_asset("tv", "650.00")])
            .await;

        let packet = h
            .service
            .submit(user_id, completed_wizard(event_id).submission().unwrap())
            .await
            .unwrap();

        assert_eq!(packet.asset_count(), 2);
        assert_eq!(packet.total_documented_value.unwrap().amount(), dec!(650.00));
    }

    #[tokio::test]
    async fn test_empty_inventory_yields_no_total() {
        let h = ProofHarness::new();
        let user_id = UserId::new();
        let property_id = PropertyId::new();
        let event = context_for(user_id, Some(property_id));
        let event_id = event.id;
        h.events.register(event).await;
        h.assets.register(property_id, vec![]).await;

        let packet = h
            .service
            .submit(user_id, completed_wizard(event_id).submission().unwrap())
            .await
            .unwrap();

        assert_eq!(packet.asset_count(), 0);
        assert!(packet.total_documented_value.is_none());
    }
}
