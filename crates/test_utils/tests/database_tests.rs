//! Postgres adapter tests
//!
//! Runs the domain services over the real Postgres adapters against a
//! containerized database, covering the paths the in-memory mocks cannot:
//! SQL row mapping, constraint-backed conflict and validation errors, and
//! the transactional counter arithmetic. Every test needs a running Docker
//! daemon and is ignored by default; run the suite with
//! `cargo test -- --ignored`.
//!
//! Tests share one container through `get_shared_test_database` and stay
//! isolated by seeding their own users, so list assertions check for
//! containment rather than table-wide counts. The lifecycle test wipes
//! data and therefore starts its own container.

use std::sync::Arc;

use rust_decimal_macros::dec;

use core_kernel::{AssetId, Currency, Money, PhotoId, PortError, PropertyId, UserId};
use infra_db::repositories::{NewAsset, NewAssetPhoto, NewProperty, NewUser};
use infra_db::{DatabasePool, InventoryRepository};
use test_utils::assert_err_variant;
use test_utils::builders::LossEventBuilder;
use test_utils::database::{
    create_isolated_test_database, get_shared_test_database, DatabaseTestAssertions,
};
use test_utils::fixtures::{StringFixtures, TemporalFixtures};

async fn seed_user(pool: &DatabasePool) -> UserId {
    let user_id = UserId::new();
    InventoryRepository::new(pool.clone())
        .insert_user(&NewUser {
            user_id,
            email: format!("{user_id}@example.test"),
            display_name: StringFixtures::owner_name().to_string(),
        })
        .await
        .expect("user seed failed");
    user_id
}

async fn seed_property(pool: &DatabasePool, user_id: UserId) -> PropertyId {
    let property_id = PropertyId::new();
    InventoryRepository::new(pool.clone())
        .insert_property(&NewProperty {
            property_id,
            user_id,
            label: "Primary residence".to_string(),
        })
        .await
        .expect("property seed failed");
    property_id
}

async fn seed_asset(
    pool: &DatabasePool,
    property_id: PropertyId,
    name: &str,
    value: Option<Money>,
    photo_count: usize,
) -> AssetId {
    let inventory = InventoryRepository::new(pool.clone());
    let asset_id = AssetId::new();
    inventory
        .insert_asset(&NewAsset {
            asset_id,
            property_id,
            name: name.to_string(),
            category: None,
            estimated_value: value,
        })
        .await
        .expect("asset seed failed");
    for n in 0..photo_count {
        inventory
            .insert_photo(&NewAssetPhoto {
                photo_id: PhotoId::new(),
                asset_id,
                url: format!("https://cdn.claimready.io/photos/{asset_id}/{n}.jpg"),
            })
            .await
            .expect("photo seed failed");
    }
    asset_id
}

mod loss_event_store {
    use super::*;
    use domain_loss::{LossError, LossEventService, LossEventStore, LossEventType, ReminderThreshold};
    use infra_db::PostgresLossEventAdapter;

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_reported_event_round_trips() {
        let db = get_shared_test_database().await;
        let pool = db.pool().clone();
        let user_id = seed_user(&pool).await;
        let property_id = seed_property(&pool, user_id).await;

        let service = LossEventService::new(Arc::new(PostgresLossEventAdapter::new(pool.clone())));
        let reported = service
            .report_event(
                LossEventBuilder::new()
                    .with_user_id(user_id)
                    .with_property_id(Some(property_id))
                    .with_event_type(LossEventType::Fire)
                    .build_input(),
            )
            .await
            .unwrap();

        let fetched = service.get_event(user_id, reported.id).await.unwrap();
        assert_eq!(fetched.id, reported.id);
        assert_eq!(fetched.user_id, user_id);
        assert_eq!(fetched.property_id, Some(property_id));
        assert_eq!(fetched.event_type, LossEventType::Fire);
        assert_eq!(fetched.event_date, TemporalFixtures::event_date());
        assert_eq!(fetched.discovery_date, TemporalFixtures::discovery_date());
        assert_eq!(fetched.filing_deadline, TemporalFixtures::filing_deadline());
        assert_eq!(fetched.description, StringFixtures::description());
        assert_eq!(
            fetched.police_report_number.as_deref(),
            Some(StringFixtures::police_report_number())
        );
        let loss = fetched.estimated_loss.unwrap();
        assert_eq!(loss.amount(), dec!(1500.00));
        assert_eq!(loss.currency(), Currency::USD);
        assert!(!fetched.reminders.any_fired());

        let listed = service.list_events(user_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, reported.id);

        // Another user's lookup must not see the event at all
        let other = seed_user(&pool).await;
        assert_err_variant!(
            service.get_event(other, reported.id).await,
            LossError::EventNotFound(_)
        );
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_duplicate_event_insert_is_a_conflict() {
        let db = get_shared_test_database().await;
        let pool = db.pool().clone();
        let user_id = seed_user(&pool).await;

        let store = PostgresLossEventAdapter::new(pool);
        let event = LossEventBuilder::new()
            .with_user_id(user_id)
            .with_property_id(None)
            .build();

        store.insert_event(&event).await.unwrap();
        assert_err_variant!(store.insert_event(&event).await, PortError::Conflict { .. });
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_reminder_markers_persist_and_age_events_out_of_the_scan() {
        let db = get_shared_test_database().await;
        let pool = db.pool().clone();
        let user_id = seed_user(&pool).await;

        let store = PostgresLossEventAdapter::new(pool);
        let event = LossEventBuilder::new()
            .with_user_id(user_id)
            .with_property_id(None)
            .build();
        store.insert_event(&event).await.unwrap();

        let candidates = store
            .find_reminder_candidates(TemporalFixtures::discovery_date())
            .await
            .unwrap();
        assert!(candidates.iter().any(|e| e.id == event.id));

        // Past the deadline the event is no longer worth scanning
        let candidates = store
            .find_reminder_candidates(TemporalFixtures::after_deadline())
            .await
            .unwrap();
        assert!(candidates.iter().all(|e| e.id != event.id));

        store
            .record_reminders(
                event.id,
                &[ReminderThreshold::SixtyDay, ReminderThreshold::FortyFiveDay],
            )
            .await
            .unwrap();

        let stored = store.find_event(event.id).await.unwrap();
        assert!(stored.reminders.has_fired(ReminderThreshold::SixtyDay));
        assert!(stored.reminders.has_fired(ReminderThreshold::FortyFiveDay));
        assert!(!stored.reminders.has_fired(ReminderThreshold::ThirtyDay));
        assert!(!stored.reminders.has_fired(ReminderThreshold::SevenDay));

        store
            .record_reminders(
                event.id,
                &[ReminderThreshold::ThirtyDay, ReminderThreshold::SevenDay],
            )
            .await
            .unwrap();

        // With every threshold fired the event drops out of the scan
        let candidates = store
            .find_reminder_candidates(TemporalFixtures::seven_day_mark())
            .await
            .unwrap();
        assert!(candidates.iter().all(|e| e.id != event.id));
    }
}

mod recipient_directory {
    use super::*;
    use domain_loss::RecipientDirectory;
    use infra_db::PostgresRecipientDirectory;

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_resolves_seeded_user_with_display_name() {
        let db = get_shared_test_database().await;
        let pool = db.pool().clone();
        let user_id = seed_user(&pool).await;

        let directory = PostgresRecipientDirectory::new(pool);
        let recipient = directory.recipient_for(user_id).await.unwrap();
        assert_eq!(recipient.email, format!("{user_id}@example.test"));
        assert_eq!(
            recipient.display_name.as_deref(),
            Some(StringFixtures::owner_name())
        );
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_unknown_user_is_not_found() {
        let db = get_shared_test_database().await;
        let pool = db.pool().clone();

        let directory = PostgresRecipientDirectory::new(pool);
        let err = directory.recipient_for(UserId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}

mod proof_of_loss_store {
    use super::*;
    use chrono::Utc;
    use core_kernel::LossEventId;
    use domain_loss::LossEventStore;
    use domain_proof::{
        ProofError, ProofOfLossService, ProofOfLossSubmission, DEFAULT_SWORN_STATEMENT,
    };
    use infra_db::{
        PostgresAssetCatalog, PostgresLossEventAdapter, PostgresLossEventGateway,
        PostgresProofOfLossAdapter,
    };

    fn proof_service(pool: &DatabasePool) -> ProofOfLossService {
        ProofOfLossService::new(
            Arc::new(PostgresLossEventGateway::new(pool.clone())),
            Arc::new(PostgresAssetCatalog::new(pool.clone())),
            Arc::new(PostgresProofOfLossAdapter::new(pool.clone())),
        )
    }

    fn submission(loss_event_id: LossEventId) -> ProofOfLossSubmission {
        ProofOfLossSubmission {
            loss_event_id,
            insurer_name: StringFixtures::insurer_name().to_string(),
            policy_number: StringFixtures::policy_number().to_string(),
            claim_number: None,
            sworn_statement: DEFAULT_SWORN_STATEMENT.to_string(),
            signature_data: StringFixtures::signature_data().to_string(),
            signed_at: Utc::now(),
        }
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_packet_reads_documented_inventory() {
        let db = get_shared_test_database().await;
        let pool = db.pool().clone();
        let user_id = seed_user(&pool).await;
        let property_id = seed_property(&pool, user_id).await;
        seed_asset(
            &pool,
            property_id,
            "Laptop",
            Some(Money::new(dec!(1500.00), Currency::USD)),
            2,
        )
        .await;
        seed_asset(&pool, property_id, "Mantel clock", None, 0).await;

        let event = LossEventBuilder::new()
            .with_user_id(user_id)
            .with_property_id(Some(property_id))
            .build();
        PostgresLossEventAdapter::new(pool.clone())
            .insert_event(&event)
            .await
            .unwrap();

        let service = proof_service(&pool);
        let packet = service.submit(user_id, submission(event.id)).await.unwrap();

        assert_eq!(packet.asset_count(), 2);
        assert_eq!(
            packet.total_documented_value.unwrap().amount(),
            dec!(1500.00)
        );
        let laptop = packet.assets.iter().find(|a| a.name == "Laptop").unwrap();
        assert_eq!(laptop.photos.len(), 2);
        assert_eq!(packet.event.id, event.id);
        assert_eq!(packet.event.filing_deadline, event.filing_deadline);
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_resubmission_updates_the_form_in_place() {
        let db = get_shared_test_database().await;
        let pool = db.pool().clone();
        let user_id = seed_user(&pool).await;

        let event = LossEventBuilder::new()
            .with_user_id(user_id)
            .with_property_id(None)
            .build();
        PostgresLossEventAdapter::new(pool.clone())
            .insert_event(&event)
            .await
            .unwrap();

        let service = proof_service(&pool);
        let first = service.submit(user_id, submission(event.id)).await.unwrap();

        let mut corrected = submission(event.id);
        corrected.claim_number = Some(StringFixtures::claim_number().to_string());
        let second = service.submit(user_id, corrected).await.unwrap();

        // The unique form slot keeps its identity across resubmissions
        assert_eq!(second.form.id, first.form.id);
        assert_eq!(second.form.created_at, first.form.created_at);
        assert_eq!(
            second.form.claim_number.as_deref(),
            Some(StringFixtures::claim_number())
        );

        let stored = service.get_form(user_id, event.id).await.unwrap();
        assert_eq!(stored.id, first.form.id);
        assert_eq!(
            stored.claim_number.as_deref(),
            Some(StringFixtures::claim_number())
        );
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_other_users_event_is_hidden() {
        let db = get_shared_test_database().await;
        let pool = db.pool().clone();
        let owner = seed_user(&pool).await;
        let stranger = seed_user(&pool).await;

        let event = LossEventBuilder::new()
            .with_user_id(owner)
            .with_property_id(None)
            .build();
        PostgresLossEventAdapter::new(pool.clone())
            .insert_event(&event)
            .await
            .unwrap();

        let service = proof_service(&pool);
        assert_err_variant!(
            service.submit(stranger, submission(event.id)).await,
            ProofError::EventNotFound(_)
        );
        assert_err_variant!(
            service.get_form(owner, event.id).await,
            ProofError::FormNotFound(_)
        );
    }
}

mod jumpstart_store {
    use super::*;
    use chrono::Utc;
    use domain_jumpstart::{JumpstartMode, JumpstartService, JumpstartStore};
    use infra_db::PostgresJumpstartAdapter;

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_session_flow_counts_server_side() {
        let db = get_shared_test_database().await;
        let pool = db.pool().clone();
        let user_id = seed_user(&pool).await;
        let property_id = seed_property(&pool, user_id).await;
        let asset_id = seed_asset(
            &pool,
            property_id,
            "Sofa",
            Some(Money::new(dec!(120.00), Currency::USD)),
            0,
        )
        .await;

        let service = JumpstartService::new(Arc::new(PostgresJumpstartAdapter::new(pool)));
        let active = service
            .start_session(user_id, JumpstartMode::QuickWin)
            .await
            .unwrap();
        assert_eq!(active.session.items_target, 3);
        let session_id = active.session.id;

        let after_first = service
            .complete_prompt(
                user_id,
                session_id,
                Some(asset_id),
                Money::new(dec!(120.00), Currency::USD),
            )
            .await
            .unwrap();
        assert_eq!(after_first.session.items_completed, 1);
        assert_eq!(after_first.session.total_value.amount(), dec!(120.00));

        let after_skip = service.skip_prompt(user_id, session_id).await.unwrap();
        assert_eq!(after_skip.session.items_completed, 1);
        assert_eq!(after_skip.current_prompt_index(), 2);

        let after_last = service
            .complete_prompt(user_id, session_id, None, Money::new(dec!(80.00), Currency::USD))
            .await
            .unwrap();
        assert_eq!(after_last.session.items_completed, 2);
        assert_eq!(after_last.session.total_value.amount(), dec!(200.00));
        assert!(after_last.is_exhausted());

        let resumed = service.resume_active_session(user_id).await.unwrap().unwrap();
        assert_eq!(resumed.session.id, session_id);
        assert_eq!(resumed.progress_percent(), 67);
        assert!(resumed.prompts[0].completed);
        assert_eq!(resumed.prompts[0].asset_id, Some(asset_id));
        assert!(resumed.prompts[1].skipped);
        assert!(resumed.prompts[2].completed);

        let done = service.complete_session(user_id, session_id).await.unwrap();
        assert!(done.completed);
        assert!(done.completed_at.is_some());
        assert!(service.resume_active_session(user_id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_completing_the_same_prompt_twice_is_a_conflict() {
        let db = get_shared_test_database().await;
        let pool = db.pool().clone();
        let user_id = seed_user(&pool).await;

        let service = JumpstartService::new(Arc::new(PostgresJumpstartAdapter::new(pool.clone())));
        let store = PostgresJumpstartAdapter::new(pool);

        let active = service
            .start_session(user_id, JumpstartMode::QuickWin)
            .await
            .unwrap();
        let session_id = active.session.id;

        store
            .complete_prompt(
                session_id,
                0,
                None,
                Money::new(dec!(45.00), Currency::USD),
                Utc::now(),
            )
            .await
            .unwrap();
        assert_err_variant!(
            store
                .complete_prompt(
                    session_id,
                    0,
                    None,
                    Money::new(dec!(45.00), Currency::USD),
                    Utc::now(),
                )
                .await,
            PortError::Conflict { .. }
        );

        let (session, _) = store.find_session(session_id).await.unwrap();
        assert_eq!(session.items_completed, 1);
        assert_eq!(session.total_value.amount(), dec!(45.00));
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_mismatched_currency_rolls_back_the_prompt() {
        let db = get_shared_test_database().await;
        let pool = db.pool().clone();
        let user_id = seed_user(&pool).await;

        let service = JumpstartService::new(Arc::new(PostgresJumpstartAdapter::new(pool.clone())));
        let store = PostgresJumpstartAdapter::new(pool);

        let active = service
            .start_session(user_id, JumpstartMode::HighValue)
            .await
            .unwrap();
        let session_id = active.session.id;

        // The counter row only matches its own currency, so the whole
        // transaction, prompt update included, must roll back
        assert_err_variant!(
            store
                .complete_prompt(
                    session_id,
                    0,
                    None,
                    Money::new(dec!(45.00), Currency::EUR),
                    Utc::now(),
                )
                .await,
            PortError::Validation { .. }
        );

        let (session, prompts) = store.find_session(session_id).await.unwrap();
        assert_eq!(session.items_completed, 0);
        assert!(session.total_value.is_zero());
        assert!(prompts[0].is_pending());
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_dismissed_session_stops_resuming() {
        let db = get_shared_test_database().await;
        let pool = db.pool().clone();
        let user_id = seed_user(&pool).await;

        let service = JumpstartService::new(Arc::new(PostgresJumpstartAdapter::new(pool)));
        let active = service
            .start_session(user_id, JumpstartMode::HighValue)
            .await
            .unwrap();

        service.dismiss_session(user_id, active.session.id).await.unwrap();
        assert!(service.resume_active_session(user_id).await.unwrap().is_none());
    }
}

mod asset_catalog {
    use super::*;
    use domain_proof::AssetCatalog;
    use infra_db::PostgresAssetCatalog;

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_assets_come_back_with_grouped_photos() {
        let db = get_shared_test_database().await;
        let pool = db.pool().clone();
        let user_id = seed_user(&pool).await;
        let property_id = seed_property(&pool, user_id).await;

        let laptop = seed_asset(
            &pool,
            property_id,
            "Laptop",
            Some(Money::new(dec!(1500.00), Currency::USD)),
            2,
        )
        .await;
        let clock = seed_asset(&pool, property_id, "Mantel clock", None, 0).await;

        let catalog = PostgresAssetCatalog::new(pool);
        let assets = catalog.assets_for_property(property_id).await.unwrap();
        assert_eq!(assets.len(), 2);

        let laptop_row = assets.iter().find(|a| a.id == laptop).unwrap();
        assert_eq!(laptop_row.photos.len(), 2);
        assert_eq!(laptop_row.estimated_value.unwrap().amount(), dec!(1500.00));

        let clock_row = assets.iter().find(|a| a.id == clock).unwrap();
        assert!(clock_row.photos.is_empty());
        assert!(clock_row.estimated_value.is_none());

        let empty = catalog.assets_for_property(PropertyId::new()).await.unwrap();
        assert!(empty.is_empty());
    }
}

mod database_lifecycle {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_clear_data_resets_an_isolated_database() {
        let db = create_isolated_test_database().await.unwrap();
        let pool = db.pool().clone();
        let user_id = seed_user(&pool).await;

        let renamed = sqlx::query("UPDATE users SET display_name = $1 WHERE user_id = $2")
            .bind("Renamed Owner")
            .bind(Uuid::from(user_id))
            .execute(db.pool())
            .await
            .unwrap();
        renamed.assert_rows_affected(1);

        db.clear_data().await.unwrap();

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
