//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the claim
//! readiness system. These fixtures are designed to be consistent and
//! predictable for unit tests.

use chrono::NaiveDate;
use core_kernel::{
    AssetId, Currency, JumpstartSessionId, LossEventId, Money, PropertyId, ProofOfLossFormId,
    UserId,
};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Creates a standard USD amount for testing
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }

    /// Typical documented value for a laptop
    pub fn usd_laptop() -> Money {
        Money::new(dec!(1500.00), Currency::USD)
    }

    /// Typical documented value for a television
    pub fn usd_tv() -> Money {
        Money::new(dec!(2200.00), Currency::USD)
    }

    /// A large estimated loss for a whole-home incident
    pub fn usd_total_loss() -> Money {
        Money::new(dec!(250000.00), Currency::USD)
    }

    /// Creates a zero amount
    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }

    /// Creates a EUR amount for currency mismatch tests
    pub fn eur_100() -> Money {
        Money::new(dec!(100.00), Currency::EUR)
    }

    /// A negative amount for estimate validation tests
    pub fn usd_negative() -> Money {
        Money::new(dec!(-50.00), Currency::USD)
    }
}

/// Fixture for dates around the filing window
///
/// The canonical timeline discovers a loss on Jan 1, 2025, which puts the
/// filing deadline at Mar 2, 2025. The mark dates land exactly on the
/// reminder thresholds of that window.
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Date the incident occurred, a few days before discovery
    pub fn event_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 28).unwrap()
    }

    /// Date the owner discovered the loss, anchors the filing window
    pub fn discovery_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    /// The filing deadline derived from the canonical discovery date
    pub fn filing_deadline() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()
    }

    /// 45 days remaining in the canonical window
    pub fn forty_five_day_mark() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 16).unwrap()
    }

    /// 30 days remaining in the canonical window
    pub fn thirty_day_mark() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
    }

    /// 7 days remaining in the canonical window
    pub fn seven_day_mark() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 23).unwrap()
    }

    /// The day before the deadline
    pub fn day_before_deadline() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    /// A date past the filing deadline
    pub fn after_deadline() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic user ID for testing
    pub fn user_id() -> UserId {
        UserId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap())
    }

    /// Creates a deterministic property ID for testing
    pub fn property_id() -> PropertyId {
        PropertyId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap())
    }

    /// Creates a deterministic asset ID for testing
    pub fn asset_id() -> AssetId {
        AssetId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap())
    }

    /// Creates a deterministic loss event ID for testing
    pub fn loss_event_id() -> LossEventId {
        LossEventId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440004").unwrap())
    }

    /// Creates a deterministic proof of loss form ID for testing
    pub fn form_id() -> ProofOfLossFormId {
        ProofOfLossFormId::from_uuid(
            Uuid::parse_str("550e8400-e29b-41d4-a716-446655440005").unwrap(),
        )
    }

    /// Creates a deterministic jumpstart session ID for testing
    pub fn session_id() -> JumpstartSessionId {
        JumpstartSessionId::from_uuid(
            Uuid::parse_str("550e8400-e29b-41d4-a716-446655440006").unwrap(),
        )
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    /// Standard loss description
    pub fn description() -> &'static str {
        "Garage broken into overnight, tools and bikes taken"
    }

    /// Standard police report reference
    pub fn police_report_number() -> &'static str {
        "PD-2025-0042"
    }

    /// Standard insurer name
    pub fn insurer_name() -> &'static str {
        "Acme Mutual Insurance"
    }

    /// Standard homeowner policy number
    pub fn policy_number() -> &'static str {
        "HO-2024-118822"
    }

    /// Standard claim number assigned by the insurer
    pub fn claim_number() -> &'static str {
        "CLM-2025-000431"
    }

    /// Test email address
    pub fn email() -> &'static str {
        "owner@example.com"
    }

    /// Test owner name
    pub fn owner_name() -> &'static str {
        "Jordan Reyes"
    }

    /// Captured signature payload
    pub fn signature_data() -> &'static str {
        "data:image/png;base64,iVBORw0KGgoAAAANSUhEUg=="
    }
}
