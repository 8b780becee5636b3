//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{Duration, NaiveDate};
use core_kernel::{Currency, LossEventId, Money, UserId};
use domain_jumpstart::JumpstartMode;
use domain_loss::{LossEventType, NewLossEvent, ReminderThreshold};
use proptest::prelude::*;

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::CAD),
        Just(Currency::EUR),
        Just(Currency::GBP),
    ]
}

/// Strategy for generating valid positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for generating valid Money values with positive amounts
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (positive_amount_minor_strategy(), currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for generating valid USD Money values
pub fn usd_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(|amount| Money::from_minor(amount, Currency::USD))
}

/// Strategy for generating loss event types
pub fn event_type_strategy() -> impl Strategy<Value = LossEventType> {
    prop_oneof![
        Just(LossEventType::Fire),
        Just(LossEventType::Theft),
        Just(LossEventType::Flood),
        Just(LossEventType::WaterDamage),
        Just(LossEventType::Storm),
        Just(LossEventType::Vandalism),
        Just(LossEventType::Other),
    ]
}

/// Strategy for generating reminder thresholds
pub fn threshold_strategy() -> impl Strategy<Value = ReminderThreshold> {
    prop_oneof![
        Just(ReminderThreshold::SixtyDay),
        Just(ReminderThreshold::FortyFiveDay),
        Just(ReminderThreshold::ThirtyDay),
        Just(ReminderThreshold::SevenDay),
    ]
}

/// Strategy for generating jumpstart modes
pub fn jumpstart_mode_strategy() -> impl Strategy<Value = JumpstartMode> {
    prop_oneof![
        Just(JumpstartMode::QuickWin),
        Just(JumpstartMode::HighValue),
        Just(JumpstartMode::RoomBlitz),
    ]
}

/// Strategy for generating discovery dates across 2025
pub fn discovery_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..365i64).prop_map(|days| {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + Duration::days(days)
    })
}

/// Strategy for generating (event, discovery) date pairs with the event on
/// or before the discovery
pub fn date_pair_strategy() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (discovery_date_strategy(), 0i64..30i64).prop_map(|(discovery, lag)| {
        (discovery - Duration::days(lag), discovery)
    })
}

/// Strategy for generating days-remaining values around the filing window
pub fn days_remaining_strategy() -> impl Strategy<Value = i64> {
    -30i64..=90i64
}

/// Strategy for generating loss descriptions
pub fn description_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{9,79}"
}

/// Strategy for generating UserId
pub fn user_id_strategy() -> impl Strategy<Value = UserId> {
    any::<[u8; 16]>().prop_map(|bytes| UserId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for generating LossEventId
pub fn loss_event_id_strategy() -> impl Strategy<Value = LossEventId> {
    any::<[u8; 16]>().prop_map(|bytes| LossEventId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for generating complete, valid reporting inputs
pub fn new_loss_event_strategy() -> impl Strategy<Value = NewLossEvent> {
    (
        user_id_strategy(),
        event_type_strategy(),
        date_pair_strategy(),
        description_strategy(),
        proptest::option::of(usd_money_strategy()),
    )
        .prop_map(|(user_id, event_type, (event_date, discovery_date), description, loss)| {
            NewLossEvent {
                user_id,
                property_id: None,
                event_type,
                event_date,
                discovery_date,
                description,
                police_report_number: None,
                fire_report_number: None,
                estimated_loss: loss,
            }
        })
}
