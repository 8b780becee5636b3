//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use chrono::NaiveDate;
use core_kernel::{DeadlineUrgency, Money, FILING_WINDOW_DAYS};
use domain_loss::{LossEvent, ReminderThreshold};
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value is positive
pub fn assert_money_positive(money: &Money) {
    assert!(
        money.is_positive(),
        "Expected positive money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts that money values sum to a total
///
/// # Panics
///
/// Panics if the sum doesn't equal the total
pub fn assert_money_sum_equals(parts: &[Money], total: &Money) {
    let sum = parts.iter().fold(Money::zero(total.currency()), |acc, m| {
        acc.checked_add(m).expect("Currency mismatch in sum")
    });

    assert_eq!(
        sum.amount(),
        total.amount(),
        "Sum of parts ({}) doesn't equal total ({})",
        sum.amount(),
        total.amount()
    );
}

/// Asserts that an event's filing deadline sits exactly one filing window
/// after its discovery date
pub fn assert_deadline_follows_discovery(event: &LossEvent) {
    let expected_days = FILING_WINDOW_DAYS;
    let actual_days = (event.filing_deadline - event.discovery_date).num_days();
    assert_eq!(
        actual_days, expected_days,
        "Filing deadline {} is {} days after discovery {}, expected {}",
        event.filing_deadline, actual_days, event.discovery_date, expected_days
    );
}

/// Asserts the urgency band an event reports as of a given date
pub fn assert_urgency(event: &LossEvent, today: NaiveDate, expected: DeadlineUrgency) {
    let actual = event.urgency(today);
    assert_eq!(
        actual,
        expected,
        "Expected urgency {:?} as of {} ({} days remaining), got {:?}",
        expected,
        today,
        event.days_remaining(today),
        actual
    );
}

/// Asserts that a reminder threshold has fired for an event
pub fn assert_threshold_fired(event: &LossEvent, threshold: ReminderThreshold) {
    assert!(
        event.reminders.has_fired(threshold),
        "Expected {} reminder to have fired for event {}, trail is {:?}",
        threshold,
        event.id,
        event.reminders
    );
}

/// Asserts that a reminder threshold has not fired for an event
pub fn assert_threshold_not_fired(event: &LossEvent, threshold: ReminderThreshold) {
    assert!(
        !event.reminders.has_fired(threshold),
        "Expected {} reminder not to have fired for event {}, trail is {:?}",
        threshold,
        event.id,
        event.reminders
    );
}

/// Asserts that a decimal value is within a range
pub fn assert_decimal_in_range(value: Decimal, min: Decimal, max: Decimal) {
    assert!(
        value >= min && value <= max,
        "Decimal {} is not in range [{}, {}]",
        value,
        min,
        max
    );
}

/// Asserts that a result is Ok and returns the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Asserts that a result is Err and returns the error
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => e,
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => panic!("{}: got Ok({:?})", $msg, value),
            Err(e) => e,
        }
    };
}

/// Asserts that an error matches a specific variant
#[macro_export]
macro_rules! assert_err_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Ok(value) => panic!("Expected Err matching {}, got Ok({:?})", stringify!($pattern), value),
            Err(ref e) => {
                assert!(
                    matches!(e, $pattern),
                    "Error {:?} does not match pattern {}",
                    e,
                    stringify!($pattern)
                );
            }
        }
    };
}
