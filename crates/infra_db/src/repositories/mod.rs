//! Repository implementations for domain entities
//!
//! This module provides concrete repository implementations that handle
//! database access for each domain aggregate. Repositories encapsulate
//! SQL queries and map between database rows and domain types.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - Runtime-bound queries mapped onto typed row structs
//! - Money stored as an amount/currency column pair
//! - Transaction support for multi-row operations
//! - Server-side arithmetic for counters touched by concurrent writers

pub mod inventory;
pub mod jumpstart;
pub mod loss_events;
pub mod proof_forms;

pub use inventory::{InventoryRepository, NewAsset, NewAssetPhoto, NewProperty, NewUser};
pub use jumpstart::JumpstartRepository;
pub use loss_events::LossEventRepository;
pub use proof_forms::ProofFormRepository;

use rust_decimal::Decimal;

use core_kernel::{Currency, Money};

use crate::error::DatabaseError;

/// Rehydrates an optional money value from its column pair
///
/// The schema constrains the two columns to be set together or not at all;
/// a half-set pair is corrupt data and surfaces as a serialization error.
pub(crate) fn money_from_columns(
    amount: Option<Decimal>,
    currency: Option<&str>,
) -> Result<Option<Money>, DatabaseError> {
    match (amount, currency) {
        (Some(amount), Some(code)) => money_from_required_columns(amount, code).map(Some),
        (None, None) => Ok(None),
        _ => Err(DatabaseError::SerializationError(
            "money amount and currency columns must be set together".to_string(),
        )),
    }
}

/// Rehydrates a non-null money value from its column pair
pub(crate) fn money_from_required_columns(
    amount: Decimal,
    currency: &str,
) -> Result<Money, DatabaseError> {
    let currency = Currency::from_code(currency)
        .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
    Ok(Money::new(amount, currency))
}
