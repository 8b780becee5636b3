//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the PostgreSQL database layer.
//!
//! # Architecture
//!
//! Each domain has a corresponding adapter that:
//! - Implements the domain's port trait
//! - Translates between domain models and database row types
//! - Uses the repository layer for database operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresLossEventAdapter;
//! use domain_loss::LossEventStore;
//!
//! let adapter = PostgresLossEventAdapter::new(pool);
//! let event = adapter.find_event(loss_event_id).await?;
//! ```

pub mod jumpstart;
pub mod loss;
pub mod proof;

pub use jumpstart::PostgresJumpstartAdapter;
pub use loss::{PostgresLossEventAdapter, PostgresRecipientDirectory};
pub use proof::{PostgresAssetCatalog, PostgresLossEventGateway, PostgresProofOfLossAdapter};

use core_kernel::PortError;

use crate::error::DatabaseError;

/// Maps a database error onto the port error the domain expects
///
/// Not-found keeps its entity and id; constraint violations surface as
/// validation failures except duplicates, which are conflicts so callers
/// can distinguish a lost race from bad input.
pub(crate) fn db_to_port_error(error: DatabaseError) -> PortError {
    match error {
        DatabaseError::NotFound { entity, id } => PortError::NotFound {
            entity_type: entity,
            id,
        },
        DatabaseError::DuplicateEntry(message) => PortError::conflict(message),
        DatabaseError::ForeignKeyViolation(message)
        | DatabaseError::ConstraintViolation(message) => PortError::validation(message),
        DatabaseError::ConnectionFailed(message) => PortError::connection(message),
        DatabaseError::PoolExhausted => PortError::service_unavailable("database"),
        other => PortError::internal(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_keeps_entity_and_id() {
        let err = db_to_port_error(DatabaseError::not_found("LossEvent", "LOSS-1"));

        match err {
            PortError::NotFound { entity_type, id } => {
                assert_eq!(entity_type, "LossEvent");
                assert_eq!(id, "LOSS-1");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err = db_to_port_error(DatabaseError::DuplicateEntry("already resolved".into()));
        assert!(matches!(err, PortError::Conflict { .. }));
    }

    #[test]
    fn test_pool_exhaustion_is_transient() {
        let err = db_to_port_error(DatabaseError::PoolExhausted);
        assert!(err.is_transient());
    }
}
