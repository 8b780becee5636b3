//! Infrastructure Database Layer
//!
//! This crate provides the database infrastructure for the claim readiness
//! system, implementing the domain persistence ports on PostgreSQL using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern, providing data access
//! abstractions that hide the database implementation details from the
//! domain layer. Repositories own the SQL and row mapping; adapters wrap
//! them to satisfy the domain port traits.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseConfig, create_pool, run_migrations};
//! use infra_db::adapters::PostgresLossEventAdapter;
//!
//! let pool = create_pool(DatabaseConfig::new(database_url)).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresLossEventAdapter::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::{
    PostgresAssetCatalog, PostgresJumpstartAdapter, PostgresLossEventAdapter,
    PostgresLossEventGateway, PostgresProofOfLossAdapter, PostgresRecipientDirectory,
};
pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool};
pub use repositories::{
    InventoryRepository, JumpstartRepository, LossEventRepository, ProofFormRepository,
};
