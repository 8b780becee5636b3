//! Proof of Loss Domain Adapters
//!
//! Implements the three ports claim submission depends on: the loss event
//! gateway, the asset catalog, and the form store. The gateway is where
//! the loss aggregate is flattened into the context slice the proof
//! domain consumes; the domains themselves never see each other.

use async_trait::async_trait;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, LossEventId, PortError, PropertyId, UserId};
use domain_proof::{
    AssetCatalog, CatalogAsset, LossEventContext, LossEventGateway, ProofOfLossForm,
    ProofOfLossStore,
};

use crate::adapters::db_to_port_error;
use crate::pool::DatabasePool;
use crate::repositories::{InventoryRepository, LossEventRepository, ProofFormRepository};

/// PostgreSQL adapter for the `LossEventGateway` port
#[derive(Debug, Clone)]
pub struct PostgresLossEventGateway {
    repository: LossEventRepository,
}

impl PostgresLossEventGateway {
    /// Creates a new gateway with the given connection pool
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            repository: LossEventRepository::new(pool),
        }
    }
}

impl DomainPort for PostgresLossEventGateway {}

#[async_trait]
impl LossEventGateway for PostgresLossEventGateway {
    #[instrument(skip(self), fields(loss_event_id = %id))]
    async fn loss_event_context(&self, id: LossEventId) -> Result<LossEventContext, PortError> {
        debug!("Resolving loss event context for claim submission");

        let event = self
            .repository
            .find_by_id(id)
            .await
            .map_err(db_to_port_error)?;

        Ok(LossEventContext {
            id: event.id,
            user_id: event.user_id,
            property_id: event.property_id,
            event_label: event.event_type.label().to_string(),
            event_date: event.event_date,
            discovery_date: event.discovery_date,
            filing_deadline: event.filing_deadline,
        })
    }
}

/// PostgreSQL adapter for the `AssetCatalog` port
#[derive(Debug, Clone)]
pub struct PostgresAssetCatalog {
    repository: InventoryRepository,
}

impl PostgresAssetCatalog {
    /// Creates a new catalog with the given connection pool
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            repository: InventoryRepository::new(pool),
        }
    }
}

impl DomainPort for PostgresAssetCatalog {}

#[async_trait]
impl AssetCatalog for PostgresAssetCatalog {
    #[instrument(skip(self), fields(property_id = %property_id))]
    async fn assets_for_property(
        &self,
        property_id: PropertyId,
    ) -> Result<Vec<CatalogAsset>, PortError> {
        debug!("Loading documented assets for claim packet");

        self.repository
            .assets_for_property(property_id)
            .await
            .map_err(db_to_port_error)
    }
}

/// PostgreSQL adapter for the `ProofOfLossStore` port
#[derive(Debug, Clone)]
pub struct PostgresProofOfLossAdapter {
    repository: ProofFormRepository,
}

impl PostgresProofOfLossAdapter {
    /// Creates a new adapter with the given connection pool
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            repository: ProofFormRepository::new(pool),
        }
    }
}

impl DomainPort for PostgresProofOfLossAdapter {}

#[async_trait]
impl ProofOfLossStore for PostgresProofOfLossAdapter {
    #[instrument(skip(self, form), fields(user_id = %form.user_id, loss_event_id = %form.loss_event_id))]
    async fn upsert_form(&self, form: &ProofOfLossForm) -> Result<ProofOfLossForm, PortError> {
        debug!("Upserting Proof of Loss form");

        self.repository.upsert(form).await.map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(user_id = %user_id, loss_event_id = %loss_event_id))]
    async fn find_form_for_event(
        &self,
        user_id: UserId,
        loss_event_id: LossEventId,
    ) -> Result<Option<ProofOfLossForm>, PortError> {
        debug!("Fetching Proof of Loss form");

        self.repository
            .find_for_event(user_id, loss_event_id)
            .await
            .map_err(db_to_port_error)
    }
}
