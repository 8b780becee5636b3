//! Proof of Loss Domain Ports
//!
//! Submission touches three collaborators, each behind its own port:
//!
//! - **`LossEventGateway`**: resolves the loss event being claimed against,
//!   with just the fields packet assembly needs
//! - **`AssetCatalog`**: returns the documented assets (with photo
//!   references) for the event's property
//! - **`ProofOfLossStore`**: upserts the submitted form keyed by
//!   (user, loss event)
//!
//! The gateway deliberately exposes a flattened context rather than the
//! loss-event aggregate, keeping this crate decoupled from the loss
//! domain.

use async_trait::async_trait;
use chrono::NaiveDate;

use core_kernel::{
    AssetId, DomainPort, LossEventId, Money, PhotoId, PortError, PropertyId, UserId,
};

use crate::form::ProofOfLossForm;

/// The slice of a loss event that submission and packet assembly need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LossEventContext {
    pub id: LossEventId,
    pub user_id: UserId,
    pub property_id: Option<PropertyId>,
    /// Human-readable incident label (e.g., "Theft")
    pub event_label: String,
    pub event_date: NaiveDate,
    pub discovery_date: NaiveDate,
    pub filing_deadline: NaiveDate,
}

/// A photo reference attached to a documented asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPhoto {
    pub id: PhotoId,
    /// Object-store URL of the stored image
    pub url: String,
}

/// A documented asset as the inventory catalog knows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogAsset {
    pub id: AssetId,
    pub name: String,
    pub category: Option<String>,
    pub estimated_value: Option<Money>,
    pub photos: Vec<CatalogPhoto>,
}

/// Read access to loss events for claim submission
#[async_trait]
pub trait LossEventGateway: DomainPort {
    /// Resolves the context for one loss event
    ///
    /// Returns `PortError::NotFound` when no such event exists. Ownership
    /// checks are the caller's responsibility.
    async fn loss_event_context(&self, id: LossEventId) -> Result<LossEventContext, PortError>;
}

/// Read access to the documented inventory
#[async_trait]
pub trait AssetCatalog: DomainPort {
    /// All assets tied to a property, with their photo references
    ///
    /// The result is a point-in-time snapshot; the packet stores copies,
    /// not references.
    async fn assets_for_property(
        &self,
        property_id: PropertyId,
    ) -> Result<Vec<CatalogAsset>, PortError>;
}

/// Persistence port for submitted forms
#[async_trait]
pub trait ProofOfLossStore: DomainPort {
    /// Upserts a form keyed by (user, loss event)
    ///
    /// Inserts on first submission; a resubmission overwrites the stored
    /// fields in place and keeps the original identifier and creation
    /// time. Returns the stored row.
    async fn upsert_form(&self, form: &ProofOfLossForm) -> Result<ProofOfLossForm, PortError>;

    /// The user's submitted form for a loss event, if any
    async fn find_form_for_event(
        &self,
        user_id: UserId,
        loss_event_id: LossEventId,
    ) -> Result<Option<ProofOfLossForm>, PortError>;
}

/// In-memory mock implementations for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory mock implementation of LossEventGateway
    #[derive(Debug, Default)]
    pub struct MockLossEventGateway {
        contexts: Arc<RwLock<HashMap<LossEventId, LossEventContext>>>,
    }

    impl MockLossEventGateway {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn register(&self, context: LossEventContext) {
            self.contexts.write().await.insert(context.id, context);
        }
    }

    impl DomainPort for MockLossEventGateway {}

    #[async_trait]
    impl LossEventGateway for MockLossEventGateway {
        async fn loss_event_context(
            &self,
            id: LossEventId,
        ) -> Result<LossEventContext, PortError> {
            self.contexts
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("LossEvent", id))
        }
    }

    /// In-memory mock implementation of AssetCatalog
    ///
    /// Counts calls so tests can prove validation failures never reach
    /// the catalog.
    #[derive(Debug, Default)]
    pub struct MockAssetCatalog {
        assets: Arc<RwLock<HashMap<PropertyId, Vec<CatalogAsset>>>>,
        calls: Arc<RwLock<usize>>,
    }

    impl MockAssetCatalog {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn register(&self, property_id: PropertyId, assets: Vec<CatalogAsset>) {
            self.assets.write().await.insert(property_id, assets);
        }

        pub async fn call_count(&self) -> usize {
            *self.calls.read().await
        }
    }

    impl DomainPort for MockAssetCatalog {}

    #[async_trait]
    impl AssetCatalog for MockAssetCatalog {
        async fn assets_for_property(
            &self,
            property_id: PropertyId,
        ) -> Result<Vec<CatalogAsset>, PortError> {
            *self.calls.write().await += 1;
            Ok(self
                .assets
                .read()
                .await
                .get(&property_id)
                .cloned()
                .unwrap_or_default())
        }
    }

    /// In-memory mock implementation of ProofOfLossStore
    #[derive(Debug, Default)]
    pub struct MockProofOfLossStore {
        forms: Arc<RwLock<HashMap<(UserId, LossEventId), ProofOfLossForm>>>,
        calls: Arc<RwLock<usize>>,
    }

    impl MockProofOfLossStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn call_count(&self) -> usize {
            *self.calls.read().await
        }

        pub async fn form_count(&self) -> usize {
            self.forms.read().await.len()
        }
    }

    impl DomainPort for MockProofOfLossStore {}

    #[async_trait]
    impl ProofOfLossStore for MockProofOfLossStore {
        async fn upsert_form(
            &self,
            form: &ProofOfLossForm,
        ) -> Result<ProofOfLossForm, PortError> {
            *self.calls.write().await += 1;
            let key = (form.user_id, form.loss_event_id);
            let mut forms = self.forms.write().await;

            let stored = match forms.get(&key) {
                Some(existing) => {
                    // Overwrite in place, keeping identity and creation time
                    let mut updated = form.clone();
                    updated.id = existing.id;
                    updated.created_at = existing.created_at;
                    updated.updated_at = Utc::now();
                    updated
                }
                None => form.clone(),
            };
            forms.insert(key, stored.clone());
            Ok(stored)
        }

        async fn find_form_for_event(
            &self,
            user_id: UserId,
            loss_event_id: LossEventId,
        ) -> Result<Option<ProofOfLossForm>, PortError> {
            Ok(self
                .forms
                .read()
                .await
                .get(&(user_id, loss_event_id))
                .cloned())
        }
    }
}
