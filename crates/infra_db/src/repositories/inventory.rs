//! Inventory and identity repository
//!
//! Read access to users, properties, and the documented asset catalog,
//! plus the insert paths used to build catalogs up. Claim packet
//! assembly reads assets with their photos in one pass.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use core_kernel::{AssetId, PhotoId, PropertyId, UserId};
use domain_proof::{CatalogAsset, CatalogPhoto};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;
use crate::repositories::money_from_columns;

const USER_COLUMNS: &str = "user_id, email, display_name, created_at";

const ASSET_COLUMNS: &str = "asset_id, property_id, name, category, estimated_value_amount, \
     estimated_value_currency, created_at";

const PHOTO_COLUMNS: &str = "photo_id, asset_id, url, created_at";

/// Database row for a user account
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// Database row for a documented asset
#[derive(Debug, Clone, FromRow)]
pub struct AssetRow {
    pub asset_id: Uuid,
    pub property_id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub estimated_value_amount: Option<Decimal>,
    pub estimated_value_currency: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Database row for an asset photo
#[derive(Debug, Clone, FromRow)]
pub struct PhotoRow {
    pub photo_id: Uuid,
    pub asset_id: Uuid,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_id: UserId,
    pub email: String,
    pub display_name: String,
}

/// Input for creating a property
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub property_id: PropertyId,
    pub user_id: UserId,
    pub label: String,
}

/// Input for documenting an asset
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub asset_id: AssetId,
    pub property_id: PropertyId,
    pub name: String,
    pub category: Option<String>,
    pub estimated_value: Option<core_kernel::Money>,
}

/// Input for attaching a photo to an asset
#[derive(Debug, Clone)]
pub struct NewAssetPhoto {
    pub photo_id: PhotoId,
    pub asset_id: AssetId,
    pub url: String,
}

/// Repository for identity and inventory data access
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: DatabasePool,
}

impl InventoryRepository {
    /// Creates a new repository with the given connection pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Fetches one user account
    pub async fn find_user(&self, user_id: UserId) -> Result<UserRow, DatabaseError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");

        sqlx::query_as::<_, UserRow>(&query)
            .bind(Uuid::from(user_id))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("User", user_id))
    }

    /// Creates a user account
    pub async fn insert_user(&self, user: &NewUser) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO users (user_id, email, display_name) VALUES ($1, $2, $3)")
            .bind(Uuid::from(user.user_id))
            .bind(&user.email)
            .bind(&user.display_name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Creates a property for a user
    pub async fn insert_property(&self, property: &NewProperty) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO properties (property_id, user_id, label) VALUES ($1, $2, $3)")
            .bind(Uuid::from(property.property_id))
            .bind(Uuid::from(property.user_id))
            .bind(&property.label)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Documents an asset under a property
    pub async fn insert_asset(&self, asset: &NewAsset) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO assets (asset_id, property_id, name, category, \
             estimated_value_amount, estimated_value_currency) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::from(asset.asset_id))
        .bind(Uuid::from(asset.property_id))
        .bind(&asset.name)
        .bind(&asset.category)
        .bind(asset.estimated_value.map(|m| m.amount()))
        .bind(asset.estimated_value.map(|m| m.currency().code()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Attaches a photo to an asset
    pub async fn insert_photo(&self, photo: &NewAssetPhoto) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO asset_photos (photo_id, asset_id, url) VALUES ($1, $2, $3)")
            .bind(Uuid::from(photo.photo_id))
            .bind(Uuid::from(photo.asset_id))
            .bind(&photo.url)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// All documented assets for a property, each with its photos
    ///
    /// Photos are fetched for the whole asset set in one query and
    /// grouped in memory, keeping the read at two round trips no matter
    /// how large the catalog is.
    pub async fn assets_for_property(
        &self,
        property_id: PropertyId,
    ) -> Result<Vec<CatalogAsset>, DatabaseError> {
        let asset_query = format!(
            "SELECT {ASSET_COLUMNS} FROM assets WHERE property_id = $1 ORDER BY created_at"
        );

        let asset_rows = sqlx::query_as::<_, AssetRow>(&asset_query)
            .bind(Uuid::from(property_id))
            .fetch_all(&self.pool)
            .await?;

        if asset_rows.is_empty() {
            return Ok(Vec::new());
        }

        let asset_ids: Vec<Uuid> = asset_rows.iter().map(|a| a.asset_id).collect();

        let photo_query = format!(
            "SELECT {PHOTO_COLUMNS} FROM asset_photos \
             WHERE asset_id = ANY($1) \
             ORDER BY created_at"
        );

        let photo_rows = sqlx::query_as::<_, PhotoRow>(&photo_query)
            .bind(&asset_ids)
            .fetch_all(&self.pool)
            .await?;

        let mut assets = Vec::with_capacity(asset_rows.len());
        for row in asset_rows {
            let estimated_value = money_from_columns(
                row.estimated_value_amount,
                row.estimated_value_currency.as_deref(),
            )?;
            let photos = photo_rows
                .iter()
                .filter(|p| p.asset_id == row.asset_id)
                .map(|p| CatalogPhoto {
                    id: PhotoId::from_uuid(p.photo_id),
                    url: p.url.clone(),
                })
                .collect();

            assets.push(CatalogAsset {
                id: AssetId::from_uuid(row.asset_id),
                name: row.name,
                category: row.category,
                estimated_value,
                photos,
            });
        }

        Ok(assets)
    }
}
