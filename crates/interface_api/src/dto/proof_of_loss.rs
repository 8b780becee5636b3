//! Proof of Loss DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::Money;
use domain_proof::{CatalogAsset, ClaimPacket, ProofOfLossForm};

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitProofOfLossRequest {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub insurer_name: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub policy_number: String,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub claim_number: Option<String>,
    /// Omitted to sign the standard sworn statement text
    pub sworn_statement: Option<String>,
    pub signature_data: String,
}

#[derive(Debug, Serialize)]
pub struct ProofOfLossFormResponse {
    pub id: Uuid,
    pub loss_event_id: Uuid,
    pub insurer_name: String,
    pub policy_number: String,
    pub claim_number: Option<String>,
    pub sworn_statement: String,
    pub signature_data: String,
    pub signed_at: DateTime<Utc>,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
}

impl ProofOfLossFormResponse {
    pub fn from_form(form: ProofOfLossForm) -> Self {
        Self {
            id: Uuid::from(form.id),
            loss_event_id: Uuid::from(form.loss_event_id),
            insurer_name: form.insurer_name,
            policy_number: form.policy_number,
            claim_number: form.claim_number,
            sworn_statement: form.sworn_statement,
            signature_data: form.signature_data,
            signed_at: form.signed_at,
            status: form.status.as_str().to_string(),
            submitted_at: form.submitted_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PacketAssetResponse {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub estimated_value: Option<Money>,
    pub photo_urls: Vec<String>,
}

impl PacketAssetResponse {
    fn from_asset(asset: CatalogAsset) -> Self {
        Self {
            id: Uuid::from(asset.id),
            name: asset.name,
            category: asset.category,
            estimated_value: asset.estimated_value,
            photo_urls: asset.photos.into_iter().map(|p| p.url).collect(),
        }
    }
}

/// The assembled claim packet returned on submission
#[derive(Debug, Serialize)]
pub struct ClaimPacketResponse {
    pub form: ProofOfLossFormResponse,
    pub loss_event_id: Uuid,
    pub event_label: String,
    pub filing_deadline: NaiveDate,
    pub asset_count: usize,
    pub photo_count: usize,
    pub total_documented_value: Option<Money>,
    pub assets: Vec<PacketAssetResponse>,
    pub assembled_at: DateTime<Utc>,
}

impl ClaimPacketResponse {
    pub fn from_packet(packet: ClaimPacket) -> Self {
        let asset_count = packet.asset_count();
        let photo_count = packet.photo_count();
        Self {
            form: ProofOfLossFormResponse::from_form(packet.form),
            loss_event_id: Uuid::from(packet.event.id),
            event_label: packet.event.event_label,
            filing_deadline: packet.event.filing_deadline,
            asset_count,
            photo_count,
            total_documented_value: packet.total_documented_value,
            assets: packet
                .assets
                .into_iter()
                .map(PacketAssetResponse::from_asset)
                .collect(),
            assembled_at: packet.assembled_at,
        }
    }
}
