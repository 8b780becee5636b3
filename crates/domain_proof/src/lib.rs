//! Proof of Loss Domain
//!
//! This crate implements the formal claim document insurers require: a
//! three-step guided wizard (insurer info, sworn statement, signature)
//! whose submission assembles the loss event and its documented assets
//! into a claim packet and persists a submitted form.
//!
//! # Wizard
//!
//! ```text
//! InsuranceInfo -> SwornStatement -> Signature -> (submit)
//! ```
//!
//! Navigation between steps is free in both directions; required fields
//! and the signature are enforced only at submission. Abandoning the
//! wizard before submit discards everything, so no draft state is
//! persisted.

pub mod error;
pub mod form;
pub mod packet;
pub mod ports;
pub mod service;
pub mod wizard;

pub use error::ProofError;
pub use form::{ProofOfLossForm, ProofOfLossStatus};
pub use packet::ClaimPacket;
pub use ports::{
    AssetCatalog, CatalogAsset, CatalogPhoto, LossEventContext, LossEventGateway,
    ProofOfLossStore,
};
pub use service::ProofOfLossService;
pub use wizard::{
    ProofOfLossStep, ProofOfLossSubmission, ProofOfLossWizard, DEFAULT_SWORN_STATEMENT,
};
