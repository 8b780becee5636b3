//! Core Kernel - Foundational types and utilities for the claim-readiness system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Filing-deadline date arithmetic and urgency banding
//! - Common identifiers and value objects
//! - Port infrastructure shared by the domain crates

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{filing_deadline, days_until, DeadlineUrgency, FILING_WINDOW_DAYS};
pub use identifiers::{
    UserId, PropertyId, AssetId, PhotoId,
    LossEventId, ProofOfLossFormId,
    JumpstartSessionId, JumpstartPromptId,
};
pub use error::CoreError;
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
