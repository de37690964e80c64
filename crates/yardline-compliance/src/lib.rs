//! Yardline Compliance — alert derivation from equipment dates and the
//! alert lifecycle (acknowledge, resolve).

pub mod config;
pub mod deriver;
pub mod error;
pub mod service;
pub mod snapshot;

pub use config::ComplianceConfig;
pub use deriver::{Derivation, derive_alerts};
pub use error::ComplianceError;
pub use service::{ComplianceService, EquipmentCompliance, RefreshOutcome};
