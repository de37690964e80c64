//! Vendor webhook domain model.
//!
//! Vendors (suppliers, rental houses, service shops) register endpoints
//! that receive procurement and equipment events for a tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event name that subscribes a webhook to every event.
pub const WILDCARD_EVENT: &str = "*";

/// A registered vendor endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorWebhook {
    pub id: Uuid,
    /// The tenant this webhook belongs to.
    pub tenant_id: Uuid,
    pub vendor_name: String,
    /// The HTTPS URL events are delivered to.
    pub url: String,
    /// Event types this webhook is subscribed to (e.g., `["equipment.updated"]`).
    pub events: Vec<String>,
    /// SHA-256 of the shared signing secret.
    #[serde(skip_serializing)]
    pub secret_hash: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VendorWebhook {
    /// Whether an enabled webhook should receive `event`.
    pub fn subscribes_to(&self, event: &str) -> bool {
        self.enabled
            && self
                .events
                .iter()
                .any(|e| e == event || e == WILDCARD_EVENT)
    }
}

/// Fields required to register a new webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVendorWebhook {
    /// Filled from the route when created over HTTP.
    #[serde(default)]
    pub tenant_id: Uuid,
    pub vendor_name: String,
    pub url: String,
    pub events: Vec<String>,
}

/// Fields that can be updated on an existing webhook.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateVendorWebhook {
    pub vendor_name: Option<String>,
    pub url: Option<String>,
    pub events: Option<Vec<String>>,
    pub enabled: Option<bool>,
}
