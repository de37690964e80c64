//! Tenant domain model.
//!
//! A tenant is a customer organization and the unit of data isolation.
//! Equipment, projects, alerts, webhooks and onboarding state are all
//! scoped to a tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Commercial plan a tenant is subscribed to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SubscriptionTier {
    #[default]
    Starter,
    Professional,
    Enterprise,
}

impl SubscriptionTier {
    /// Whether this tier unlocks premium features on its own.
    pub fn is_premium(self) -> bool {
        matches!(self, Self::Professional | Self::Enterprise)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SubscriptionStatus {
    #[default]
    Trialing,
    Active,
    PastDue,
    Cancelled,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    /// Human-readable company name.
    pub name: String,
    /// URL-safe unique identifier derived from the name.
    pub slug: String,
    pub subscription_tier: SubscriptionTier,
    pub subscription_status: SubscriptionStatus,
    /// End of the trial window, if the tenant has ever been on trial.
    pub trial_ends_at: Option<DateTime<Utc>>,
    /// Arbitrary key-value metadata.
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub slug: String,
    pub subscription_tier: SubscriptionTier,
    pub subscription_status: SubscriptionStatus,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub metadata: Option<serde_json::Value>,
}

/// Fields that can be updated on an existing tenant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTenant {
    pub name: Option<String>,
    pub subscription_tier: Option<SubscriptionTier>,
    pub subscription_status: Option<SubscriptionStatus>,
    /// `Some(Some(ts))` = set, `Some(None)` = clear, `None` = no change.
    #[serde(default, deserialize_with = "crate::models::nullable::deserialize")]
    pub trial_ends_at: Option<Option<DateTime<Utc>>>,
    pub metadata: Option<serde_json::Value>,
}

/// Create a tenant and attach its owning user in one step.
#[derive(Debug, Clone)]
pub struct ProvisionTenant {
    pub tenant: CreateTenant,
    pub owner_user_id: Uuid,
}

/// Lower-case, hyphen-separated slug for a tenant name.
///
/// Runs of non-alphanumeric characters collapse into a single hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}
