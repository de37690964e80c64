//! Tenancy configuration.

use yardline_core::models::tenant::SubscriptionTier;

/// Configuration for tenant provisioning.
#[derive(Debug, Clone)]
pub struct TenancyConfig {
    /// Trial length for new tenants and `setTrial` without `trialDays`
    /// (default: 14).
    pub default_trial_days: i64,
    /// Longest trial `setTrial` accepts (default: 90).
    pub max_trial_days: i64,
    /// Tier assigned when the request names none.
    pub default_tier: SubscriptionTier,
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            default_trial_days: 14,
            max_trial_days: 90,
            default_tier: SubscriptionTier::Starter,
        }
    }
}
