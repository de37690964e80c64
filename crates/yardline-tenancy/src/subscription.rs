//! Trial and subscription rules.

use chrono::{DateTime, Utc};
use yardline_core::models::tenant::{SubscriptionStatus, Tenant};

/// Whole days left in the tenant's trial, rounded up. `None` when the
/// tenant is not trialing or has no trial end.
pub fn trial_days_remaining(tenant: &Tenant, now: DateTime<Utc>) -> Option<i64> {
    if tenant.subscription_status != SubscriptionStatus::Trialing {
        return None;
    }
    let ends_at = tenant.trial_ends_at?;
    let remaining = ends_at - now;
    if remaining.num_seconds() <= 0 {
        return Some(0);
    }
    let days = remaining.num_days();
    if remaining > chrono::Duration::days(days) {
        Some(days + 1)
    } else {
        Some(days)
    }
}

/// Status as it should be presented: a trial past its end reads as
/// `Expired`.
pub fn effective_status(tenant: &Tenant, now: DateTime<Utc>) -> SubscriptionStatus {
    match (tenant.subscription_status, tenant.trial_ends_at) {
        (SubscriptionStatus::Trialing, Some(ends_at)) if ends_at <= now => {
            SubscriptionStatus::Expired
        }
        (status, _) => status,
    }
}

/// Premium features are open to active Professional/Enterprise tenants and
/// to any tenant inside an unexpired trial.
pub fn has_premium_access(tenant: &Tenant, now: DateTime<Utc>) -> bool {
    match effective_status(tenant, now) {
        SubscriptionStatus::Active => tenant.subscription_tier.is_premium(),
        SubscriptionStatus::Trialing => true,
        SubscriptionStatus::PastDue
        | SubscriptionStatus::Cancelled
        | SubscriptionStatus::Expired => false,
    }
}
