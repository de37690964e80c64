//! Tenant provisioning routes

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use yardline_core::models::tenant::{SubscriptionStatus, SubscriptionTier};
use yardline_core::repository::TenantRepository;
use yardline_tenancy::subscription;
use yardline_tenancy::{CreateTenantRequest, FunctionResponse};

use crate::error::{ApiResult, status_for};
use crate::state::AppState;

/// `POST /functions/create-tenant`
pub async fn create_tenant(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateTenantRequest>,
) -> (StatusCode, Json<FunctionResponse>) {
    let response = state.provisioning.handle(request).await;
    let status = response.category.map_or(StatusCode::OK, status_for);
    (status, Json(response))
}

#[derive(Serialize)]
pub struct SubscriptionResponse {
    pub tenant_id: Uuid,
    pub tier: SubscriptionTier,
    pub status: SubscriptionStatus,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub trial_days_remaining: Option<i64>,
    pub premium: bool,
}

/// `GET /api/tenants/:tenant_id/subscription`
pub async fn subscription(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<SubscriptionResponse>> {
    let tenant = state.tenants.get_by_id(tenant_id).await?;
    let now = Utc::now();

    Ok(Json(SubscriptionResponse {
        tenant_id,
        tier: tenant.subscription_tier,
        status: subscription::effective_status(&tenant, now),
        trial_ends_at: tenant.trial_ends_at,
        trial_days_remaining: subscription::trial_days_remaining(&tenant, now),
        premium: subscription::has_premium_access(&tenant, now),
    }))
}
