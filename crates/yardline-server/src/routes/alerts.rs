//! Compliance alert routes

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use yardline_compliance::{EquipmentCompliance, RefreshOutcome};
use yardline_core::models::alert::{AlertSummary, ComplianceAlert};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AlertQuery {
    #[serde(default)]
    pub include_resolved: bool,
}

/// Refreshes first, so the list always reflects current equipment.
pub async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<AlertQuery>,
) -> ApiResult<Json<Vec<ComplianceAlert>>> {
    let outcome = state.compliance.refresh(tenant_id).await?;
    let alerts = if query.include_resolved {
        outcome.alerts
    } else {
        outcome.alerts.into_iter().filter(ComplianceAlert::is_active).collect()
    };
    Ok(Json(alerts))
}

pub async fn alert_summary(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<AlertSummary>> {
    state.compliance.refresh(tenant_id).await?;
    Ok(Json(state.compliance.summary(tenant_id).await?))
}

pub async fn refresh_alerts(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<RefreshOutcome>> {
    Ok(Json(state.compliance.refresh(tenant_id).await?))
}

pub async fn acknowledge_alert(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<ComplianceAlert>> {
    Ok(Json(state.compliance.acknowledge(tenant_id, id).await?))
}

pub async fn resolve_alert(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<ComplianceAlert>> {
    Ok(Json(state.compliance.resolve(tenant_id, id).await?))
}

/// Per-equipment compliance as implied by today's date.
pub async fn equipment_compliance(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<Vec<EquipmentCompliance>>> {
    let report = state
        .compliance
        .equipment_compliance(tenant_id, Utc::now().date_naive())
        .await?;
    Ok(Json(report))
}
