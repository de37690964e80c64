//! API routes

pub mod alerts;
pub mod equipment;
pub mod notifications;
pub mod onboarding;
pub mod projects;
pub mod tenants;
pub mod webhooks;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use yardline_core::repository::Pagination;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `?offset=&limit=` query, capped at 200 items per page.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl From<PageQuery> for Pagination {
    fn from(q: PageQuery) -> Self {
        let default = Pagination::default();
        Self {
            offset: q.offset.unwrap_or(default.offset),
            limit: q.limit.unwrap_or(default.limit).min(200),
        }
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Tenant provisioning
        .route("/functions/create-tenant", post(tenants::create_tenant))
        .route(
            "/api/tenants/:tenant_id/subscription",
            get(tenants::subscription),
        )
        // Equipment
        .route(
            "/api/tenants/:tenant_id/equipment",
            get(equipment::list_equipment).post(equipment::create_equipment),
        )
        .route(
            "/api/tenants/:tenant_id/equipment/:id",
            get(equipment::get_equipment)
                .put(equipment::update_equipment)
                .delete(equipment::delete_equipment),
        )
        // Projects
        .route(
            "/api/tenants/:tenant_id/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/api/tenants/:tenant_id/projects/:id",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        // Compliance alerts
        .route("/api/tenants/:tenant_id/alerts", get(alerts::list_alerts))
        .route(
            "/api/tenants/:tenant_id/alerts/summary",
            get(alerts::alert_summary),
        )
        .route(
            "/api/tenants/:tenant_id/alerts/refresh",
            post(alerts::refresh_alerts),
        )
        .route(
            "/api/tenants/:tenant_id/alerts/:id/acknowledge",
            post(alerts::acknowledge_alert),
        )
        .route(
            "/api/tenants/:tenant_id/alerts/:id/resolve",
            post(alerts::resolve_alert),
        )
        .route(
            "/api/tenants/:tenant_id/compliance",
            get(alerts::equipment_compliance),
        )
        // Notifications
        .route(
            "/api/tenants/:tenant_id/notifications",
            get(notifications::list_notifications),
        )
        .route(
            "/api/tenants/:tenant_id/notifications/:id/read",
            post(notifications::mark_read),
        )
        // Vendor webhooks
        .route(
            "/api/tenants/:tenant_id/webhooks",
            get(webhooks::list_webhooks).post(webhooks::create_webhook),
        )
        .route(
            "/api/tenants/:tenant_id/webhooks/:id",
            delete(webhooks::delete_webhook).put(webhooks::update_webhook),
        )
        .route(
            "/api/tenants/:tenant_id/webhooks/:id/rotate-secret",
            post(webhooks::rotate_secret),
        )
        // Onboarding
        .route(
            "/api/tenants/:tenant_id/onboarding",
            get(onboarding::get_state).delete(onboarding::reset),
        )
        .route(
            "/api/tenants/:tenant_id/onboarding/steps/:step",
            post(onboarding::complete_step),
        )
        // Tracing
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
