//! Notification routes

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;
use yardline_core::models::notification::Notification;
use yardline_core::repository::NotificationRepository;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
}

pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<NotificationQuery>,
) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(
        state
            .notifications
            .list(tenant_id, query.unread_only)
            .await?,
    ))
}

pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Notification>> {
    Ok(Json(state.notifications.mark_read(tenant_id, id).await?))
}
