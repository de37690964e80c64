//! Vendor webhook routes

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;
use yardline_core::models::webhook::{CreateVendorWebhook, UpdateVendorWebhook, VendorWebhook};
use yardline_core::repository::VendorWebhookRepository;

use crate::error::ApiResult;
use crate::state::AppState;

/// Returned on creation; the only time the raw secret is visible.
#[derive(Serialize)]
pub struct CreatedWebhookResponse {
    pub webhook: VendorWebhook,
    pub secret: String,
}

#[derive(Serialize)]
pub struct SecretResponse {
    pub secret: String,
}

pub async fn list_webhooks(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<Vec<VendorWebhook>>> {
    Ok(Json(state.webhooks.list(tenant_id).await?))
}

pub async fn create_webhook(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<Uuid>,
    Json(mut input): Json<CreateVendorWebhook>,
) -> ApiResult<(StatusCode, Json<CreatedWebhookResponse>)> {
    input.tenant_id = tenant_id;
    let (webhook, secret) = state.webhooks.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedWebhookResponse { webhook, secret }),
    ))
}

pub async fn update_webhook(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateVendorWebhook>,
) -> ApiResult<Json<VendorWebhook>> {
    Ok(Json(state.webhooks.update(tenant_id, id, input).await?))
}

pub async fn delete_webhook(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state.webhooks.delete(tenant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn rotate_secret(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<SecretResponse>> {
    let secret = state.webhooks.rotate_secret(tenant_id, id).await?;
    Ok(Json(SecretResponse { secret }))
}
