//! Equipment routes

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;
use yardline_core::models::equipment::{CreateEquipment, Equipment, UpdateEquipment};
use yardline_core::repository::EquipmentRepository;

use super::PageQuery;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Serialize)]
pub struct EquipmentListResponse {
    pub items: Vec<Equipment>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

pub async fn list_equipment(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<EquipmentListResponse>> {
    let page = state
        .equipment
        .list_by_tenant(tenant_id, query.into())
        .await?;
    Ok(Json(EquipmentListResponse {
        items: page.items,
        total: page.total,
        offset: page.offset,
        limit: page.limit,
    }))
}

pub async fn create_equipment(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<Uuid>,
    Json(mut input): Json<CreateEquipment>,
) -> ApiResult<(StatusCode, Json<Equipment>)> {
    input.tenant_id = tenant_id;
    let equipment = state.equipment.create(input).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

pub async fn get_equipment(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Equipment>> {
    Ok(Json(state.equipment.get_by_id(tenant_id, id).await?))
}

pub async fn update_equipment(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateEquipment>,
) -> ApiResult<Json<Equipment>> {
    Ok(Json(state.equipment.update(tenant_id, id, input).await?))
}

pub async fn delete_equipment(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state.equipment.delete(tenant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
