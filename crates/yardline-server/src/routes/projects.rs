//! Project routes

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;
use yardline_core::models::project::{CreateProject, Project, UpdateProject};
use yardline_core::repository::ProjectRepository;

use super::PageQuery;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ProjectListResponse {
    pub items: Vec<Project>,
    pub total: u64,
}

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ProjectListResponse>> {
    let page = state.projects.list_by_tenant(tenant_id, query.into()).await?;
    Ok(Json(ProjectListResponse {
        items: page.items,
        total: page.total,
    }))
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<Uuid>,
    Json(mut input): Json<CreateProject>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    input.tenant_id = tenant_id;
    let project = state.projects.create(input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Project>> {
    Ok(Json(state.projects.get_by_id(tenant_id, id).await?))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateProject>,
) -> ApiResult<Json<Project>> {
    Ok(Json(state.projects.update(tenant_id, id, input).await?))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state.projects.delete(tenant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
