//! Onboarding routes

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;
use yardline_core::error::YardlineError;
use yardline_core::models::onboarding::{OnboardingState, OnboardingStep};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn get_state(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<OnboardingState>> {
    Ok(Json(state.onboarding.state(tenant_id).await?))
}

pub async fn complete_step(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, step)): Path<(Uuid, String)>,
) -> ApiResult<Json<OnboardingState>> {
    let step = OnboardingStep::parse(&step)
        .ok_or_else(|| YardlineError::validation(format!("unknown onboarding step: {step}")))?;
    Ok(Json(state.onboarding.complete_step(tenant_id, step).await?))
}

pub async fn reset(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<OnboardingState>> {
    Ok(Json(state.onboarding.reset(tenant_id).await?))
}
