//! SurrealDB implementation of [`OnboardingRepository`].
//!
//! One `onboarding_state` record per tenant, keyed by the tenant id.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use yardline_core::error::YardlineResult;
use yardline_core::models::onboarding::{OnboardingState, OnboardingStep};
use yardline_core::repository::OnboardingRepository;

use super::codec::unknown_variant;
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct OnboardingRow {
    completed_steps: Vec<String>,
    current_step: Option<String>,
    completed: bool,
    updated_at: DateTime<Utc>,
}

fn parse_step(s: &str) -> Result<OnboardingStep, DbError> {
    OnboardingStep::parse(s).ok_or_else(|| unknown_variant("onboarding step", s))
}

impl OnboardingRow {
    fn try_into_state(self, tenant_id: Uuid) -> Result<OnboardingState, DbError> {
        let completed_steps = self
            .completed_steps
            .iter()
            .map(|s| parse_step(s))
            .collect::<Result<Vec<_>, _>>()?;
        let current_step = self.current_step.as_deref().map(parse_step).transpose()?;
        Ok(OnboardingState {
            tenant_id,
            completed_steps,
            current_step,
            completed: self.completed,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Onboarding repository.
#[derive(Clone)]
pub struct SurrealOnboardingRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOnboardingRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, tenant_id: Uuid) -> Result<Option<OnboardingState>, DbError> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('onboarding_state', $tenant_id)")
            .bind(("tenant_id", tenant_id.to_string()))
            .await?;

        let rows: Vec<OnboardingRow> = result.take(0)?;
        rows.into_iter()
            .next()
            .map(|row| row.try_into_state(tenant_id))
            .transpose()
    }
}

impl<C: Connection> OnboardingRepository for SurrealOnboardingRepository<C> {
    async fn get(&self, tenant_id: Uuid) -> YardlineResult<Option<OnboardingState>> {
        Ok(self.fetch(tenant_id).await?)
    }

    async fn save(&self, state: OnboardingState) -> YardlineResult<OnboardingState> {
        let steps: Vec<String> = state
            .completed_steps
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();

        self.db
            .query(
                "UPSERT type::record('onboarding_state', $tenant_id) SET \
                 completed_steps = $steps, current_step = $current_step, \
                 completed = $completed, updated_at = $updated_at",
            )
            .bind(("tenant_id", state.tenant_id.to_string()))
            .bind(("steps", steps))
            .bind((
                "current_step",
                state.current_step.map(|s| s.as_str().to_string()),
            ))
            .bind(("completed", state.completed))
            .bind(("updated_at", state.updated_at))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        self.fetch(state.tenant_id)
            .await?
            .ok_or_else(|| DbError::not_found("onboarding_state", state.tenant_id).into())
    }
}
