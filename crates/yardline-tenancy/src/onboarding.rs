//! Onboarding progress service.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use yardline_core::error::YardlineResult;
use yardline_core::models::onboarding::{OnboardingState, OnboardingStep};
use yardline_core::repository::OnboardingRepository;

/// Recompute `current_step` and `completed` from `completed_steps`.
fn advance(state: &mut OnboardingState) {
    state.current_step = OnboardingStep::ALL
        .into_iter()
        .find(|step| !state.completed_steps.contains(step));
    state.completed = state.current_step.is_none();
}

pub struct OnboardingService<O: OnboardingRepository> {
    repo: O,
}

impl<O: OnboardingRepository> OnboardingService<O> {
    pub fn new(repo: O) -> Self {
        Self { repo }
    }

    /// The tenant's progress; a fresh, unsaved state when none is stored.
    pub async fn state(&self, tenant_id: Uuid) -> YardlineResult<OnboardingState> {
        Ok(self
            .repo
            .get(tenant_id)
            .await?
            .unwrap_or_else(|| OnboardingState::new(tenant_id)))
    }

    /// Mark `step` done. Completing a step twice is a no-op.
    pub async fn complete_step(
        &self,
        tenant_id: Uuid,
        step: OnboardingStep,
    ) -> YardlineResult<OnboardingState> {
        let mut state = self.state(tenant_id).await?;
        if state.completed_steps.contains(&step) {
            return Ok(state);
        }

        state.completed_steps.push(step);
        advance(&mut state);
        state.updated_at = Utc::now();

        if state.completed {
            info!(tenant_id = %tenant_id, "Onboarding completed");
        }
        self.repo.save(state).await
    }

    pub async fn reset(&self, tenant_id: Uuid) -> YardlineResult<OnboardingState> {
        self.repo.save(OnboardingState::new(tenant_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_picks_first_incomplete_step() {
        let mut state = OnboardingState::new(Uuid::new_v4());
        state.completed_steps = vec![OnboardingStep::InviteTeam];
        advance(&mut state);
        assert_eq!(state.current_step, Some(OnboardingStep::CompanyProfile));
        assert!(!state.completed);

        state.completed_steps = OnboardingStep::ALL.to_vec();
        advance(&mut state);
        assert_eq!(state.current_step, None);
        assert!(state.completed);
    }
}
