//! Integration tests for the onboarding service.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;
use yardline_core::models::onboarding::OnboardingStep;
use yardline_core::repository::OnboardingRepository;
use yardline_db::repository::SurrealOnboardingRepository;
use yardline_tenancy::OnboardingService;

#[tokio::test]
async fn steps_complete_in_any_order() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    yardline_db::run_migrations(&db).await.unwrap();

    let repo = SurrealOnboardingRepository::new(db.clone());
    let service = OnboardingService::new(SurrealOnboardingRepository::new(db));
    let tenant_id = Uuid::new_v4();

    let fresh = service.state(tenant_id).await.unwrap();
    assert_eq!(fresh.current_step, Some(OnboardingStep::CompanyProfile));
    assert!(repo.get(tenant_id).await.unwrap().is_none());

    let state = service
        .complete_step(tenant_id, OnboardingStep::AddEquipment)
        .await
        .unwrap();
    assert_eq!(state.current_step, Some(OnboardingStep::CompanyProfile));

    let again = service
        .complete_step(tenant_id, OnboardingStep::AddEquipment)
        .await
        .unwrap();
    assert_eq!(again.completed_steps, vec![OnboardingStep::AddEquipment]);

    for step in [
        OnboardingStep::CompanyProfile,
        OnboardingStep::InviteTeam,
        OnboardingStep::CreateProject,
    ] {
        service.complete_step(tenant_id, step).await.unwrap();
    }

    let done = service.state(tenant_id).await.unwrap();
    assert!(done.completed);
    assert!(done.current_step.is_none());
    assert_eq!(done.completed_steps.len(), 4);

    let reset = service.reset(tenant_id).await.unwrap();
    assert!(!reset.completed);
    assert!(reset.completed_steps.is_empty());
    assert_eq!(reset.current_step, Some(OnboardingStep::CompanyProfile));
}
