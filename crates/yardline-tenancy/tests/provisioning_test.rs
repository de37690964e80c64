//! Integration tests for the `create-tenant` function.

use chrono::Utc;
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;
use yardline_core::error::{ErrorCategory, YardlineError};
use yardline_core::models::profile::CreateProfile;
use yardline_core::models::tenant::{
    CreateTenant, SubscriptionStatus, SubscriptionTier, UpdateTenant,
};
use yardline_core::models::user::{CreateUser, UserRole};
use yardline_core::repository::{ProfileRepository, TenantRepository, UserRepository};
use yardline_db::repository::{
    SurrealProfileRepository, SurrealTenantRepository, SurrealUserRepository,
};
use yardline_tenancy::{
    CreateTenantOutcome, CreateTenantRequest, TenancyConfig, TenantProvisioningService,
};

type Service =
    TenantProvisioningService<SurrealTenantRepository<Db>, SurrealUserRepository<Db>>;

struct Fixture {
    service: Service,
    tenants: SurrealTenantRepository<Db>,
    users: SurrealUserRepository<Db>,
    profiles: SurrealProfileRepository<Db>,
}

async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    yardline_db::run_migrations(&db).await.unwrap();

    Fixture {
        service: TenantProvisioningService::new(
            SurrealTenantRepository::new(db.clone()),
            SurrealUserRepository::new(db.clone()),
            TenancyConfig::default(),
        ),
        tenants: SurrealTenantRepository::new(db.clone()),
        users: SurrealUserRepository::new(db.clone()),
        profiles: SurrealProfileRepository::new(db),
    }
}

/// A user with a profile and no tenant yet.
async fn signup(f: &Fixture, email: &str) -> Uuid {
    let user = f
        .users
        .create(CreateUser {
            tenant_id: None,
            email: email.into(),
            full_name: "Dana Ortiz".into(),
            role: UserRole::Viewer,
        })
        .await
        .unwrap();
    f.profiles
        .create(CreateProfile {
            user_id: user.id,
            tenant_id: None,
            full_name: "Dana Ortiz".into(),
            phone: None,
            job_title: Some("Fleet manager".into()),
        })
        .await
        .unwrap();
    user.id
}

fn request(value: serde_json::Value) -> CreateTenantRequest {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn create_provisions_trial_tenant_with_owner() {
    let f = setup().await;
    let user_id = signup(&f, "dana@ortizcivil.example").await;

    let response = f
        .service
        .handle(request(json!({ "userId": user_id, "name": "Ortiz Civil" })))
        .await;
    assert!(response.success, "{:?}", response.error);
    assert!(response.conflict.is_none());

    let tenant_id: Uuid = serde_json::from_value(response.data.unwrap()["id"].clone()).unwrap();
    let tenant = f.tenants.get_by_id(tenant_id).await.unwrap();
    assert_eq!(tenant.slug, "ortiz-civil");
    assert_eq!(tenant.subscription_status, SubscriptionStatus::Trialing);
    assert_eq!(tenant.subscription_tier, SubscriptionTier::Starter);
    let trial_ends_at = tenant.trial_ends_at.unwrap();
    assert!(trial_ends_at > Utc::now() + chrono::Duration::days(13));

    let owner = f.users.get_by_id(user_id).await.unwrap();
    assert_eq!(owner.tenant_id, Some(tenant_id));
    assert_eq!(owner.role, UserRole::Owner);
    let profile = f.profiles.get_by_id(user_id).await.unwrap();
    assert_eq!(profile.tenant_id, Some(tenant_id));
}

#[tokio::test]
async fn second_create_for_same_owner_conflicts() {
    let f = setup().await;
    let user_id = signup(&f, "dana@ortizcivil.example").await;

    let first = f
        .service
        .create_tenant(user_id, "Ortiz Civil", None, None)
        .await
        .unwrap();
    let CreateTenantOutcome::Created(tenant) = first else {
        panic!("expected a new tenant");
    };

    let response = f
        .service
        .handle(request(json!({ "userId": user_id, "name": "Ortiz Civil 2" })))
        .await;
    assert!(!response.success);
    assert_eq!(response.conflict, Some(true));
    assert_eq!(response.category, Some(ErrorCategory::Conflict));
    assert_eq!(response.data.unwrap()["id"], json!(tenant.id));
}

#[tokio::test]
async fn taken_slug_gets_a_suffix() {
    let f = setup().await;
    let first = signup(&f, "a@example.com").await;
    let second = signup(&f, "b@example.com").await;

    let CreateTenantOutcome::Created(a) = f
        .service
        .create_tenant(first, "Keystone Rentals", None, Some(SubscriptionTier::Professional))
        .await
        .unwrap()
    else {
        panic!("expected a new tenant");
    };
    let CreateTenantOutcome::Created(b) = f
        .service
        .create_tenant(second, "Keystone Rentals", None, None)
        .await
        .unwrap()
    else {
        panic!("expected a new tenant");
    };

    assert_eq!(a.slug, "keystone-rentals");
    assert_eq!(a.subscription_tier, SubscriptionTier::Professional);
    assert_eq!(b.slug, "keystone-rentals-2");
}

#[tokio::test]
async fn last_slug_suffix_is_used_before_giving_up() {
    let f = setup().await;
    for n in 1..50 {
        let slug = if n == 1 {
            "depot".to_string()
        } else {
            format!("depot-{n}")
        };
        f.tenants
            .create(CreateTenant {
                name: "Depot".into(),
                slug,
                subscription_tier: SubscriptionTier::Starter,
                subscription_status: SubscriptionStatus::Active,
                trial_ends_at: None,
                metadata: None,
            })
            .await
            .unwrap();
    }

    let owner = signup(&f, "last@example.com").await;
    let CreateTenantOutcome::Created(tenant) = f
        .service
        .create_tenant(owner, "Depot", None, None)
        .await
        .unwrap()
    else {
        panic!("expected a new tenant");
    };
    assert_eq!(tenant.slug, "depot-50");

    let late = signup(&f, "late@example.com").await;
    let exhausted = f.service.create_tenant(late, "Depot", None, None).await;
    assert!(matches!(exhausted, Err(YardlineError::AlreadyExists { .. })));
}

#[tokio::test]
async fn set_trial_restarts_trial() {
    let f = setup().await;
    let tenant = f
        .tenants
        .create(CreateTenant {
            name: "Bayline Marine".into(),
            slug: "bayline".into(),
            subscription_tier: SubscriptionTier::Starter,
            subscription_status: SubscriptionStatus::Expired,
            trial_ends_at: None,
            metadata: None,
        })
        .await
        .unwrap();

    let response = f
        .service
        .handle(request(json!({
            "setTrial": true,
            "tenantId": tenant.id,
            "trialDays": 30
        })))
        .await;
    assert!(response.success, "{:?}", response.error);

    let updated = f.tenants.get_by_id(tenant.id).await.unwrap();
    assert_eq!(updated.subscription_status, SubscriptionStatus::Trialing);
    let ends = updated.trial_ends_at.unwrap();
    assert!(ends > Utc::now() + chrono::Duration::days(29));
    assert!(ends <= Utc::now() + chrono::Duration::days(30));
}

#[tokio::test]
async fn set_trial_rejects_out_of_range_days() {
    let f = setup().await;
    let result = f.service.set_trial(Uuid::new_v4(), Some(0)).await;
    assert!(matches!(result, Err(YardlineError::Validation { .. })));

    let response = f
        .service
        .handle(request(json!({
            "setTrial": true,
            "tenantId": Uuid::new_v4(),
            "trialDays": 365
        })))
        .await;
    assert!(!response.success);
    assert_eq!(response.category, Some(ErrorCategory::Validation));
}

#[tokio::test]
async fn migration_moves_user_and_profile() {
    let f = setup().await;
    let owner = signup(&f, "owner@example.com").await;
    let worker = signup(&f, "worker@example.com").await;

    let CreateTenantOutcome::Created(source) = f
        .service
        .create_tenant(owner, "Source Co", None, None)
        .await
        .unwrap()
    else {
        panic!("expected a new tenant");
    };
    let target = f
        .tenants
        .create(CreateTenant {
            name: "Target Co".into(),
            slug: "target-co".into(),
            subscription_tier: SubscriptionTier::Starter,
            subscription_status: SubscriptionStatus::Active,
            trial_ends_at: None,
            metadata: None,
        })
        .await
        .unwrap();

    f.service.migrate_user(worker, source.id).await.unwrap();

    let response = f
        .service
        .handle(request(json!({
            "isMigration": true,
            "userId": worker,
            "tenantId": target.id
        })))
        .await;
    assert!(response.success, "{:?}", response.error);
    assert_eq!(response.data.unwrap()["tenantId"], json!(target.id));

    assert_eq!(
        f.users.get_by_id(worker).await.unwrap().tenant_id,
        Some(target.id)
    );
    assert_eq!(
        f.profiles.get_by_id(worker).await.unwrap().tenant_id,
        Some(target.id)
    );
}

#[tokio::test]
async fn migration_rejects_unknown_tenant_and_noop_moves() {
    let f = setup().await;
    let user_id = signup(&f, "solo@example.com").await;

    let unknown = f.service.migrate_user(user_id, Uuid::new_v4()).await;
    assert!(matches!(unknown, Err(YardlineError::NotFound { .. })));
    assert!(f.users.get_by_id(user_id).await.unwrap().tenant_id.is_none());

    let CreateTenantOutcome::Created(tenant) = f
        .service
        .create_tenant(user_id, "Solo Works", None, None)
        .await
        .unwrap()
    else {
        panic!("expected a new tenant");
    };
    let noop = f.service.migrate_user(user_id, tenant.id).await;
    assert!(matches!(noop, Err(YardlineError::Validation { .. })));

    // Unrelated update leaves the trial fields alone.
    let renamed = f
        .tenants
        .update(
            tenant.id,
            UpdateTenant {
                name: Some("Solo Works LLC".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.trial_ends_at, tenant.trial_ends_at);
}

#[tokio::test]
async fn malformed_requests_fail_in_the_envelope() {
    let f = setup().await;

    let missing = f.service.handle(request(json!({ "name": "No Owner" }))).await;
    assert!(!missing.success);
    assert!(missing.error.unwrap().contains("userId"));

    let ghost = f
        .service
        .handle(request(json!({ "userId": Uuid::new_v4(), "name": "Ghost" })))
        .await;
    assert!(!ghost.success);
    assert_eq!(ghost.category, Some(ErrorCategory::NotFound));
}
