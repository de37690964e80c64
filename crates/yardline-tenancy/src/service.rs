//! Tenant provisioning service — the `create-tenant` function.

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;
use yardline_core::error::{YardlineError, YardlineResult};
use yardline_core::models::tenant::{
    CreateTenant, ProvisionTenant, SubscriptionStatus, SubscriptionTier, Tenant, UpdateTenant,
    slugify,
};
use yardline_core::models::user::User;
use yardline_core::repository::{TenantRepository, UserRepository};

use crate::config::TenancyConfig;
use crate::error::TenancyError;
use crate::request::{CreateTenantRequest, FunctionResponse, TenantAction};

const MAX_SLUG_SUFFIX: u32 = 50;

/// Result of a create request.
#[derive(Debug, Clone)]
pub enum CreateTenantOutcome {
    Created(Tenant),
    /// The owner already belongs to this tenant; nothing was created.
    Existing(Tenant),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MigrationData {
    user_id: Uuid,
    tenant_id: Uuid,
}

/// Tenant provisioning service.
///
/// Generic over repository implementations so that the tenancy layer
/// has no dependency on the database crate.
pub struct TenantProvisioningService<T: TenantRepository, U: UserRepository> {
    tenant_repo: T,
    user_repo: U,
    config: TenancyConfig,
}

impl<T: TenantRepository, U: UserRepository> TenantProvisioningService<T, U> {
    pub fn new(tenant_repo: T, user_repo: U, config: TenancyConfig) -> Self {
        Self {
            tenant_repo,
            user_repo,
            config,
        }
    }

    /// Dispatch a `create-tenant` request. Failures are reported in the
    /// envelope, never as `Err`.
    pub async fn handle(&self, request: CreateTenantRequest) -> FunctionResponse {
        let action = match request.into_action() {
            Ok(action) => action,
            Err(e) => return FunctionResponse::failure(&e.into()),
        };

        let result = match action {
            TenantAction::SetTrial { tenant_id, days } => self
                .set_trial(tenant_id, days)
                .await
                .map(FunctionResponse::ok),
            TenantAction::MigrateUser { user_id, tenant_id } => self
                .migrate_user(user_id, tenant_id)
                .await
                .map(|user| {
                    FunctionResponse::ok(MigrationData {
                        user_id: user.id,
                        tenant_id,
                    })
                }),
            TenantAction::Create {
                user_id,
                name,
                slug,
                tier,
            } => self
                .create_tenant(user_id, &name, slug, tier)
                .await
                .map(|outcome| match outcome {
                    CreateTenantOutcome::Created(tenant) => FunctionResponse::ok(tenant),
                    CreateTenantOutcome::Existing(tenant) => {
                        let message = TenancyError::OwnerAlreadyAssigned {
                            user_id,
                            tenant_id: tenant.id,
                        }
                        .to_string();
                        FunctionResponse::conflict(message, tenant)
                    }
                }),
        };

        result.unwrap_or_else(|e| {
            warn!(error = %e, "create-tenant request failed");
            FunctionResponse::failure(&e)
        })
    }

    /// Create a tenant in trial and make `owner_id` its owner.
    ///
    /// When the owner already belongs to a tenant, that tenant is returned
    /// as [`CreateTenantOutcome::Existing`] and nothing is written.
    pub async fn create_tenant(
        &self,
        owner_id: Uuid,
        name: &str,
        slug: Option<String>,
        tier: Option<SubscriptionTier>,
    ) -> YardlineResult<CreateTenantOutcome> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TenancyError::EmptyName.into());
        }

        let owner = self.user_repo.get_by_id(owner_id).await?;
        if let Some(existing) = owner.tenant_id {
            let tenant = self.tenant_repo.get_by_id(existing).await?;
            info!(
                user_id = %owner_id,
                tenant_id = %tenant.id,
                "Owner already has a tenant"
            );
            return Ok(CreateTenantOutcome::Existing(tenant));
        }

        let slug = self.available_slug(slug.unwrap_or_else(|| slugify(name))).await?;
        let trial_ends_at = Utc::now() + Duration::days(self.config.default_trial_days);

        let tenant = self
            .tenant_repo
            .provision(ProvisionTenant {
                tenant: CreateTenant {
                    name: name.to_string(),
                    slug,
                    subscription_tier: tier.unwrap_or(self.config.default_tier),
                    subscription_status: SubscriptionStatus::Trialing,
                    trial_ends_at: Some(trial_ends_at),
                    metadata: None,
                },
                owner_user_id: owner_id,
            })
            .await?;

        Ok(CreateTenantOutcome::Created(tenant))
    }

    /// Put a tenant on trial for `days` (or the default length) from now.
    pub async fn set_trial(&self, tenant_id: Uuid, days: Option<i64>) -> YardlineResult<Tenant> {
        let days = days.unwrap_or(self.config.default_trial_days);
        if !(1..=self.config.max_trial_days).contains(&days) {
            return Err(TenancyError::InvalidTrialDays {
                days,
                max: self.config.max_trial_days,
            }
            .into());
        }

        let trial_ends_at = Utc::now() + Duration::days(days);
        let tenant = self
            .tenant_repo
            .update(
                tenant_id,
                UpdateTenant {
                    subscription_status: Some(SubscriptionStatus::Trialing),
                    trial_ends_at: Some(Some(trial_ends_at)),
                    ..Default::default()
                },
            )
            .await?;

        info!(tenant_id = %tenant_id, days, "Trial set");
        Ok(tenant)
    }

    /// Move a user, with their profile, to another tenant.
    pub async fn migrate_user(&self, user_id: Uuid, tenant_id: Uuid) -> YardlineResult<User> {
        match self.tenant_repo.get_by_id(tenant_id).await {
            Ok(_) => {}
            Err(YardlineError::NotFound { .. }) => {
                return Err(TenancyError::UnknownTenant(tenant_id).into());
            }
            Err(e) => return Err(e),
        }

        let user = self.user_repo.get_by_id(user_id).await?;
        if user.tenant_id == Some(tenant_id) {
            return Err(TenancyError::AlreadyInTenant { user_id, tenant_id }.into());
        }

        self.user_repo.migrate_tenant(user_id, tenant_id).await
    }

    /// `base`, or `base-<n>` for the first free n.
    async fn available_slug(&self, base: String) -> YardlineResult<String> {
        let base = if base.is_empty() {
            "tenant".to_string()
        } else {
            base
        };

        for n in 1..=MAX_SLUG_SUFFIX {
            let candidate = if n == 1 {
                base.clone()
            } else {
                format!("{base}-{n}")
            };
            match self.tenant_repo.get_by_slug(&candidate).await {
                Err(YardlineError::NotFound { .. }) => return Ok(candidate),
                Ok(_) => {}
                Err(e) => return Err(e),
            }
        }
        Err(YardlineError::AlreadyExists {
            entity: format!("tenant slug {base}"),
        })
    }
}
