//! Shared application state.

use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use yardline_compliance::ComplianceService;
use yardline_db::repository::{
    SurrealAlertRepository, SurrealEquipmentRepository, SurrealNotificationRepository,
    SurrealOnboardingRepository, SurrealProjectRepository, SurrealTenantRepository,
    SurrealUserRepository, SurrealVendorWebhookRepository,
};
use yardline_tenancy::{OnboardingService, TenantProvisioningService};

use crate::config::ServerConfig;

pub type Compliance = ComplianceService<
    SurrealEquipmentRepository<Any>,
    SurrealAlertRepository<Any>,
    SurrealNotificationRepository<Any>,
>;

pub type Provisioning =
    TenantProvisioningService<SurrealTenantRepository<Any>, SurrealUserRepository<Any>>;

/// Services and repositories shared across handlers.
pub struct AppState {
    pub compliance: Compliance,
    pub provisioning: Provisioning,
    pub onboarding: OnboardingService<SurrealOnboardingRepository<Any>>,
    pub tenants: SurrealTenantRepository<Any>,
    pub equipment: SurrealEquipmentRepository<Any>,
    pub projects: SurrealProjectRepository<Any>,
    pub notifications: SurrealNotificationRepository<Any>,
    pub webhooks: SurrealVendorWebhookRepository<Any>,
}

impl AppState {
    pub fn new(db: Surreal<Any>, config: &ServerConfig) -> Self {
        Self {
            compliance: ComplianceService::new(
                SurrealEquipmentRepository::new(db.clone()),
                SurrealAlertRepository::new(db.clone()),
                SurrealNotificationRepository::new(db.clone()),
                config.compliance.clone(),
            ),
            provisioning: TenantProvisioningService::new(
                SurrealTenantRepository::new(db.clone()),
                SurrealUserRepository::new(db.clone()),
                config.tenancy.clone(),
            ),
            onboarding: OnboardingService::new(SurrealOnboardingRepository::new(db.clone())),
            tenants: SurrealTenantRepository::new(db.clone()),
            equipment: SurrealEquipmentRepository::new(db.clone()),
            projects: SurrealProjectRepository::new(db.clone()),
            notifications: SurrealNotificationRepository::new(db.clone()),
            webhooks: SurrealVendorWebhookRepository::new(db),
        }
    }
}
