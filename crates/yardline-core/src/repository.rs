//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Tenant-scoped repositories
//! require a `tenant_id` parameter to enforce data isolation.

use uuid::Uuid;

use crate::error::YardlineResult;
use crate::models::{
    alert::{ComplianceAlert, UpdateAlertStatus},
    equipment::{CreateEquipment, Equipment, UpdateEquipment},
    notification::{CreateNotification, Notification},
    onboarding::OnboardingState,
    profile::{CreateProfile, Profile, UpdateProfile},
    project::{CreateProject, Project, UpdateProject},
    tenant::{CreateTenant, ProvisionTenant, Tenant, UpdateTenant},
    user::{CreateUser, UpdateUser, User},
    webhook::{CreateVendorWebhook, UpdateVendorWebhook, VendorWebhook},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Tenants, users and profiles
// ---------------------------------------------------------------------------

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = YardlineResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = YardlineResult<Tenant>> + Send;
    fn get_by_slug(&self, slug: &str) -> impl Future<Output = YardlineResult<Tenant>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTenant,
    ) -> impl Future<Output = YardlineResult<Tenant>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = YardlineResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = YardlineResult<PaginatedResult<Tenant>>> + Send;

    /// Create a tenant and make the given user (and their profile) its
    /// owner, atomically.
    fn provision(
        &self,
        input: ProvisionTenant,
    ) -> impl Future<Output = YardlineResult<Tenant>> + Send;
}

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = YardlineResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = YardlineResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = YardlineResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = YardlineResult<User>> + Send;
    fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = YardlineResult<PaginatedResult<User>>> + Send;

    /// Move a user and their profile to another tenant in one transaction.
    fn migrate_tenant(
        &self,
        user_id: Uuid,
        new_tenant_id: Uuid,
    ) -> impl Future<Output = YardlineResult<User>> + Send;
}

pub trait ProfileRepository: Send + Sync {
    fn create(&self, input: CreateProfile)
    -> impl Future<Output = YardlineResult<Profile>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = YardlineResult<Profile>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateProfile,
    ) -> impl Future<Output = YardlineResult<Profile>> + Send;
}

// ---------------------------------------------------------------------------
// Tenant-scoped repositories
// ---------------------------------------------------------------------------

pub trait EquipmentRepository: Send + Sync {
    fn create(
        &self,
        input: CreateEquipment,
    ) -> impl Future<Output = YardlineResult<Equipment>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = YardlineResult<Equipment>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateEquipment,
    ) -> impl Future<Output = YardlineResult<Equipment>> + Send;
    fn delete(&self, tenant_id: Uuid, id: Uuid)
    -> impl Future<Output = YardlineResult<()>> + Send;
    fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = YardlineResult<PaginatedResult<Equipment>>> + Send;

    /// Every equipment item of a tenant, ordered by id.
    fn snapshot(&self, tenant_id: Uuid)
    -> impl Future<Output = YardlineResult<Vec<Equipment>>> + Send;
}

pub trait ProjectRepository: Send + Sync {
    fn create(&self, input: CreateProject)
    -> impl Future<Output = YardlineResult<Project>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = YardlineResult<Project>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateProject,
    ) -> impl Future<Output = YardlineResult<Project>> + Send;
    fn delete(&self, tenant_id: Uuid, id: Uuid)
    -> impl Future<Output = YardlineResult<()>> + Send;
    fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = YardlineResult<PaginatedResult<Project>>> + Send;
}

/// Owned store for derived compliance alerts.
pub trait AlertRepository: Send + Sync {
    /// All stored alerts of a tenant, resolved ones included.
    fn list(&self, tenant_id: Uuid)
    -> impl Future<Output = YardlineResult<Vec<ComplianceAlert>>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = YardlineResult<ComplianceAlert>> + Send;

    /// Fingerprint of the equipment snapshot the stored alerts were
    /// derived from.
    fn snapshot_fingerprint(
        &self,
        tenant_id: Uuid,
    ) -> impl Future<Output = YardlineResult<Option<String>>> + Send;

    /// Replace the tenant's alert set and its fingerprint, and record the
    /// notifications raised by the new set, in one transaction.
    ///
    /// Stored alerts that are no longer Open keep their stored status,
    /// `updated_at` and `resolved_at` when they appear in `alerts`.
    fn replace(
        &self,
        tenant_id: Uuid,
        alerts: Vec<ComplianceAlert>,
        notifications: Vec<CreateNotification>,
        fingerprint: String,
    ) -> impl Future<Output = YardlineResult<()>> + Send;

    fn update_status(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateAlertStatus,
    ) -> impl Future<Output = YardlineResult<ComplianceAlert>> + Send;
}

pub trait NotificationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateNotification,
    ) -> impl Future<Output = YardlineResult<Notification>> + Send;
    /// Newest first.
    fn list(
        &self,
        tenant_id: Uuid,
        unread_only: bool,
    ) -> impl Future<Output = YardlineResult<Vec<Notification>>> + Send;
    fn mark_read(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = YardlineResult<Notification>> + Send;
}

pub trait VendorWebhookRepository: Send + Sync {
    /// Returns the webhook and the raw signing secret. The secret is
    /// only available at creation time.
    fn create(
        &self,
        input: CreateVendorWebhook,
    ) -> impl Future<Output = YardlineResult<(VendorWebhook, String)>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = YardlineResult<VendorWebhook>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateVendorWebhook,
    ) -> impl Future<Output = YardlineResult<VendorWebhook>> + Send;
    fn delete(&self, tenant_id: Uuid, id: Uuid)
    -> impl Future<Output = YardlineResult<()>> + Send;
    fn list(
        &self,
        tenant_id: Uuid,
    ) -> impl Future<Output = YardlineResult<Vec<VendorWebhook>>> + Send;

    /// Enabled webhooks subscribed to `event` (directly or via `*`).
    fn list_for_event(
        &self,
        tenant_id: Uuid,
        event: &str,
    ) -> impl Future<Output = YardlineResult<Vec<VendorWebhook>>> + Send;

    /// Generate a new signing secret, returning the raw value.
    fn rotate_secret(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = YardlineResult<String>> + Send;
}

pub trait OnboardingRepository: Send + Sync {
    /// `None` when the tenant has not started onboarding.
    fn get(
        &self,
        tenant_id: Uuid,
    ) -> impl Future<Output = YardlineResult<Option<OnboardingState>>> + Send;
    fn save(
        &self,
        state: OnboardingState,
    ) -> impl Future<Output = YardlineResult<OnboardingState>> + Send;
}
