//! SurrealDB repository implementations.

mod alert;
mod codec;
mod equipment;
mod notification;
mod onboarding;
mod profile;
mod project;
mod tenant;
mod user;
mod webhook;

pub use alert::SurrealAlertRepository;
pub use equipment::SurrealEquipmentRepository;
pub use notification::SurrealNotificationRepository;
pub use onboarding::SurrealOnboardingRepository;
pub use profile::SurrealProfileRepository;
pub use project::SurrealProjectRepository;
pub use tenant::SurrealTenantRepository;
pub use user::SurrealUserRepository;
pub use webhook::{SurrealVendorWebhookRepository, hash_webhook_secret};
