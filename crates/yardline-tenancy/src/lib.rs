//! Yardline Tenancy — the `create-tenant` function, trial and
//! subscription rules, and tenant onboarding.

pub mod config;
pub mod error;
pub mod onboarding;
pub mod request;
pub mod service;
pub mod subscription;

pub use config::TenancyConfig;
pub use error::TenancyError;
pub use onboarding::OnboardingService;
pub use request::{CreateTenantRequest, FunctionResponse, TenantAction};
pub use service::{CreateTenantOutcome, TenantProvisioningService};
