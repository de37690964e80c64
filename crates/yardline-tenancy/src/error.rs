//! Tenancy error types.

use thiserror::Error;
use uuid::Uuid;
use yardline_core::error::YardlineError;

#[derive(Debug, Error)]
pub enum TenancyError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("tenant name must not be empty")]
    EmptyName,

    #[error("trial length must be between 1 and {max} days, got {days}")]
    InvalidTrialDays { days: i64, max: i64 },

    #[error("user {user_id} already belongs to tenant {tenant_id}")]
    OwnerAlreadyAssigned { user_id: Uuid, tenant_id: Uuid },

    #[error("target tenant {0} does not exist")]
    UnknownTenant(Uuid),

    #[error("user {user_id} is already a member of tenant {tenant_id}")]
    AlreadyInTenant { user_id: Uuid, tenant_id: Uuid },
}

impl From<TenancyError> for YardlineError {
    fn from(err: TenancyError) -> Self {
        match err {
            TenancyError::MissingField(_)
            | TenancyError::EmptyName
            | TenancyError::InvalidTrialDays { .. }
            | TenancyError::AlreadyInTenant { .. } => YardlineError::Validation {
                message: err.to_string(),
            },
            TenancyError::OwnerAlreadyAssigned { .. } => YardlineError::Conflict {
                message: err.to_string(),
            },
            TenancyError::UnknownTenant(id) => YardlineError::not_found("tenant", id),
        }
    }
}
