//! Compliance error types.

use thiserror::Error;
use uuid::Uuid;
use yardline_core::error::YardlineError;
use yardline_core::models::alert::AlertStatus;

#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("alert {id} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        id: Uuid,
        from: AlertStatus,
        to: AlertStatus,
    },

    #[error("failed to fingerprint equipment snapshot: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

impl From<ComplianceError> for YardlineError {
    fn from(err: ComplianceError) -> Self {
        match err {
            ComplianceError::InvalidTransition { id, from, to } => {
                YardlineError::InvalidTransition {
                    entity: format!("alert {id}"),
                    from: from.as_str().into(),
                    to: to.as_str().into(),
                }
            }
            ComplianceError::Fingerprint(e) => YardlineError::Serialization(e.to_string()),
        }
    }
}
