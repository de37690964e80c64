//! Wire types of the `create-tenant` function.
//!
//! One endpoint carries three actions, selected by the `setTrial` and
//! `isMigration` flags. Every outcome is reported through the same
//! `{ success, data?, error?, conflict? }` envelope.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use yardline_core::error::{ErrorCategory, YardlineError};
use yardline_core::models::tenant::SubscriptionTier;

use crate::error::TenancyError;

/// Request body of `create-tenant`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantRequest {
    #[serde(default)]
    pub set_trial: bool,
    #[serde(default)]
    pub is_migration: bool,
    pub tenant_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub subscription_tier: Option<SubscriptionTier>,
    pub trial_days: Option<i64>,
}

/// The action a request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantAction {
    SetTrial {
        tenant_id: Uuid,
        days: Option<i64>,
    },
    MigrateUser {
        user_id: Uuid,
        tenant_id: Uuid,
    },
    Create {
        user_id: Uuid,
        name: String,
        slug: Option<String>,
        tier: Option<SubscriptionTier>,
    },
}

impl CreateTenantRequest {
    /// Resolve the action. `setTrial` wins over `isMigration`.
    pub fn into_action(self) -> Result<TenantAction, TenancyError> {
        if self.set_trial {
            return Ok(TenantAction::SetTrial {
                tenant_id: self.tenant_id.ok_or(TenancyError::MissingField("tenantId"))?,
                days: self.trial_days,
            });
        }
        if self.is_migration {
            return Ok(TenantAction::MigrateUser {
                user_id: self.user_id.ok_or(TenancyError::MissingField("userId"))?,
                tenant_id: self.tenant_id.ok_or(TenancyError::MissingField("tenantId"))?,
            });
        }

        let user_id = self.user_id.ok_or(TenancyError::MissingField("userId"))?;
        let name = self.name.ok_or(TenancyError::MissingField("name"))?;
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(TenancyError::EmptyName);
        }
        Ok(TenantAction::Create {
            user_id,
            name,
            slug: self.slug,
            tier: self.subscription_tier,
        })
    }
}

/// Response envelope of `create-tenant`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<bool>,
    /// Category of the failure, for transports that need a status code.
    #[serde(skip)]
    pub category: Option<ErrorCategory>,
}

impl FunctionResponse {
    pub fn ok(data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
                conflict: None,
                category: None,
            },
            Err(e) => Self::failure(&YardlineError::from(e)),
        }
    }

    pub fn failure(err: &YardlineError) -> Self {
        let category = err.category();
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            conflict: (category == ErrorCategory::Conflict).then_some(true),
            category: Some(category),
        }
    }

    /// A conflict carrying the record that caused it.
    pub fn conflict(message: impl Into<String>, existing: impl Serialize) -> Self {
        Self {
            success: false,
            data: serde_json::to_value(existing).ok(),
            error: Some(message.into()),
            conflict: Some(true),
            category: Some(ErrorCategory::Conflict),
        }
    }
}
