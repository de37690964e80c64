//! Tenant onboarding progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Onboarding steps in the order they are presented.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OnboardingStep {
    CompanyProfile,
    InviteTeam,
    AddEquipment,
    CreateProject,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 4] = [
        Self::CompanyProfile,
        Self::InviteTeam,
        Self::AddEquipment,
        Self::CreateProject,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CompanyProfile => "CompanyProfile",
            Self::InviteTeam => "InviteTeam",
            Self::AddEquipment => "AddEquipment",
            Self::CreateProject => "CreateProject",
        }
    }

    /// Case-insensitive; `-` and `_` are ignored, so `company-profile`
    /// parses as [`OnboardingStep::CompanyProfile`].
    pub fn parse(s: &str) -> Option<Self> {
        let wanted: String = s.chars().filter(|c| *c != '-' && *c != '_').collect();
        Self::ALL
            .into_iter()
            .find(|step| step.as_str().eq_ignore_ascii_case(&wanted))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OnboardingState {
    pub tenant_id: Uuid,
    pub completed_steps: Vec<OnboardingStep>,
    /// First step not yet completed; `None` once onboarding is done.
    pub current_step: Option<OnboardingStep>,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

impl OnboardingState {
    pub fn new(tenant_id: Uuid) -> Self {
        Self {
            tenant_id,
            completed_steps: Vec::new(),
            current_step: OnboardingStep::ALL.first().copied(),
            completed: false,
            updated_at: Utc::now(),
        }
    }
}
