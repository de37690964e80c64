//! Equipment domain model.
//!
//! Equipment carries three dated obligations (maintenance, certification,
//! inspection) that drive compliance alerting.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::alert::AlertType;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EquipmentStatus {
    #[default]
    Available,
    InUse,
    Maintenance,
    Retired,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ComplianceStatus {
    Compliant,
    DueSoon,
    NonCompliant,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Equipment {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Project the equipment is currently assigned to, if any.
    pub project_id: Option<Uuid>,
    pub name: String,
    pub category: String,
    pub serial_number: Option<String>,
    pub status: EquipmentStatus,
    pub last_maintenance: Option<NaiveDate>,
    pub next_maintenance: Option<NaiveDate>,
    pub certification_required: bool,
    pub certification_expiry: Option<NaiveDate>,
    pub last_inspection: Option<NaiveDate>,
    pub next_inspection: Option<NaiveDate>,
    /// Status as recorded by the operator.
    pub compliance_status: ComplianceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single dated obligation on a piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceCheck {
    pub alert_type: AlertType,
    pub due_date: NaiveDate,
}

impl Equipment {
    /// Dated obligations in maintenance, certification, inspection order.
    ///
    /// Certification only counts when `certification_required` is set;
    /// missing dates yield no check.
    pub fn compliance_checks(&self) -> impl Iterator<Item = ComplianceCheck> + '_ {
        let certification = self
            .certification_expiry
            .filter(|_| self.certification_required);
        [
            (AlertType::Maintenance, self.next_maintenance),
            (AlertType::Certification, certification),
            (AlertType::Inspection, self.next_inspection),
        ]
        .into_iter()
        .filter_map(|(alert_type, date)| {
            date.map(|due_date| ComplianceCheck {
                alert_type,
                due_date,
            })
        })
    }

    /// Compliance as implied by the dates alone.
    pub fn assess_compliance(&self, today: NaiveDate, horizon_days: i64) -> ComplianceStatus {
        let mut status = ComplianceStatus::Unknown;
        for check in self.compliance_checks() {
            let days = (check.due_date - today).num_days();
            if days < 0 {
                return ComplianceStatus::NonCompliant;
            }
            if days <= horizon_days {
                status = ComplianceStatus::DueSoon;
            } else if status == ComplianceStatus::Unknown {
                status = ComplianceStatus::Compliant;
            }
        }
        status
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEquipment {
    /// Filled from the route when created over HTTP.
    #[serde(default)]
    pub tenant_id: Uuid,
    pub project_id: Option<Uuid>,
    pub name: String,
    pub category: String,
    pub serial_number: Option<String>,
    #[serde(default)]
    pub status: EquipmentStatus,
    pub last_maintenance: Option<NaiveDate>,
    pub next_maintenance: Option<NaiveDate>,
    #[serde(default)]
    pub certification_required: bool,
    pub certification_expiry: Option<NaiveDate>,
    pub last_inspection: Option<NaiveDate>,
    pub next_inspection: Option<NaiveDate>,
    #[serde(default)]
    pub compliance_status: ComplianceStatus,
}

/// Fields that can be updated on existing equipment.
///
/// For the nullable fields: `Some(Some(v))` = set, `Some(None)` = clear,
/// `None` = no change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateEquipment {
    #[serde(default, deserialize_with = "crate::models::nullable::deserialize")]
    pub project_id: Option<Option<Uuid>>,
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "crate::models::nullable::deserialize")]
    pub serial_number: Option<Option<String>>,
    pub status: Option<EquipmentStatus>,
    #[serde(default, deserialize_with = "crate::models::nullable::deserialize")]
    pub last_maintenance: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "crate::models::nullable::deserialize")]
    pub next_maintenance: Option<Option<NaiveDate>>,
    pub certification_required: Option<bool>,
    #[serde(default, deserialize_with = "crate::models::nullable::deserialize")]
    pub certification_expiry: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "crate::models::nullable::deserialize")]
    pub last_inspection: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "crate::models::nullable::deserialize")]
    pub next_inspection: Option<Option<NaiveDate>>,
    pub compliance_status: Option<ComplianceStatus>,
}
