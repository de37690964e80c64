//! Compliance alert domain model.
//!
//! Alerts are derived from equipment dates. Their identity for
//! deduplication is the [`AlertKey`] triple, and their status only
//! ever moves forward: `Open → Acknowledged → Resolved` or
//! `Open → Resolved`.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlertType {
    Maintenance,
    Certification,
    Inspection,
}

impl AlertType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Maintenance => "Maintenance",
            Self::Certification => "Certification",
            Self::Inspection => "Inspection",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert urgency, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlertPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AlertStatus {
    Open,
    Acknowledged,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Acknowledged => "Acknowledged",
            Self::Resolved => "Resolved",
        }
    }

    /// Whether a user action may move an alert from `self` to `next`.
    pub fn can_transition_to(self, next: AlertStatus) -> bool {
        matches!(
            (self, next),
            (Self::Open, Self::Acknowledged)
                | (Self::Open, Self::Resolved)
                | (Self::Acknowledged, Self::Resolved)
        )
    }

    /// Acknowledged and resolved alerts survive recomputation as-is.
    pub fn is_sticky(self) -> bool {
        !matches!(self, Self::Open)
    }
}

/// Deduplication identity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlertKey {
    pub alert_type: AlertType,
    pub equipment_id: Uuid,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplianceAlert {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub equipment_id: Uuid,
    pub equipment_name: String,
    pub alert_type: AlertType,
    pub due_date: NaiveDate,
    pub priority: AlertPriority,
    pub status: AlertStatus,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl ComplianceAlert {
    pub fn key(&self) -> AlertKey {
        AlertKey {
            alert_type: self.alert_type,
            equipment_id: self.equipment_id,
            due_date: self.due_date,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status != AlertStatus::Resolved
    }
}

/// A status change applied to a stored alert.
#[derive(Debug, Clone)]
pub struct UpdateAlertStatus {
    pub status: AlertStatus,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Counts of active alerts for dashboards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertSummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub open: usize,
    pub acknowledged: usize,
    pub resolved: usize,
}

impl AlertSummary {
    pub fn from_alerts<'a>(alerts: impl IntoIterator<Item = &'a ComplianceAlert>) -> Self {
        let mut summary = Self::default();
        for alert in alerts {
            match alert.status {
                AlertStatus::Open => summary.open += 1,
                AlertStatus::Acknowledged => summary.acknowledged += 1,
                AlertStatus::Resolved => {
                    summary.resolved += 1;
                    continue;
                }
            }
            match alert.priority {
                AlertPriority::Critical => summary.critical += 1,
                AlertPriority::High => summary.high += 1,
                AlertPriority::Medium => summary.medium += 1,
                AlertPriority::Low => summary.low += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_only_move_forward() {
        use AlertStatus::*;
        assert!(Open.can_transition_to(Acknowledged));
        assert!(Open.can_transition_to(Resolved));
        assert!(Acknowledged.can_transition_to(Resolved));

        assert!(!Acknowledged.can_transition_to(Open));
        assert!(!Acknowledged.can_transition_to(Acknowledged));
        assert!(!Resolved.can_transition_to(Open));
        assert!(!Resolved.can_transition_to(Acknowledged));
        assert!(!Resolved.can_transition_to(Resolved));
    }

    #[test]
    fn priorities_are_ordered() {
        assert!(AlertPriority::Critical > AlertPriority::High);
        assert!(AlertPriority::High > AlertPriority::Medium);
        assert!(AlertPriority::Medium > AlertPriority::Low);
    }

    #[test]
    fn summary_skips_resolved_in_priority_counts() {
        let now = Utc::now();
        let base = ComplianceAlert {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            equipment_id: Uuid::new_v4(),
            equipment_name: "Crane".into(),
            alert_type: AlertType::Maintenance,
            due_date: now.date_naive(),
            priority: AlertPriority::Critical,
            status: AlertStatus::Open,
            description: String::new(),
            created_at: now,
            updated_at: now,
            resolved_at: None,
        };
        let mut resolved = base.clone();
        resolved.status = AlertStatus::Resolved;
        let mut acked = base.clone();
        acked.priority = AlertPriority::Medium;
        acked.status = AlertStatus::Acknowledged;

        let summary = AlertSummary::from_alerts([&base, &resolved, &acked]);
        assert_eq!(summary.critical, 1);
        assert_eq!(summary.medium, 1);
        assert_eq!(summary.open, 1);
        assert_eq!(summary.acknowledged, 1);
        assert_eq!(summary.resolved, 1);
    }
}
