//! Alert derivation.
//!
//! Turns an equipment snapshot plus the previously stored alerts into the
//! next alert set and the notifications it should raise. Pure: no I/O,
//! and the clock is passed in.
//!
//! Rules, per dated check (`next_maintenance`, `certification_expiry` when
//! certification is required, `next_inspection`):
//!
//! - an Acknowledged or Resolved alert with the same [`AlertKey`] is
//!   carried forward unchanged;
//! - a date before today is **Critical**;
//! - a date within the alert horizon is **High** (maintenance,
//!   certification) or **Medium** (inspection);
//! - anything later raises nothing.
//!
//! Only newly created High/Critical alerts notify, and soon-due ones only
//! inside the notification window.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use yardline_core::models::alert::{
    AlertKey, AlertPriority, AlertStatus, AlertType, ComplianceAlert,
};
use yardline_core::models::equipment::{ComplianceCheck, Equipment};
use yardline_core::models::notification::CreateNotification;

use crate::config::ComplianceConfig;

/// Result of one derivation pass.
#[derive(Debug, Clone, Default)]
pub struct Derivation {
    /// The complete alert set to store, ordered by due date.
    pub alerts: Vec<ComplianceAlert>,
    /// Notifications for alerts created in this pass.
    pub notify: Vec<CreateNotification>,
}

/// Priority for a check due on `due_date`, or `None` when it is outside
/// the alert horizon.
pub fn classify(
    alert_type: AlertType,
    due_date: NaiveDate,
    today: NaiveDate,
    config: &ComplianceConfig,
) -> Option<AlertPriority> {
    let days = (due_date - today).num_days();
    if days < 0 {
        Some(AlertPriority::Critical)
    } else if days <= config.alert_horizon_days {
        Some(match alert_type {
            AlertType::Maintenance | AlertType::Certification => AlertPriority::High,
            AlertType::Inspection => AlertPriority::Medium,
        })
    } else {
        None
    }
}

/// Whether a newly created alert should raise a notification.
pub fn should_notify(
    priority: AlertPriority,
    due_date: NaiveDate,
    today: NaiveDate,
    config: &ComplianceConfig,
) -> bool {
    if priority < AlertPriority::High {
        return false;
    }
    let days = (due_date - today).num_days();
    days < 0 || days <= config.notification_window_days
}

fn describe(equipment: &Equipment, check: ComplianceCheck, today: NaiveDate) -> String {
    let days = (check.due_date - today).num_days();
    let what = match check.alert_type {
        AlertType::Maintenance => "maintenance",
        AlertType::Certification => "certification",
        AlertType::Inspection => "inspection",
    };
    match days {
        d if d < 0 => format!(
            "{} {what} overdue since {} ({} days)",
            equipment.name,
            check.due_date,
            -d
        ),
        0 => format!("{} {what} due today", equipment.name),
        1 => format!("{} {what} due tomorrow", equipment.name),
        d => format!(
            "{} {what} due on {} (in {d} days)",
            equipment.name, check.due_date
        ),
    }
}

fn notification_for(alert: &ComplianceAlert, today: NaiveDate) -> CreateNotification {
    let title = if alert.due_date < today {
        format!("{} overdue", alert.alert_type)
    } else {
        format!("{} due soon", alert.alert_type)
    };
    CreateNotification {
        tenant_id: alert.tenant_id,
        title,
        message: alert.description.clone(),
        priority: alert.priority,
        alert_id: Some(alert.id),
    }
}

/// Derive the next alert set from `equipment` and the `previous` one.
///
/// Previously Open alerts whose key still applies keep their id and
/// `created_at`; their priority and description are recomputed. Resolved
/// alerts whose key no longer applies are kept as history. Open and
/// Acknowledged alerts whose key no longer applies are dropped.
pub fn derive_alerts(
    equipment: &[Equipment],
    previous: &[ComplianceAlert],
    today: NaiveDate,
    now: DateTime<Utc>,
    config: &ComplianceConfig,
) -> Derivation {
    let mut sticky: HashMap<AlertKey, &ComplianceAlert> = HashMap::new();
    let mut open: HashMap<AlertKey, &ComplianceAlert> = HashMap::new();
    for alert in previous {
        if alert.status.is_sticky() {
            sticky.insert(alert.key(), alert);
        } else {
            open.insert(alert.key(), alert);
        }
    }

    let mut derivation = Derivation::default();

    for item in equipment {
        for check in item.compliance_checks() {
            let key = AlertKey {
                alert_type: check.alert_type,
                equipment_id: item.id,
                due_date: check.due_date,
            };

            if let Some(kept) = sticky.remove(&key) {
                derivation.alerts.push(kept.clone());
                continue;
            }

            let Some(priority) = classify(check.alert_type, check.due_date, today, config) else {
                continue;
            };
            let description = describe(item, check, today);

            if let Some(existing) = open.get(&key) {
                let mut alert = (*existing).clone();
                if alert.priority != priority || alert.description != description {
                    alert.updated_at = now;
                }
                alert.priority = priority;
                alert.description = description;
                alert.equipment_name = item.name.clone();
                derivation.alerts.push(alert);
                continue;
            }

            let alert = ComplianceAlert {
                id: Uuid::new_v4(),
                tenant_id: item.tenant_id,
                equipment_id: item.id,
                equipment_name: item.name.clone(),
                alert_type: check.alert_type,
                due_date: check.due_date,
                priority,
                status: AlertStatus::Open,
                description,
                created_at: now,
                updated_at: now,
                resolved_at: None,
            };
            if should_notify(priority, check.due_date, today, config) {
                derivation.notify.push(notification_for(&alert, today));
            }
            derivation.alerts.push(alert);
        }
    }

    // Resolved history with no current counterpart.
    derivation.alerts.extend(
        sticky
            .into_values()
            .filter(|a| a.status == AlertStatus::Resolved)
            .cloned(),
    );

    derivation.alerts.sort_by(|a, b| {
        a.due_date
            .cmp(&b.due_date)
            .then(a.alert_type.cmp(&b.alert_type))
            .then_with(|| a.equipment_name.cmp(&b.equipment_name))
    });
    derivation
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use yardline_core::models::equipment::{ComplianceStatus, EquipmentStatus};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn days(n: i64) -> NaiveDate {
        today() + Duration::days(n)
    }

    fn equipment(name: &str) -> Equipment {
        Equipment {
            id: Uuid::new_v4(),
            tenant_id: Uuid::nil(),
            project_id: None,
            name: name.into(),
            category: "Lifting".into(),
            serial_number: None,
            status: EquipmentStatus::Available,
            last_maintenance: None,
            next_maintenance: None,
            certification_required: false,
            certification_expiry: None,
            last_inspection: None,
            next_inspection: None,
            compliance_status: ComplianceStatus::Unknown,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn derive(equipment: &[Equipment], previous: &[ComplianceAlert]) -> Derivation {
        derive_alerts(
            equipment,
            previous,
            today(),
            Utc::now(),
            &ComplianceConfig::default(),
        )
    }

    #[test]
    fn overdue_maintenance_is_critical() {
        let mut crane = equipment("Tower crane");
        crane.next_maintenance = Some(days(-1));

        let out = derive(&[crane.clone()], &[]);
        assert_eq!(out.alerts.len(), 1);
        let alert = &out.alerts[0];
        assert_eq!(alert.alert_type, AlertType::Maintenance);
        assert_eq!(alert.priority, AlertPriority::Critical);
        assert_eq!(alert.status, AlertStatus::Open);
        assert_eq!(alert.equipment_id, crane.id);
        assert_eq!(out.notify.len(), 1);
        assert_eq!(out.notify[0].alert_id, Some(alert.id));
    }

    #[test]
    fn maintenance_within_horizon_is_high() {
        let mut crane = equipment("Tower crane");
        crane.next_maintenance = Some(days(10));

        let out = derive(&[crane], &[]);
        assert_eq!(out.alerts.len(), 1);
        assert_eq!(out.alerts[0].priority, AlertPriority::High);
        // Outside the notification window.
        assert!(out.notify.is_empty());
    }

    #[test]
    fn maintenance_beyond_horizon_raises_nothing() {
        let mut crane = equipment("Tower crane");
        crane.next_maintenance = Some(days(45));

        let out = derive(&[crane], &[]);
        assert!(out.alerts.is_empty());
        assert!(out.notify.is_empty());
    }

    #[test]
    fn horizon_edges() {
        let config = ComplianceConfig::default();
        assert_eq!(
            classify(AlertType::Maintenance, today(), today(), &config),
            Some(AlertPriority::High)
        );
        assert_eq!(
            classify(AlertType::Maintenance, days(30), today(), &config),
            Some(AlertPriority::High)
        );
        assert_eq!(
            classify(AlertType::Maintenance, days(31), today(), &config),
            None
        );
    }

    #[test]
    fn inspection_soon_is_medium_and_silent() {
        let mut lift = equipment("Scissor lift");
        lift.next_inspection = Some(days(3));

        let out = derive(&[lift], &[]);
        assert_eq!(out.alerts.len(), 1);
        assert_eq!(out.alerts[0].alert_type, AlertType::Inspection);
        assert_eq!(out.alerts[0].priority, AlertPriority::Medium);
        assert!(out.notify.is_empty());
    }

    #[test]
    fn certification_only_counts_when_required() {
        let mut lift = equipment("Boom lift");
        lift.certification_expiry = Some(days(5));

        assert!(derive(&[lift.clone()], &[]).alerts.is_empty());

        lift.certification_required = true;
        let out = derive(&[lift], &[]);
        assert_eq!(out.alerts.len(), 1);
        assert_eq!(out.alerts[0].alert_type, AlertType::Certification);
        assert_eq!(out.alerts[0].priority, AlertPriority::High);
        assert_eq!(out.notify.len(), 1);
    }

    #[test]
    fn notification_window() {
        let config = ComplianceConfig::default();
        assert!(should_notify(AlertPriority::High, days(7), today(), &config));
        assert!(!should_notify(AlertPriority::High, days(8), today(), &config));
        assert!(should_notify(
            AlertPriority::Critical,
            days(-40),
            today(),
            &config
        ));
        assert!(!should_notify(
            AlertPriority::Medium,
            days(1),
            today(),
            &config
        ));
    }

    #[test]
    fn acknowledged_alert_survives_recomputation() {
        let mut crane = equipment("Tower crane");
        crane.next_maintenance = Some(days(-2));

        let first = derive(&[crane.clone()], &[]);
        let mut acked = first.alerts[0].clone();
        acked.status = AlertStatus::Acknowledged;

        let second = derive(&[crane], &[acked.clone()]);
        assert_eq!(second.alerts, vec![acked]);
        assert!(second.notify.is_empty());
    }

    #[test]
    fn open_alert_keeps_identity_and_is_not_renotified() {
        let mut crane = equipment("Tower crane");
        crane.next_maintenance = Some(days(5));

        let first = derive(&[crane.clone()], &[]);
        assert_eq!(first.notify.len(), 1);

        let later = derive_alerts(
            &[crane],
            &first.alerts,
            days(6),
            Utc::now(),
            &ComplianceConfig::default(),
        );
        assert_eq!(later.alerts.len(), 1);
        assert_eq!(later.alerts[0].id, first.alerts[0].id);
        assert_eq!(later.alerts[0].created_at, first.alerts[0].created_at);
        assert_eq!(later.alerts[0].priority, AlertPriority::Critical);
        assert!(later.notify.is_empty());
    }

    #[test]
    fn rescheduled_date_replaces_stale_alerts() {
        let mut crane = equipment("Tower crane");
        crane.next_maintenance = Some(days(-1));
        let first = derive(&[crane.clone()], &[]);

        let mut acked = first.alerts[0].clone();
        acked.status = AlertStatus::Acknowledged;

        crane.next_maintenance = Some(days(90));
        let out = derive(&[crane], &[acked]);
        assert!(out.alerts.is_empty());
    }

    #[test]
    fn resolved_history_is_retained() {
        let mut crane = equipment("Tower crane");
        crane.next_maintenance = Some(days(-1));
        let first = derive(&[crane.clone()], &[]);

        let mut resolved = first.alerts[0].clone();
        resolved.status = AlertStatus::Resolved;
        resolved.resolved_at = Some(Utc::now());

        // Serviced: the next maintenance moves out of the horizon.
        crane.next_maintenance = Some(days(180));
        let out = derive(&[crane], &[resolved.clone()]);
        assert_eq!(out.alerts, vec![resolved]);
    }

    #[test]
    fn alerts_are_ordered_by_due_date() {
        let mut a = equipment("Generator");
        a.next_inspection = Some(days(20));
        a.next_maintenance = Some(days(2));
        let mut b = equipment("Compressor");
        b.next_maintenance = Some(days(-3));

        let out = derive(&[a, b], &[]);
        let dates: Vec<_> = out.alerts.iter().map(|a| a.due_date).collect();
        assert_eq!(dates, vec![days(-3), days(2), days(20)]);
    }
}
