//! Compliance service — alert refresh and lifecycle orchestration.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};
use uuid::Uuid;
use yardline_core::error::YardlineResult;
use yardline_core::models::alert::{
    AlertPriority, AlertStatus, AlertSummary, ComplianceAlert, UpdateAlertStatus,
};
use yardline_core::models::equipment::ComplianceStatus;
use yardline_core::models::notification::CreateNotification;
use yardline_core::repository::{AlertRepository, EquipmentRepository, NotificationRepository};

use crate::config::ComplianceConfig;
use crate::deriver::derive_alerts;
use crate::error::ComplianceError;
use crate::snapshot;

/// Result of a refresh.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    /// The tenant's stored alerts after the refresh, resolved included.
    pub alerts: Vec<ComplianceAlert>,
    /// `false` when the snapshot was unchanged and derivation was skipped.
    pub recomputed: bool,
    pub notifications_emitted: usize,
}

/// Date-derived compliance of one piece of equipment.
#[derive(Debug, Clone, Serialize)]
pub struct EquipmentCompliance {
    pub equipment_id: Uuid,
    pub name: String,
    /// Status as recorded on the equipment.
    pub recorded: ComplianceStatus,
    /// Status implied by its dates today.
    pub assessed: ComplianceStatus,
}

/// Compliance service.
///
/// Generic over repository implementations so that the compliance layer
/// has no dependency on the database crate. Refreshes and status
/// transitions of one tenant run one at a time.
pub struct ComplianceService<E, A, N>
where
    E: EquipmentRepository,
    A: AlertRepository,
    N: NotificationRepository,
{
    equipment_repo: E,
    alert_repo: A,
    notification_repo: N,
    config: ComplianceConfig,
    tenant_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl<E, A, N> ComplianceService<E, A, N>
where
    E: EquipmentRepository,
    A: AlertRepository,
    N: NotificationRepository,
{
    pub fn new(
        equipment_repo: E,
        alert_repo: A,
        notification_repo: N,
        config: ComplianceConfig,
    ) -> Self {
        Self {
            equipment_repo,
            alert_repo,
            notification_repo,
            config,
            tenant_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ComplianceConfig {
        &self.config
    }

    /// Refresh the tenant's alerts as of the current UTC date.
    pub async fn refresh(&self, tenant_id: Uuid) -> YardlineResult<RefreshOutcome> {
        self.refresh_at(tenant_id, Utc::now().date_naive()).await
    }

    /// Refresh the tenant's alerts as of `today`.
    ///
    /// Skipped when the equipment snapshot fingerprint matches the one
    /// stored with the current alert set.
    pub async fn refresh_at(
        &self,
        tenant_id: Uuid,
        today: NaiveDate,
    ) -> YardlineResult<RefreshOutcome> {
        let _guard = self.lock_tenant(tenant_id).await;

        let equipment = self.equipment_repo.snapshot(tenant_id).await?;
        let fingerprint = snapshot::fingerprint(&equipment, today)?;
        let stored = self.alert_repo.snapshot_fingerprint(tenant_id).await?;
        let previous = self.alert_repo.list(tenant_id).await?;

        if stored.as_deref() == Some(fingerprint.as_str()) {
            debug!(
                tenant_id = %tenant_id,
                "Equipment snapshot unchanged, skipping derivation"
            );
            return Ok(RefreshOutcome {
                alerts: previous,
                recomputed: false,
                notifications_emitted: 0,
            });
        }

        let derivation =
            derive_alerts(&equipment, &previous, today, Utc::now(), &self.config);
        let emitted = derivation.notify.len();
        self.alert_repo
            .replace(tenant_id, derivation.alerts, derivation.notify, fingerprint)
            .await?;
        let alerts = self.alert_repo.list(tenant_id).await?;

        info!(
            tenant_id = %tenant_id,
            equipment = equipment.len(),
            alerts = alerts.len(),
            notifications = emitted,
            "Compliance alerts recomputed"
        );

        Ok(RefreshOutcome {
            alerts,
            recomputed: true,
            notifications_emitted: emitted,
        })
    }

    pub async fn acknowledge(
        &self,
        tenant_id: Uuid,
        alert_id: Uuid,
    ) -> YardlineResult<ComplianceAlert> {
        let alert = self
            .transition(tenant_id, alert_id, AlertStatus::Acknowledged)
            .await?;
        info!(tenant_id = %tenant_id, alert_id = %alert_id, "Alert acknowledged");
        Ok(alert)
    }

    /// Resolve an alert and emit a low-priority notification about it.
    pub async fn resolve(
        &self,
        tenant_id: Uuid,
        alert_id: Uuid,
    ) -> YardlineResult<ComplianceAlert> {
        let alert = self
            .transition(tenant_id, alert_id, AlertStatus::Resolved)
            .await?;

        self.notification_repo
            .create(CreateNotification {
                tenant_id,
                title: format!("{} alert resolved", alert.alert_type),
                message: format!(
                    "{} {} alert due {} was resolved",
                    alert.equipment_name,
                    alert.alert_type.as_str().to_lowercase(),
                    alert.due_date
                ),
                priority: AlertPriority::Low,
                alert_id: Some(alert.id),
            })
            .await?;

        info!(tenant_id = %tenant_id, alert_id = %alert_id, "Alert resolved");
        Ok(alert)
    }

    /// Stored alerts that are not resolved.
    pub async fn active_alerts(&self, tenant_id: Uuid) -> YardlineResult<Vec<ComplianceAlert>> {
        let alerts = self.alert_repo.list(tenant_id).await?;
        Ok(alerts.into_iter().filter(ComplianceAlert::is_active).collect())
    }

    pub async fn all_alerts(&self, tenant_id: Uuid) -> YardlineResult<Vec<ComplianceAlert>> {
        self.alert_repo.list(tenant_id).await
    }

    pub async fn summary(&self, tenant_id: Uuid) -> YardlineResult<AlertSummary> {
        let alerts = self.alert_repo.list(tenant_id).await?;
        Ok(AlertSummary::from_alerts(&alerts))
    }

    /// Assess every piece of equipment against its dates as of `today`.
    pub async fn equipment_compliance(
        &self,
        tenant_id: Uuid,
        today: NaiveDate,
    ) -> YardlineResult<Vec<EquipmentCompliance>> {
        let equipment = self.equipment_repo.snapshot(tenant_id).await?;
        Ok(equipment
            .into_iter()
            .map(|e| EquipmentCompliance {
                equipment_id: e.id,
                assessed: e.assess_compliance(today, self.config.alert_horizon_days),
                recorded: e.compliance_status,
                name: e.name,
            })
            .collect())
    }

    async fn lock_tenant(&self, tenant_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.tenant_locks.lock().await;
            Arc::clone(locks.entry(tenant_id).or_default())
        };
        lock.lock_owned().await
    }

    async fn transition(
        &self,
        tenant_id: Uuid,
        alert_id: Uuid,
        next: AlertStatus,
    ) -> YardlineResult<ComplianceAlert> {
        let _guard = self.lock_tenant(tenant_id).await;

        let alert = self.alert_repo.get_by_id(tenant_id, alert_id).await?;
        if !alert.status.can_transition_to(next) {
            return Err(ComplianceError::InvalidTransition {
                id: alert_id,
                from: alert.status,
                to: next,
            }
            .into());
        }

        let now = Utc::now();
        let resolved_at = match next {
            AlertStatus::Resolved => Some(now),
            _ => alert.resolved_at,
        };
        self.alert_repo
            .update_status(
                tenant_id,
                alert_id,
                UpdateAlertStatus {
                    status: next,
                    updated_at: now,
                    resolved_at,
                },
            )
            .await
    }
}
