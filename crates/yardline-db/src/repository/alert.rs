//! SurrealDB implementation of [`AlertRepository`].
//!
//! Alerts for a tenant are replaced wholesale on every recomputation,
//! together with the fingerprint of the equipment snapshot they were
//! derived from and the notifications the new set raises. All of it
//! shares one transaction.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;
use yardline_core::error::{YardlineError, YardlineResult};
use yardline_core::models::alert::{
    AlertPriority, AlertStatus, AlertType, ComplianceAlert, UpdateAlertStatus,
};
use yardline_core::models::notification::CreateNotification;
use yardline_core::repository::AlertRepository;

use super::codec::{format_date, parse_date, parse_uuid, unknown_variant};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AlertRow {
    record_id: String,
    tenant_id: String,
    equipment_id: String,
    equipment_name: String,
    alert_type: String,
    due_date: String,
    priority: String,
    status: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

/// Shape written by `INSERT INTO alert`; `id` becomes the record key.
#[derive(Debug, SurrealValue)]
struct NewAlertRow {
    id: String,
    tenant_id: String,
    equipment_id: String,
    equipment_name: String,
    alert_type: String,
    due_date: String,
    priority: String,
    status: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

/// Shape written by `INSERT INTO notification`.
#[derive(Debug, SurrealValue)]
struct NewNotificationRow {
    id: String,
    tenant_id: String,
    title: String,
    message: String,
    priority: String,
    alert_id: Option<String>,
    read: bool,
}

impl From<CreateNotification> for NewNotificationRow {
    fn from(input: CreateNotification) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id: input.tenant_id.to_string(),
            title: input.title,
            message: input.message,
            priority: input.priority.as_str().into(),
            alert_id: input.alert_id.map(|a| a.to_string()),
            read: false,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct FingerprintRow {
    fingerprint: String,
}

fn parse_type(s: &str) -> Result<AlertType, DbError> {
    match s {
        "Maintenance" => Ok(AlertType::Maintenance),
        "Certification" => Ok(AlertType::Certification),
        "Inspection" => Ok(AlertType::Inspection),
        other => Err(unknown_variant("alert type", other)),
    }
}

pub(crate) fn parse_priority(s: &str) -> Result<AlertPriority, DbError> {
    match s {
        "Low" => Ok(AlertPriority::Low),
        "Medium" => Ok(AlertPriority::Medium),
        "High" => Ok(AlertPriority::High),
        "Critical" => Ok(AlertPriority::Critical),
        other => Err(unknown_variant("alert priority", other)),
    }
}

fn parse_status(s: &str) -> Result<AlertStatus, DbError> {
    match s {
        "Open" => Ok(AlertStatus::Open),
        "Acknowledged" => Ok(AlertStatus::Acknowledged),
        "Resolved" => Ok(AlertStatus::Resolved),
        other => Err(unknown_variant("alert status", other)),
    }
}

impl AlertRow {
    fn try_into_alert(self) -> Result<ComplianceAlert, DbError> {
        Ok(ComplianceAlert {
            id: parse_uuid("alert", &self.record_id)?,
            tenant_id: parse_uuid("tenant", &self.tenant_id)?,
            equipment_id: parse_uuid("equipment", &self.equipment_id)?,
            equipment_name: self.equipment_name,
            alert_type: parse_type(&self.alert_type)?,
            due_date: parse_date("due_date", &self.due_date)?,
            priority: parse_priority(&self.priority)?,
            status: parse_status(&self.status)?,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
            resolved_at: self.resolved_at,
        })
    }
}

impl From<ComplianceAlert> for NewAlertRow {
    fn from(alert: ComplianceAlert) -> Self {
        Self {
            id: alert.id.to_string(),
            tenant_id: alert.tenant_id.to_string(),
            equipment_id: alert.equipment_id.to_string(),
            equipment_name: alert.equipment_name,
            alert_type: alert.alert_type.as_str().into(),
            due_date: format_date(alert.due_date),
            priority: alert.priority.as_str().into(),
            status: alert.status.as_str().into(),
            description: alert.description,
            created_at: alert.created_at,
            updated_at: alert.updated_at,
            resolved_at: alert.resolved_at,
        }
    }
}

/// SurrealDB implementation of the Alert repository.
#[derive(Clone)]
pub struct SurrealAlertRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAlertRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, tenant_id: Uuid, id: Uuid) -> Result<ComplianceAlert, DbError> {
        let id_str = id.to_string();
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('alert', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await?;

        let rows: Vec<AlertRow> = result.take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("alert", id_str))?
            .try_into_alert()
    }
}

impl<C: Connection> AlertRepository for SurrealAlertRepository<C> {
    async fn list(&self, tenant_id: Uuid) -> YardlineResult<Vec<ComplianceAlert>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM alert \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AlertRow> = result.take(0).map_err(DbError::from)?;
        let mut alerts = rows
            .into_iter()
            .map(AlertRow::try_into_alert)
            .collect::<Result<Vec<_>, DbError>>()?;
        alerts.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then(a.alert_type.cmp(&b.alert_type))
                .then_with(|| a.equipment_name.cmp(&b.equipment_name))
        });
        Ok(alerts)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> YardlineResult<ComplianceAlert> {
        Ok(self.fetch(tenant_id, id).await?)
    }

    async fn snapshot_fingerprint(&self, tenant_id: Uuid) -> YardlineResult<Option<String>> {
        let mut result = self
            .db
            .query("SELECT fingerprint FROM type::record('alert_snapshot', $tenant_id)")
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FingerprintRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().next().map(|r| r.fingerprint))
    }

    async fn replace(
        &self,
        tenant_id: Uuid,
        alerts: Vec<ComplianceAlert>,
        notifications: Vec<CreateNotification>,
        fingerprint: String,
    ) -> YardlineResult<()> {
        if let Some(stray) = alerts.iter().find(|a| a.tenant_id != tenant_id) {
            return Err(YardlineError::validation(format!(
                "alert {} belongs to tenant {}, not {tenant_id}",
                stray.id, stray.tenant_id
            )));
        }
        if let Some(stray) = notifications.iter().find(|n| n.tenant_id != tenant_id) {
            return Err(YardlineError::validation(format!(
                "notification for tenant {} cannot be raised under {tenant_id}",
                stray.tenant_id
            )));
        }

        let count = alerts.len();
        let notified = notifications.len();
        let rows: Vec<NewAlertRow> = alerts.into_iter().map(NewAlertRow::from).collect();
        let notification_rows: Vec<NewNotificationRow> = notifications
            .into_iter()
            .map(NewNotificationRow::from)
            .collect();

        // INSERT rejects an empty batch, so only include it when needed.
        let insert_alerts = if rows.is_empty() {
            ""
        } else {
            "INSERT INTO alert $rows;"
        };
        let insert_notifications = if notification_rows.is_empty() {
            ""
        } else {
            "INSERT INTO notification $notifications;"
        };

        // Acknowledged and resolved rows written since the caller read the
        // alert set win over the caller's copy.
        let query = format!(
            "BEGIN TRANSACTION; \
             LET $sticky = (SELECT id, status, updated_at, resolved_at FROM alert \
                 WHERE tenant_id = $tenant_id AND status != 'Open'); \
             DELETE alert WHERE tenant_id = $tenant_id; \
             {insert_alerts} \
             FOR $kept IN $sticky {{ \
                 UPDATE $kept.id SET status = $kept.status, \
                 updated_at = $kept.updated_at, resolved_at = $kept.resolved_at; \
             }}; \
             {insert_notifications} \
             UPSERT type::record('alert_snapshot', $tenant_id) SET \
             fingerprint = $fingerprint, updated_at = time::now(); \
             COMMIT TRANSACTION;"
        );

        self.db
            .query(query)
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("rows", rows))
            .bind(("notifications", notification_rows))
            .bind(("fingerprint", fingerprint))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        debug!(
            tenant_id = %tenant_id,
            count,
            notified,
            "Alert set replaced"
        );

        Ok(())
    }

    async fn update_status(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateAlertStatus,
    ) -> YardlineResult<ComplianceAlert> {
        self.fetch(tenant_id, id).await?;

        self.db
            .query(
                "UPDATE type::record('alert', $id) SET \
                 status = $status, updated_at = $updated_at, \
                 resolved_at = $resolved_at",
            )
            .bind(("id", id.to_string()))
            .bind(("status", input.status.as_str()))
            .bind(("updated_at", input.updated_at))
            .bind(("resolved_at", input.resolved_at))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(self.fetch(tenant_id, id).await?)
    }
}
