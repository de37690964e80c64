//! SurrealDB implementation of [`NotificationRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use yardline_core::error::YardlineResult;
use yardline_core::models::notification::{CreateNotification, Notification};
use yardline_core::repository::NotificationRepository;

use super::alert::parse_priority;
use super::codec::{parse_opt_uuid, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct NotificationRow {
    record_id: String,
    tenant_id: String,
    title: String,
    message: String,
    priority: String,
    alert_id: Option<String>,
    read: bool,
    created_at: DateTime<Utc>,
}

impl NotificationRow {
    fn try_into_notification(self) -> Result<Notification, DbError> {
        Ok(Notification {
            id: parse_uuid("notification", &self.record_id)?,
            tenant_id: parse_uuid("tenant", &self.tenant_id)?,
            title: self.title,
            message: self.message,
            priority: parse_priority(&self.priority)?,
            alert_id: parse_opt_uuid("alert", self.alert_id.as_deref())?,
            read: self.read,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Notification repository.
#[derive(Clone)]
pub struct SurrealNotificationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealNotificationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, tenant_id: Uuid, id: Uuid) -> Result<Notification, DbError> {
        let id_str = id.to_string();
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('notification', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await?;

        let rows: Vec<NotificationRow> = result.take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("notification", id_str))?
            .try_into_notification()
    }
}

impl<C: Connection> NotificationRepository for SurrealNotificationRepository<C> {
    async fn create(&self, input: CreateNotification) -> YardlineResult<Notification> {
        let id = Uuid::new_v4();

        self.db
            .query(
                "CREATE type::record('notification', $id) SET \
                 tenant_id = $tenant_id, title = $title, \
                 message = $message, priority = $priority, \
                 alert_id = $alert_id, read = false",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("title", input.title))
            .bind(("message", input.message))
            .bind(("priority", input.priority.as_str()))
            .bind(("alert_id", input.alert_id.map(|a| a.to_string())))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(self.fetch(input.tenant_id, id).await?)
    }

    async fn list(&self, tenant_id: Uuid, unread_only: bool) -> YardlineResult<Vec<Notification>> {
        let query = if unread_only {
            "SELECT meta::id(id) AS record_id, * FROM notification \
             WHERE tenant_id = $tenant_id AND read = false \
             ORDER BY created_at DESC"
        } else {
            "SELECT meta::id(id) AS record_id, * FROM notification \
             WHERE tenant_id = $tenant_id \
             ORDER BY created_at DESC"
        };

        let mut result = self
            .db
            .query(query)
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<NotificationRow> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(NotificationRow::try_into_notification)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn mark_read(&self, tenant_id: Uuid, id: Uuid) -> YardlineResult<Notification> {
        self.fetch(tenant_id, id).await?;

        self.db
            .query("UPDATE type::record('notification', $id) SET read = true")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(self.fetch(tenant_id, id).await?)
    }
}
