//! In-app notification model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::alert::AlertPriority;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub message: String,
    pub priority: AlertPriority,
    /// The alert that triggered this notification, if any.
    pub alert_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    pub tenant_id: Uuid,
    pub title: String,
    pub message: String,
    pub priority: AlertPriority,
    pub alert_id: Option<Uuid>,
}
