//! Profile domain model.
//!
//! A profile carries the display details of a user. It shares the
//! user's id and mirrors the user's tenant assignment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Same as the owning user's id.
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub full_name: String,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfile {
    pub user_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub full_name: String,
    pub phone: Option<String>,
    pub job_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::nullable::deserialize")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::nullable::deserialize")]
    pub job_title: Option<Option<String>>,
}
