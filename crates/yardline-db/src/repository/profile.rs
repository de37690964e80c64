//! SurrealDB implementation of [`ProfileRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use yardline_core::error::YardlineResult;
use yardline_core::models::profile::{CreateProfile, Profile, UpdateProfile};
use yardline_core::repository::ProfileRepository;

use super::codec::{parse_opt_uuid, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ProfileRow {
    record_id: String,
    tenant_id: Option<String>,
    full_name: String,
    phone: Option<String>,
    job_title: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn try_into_profile(self) -> Result<Profile, DbError> {
        Ok(Profile {
            id: parse_uuid("profile", &self.record_id)?,
            tenant_id: parse_opt_uuid("tenant", self.tenant_id.as_deref())?,
            full_name: self.full_name,
            phone: self.phone,
            job_title: self.job_title,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Profile repository.
#[derive(Clone)]
pub struct SurrealProfileRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProfileRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> Result<Profile, DbError> {
        let id_str = id.to_string();
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM type::record('profile', $id)")
            .bind(("id", id_str.clone()))
            .await?;

        let rows: Vec<ProfileRow> = result.take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("profile", id_str))?
            .try_into_profile()
    }
}

impl<C: Connection> ProfileRepository for SurrealProfileRepository<C> {
    async fn create(&self, input: CreateProfile) -> YardlineResult<Profile> {
        self.db
            .query(
                "CREATE type::record('profile', $id) SET \
                 tenant_id = $tenant_id, full_name = $full_name, \
                 phone = $phone, job_title = $job_title",
            )
            .bind(("id", input.user_id.to_string()))
            .bind(("tenant_id", input.tenant_id.map(|t| t.to_string())))
            .bind(("full_name", input.full_name))
            .bind(("phone", input.phone))
            .bind(("job_title", input.job_title))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(self.fetch(input.user_id).await?)
    }

    async fn get_by_id(&self, id: Uuid) -> YardlineResult<Profile> {
        Ok(self.fetch(id).await?)
    }

    async fn update(&self, id: Uuid, input: UpdateProfile) -> YardlineResult<Profile> {
        let mut sets = Vec::new();
        if input.full_name.is_some() {
            sets.push("full_name = $full_name");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.job_title.is_some() {
            sets.push("job_title = $job_title");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('profile', $id) SET {}", sets.join(", "));
        let mut builder = self.db.query(&query).bind(("id", id.to_string()));

        if let Some(full_name) = input.full_name {
            builder = builder.bind(("full_name", full_name));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(job_title) = input.job_title {
            builder = builder.bind(("job_title", job_title));
        }

        builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(self.fetch(id).await?)
    }
}
