//! SurrealDB implementation of [`UserRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;
use uuid::Uuid;
use yardline_core::error::YardlineResult;
use yardline_core::models::user::{CreateUser, UpdateUser, User, UserRole};
use yardline_core::repository::{PaginatedResult, Pagination, UserRepository};

use super::codec::{CountRow, parse_opt_uuid, parse_uuid, unknown_variant};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct UserRow {
    record_id: String,
    tenant_id: Option<String>,
    email: String,
    full_name: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_role(s: &str) -> Result<UserRole, DbError> {
    match s {
        "Owner" => Ok(UserRole::Owner),
        "Admin" => Ok(UserRole::Admin),
        "Manager" => Ok(UserRole::Manager),
        "Technician" => Ok(UserRole::Technician),
        "Viewer" => Ok(UserRole::Viewer),
        other => Err(unknown_variant("user role", other)),
    }
}

fn role_to_str(role: UserRole) -> &'static str {
    match role {
        UserRole::Owner => "Owner",
        UserRole::Admin => "Admin",
        UserRole::Manager => "Manager",
        UserRole::Technician => "Technician",
        UserRole::Viewer => "Viewer",
    }
}

impl UserRow {
    fn try_into_user(self) -> Result<User, DbError> {
        Ok(User {
            id: parse_uuid("user", &self.record_id)?,
            tenant_id: parse_opt_uuid("tenant", self.tenant_id.as_deref())?,
            email: self.email,
            full_name: self.full_name,
            role: parse_role(&self.role)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> Result<User, DbError> {
        let id_str = id.to_string();
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await?;

        let rows: Vec<UserRow> = result.take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("user", id_str))?
            .try_into_user()
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> YardlineResult<User> {
        let id = Uuid::new_v4();

        self.db
            .query(
                "CREATE type::record('user', $id) SET \
                 tenant_id = $tenant_id, \
                 email = $email, full_name = $full_name, \
                 role = $role",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", input.tenant_id.map(|t| t.to_string())))
            .bind(("email", input.email.to_lowercase()))
            .bind(("full_name", input.full_name))
            .bind(("role", role_to_str(input.role)))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(self.fetch(id).await?)
    }

    async fn get_by_id(&self, id: Uuid) -> YardlineResult<User> {
        Ok(self.fetch(id).await?)
    }

    async fn get_by_email(&self, email: &str) -> YardlineResult<User> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM user WHERE email = $email")
            .bind(("email", email.to_lowercase()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("user", format!("email={email}")))?;

        Ok(row.try_into_user()?)
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> YardlineResult<User> {
        let mut sets = Vec::new();
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.full_name.is_some() {
            sets.push("full_name = $full_name");
        }
        if input.role.is_some() {
            sets.push("role = $role");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('user', $id) SET {}", sets.join(", "));
        let mut builder = self.db.query(&query).bind(("id", id.to_string()));

        if let Some(email) = input.email {
            builder = builder.bind(("email", email.to_lowercase()));
        }
        if let Some(full_name) = input.full_name {
            builder = builder.bind(("full_name", full_name));
        }
        if let Some(role) = input.role {
            builder = builder.bind(("role", role_to_str(role)));
        }

        builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(self.fetch(id).await?)
    }

    async fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> YardlineResult<PaginatedResult<User>> {
        let tenant_id_str = tenant_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM user \
                 WHERE tenant_id = $tenant_id GROUP ALL",
            )
            .bind(("tenant_id", tenant_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("tenant_id", tenant_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(UserRow::try_into_user)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn migrate_tenant(&self, user_id: Uuid, new_tenant_id: Uuid) -> YardlineResult<User> {
        // Fail with NotFound before opening the transaction.
        let before = self.fetch(user_id).await?;

        self.db
            .query(
                "BEGIN TRANSACTION; \
                 UPDATE type::record('user', $user_id) SET \
                 tenant_id = $tenant_id, updated_at = time::now(); \
                 UPDATE type::record('profile', $user_id) SET \
                 tenant_id = $tenant_id, updated_at = time::now(); \
                 COMMIT TRANSACTION;",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("tenant_id", new_tenant_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        info!(
            user_id = %user_id,
            from = ?before.tenant_id,
            to = %new_tenant_id,
            "User migrated to new tenant"
        );

        Ok(self.fetch(user_id).await?)
    }
}
