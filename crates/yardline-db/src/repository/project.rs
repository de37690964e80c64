//! SurrealDB implementation of [`ProjectRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use yardline_core::error::YardlineResult;
use yardline_core::models::project::{CreateProject, Project, ProjectStatus, UpdateProject};
use yardline_core::repository::{PaginatedResult, Pagination, ProjectRepository};

use super::codec::{CountRow, format_opt_date, parse_opt_date, parse_uuid, unknown_variant};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ProjectRow {
    record_id: String,
    tenant_id: String,
    name: String,
    description: String,
    location: Option<String>,
    status: String,
    start_date: Option<String>,
    end_date: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn status_to_str(s: ProjectStatus) -> &'static str {
    match s {
        ProjectStatus::Planning => "Planning",
        ProjectStatus::Active => "Active",
        ProjectStatus::OnHold => "OnHold",
        ProjectStatus::Completed => "Completed",
    }
}

fn parse_status(s: &str) -> Result<ProjectStatus, DbError> {
    match s {
        "Planning" => Ok(ProjectStatus::Planning),
        "Active" => Ok(ProjectStatus::Active),
        "OnHold" => Ok(ProjectStatus::OnHold),
        "Completed" => Ok(ProjectStatus::Completed),
        other => Err(unknown_variant("project status", other)),
    }
}

impl ProjectRow {
    fn try_into_project(self) -> Result<Project, DbError> {
        Ok(Project {
            id: parse_uuid("project", &self.record_id)?,
            tenant_id: parse_uuid("tenant", &self.tenant_id)?,
            name: self.name,
            description: self.description,
            location: self.location,
            status: parse_status(&self.status)?,
            start_date: parse_opt_date("start_date", self.start_date),
            end_date: parse_opt_date("end_date", self.end_date),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Project repository.
#[derive(Clone)]
pub struct SurrealProjectRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProjectRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, tenant_id: Uuid, id: Uuid) -> Result<Project, DbError> {
        let id_str = id.to_string();
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('project', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await?;

        let rows: Vec<ProjectRow> = result.take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("project", id_str))?
            .try_into_project()
    }
}

impl<C: Connection> ProjectRepository for SurrealProjectRepository<C> {
    async fn create(&self, input: CreateProject) -> YardlineResult<Project> {
        let id = Uuid::new_v4();

        self.db
            .query(
                "CREATE type::record('project', $id) SET \
                 tenant_id = $tenant_id, name = $name, \
                 description = $description, location = $location, \
                 status = $status, start_date = $start_date, \
                 end_date = $end_date",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("location", input.location))
            .bind(("status", status_to_str(input.status)))
            .bind(("start_date", format_opt_date(input.start_date)))
            .bind(("end_date", format_opt_date(input.end_date)))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(self.fetch(input.tenant_id, id).await?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> YardlineResult<Project> {
        Ok(self.fetch(tenant_id, id).await?)
    }

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateProject,
    ) -> YardlineResult<Project> {
        self.fetch(tenant_id, id).await?;

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.location.is_some() {
            sets.push("location = $location");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.start_date.is_some() {
            sets.push("start_date = $start_date");
        }
        if input.end_date.is_some() {
            sets.push("end_date = $end_date");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('project', $id) SET {}", sets.join(", "));
        let mut builder = self.db.query(&query).bind(("id", id.to_string()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(location) = input.location {
            builder = builder.bind(("location", location));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status_to_str(status)));
        }
        if let Some(start_date) = input.start_date {
            builder = builder.bind(("start_date", format_opt_date(start_date)));
        }
        if let Some(end_date) = input.end_date {
            builder = builder.bind(("end_date", format_opt_date(end_date)));
        }

        builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(self.fetch(tenant_id, id).await?)
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> YardlineResult<()> {
        self.db
            .query(
                "DELETE type::record('project', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> YardlineResult<PaginatedResult<Project>> {
        let tenant_id_str = tenant_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM project \
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
                "SELECT meta::id(id) AS record_id, * FROM project \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("tenant_id", tenant_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(ProjectRow::try_into_project)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
