//! SurrealDB implementation of [`EquipmentRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use yardline_core::error::YardlineResult;
use yardline_core::models::equipment::{
    ComplianceStatus, CreateEquipment, Equipment, EquipmentStatus, UpdateEquipment,
};
use yardline_core::repository::{EquipmentRepository, PaginatedResult, Pagination};

use super::codec::{
    CountRow, format_opt_date, parse_opt_date, parse_opt_uuid, parse_uuid, unknown_variant,
};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct EquipmentRow {
    record_id: String,
    tenant_id: String,
    project_id: Option<String>,
    name: String,
    category: String,
    serial_number: Option<String>,
    status: String,
    last_maintenance: Option<String>,
    next_maintenance: Option<String>,
    certification_required: bool,
    certification_expiry: Option<String>,
    last_inspection: Option<String>,
    next_inspection: Option<String>,
    compliance_status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn status_to_str(s: EquipmentStatus) -> &'static str {
    match s {
        EquipmentStatus::Available => "Available",
        EquipmentStatus::InUse => "InUse",
        EquipmentStatus::Maintenance => "Maintenance",
        EquipmentStatus::Retired => "Retired",
    }
}

fn parse_status(s: &str) -> Result<EquipmentStatus, DbError> {
    match s {
        "Available" => Ok(EquipmentStatus::Available),
        "InUse" => Ok(EquipmentStatus::InUse),
        "Maintenance" => Ok(EquipmentStatus::Maintenance),
        "Retired" => Ok(EquipmentStatus::Retired),
        other => Err(unknown_variant("equipment status", other)),
    }
}

fn compliance_to_str(s: ComplianceStatus) -> &'static str {
    match s {
        ComplianceStatus::Compliant => "Compliant",
        ComplianceStatus::DueSoon => "DueSoon",
        ComplianceStatus::NonCompliant => "NonCompliant",
        ComplianceStatus::Unknown => "Unknown",
    }
}

fn parse_compliance(s: &str) -> Result<ComplianceStatus, DbError> {
    match s {
        "Compliant" => Ok(ComplianceStatus::Compliant),
        "DueSoon" => Ok(ComplianceStatus::DueSoon),
        "NonCompliant" => Ok(ComplianceStatus::NonCompliant),
        "Unknown" => Ok(ComplianceStatus::Unknown),
        other => Err(unknown_variant("compliance status", other)),
    }
}

impl EquipmentRow {
    fn try_into_equipment(self) -> Result<Equipment, DbError> {
        Ok(Equipment {
            id: parse_uuid("equipment", &self.record_id)?,
            tenant_id: parse_uuid("tenant", &self.tenant_id)?,
            project_id: parse_opt_uuid("project", self.project_id.as_deref())?,
            name: self.name,
            category: self.category,
            serial_number: self.serial_number,
            status: parse_status(&self.status)?,
            last_maintenance: parse_opt_date("last_maintenance", self.last_maintenance),
            next_maintenance: parse_opt_date("next_maintenance", self.next_maintenance),
            certification_required: self.certification_required,
            certification_expiry: parse_opt_date(
                "certification_expiry",
                self.certification_expiry,
            ),
            last_inspection: parse_opt_date("last_inspection", self.last_inspection),
            next_inspection: parse_opt_date("next_inspection", self.next_inspection),
            compliance_status: parse_compliance(&self.compliance_status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn collect_equipment(rows: Vec<EquipmentRow>) -> Result<Vec<Equipment>, DbError> {
    rows.into_iter()
        .map(EquipmentRow::try_into_equipment)
        .collect()
}

/// SurrealDB implementation of the Equipment repository.
#[derive(Clone)]
pub struct SurrealEquipmentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealEquipmentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, tenant_id: Uuid, id: Uuid) -> Result<Equipment, DbError> {
        let id_str = id.to_string();
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('equipment', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await?;

        let rows: Vec<EquipmentRow> = result.take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("equipment", id_str))?
            .try_into_equipment()
    }
}

impl<C: Connection> EquipmentRepository for SurrealEquipmentRepository<C> {
    async fn create(&self, input: CreateEquipment) -> YardlineResult<Equipment> {
        let id = Uuid::new_v4();

        self.db
            .query(
                "CREATE type::record('equipment', $id) SET \
                 tenant_id = $tenant_id, project_id = $project_id, \
                 name = $name, category = $category, \
                 serial_number = $serial_number, status = $status, \
                 last_maintenance = $last_maintenance, \
                 next_maintenance = $next_maintenance, \
                 certification_required = $certification_required, \
                 certification_expiry = $certification_expiry, \
                 last_inspection = $last_inspection, \
                 next_inspection = $next_inspection, \
                 compliance_status = $compliance_status",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("project_id", input.project_id.map(|p| p.to_string())))
            .bind(("name", input.name))
            .bind(("category", input.category))
            .bind(("serial_number", input.serial_number))
            .bind(("status", status_to_str(input.status)))
            .bind(("last_maintenance", format_opt_date(input.last_maintenance)))
            .bind(("next_maintenance", format_opt_date(input.next_maintenance)))
            .bind(("certification_required", input.certification_required))
            .bind((
                "certification_expiry",
                format_opt_date(input.certification_expiry),
            ))
            .bind(("last_inspection", format_opt_date(input.last_inspection)))
            .bind(("next_inspection", format_opt_date(input.next_inspection)))
            .bind((
                "compliance_status",
                compliance_to_str(input.compliance_status),
            ))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(self.fetch(input.tenant_id, id).await?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> YardlineResult<Equipment> {
        Ok(self.fetch(tenant_id, id).await?)
    }

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateEquipment,
    ) -> YardlineResult<Equipment> {
        // Scope check before writing.
        self.fetch(tenant_id, id).await?;

        let mut sets = Vec::new();
        let mut strings: Vec<(&'static str, Option<String>)> = Vec::new();

        if let Some(project_id) = input.project_id {
            sets.push("project_id = $project_id");
            strings.push(("project_id", project_id.map(|p| p.to_string())));
        }
        if let Some(name) = input.name {
            sets.push("name = $name");
            strings.push(("name", Some(name)));
        }
        if let Some(category) = input.category {
            sets.push("category = $category");
            strings.push(("category", Some(category)));
        }
        if let Some(serial_number) = input.serial_number {
            sets.push("serial_number = $serial_number");
            strings.push(("serial_number", serial_number));
        }
        if let Some(status) = input.status {
            sets.push("status = $status");
            strings.push(("status", Some(status_to_str(status).into())));
        }
        if let Some(compliance) = input.compliance_status {
            sets.push("compliance_status = $compliance_status");
            strings.push((
                "compliance_status",
                Some(compliance_to_str(compliance).into()),
            ));
        }
        let dates = [
            ("last_maintenance", input.last_maintenance),
            ("next_maintenance", input.next_maintenance),
            ("certification_expiry", input.certification_expiry),
            ("last_inspection", input.last_inspection),
            ("next_inspection", input.next_inspection),
        ];
        let mut date_sets = Vec::new();
        for (field, value) in dates {
            if let Some(date) = value {
                date_sets.push(format!("{field} = ${field}"));
                strings.push((field, format_opt_date(date)));
            }
        }
        if input.certification_required.is_some() {
            sets.push("certification_required = $certification_required");
        }
        sets.push("updated_at = time::now()");

        let assignments: Vec<&str> = sets
            .iter()
            .copied()
            .chain(date_sets.iter().map(String::as_str))
            .collect();
        let query = format!(
            "UPDATE type::record('equipment', $id) SET {}",
            assignments.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id.to_string()));
        for (name, value) in strings {
            builder = builder.bind((name, value));
        }
        if let Some(required) = input.certification_required {
            builder = builder.bind(("certification_required", required));
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
                "DELETE type::record('equipment', $id) \
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
    ) -> YardlineResult<PaginatedResult<Equipment>> {
        let tenant_id_str = tenant_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM equipment \
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
                "SELECT meta::id(id) AS record_id, * FROM equipment \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY name ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("tenant_id", tenant_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EquipmentRow> = result.take(0).map_err(DbError::from)?;

        Ok(PaginatedResult {
            items: collect_equipment(rows)?,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn snapshot(&self, tenant_id: Uuid) -> YardlineResult<Vec<Equipment>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM equipment \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EquipmentRow> = result.take(0).map_err(DbError::from)?;
        let mut items = collect_equipment(rows)?;
        items.sort_by_key(|e| e.id);
        Ok(items)
    }
}
