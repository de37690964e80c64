//! SurrealDB implementation of [`TenantRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;
use uuid::Uuid;
use yardline_core::error::YardlineResult;
use yardline_core::models::tenant::{
    CreateTenant, ProvisionTenant, SubscriptionStatus, SubscriptionTier, Tenant, UpdateTenant,
};
use yardline_core::repository::{PaginatedResult, Pagination, TenantRepository};

use super::codec::{CountRow, parse_uuid, unknown_variant};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct TenantRow {
    record_id: String,
    name: String,
    slug: String,
    subscription_tier: String,
    subscription_status: String,
    trial_ends_at: Option<DateTime<Utc>>,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub(crate) fn tier_to_str(tier: SubscriptionTier) -> &'static str {
    match tier {
        SubscriptionTier::Starter => "Starter",
        SubscriptionTier::Professional => "Professional",
        SubscriptionTier::Enterprise => "Enterprise",
    }
}

fn parse_tier(s: &str) -> Result<SubscriptionTier, DbError> {
    match s {
        "Starter" => Ok(SubscriptionTier::Starter),
        "Professional" => Ok(SubscriptionTier::Professional),
        "Enterprise" => Ok(SubscriptionTier::Enterprise),
        other => Err(unknown_variant("subscription tier", other)),
    }
}

pub(crate) fn status_to_str(status: SubscriptionStatus) -> &'static str {
    match status {
        SubscriptionStatus::Trialing => "Trialing",
        SubscriptionStatus::Active => "Active",
        SubscriptionStatus::PastDue => "PastDue",
        SubscriptionStatus::Cancelled => "Cancelled",
        SubscriptionStatus::Expired => "Expired",
    }
}

fn parse_status(s: &str) -> Result<SubscriptionStatus, DbError> {
    match s {
        "Trialing" => Ok(SubscriptionStatus::Trialing),
        "Active" => Ok(SubscriptionStatus::Active),
        "PastDue" => Ok(SubscriptionStatus::PastDue),
        "Cancelled" => Ok(SubscriptionStatus::Cancelled),
        "Expired" => Ok(SubscriptionStatus::Expired),
        other => Err(unknown_variant("subscription status", other)),
    }
}

impl TenantRow {
    fn try_into_tenant(self) -> Result<Tenant, DbError> {
        Ok(Tenant {
            id: parse_uuid("tenant", &self.record_id)?,
            name: self.name,
            slug: self.slug,
            subscription_tier: parse_tier(&self.subscription_tier)?,
            subscription_status: parse_status(&self.subscription_status)?,
            trial_ends_at: self.trial_ends_at,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_TENANT: &str = "SELECT meta::id(id) AS record_id, * FROM tenant";

/// SurrealDB implementation of the Tenant repository.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> Result<Tenant, DbError> {
        let id_str = id.to_string();
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM type::record('tenant', $id)")
            .bind(("id", id_str.clone()))
            .await?;

        let rows: Vec<TenantRow> = result.take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("tenant", id_str))?
            .try_into_tenant()
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn create(&self, input: CreateTenant) -> YardlineResult<Tenant> {
        let id = Uuid::new_v4();
        let metadata = input
            .metadata
            .unwrap_or(serde_json::Value::Object(Default::default()));

        self.db
            .query(
                "CREATE type::record('tenant', $id) SET \
                 name = $name, slug = $slug, \
                 subscription_tier = $tier, \
                 subscription_status = $status, \
                 trial_ends_at = $trial_ends_at, \
                 metadata = $metadata",
            )
            .bind(("id", id.to_string()))
            .bind(("name", input.name))
            .bind(("slug", input.slug))
            .bind(("tier", tier_to_str(input.subscription_tier)))
            .bind(("status", status_to_str(input.subscription_status)))
            .bind(("trial_ends_at", input.trial_ends_at))
            .bind(("metadata", metadata))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(self.fetch(id).await?)
    }

    async fn get_by_id(&self, id: Uuid) -> YardlineResult<Tenant> {
        Ok(self.fetch(id).await?)
    }

    async fn get_by_slug(&self, slug: &str) -> YardlineResult<Tenant> {
        let mut result = self
            .db
            .query(format!("{SELECT_TENANT} WHERE slug = $slug"))
            .bind(("slug", slug.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("tenant", format!("slug={slug}")))?;

        Ok(row.try_into_tenant()?)
    }

    async fn update(&self, id: Uuid, input: UpdateTenant) -> YardlineResult<Tenant> {
        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.subscription_tier.is_some() {
            sets.push("subscription_tier = $tier");
        }
        if input.subscription_status.is_some() {
            sets.push("subscription_status = $status");
        }
        if input.trial_ends_at.is_some() {
            sets.push("trial_ends_at = $trial_ends_at");
        }
        if input.metadata.is_some() {
            sets.push("metadata = $metadata");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('tenant', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id.to_string()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(tier) = input.subscription_tier {
            builder = builder.bind(("tier", tier_to_str(tier)));
        }
        if let Some(status) = input.subscription_status {
            builder = builder.bind(("status", status_to_str(status)));
        }
        if let Some(trial_ends_at) = input.trial_ends_at {
            builder = builder.bind(("trial_ends_at", trial_ends_at));
        }
        if let Some(metadata) = input.metadata {
            builder = builder.bind(("metadata", metadata));
        }

        builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(self.fetch(id).await?)
    }

    async fn delete(&self, id: Uuid) -> YardlineResult<()> {
        self.db
            .query("DELETE type::record('tenant', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> YardlineResult<PaginatedResult<Tenant>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM tenant GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(format!(
                "{SELECT_TENANT} ORDER BY created_at ASC LIMIT $limit START $offset"
            ))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(TenantRow::try_into_tenant)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn provision(&self, input: ProvisionTenant) -> YardlineResult<Tenant> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let tenant = input.tenant;
        let metadata = tenant
            .metadata
            .unwrap_or(serde_json::Value::Object(Default::default()));

        // The owner's user and profile rows move with the new tenant, so
        // all three writes share one transaction.
        self.db
            .query(
                "BEGIN TRANSACTION; \
                 CREATE type::record('tenant', $id) SET \
                 name = $name, slug = $slug, \
                 subscription_tier = $tier, \
                 subscription_status = $status, \
                 trial_ends_at = $trial_ends_at, \
                 metadata = $metadata; \
                 UPDATE type::record('user', $owner_id) SET \
                 tenant_id = $id, role = 'Owner', updated_at = time::now(); \
                 UPDATE type::record('profile', $owner_id) SET \
                 tenant_id = $id, updated_at = time::now(); \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id_str))
            .bind(("owner_id", input.owner_user_id.to_string()))
            .bind(("name", tenant.name))
            .bind(("slug", tenant.slug))
            .bind(("tier", tier_to_str(tenant.subscription_tier)))
            .bind(("status", status_to_str(tenant.subscription_status)))
            .bind(("trial_ends_at", tenant.trial_ends_at))
            .bind(("metadata", metadata))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        info!(tenant_id = %id, owner_id = %input.owner_user_id, "Tenant provisioned");

        Ok(self.fetch(id).await?)
    }
}
