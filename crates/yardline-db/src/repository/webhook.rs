//! SurrealDB implementation of [`VendorWebhookRepository`].
//!
//! Only the SHA-256 of the signing secret is stored. The raw secret is
//! handed back once, on creation or rotation.

use chrono::{DateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use url::Url;
use uuid::Uuid;
use yardline_core::error::{YardlineError, YardlineResult};
use yardline_core::models::webhook::{CreateVendorWebhook, UpdateVendorWebhook, VendorWebhook};
use yardline_core::repository::VendorWebhookRepository;

use super::codec::parse_uuid;
use crate::error::DbError;

/// Generate a random signing secret (`whsec_` + 64 hex chars).
fn generate_secret() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    format!("whsec_{}", hex::encode(bytes))
}

/// Hash a webhook signing secret using SHA-256.
pub fn hash_webhook_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Webhooks must be https; plain http is only accepted for `localhost`.
fn validate_url(url: &str) -> YardlineResult<()> {
    let parsed = Url::parse(url)
        .map_err(|e| YardlineError::validation(format!("invalid webhook url {url}: {e}")))?;

    let host = parsed.host_str().unwrap_or_default();
    if host.is_empty() {
        return Err(YardlineError::validation(format!(
            "webhook url has no host: {url}"
        )));
    }

    match parsed.scheme() {
        "https" => Ok(()),
        "http" if host == "localhost" => Ok(()),
        _ => Err(YardlineError::validation(format!(
            "webhook url must use https: {url}"
        ))),
    }
}

#[derive(Debug, SurrealValue)]
struct WebhookRow {
    record_id: String,
    tenant_id: String,
    vendor_name: String,
    url: String,
    events: Vec<String>,
    secret_hash: String,
    enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WebhookRow {
    fn try_into_webhook(self) -> Result<VendorWebhook, DbError> {
        Ok(VendorWebhook {
            id: parse_uuid("vendor_webhook", &self.record_id)?,
            tenant_id: parse_uuid("tenant", &self.tenant_id)?,
            vendor_name: self.vendor_name,
            url: self.url,
            events: self.events,
            secret_hash: self.secret_hash,
            enabled: self.enabled,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the vendor webhook repository.
#[derive(Clone)]
pub struct SurrealVendorWebhookRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealVendorWebhookRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, tenant_id: Uuid, id: Uuid) -> Result<VendorWebhook, DbError> {
        let id_str = id.to_string();
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('vendor_webhook', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await?;

        let rows: Vec<WebhookRow> = result.take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("vendor_webhook", id_str))?
            .try_into_webhook()
    }
}

impl<C: Connection> VendorWebhookRepository for SurrealVendorWebhookRepository<C> {
    async fn create(&self, input: CreateVendorWebhook) -> YardlineResult<(VendorWebhook, String)> {
        validate_url(&input.url)?;
        if input.events.is_empty() {
            return Err(YardlineError::validation(
                "webhook must subscribe to at least one event",
            ));
        }

        let id = Uuid::new_v4();
        let raw_secret = generate_secret();

        self.db
            .query(
                "CREATE type::record('vendor_webhook', $id) SET \
                 tenant_id = $tenant_id, vendor_name = $vendor_name, \
                 url = $url, events = $events, \
                 secret_hash = $secret_hash, enabled = true",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("vendor_name", input.vendor_name))
            .bind(("url", input.url))
            .bind(("events", input.events))
            .bind(("secret_hash", hash_webhook_secret(&raw_secret)))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let webhook = self.fetch(input.tenant_id, id).await?;
        Ok((webhook, raw_secret))
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> YardlineResult<VendorWebhook> {
        Ok(self.fetch(tenant_id, id).await?)
    }

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateVendorWebhook,
    ) -> YardlineResult<VendorWebhook> {
        self.fetch(tenant_id, id).await?;
        if let Some(url) = &input.url {
            validate_url(url)?;
        }

        let mut sets = Vec::new();
        if input.vendor_name.is_some() {
            sets.push("vendor_name = $vendor_name");
        }
        if input.url.is_some() {
            sets.push("url = $url");
        }
        if input.events.is_some() {
            sets.push("events = $events");
        }
        if input.enabled.is_some() {
            sets.push("enabled = $enabled");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('vendor_webhook', $id) SET {}",
            sets.join(", ")
        );
        let mut builder = self.db.query(&query).bind(("id", id.to_string()));

        if let Some(vendor_name) = input.vendor_name {
            builder = builder.bind(("vendor_name", vendor_name));
        }
        if let Some(url) = input.url {
            builder = builder.bind(("url", url));
        }
        if let Some(events) = input.events {
            builder = builder.bind(("events", events));
        }
        if let Some(enabled) = input.enabled {
            builder = builder.bind(("enabled", enabled));
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
                "DELETE type::record('vendor_webhook', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, tenant_id: Uuid) -> YardlineResult<Vec<VendorWebhook>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM vendor_webhook \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WebhookRow> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(WebhookRow::try_into_webhook)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn list_for_event(
        &self,
        tenant_id: Uuid,
        event: &str,
    ) -> YardlineResult<Vec<VendorWebhook>> {
        let all = self.list(tenant_id).await?;
        Ok(all.into_iter().filter(|w| w.subscribes_to(event)).collect())
    }

    async fn rotate_secret(&self, tenant_id: Uuid, id: Uuid) -> YardlineResult<String> {
        self.fetch(tenant_id, id).await?;
        let raw_secret = generate_secret();

        self.db
            .query(
                "UPDATE type::record('vendor_webhook', $id) SET \
                 secret_hash = $secret_hash, updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .bind(("secret_hash", hash_webhook_secret(&raw_secret)))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(raw_secret)
    }
}
