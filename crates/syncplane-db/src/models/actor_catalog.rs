//! Discovered catalogs.
//!
//! Catalogs are stored once per distinct content (keyed by hash). Each
//! discovery run records a fetch event linking the actor to the catalog it
//! produced, so the most recent catalog of an actor is the one behind its
//! latest fetch event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Hex-encoded SHA-256 of a catalog's JSON text.
///
/// `serde_json` keeps object keys sorted, so equal catalogs hash equally
/// regardless of the key order they were received in.
#[must_use]
pub fn catalog_hash(catalog: &serde_json::Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(catalog.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// A stored catalog.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ActorCatalog {
    pub id: Uuid,
    pub catalog: serde_json::Value,
    pub catalog_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A catalog together with the time it was last fetched for an actor.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ActorCatalogWithUpdatedAt {
    pub id: Uuid,
    pub catalog: serde_json::Value,
    pub catalog_hash: String,
    pub updated_at: DateTime<Utc>,
}

impl ActorCatalog {
    /// Store a discovered catalog for an actor and record the fetch event.
    ///
    /// An identical catalog already on file is reused. Returns the catalog ID.
    pub async fn write_for_actor(
        pool: &PgPool,
        actor_id: Uuid,
        catalog: &serde_json::Value,
        config_hash: &str,
        actor_version: &str,
    ) -> Result<Uuid, sqlx::Error> {
        let hash = catalog_hash(catalog);
        let mut tx = pool.begin().await?;

        let catalog_id: Uuid = sqlx::query_scalar(
            r"
            INSERT INTO actor_catalog (id, catalog, catalog_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (catalog_hash) DO UPDATE SET catalog_hash = EXCLUDED.catalog_hash
            RETURNING id
            ",
        )
        .bind(Uuid::new_v4())
        .bind(catalog)
        .bind(&hash)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO actor_catalog_fetch_event (
                id, actor_id, actor_catalog_id, config_hash, actor_version
            )
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(Uuid::new_v4())
        .bind(actor_id)
        .bind(catalog_id)
        .bind(config_hash)
        .bind(actor_version)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(catalog_id)
    }

    /// The catalog behind an actor's latest fetch event, if any.
    pub async fn most_recent_for_actor(
        pool: &PgPool,
        actor_id: Uuid,
    ) -> Result<Option<ActorCatalogWithUpdatedAt>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT c.id, c.catalog, c.catalog_hash, e.created_at AS updated_at
            FROM actor_catalog_fetch_event e
            JOIN actor_catalog c ON c.id = e.actor_catalog_id
            WHERE e.actor_id = $1
            ORDER BY e.created_at DESC
            LIMIT 1
            ",
        )
        .bind(actor_id)
        .fetch_optional(pool)
        .await
    }
}
