//! PostgreSQL implementation of the persistence layer.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::EntitySnapshot;
use crate::error::ApiError;

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends an event to the event log.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError::PersistenceError`] on database failure.
    pub async fn save_event(
        &self,
        entity_id: Uuid,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<i64, ApiError> {
        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO events (entity_id, event_type, payload) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(entity_id)
        .bind(event_type)
        .bind(payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::PersistenceError(e.to_string()))?;

        Ok(row)
    }

    /// Saves an entity state snapshot.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError::PersistenceError`] on database failure.
    pub async fn save_snapshot(
        &self,
        entity_id: Uuid,
        entity_kind: &str,
        state_json: &serde_json::Value,
    ) -> Result<i64, ApiError> {
        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO entity_snapshots (entity_id, entity_kind, state_json) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(entity_id)
        .bind(entity_kind)
        .bind(state_json)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::PersistenceError(e.to_string()))?;

        Ok(row)
    }

    /// Loads the latest snapshot for each entity using `DISTINCT ON`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError::PersistenceError`] on database failure.
    pub async fn load_latest_snapshots(&self) -> Result<Vec<EntitySnapshot>, ApiError> {
        let rows = sqlx::query_as::<_, (i64, Uuid, String, serde_json::Value, DateTime<Utc>)>(
            "SELECT DISTINCT ON (entity_id) id, entity_id, entity_kind, state_json, snapshot_at \
             FROM entity_snapshots ORDER BY entity_id, snapshot_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ApiError::PersistenceError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(
                |(id, entity_id, entity_kind, state_json, snapshot_at)| EntitySnapshot {
                    id,
                    entity_id,
                    entity_kind,
                    state_json,
                    snapshot_at,
                },
            )
            .collect())
    }

    /// Deletes snapshots older than the given number of days.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError::PersistenceError`] on database failure.
    pub async fn delete_old_snapshots(&self, before_days: u64) -> Result<u64, ApiError> {
        let cutoff =
            Utc::now() - chrono::Duration::days(i64::try_from(before_days).unwrap_or(i64::MAX));

        let result = sqlx::query("DELETE FROM entity_snapshots WHERE snapshot_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::PersistenceError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
