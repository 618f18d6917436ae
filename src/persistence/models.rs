//! Database models for entity snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An entity snapshot row from the `entity_snapshots` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Auto-increment row ID.
    pub id: i64,
    /// Entity that was snapshotted.
    pub entity_id: Uuid,
    /// Entity kind string (e.g. `"tour"`, `"booking"`).
    pub entity_kind: String,
    /// Full entity state as JSONB.
    pub state_json: serde_json::Value,
    /// Snapshot timestamp.
    pub snapshot_at: DateTime<Utc>,
}
