//! Concurrent entity storage with per-record fine-grained locking.
//!
//! [`Registry`] stores records of one entity type in a `HashMap` where
//! each entry is individually protected by a [`tokio::sync::RwLock`].
//! This allows concurrent reads on the same record and concurrent writes
//! on different records; writes to the same record are serialized, which
//! is exactly the discipline the reservation flow relies on for a tour's
//! capacity counters.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::ApiError;

/// Generic store for one entity type.
///
/// Uses a `RwLock<HashMap<...>>` for the outer map and per-entry
/// `Arc<RwLock<T>>` for fine-grained per-record locking.
///
/// # Concurrency
///
/// - Multiple tasks may read the same record concurrently.
/// - Writes to different records are concurrent.
/// - Writes to the same record are serialized.
#[derive(Debug)]
pub struct Registry<I, T> {
    kind: &'static str,
    records: RwLock<HashMap<I, Arc<RwLock<T>>>>,
}

impl<I, T> Registry<I, T>
where
    I: Copy + Eq + Hash + Into<uuid::Uuid>,
{
    /// Creates an empty registry for the given entity kind.
    ///
    /// The kind string is used in `NotFound` error messages.
    #[must_use]
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Conflict`] if a record with the same ID
    /// already exists (should never happen with UUID v4).
    pub async fn insert(&self, id: I, record: T) -> Result<(), ApiError> {
        let mut map = self.records.write().await;
        if map.contains_key(&id) {
            return Err(ApiError::Conflict(format!(
                "{} {} already exists",
                self.kind,
                id.into()
            )));
        }
        map.insert(id, Arc::new(RwLock::new(record)));
        Ok(())
    }

    /// Returns a shared handle to the record behind its per-record lock.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no record with the given ID
    /// exists.
    pub async fn get(&self, id: I) -> Result<Arc<RwLock<T>>, ApiError> {
        let map = self.records.read().await;
        map.get(&id).cloned().ok_or(ApiError::NotFound {
            kind: self.kind,
            id: id.into(),
        })
    }

    /// Returns `true` if a record with the given ID exists.
    pub async fn contains(&self, id: I) -> bool {
        self.records.read().await.contains_key(&id)
    }

    /// Removes a record from the registry, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no record with the given ID
    /// exists, or [`ApiError::Internal`] if the record is still locked
    /// elsewhere.
    pub async fn remove(&self, id: I) -> Result<T, ApiError> {
        let mut map = self.records.write().await;
        let arc = map.remove(&id).ok_or(ApiError::NotFound {
            kind: self.kind,
            id: id.into(),
        })?;
        let record = Arc::try_unwrap(arc)
            .map_err(|_| {
                ApiError::Internal(format!("{} record still referenced elsewhere", self.kind))
            })?
            .into_inner();
        Ok(record)
    }

    /// Projects every record matching the filter into a result list.
    ///
    /// Records are read under their per-record lock one at a time; the
    /// caller sees a consistent view of each record but not a global
    /// snapshot across records.
    pub async fn filter_map<U>(&self, f: impl Fn(&T) -> Option<U>) -> Vec<U> {
        let map = self.records.read().await;
        let mut results = Vec::new();
        for entry_lock in map.values() {
            let entry = entry_lock.read().await;
            if let Some(projected) = f(&entry) {
                results.push(projected);
            }
        }
        results
    }

    /// Returns the first projection produced by `f`, or `None`.
    pub async fn find_map<U>(&self, f: impl Fn(&T) -> Option<U>) -> Option<U> {
        let map = self.records.read().await;
        for entry_lock in map.values() {
            let entry = entry_lock.read().await;
            if let Some(projected) = f(&entry) {
                return Some(projected);
            }
        }
        None
    }

    /// Returns `true` if any record satisfies the predicate.
    pub async fn any(&self, pred: impl Fn(&T) -> bool) -> bool {
        self.find_map(|record| pred(record).then_some(())).await.is_some()
    }

    /// Returns the number of records in the registry.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns `true` if the registry contains no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
