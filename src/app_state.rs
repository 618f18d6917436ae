//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::{EntityStore, EventBus};
use crate::service::{CatalogService, ReservationService, ReviewService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Booking lifecycle service.
    pub reservations: Arc<ReservationService>,
    /// Review and rating service.
    pub reviews: Arc<ReviewService>,
    /// Catalog CRUD service.
    pub catalog: Arc<CatalogService>,
    /// In-memory entity registries shared by all services.
    pub store: Arc<EntityStore>,
    /// Event bus for persistence subscribers.
    pub event_bus: EventBus,
}

impl AppState {
    /// Builds the full service stack over a fresh store.
    #[must_use]
    pub fn new(event_bus: EventBus) -> Self {
        let store = Arc::new(EntityStore::new());
        Self {
            reservations: Arc::new(ReservationService::new(
                Arc::clone(&store),
                event_bus.clone(),
            )),
            reviews: Arc::new(ReviewService::new(Arc::clone(&store), event_bus.clone())),
            catalog: Arc::new(CatalogService::new(Arc::clone(&store), event_bus.clone())),
            store,
            event_bus,
        }
    }
}
