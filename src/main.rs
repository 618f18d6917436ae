//! savanna-backend server entry point.
//!
//! Starts the Axum HTTP server and, when enabled, the persistence
//! background tasks (event log subscriber, periodic snapshots).

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::broadcast::error::RecvError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use savanna_backend::api;
use savanna_backend::app_state::AppState;
use savanna_backend::config::BackendConfig;
use savanna_backend::domain::{Booking, EntityStore, EventBus, Tour};
use savanna_backend::error::ApiError;
use savanna_backend::persistence::postgres::PostgresPersistence;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = BackendConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting savanna-backend");

    // Build domain and service layers
    let event_bus = EventBus::new(config.event_bus_capacity);
    let app_state = AppState::new(event_bus.clone());

    // Wire persistence background tasks
    if config.persistence_enabled {
        match connect_database(&config).await {
            Ok(persistence) => {
                if let Err(e) = restore_store(&app_state.store, &persistence).await {
                    tracing::warn!(error = %e, "snapshot restore failed, starting empty");
                }
                if config.event_log_enabled {
                    tokio::spawn(run_event_log(event_bus.clone(), persistence.clone()));
                }
                tokio::spawn(run_snapshots(
                    Arc::clone(&app_state.store),
                    persistence,
                    config.snapshot_interval_secs,
                    config.cleanup_after_days,
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "database unavailable, persistence disabled");
            }
        }
    }

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Connects to PostgreSQL using the configured pool settings.
async fn connect_database(config: &BackendConfig) -> Result<PostgresPersistence, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;
    Ok(PostgresPersistence::new(pool))
}

/// Repopulates the in-memory store from the latest persisted snapshots.
async fn restore_store(
    store: &EntityStore,
    persistence: &PostgresPersistence,
) -> Result<(), ApiError> {
    let snapshots = persistence.load_latest_snapshots().await?;
    let mut tours = 0u64;
    let mut bookings = 0u64;
    for snapshot in snapshots {
        match snapshot.entity_kind.as_str() {
            "tour" => match serde_json::from_value::<Tour>(snapshot.state_json) {
                Ok(tour) => {
                    if store.tours.insert(tour.id, tour).await.is_ok() {
                        tours += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(entity_id = %snapshot.entity_id, error = %e, "skipping unreadable tour snapshot");
                }
            },
            "booking" => match serde_json::from_value::<Booking>(snapshot.state_json) {
                Ok(booking) => {
                    if store.bookings.insert(booking.id, booking).await.is_ok() {
                        bookings += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(entity_id = %snapshot.entity_id, error = %e, "skipping unreadable booking snapshot");
                }
            },
            other => {
                tracing::warn!(entity_kind = other, "skipping unknown snapshot kind");
            }
        }
    }
    if tours > 0 || bookings > 0 {
        tracing::info!(tours, bookings, "restored entities from snapshots");
    }
    Ok(())
}

/// Consumes the event bus and appends every domain event to the event
/// log. Runs until the bus is closed.
async fn run_event_log(event_bus: EventBus, persistence: PostgresPersistence) {
    let mut rx = event_bus.subscribe();
    loop {
        match rx.recv().await {
            Ok(event) => {
                let payload = match serde_json::to_value(&event) {
                    Ok(v) => v,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to serialize event");
                        continue;
                    }
                };
                if let Err(e) = persistence
                    .save_event(event.entity_id(), event.event_type_str(), &payload)
                    .await
                {
                    tracing::error!(error = %e, "failed to persist event");
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event log subscriber lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Snapshots tours and bookings on a fixed interval and prunes old
/// snapshots.
async fn run_snapshots(
    store: Arc<EntityStore>,
    persistence: PostgresPersistence,
    interval_secs: u64,
    cleanup_after_days: u64,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    loop {
        interval.tick().await;

        let tours = store
            .tours
            .filter_map(|t| Some((uuid::Uuid::from(t.id), serde_json::to_value(t).ok()?)))
            .await;
        let bookings = store
            .bookings
            .filter_map(|b| Some((uuid::Uuid::from(b.id), serde_json::to_value(b).ok()?)))
            .await;

        for (id, state) in &tours {
            if let Err(e) = persistence.save_snapshot(*id, "tour", state).await {
                tracing::error!(error = %e, "failed to snapshot tour");
            }
        }
        for (id, state) in &bookings {
            if let Err(e) = persistence.save_snapshot(*id, "booking", state).await {
                tracing::error!(error = %e, "failed to snapshot booking");
            }
        }

        if cleanup_after_days > 0 {
            match persistence.delete_old_snapshots(cleanup_after_days).await {
                Ok(deleted) if deleted > 0 => {
                    tracing::info!(deleted, "pruned old snapshots");
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "failed to prune snapshots"),
            }
        }
    }
}
