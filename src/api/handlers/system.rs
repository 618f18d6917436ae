//! System endpoints: health check, role catalog.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Supported account role info.
#[derive(Debug, Serialize, ToSchema)]
struct RoleInfo {
    role: &'static str,
    description: &'static str,
    can_sell: bool,
}

/// `GET /config/roles` — List supported account roles.
#[utoipa::path(
    get,
    path = "/config/roles",
    tag = "System",
    summary = "List supported account roles",
    description = "Returns metadata for every account role a user can register with.",
    responses(
        (status = 200, description = "Role catalog", body = Vec<RoleInfo>),
    )
)]
pub async fn roles_handler() -> impl IntoResponse {
    let roles = vec![
        RoleInfo {
            role: "tourist",
            description: "Books tours and posts reviews",
            can_sell: false,
        },
        RoleInfo {
            role: "travel_agency",
            description: "Lists tours and manages their bookings",
            can_sell: true,
        },
        RoleInfo {
            role: "lodge_owner",
            description: "Lists lodges inside parks",
            can_sell: true,
        },
        RoleInfo {
            role: "restaurant_owner",
            description: "Lists restaurants near parks",
            can_sell: true,
        },
        RoleInfo {
            role: "travel_gear_seller",
            description: "Sells safari and travel gear",
            can_sell: true,
        },
        RoleInfo {
            role: "photographer",
            description: "Offers safari photography services",
            can_sell: true,
        },
        RoleInfo {
            role: "tour_guide",
            description: "Guides tours independently or for agencies",
            can_sell: false,
        },
    ];
    (StatusCode::OK, Json(roles))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/roles", get(roles_handler))
}
