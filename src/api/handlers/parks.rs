//! Park catalog handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::AuthenticatedUser;
use crate::api::dto::{CreateParkRequest, ParkResponse, UpdateParkRequest};
use crate::app_state::AppState;
use crate::domain::ParkId;
use crate::error::ApiError;
use crate::service::{NewPark, ParkUpdate};

/// `POST /parks` — Add a park to the catalog.
///
/// # Errors
///
/// Returns [`ApiError::InvalidInput`] on violated field bounds.
pub async fn create_park(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(req): Json<CreateParkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let park = state
        .catalog
        .create_park(NewPark {
            name: req.name,
            description: req.description,
            location: req.location,
            coordinates: req.coordinates,
            area_km2: req.area_km2,
            established_year: req.established_year,
            entry_fee_usd: req.entry_fee_usd,
            wildlife: req.wildlife,
            best_time_to_visit: req.best_time_to_visit,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ParkResponse::from(park))))
}

/// `GET /parks` — List all active parks.
pub async fn list_parks(State(state): State<AppState>) -> impl IntoResponse {
    let parks: Vec<ParkResponse> = state
        .catalog
        .list_parks()
        .await
        .into_iter()
        .map(ParkResponse::from)
        .collect();
    Json(parks)
}

/// `GET /parks/:id` — Get park details.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown id.
pub async fn get_park(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let park = state.catalog.get_park(ParkId::from_uuid(id)).await?;
    Ok(Json(ParkResponse::from(park)))
}

/// `PUT /parks/:id` — Update park reference data.
///
/// # Errors
///
/// Returns [`ApiError::InvalidInput`] on violated field bounds.
pub async fn update_park(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateParkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let park = state
        .catalog
        .update_park(
            ParkId::from_uuid(id),
            ParkUpdate {
                description: req.description,
                entry_fee_usd: req.entry_fee_usd,
                wildlife: req.wildlife,
                best_time_to_visit: req.best_time_to_visit,
            },
        )
        .await?;
    Ok(Json(ParkResponse::from(park)))
}

/// Park routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/parks", post(create_park).get(list_parks))
        .route("/parks/{id}", get(get_park).put(update_park))
}
