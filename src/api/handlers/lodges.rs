//! Lodge catalog handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::AuthenticatedUser;
use crate::api::dto::{CreateLodgeRequest, LodgeQuery, LodgeResponse};
use crate::app_state::AppState;
use crate::domain::{LodgeId, ParkId};
use crate::error::ApiError;
use crate::service::NewLodge;

/// `POST /lodges` — List a new lodge.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] unless the caller is a lodge owner,
/// or [`ApiError::NotFound`] for an unknown park.
pub async fn create_lodge(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<CreateLodgeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let lodge = state
        .catalog
        .create_lodge(
            user.id,
            NewLodge {
                name: req.name,
                location: req.location,
                park: ParkId::from_uuid(req.park_id),
                lodge_type: req.lodge_type,
                capacity: req.capacity,
                price_per_night_usd: req.price_per_night_usd,
                amenities: req.amenities,
                description: req.description,
                contact_email: req.contact_email,
                contact_phone: req.contact_phone,
                coordinates: req.coordinates,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(LodgeResponse::from(lodge))))
}

/// `GET /lodges` — List active lodges, filterable by park and type.
pub async fn list_lodges(
    State(state): State<AppState>,
    Query(query): Query<LodgeQuery>,
) -> impl IntoResponse {
    let lodges: Vec<LodgeResponse> = state
        .catalog
        .list_lodges(query.park_id.map(ParkId::from_uuid), query.lodge_type)
        .await
        .into_iter()
        .map(LodgeResponse::from)
        .collect();
    Json(lodges)
}

/// `GET /lodges/:id` — Get lodge details.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown id.
pub async fn get_lodge(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let lodge = state.catalog.get_lodge(LodgeId::from_uuid(id)).await?;
    Ok(Json(LodgeResponse::from(lodge)))
}

/// Lodge routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lodges", post(create_lodge).get(list_lodges))
        .route("/lodges/{id}", get(get_lodge))
}
