//! Tour catalog handlers: create, list with filters, get, update,
//! deactivate.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::AuthenticatedUser;
use crate::api::dto::{
    CreateTourRequest, PaginationParams, TourListResponse, TourQuery, TourResponse,
    UpdateTourRequest,
};
use crate::app_state::AppState;
use crate::domain::{ParkId, TourId};
use crate::error::{ApiError, ErrorResponse};
use crate::service::{NewTour, TourFilter, TourUpdate};

/// `POST /tours` — List a new tour.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] unless the caller is a travel
/// agency, or [`ApiError::NotFound`] for an unknown park.
#[utoipa::path(
    post,
    path = "/api/v1/tours",
    tag = "Tours",
    summary = "Create a tour",
    request_body = CreateTourRequest,
    responses(
        (status = 201, description = "Tour created", body = TourResponse),
        (status = 403, description = "Caller is not a travel agency", body = ErrorResponse),
        (status = 404, description = "Park not found", body = ErrorResponse),
    )
)]
pub async fn create_tour(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<CreateTourRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tour = state
        .catalog
        .create_tour(
            user.id,
            NewTour {
                title: req.title,
                description: req.description,
                park: ParkId::from_uuid(req.park_id),
                duration_days: req.duration_days,
                price_usd: req.price_usd,
                max_participants: req.max_participants,
                difficulty: req.difficulty,
                includes: req.includes,
                excludes: req.excludes,
                tags: req.tags,
                cancellation_policy: req.cancellation_policy,
                start_dates: req.start_dates,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TourResponse::from(tour))))
}

/// `GET /tours` — List active tours with filters and pagination.
#[utoipa::path(
    get,
    path = "/api/v1/tours",
    tag = "Tours",
    summary = "List tours",
    description = "Returns active tours matching the filter criteria: park, agency, text search, price and duration bounds.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated tour list", body = TourListResponse),
    )
)]
pub async fn list_tours(
    State(state): State<AppState>,
    Query(query): Query<TourQuery>,
    Query(params): Query<PaginationParams>,
) -> impl IntoResponse {
    let params = params.clamped();
    let filter = TourFilter::from(query);
    let tours = state.catalog.list_tours(&filter).await;

    let meta = params.meta(tours.len());
    let data: Vec<TourResponse> = tours
        .into_iter()
        .skip(params.offset())
        .take(params.per_page as usize)
        .map(TourResponse::from)
        .collect();

    Json(TourListResponse {
        data,
        pagination: meta,
    })
}

/// `GET /tours/:id` — Get tour details.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown or inactive tour.
pub async fn get_tour(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let tour = state.catalog.get_tour(TourId::from_uuid(id)).await?;
    Ok(Json(TourResponse::from(tour)))
}

/// `PUT /tours/:id` — Update a tour (owning agency only).
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] for any caller but the owning
/// agency.
pub async fn update_tour(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateTourRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tour = state
        .catalog
        .update_tour(
            user.id,
            TourId::from_uuid(id),
            TourUpdate {
                title: req.title,
                description: req.description,
                price_usd: req.price_usd,
                difficulty: req.difficulty,
                includes: req.includes,
                excludes: req.excludes,
                tags: req.tags,
                cancellation_policy: req.cancellation_policy,
                is_available: req.is_available,
            },
        )
        .await?;
    Ok(Json(TourResponse::from(tour)))
}

/// `DELETE /tours/:id` — Soft-delete a tour (owning agency only).
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] for any caller but the owning
/// agency.
pub async fn deactivate_tour(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .catalog
        .deactivate_tour(user.id, TourId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Tour routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tours", post(create_tour).get(list_tours))
        .route(
            "/tours/{id}",
            get(get_tour).put(update_tour).delete(deactivate_tour),
        )
}
