//! Booking handlers: create, list, get, cancel, and status flips.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::api::auth::AuthenticatedUser;
use crate::api::dto::{
    BookingListResponse, BookingResponse, CancelBookingRequest, CreateBookingRequest,
    PaginationParams, RefundBookingRequest,
};
use crate::app_state::AppState;
use crate::domain::{BookingId, Currency, TourId};
use crate::error::{ApiError, ErrorResponse};
use crate::service::BookingRequest;

/// `POST /bookings` — Book spots on a tour.
///
/// # Errors
///
/// Returns [`ApiError`] on validation failure, an unknown tour, or an
/// exhausted capacity ledger.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    summary = "Create a booking",
    description = "Atomically checks and charges the tour's per-date and aggregate capacity, then creates the booking. Two concurrent bookings can never oversell a tour.",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 404, description = "Tour not found", body = ErrorResponse),
        (status = 422, description = "Tour unavailable, date unavailable, or capacity exceeded", body = ErrorResponse),
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .reservations
        .create_booking(
            user.id,
            BookingRequest {
                tour: TourId::from_uuid(req.tour_id),
                participants: req.participants,
                start_date: req.start_date,
                currency: req.currency.unwrap_or(Currency::Usd),
                emergency_contact: req.emergency_contact,
                special_requests: req.special_requests,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// `GET /bookings` — List the caller's bookings with pagination.
///
/// # Errors
///
/// Returns [`ApiError::Unauthenticated`] when identity headers are
/// missing.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    summary = "List own bookings",
    description = "Returns a paginated list of the caller's bookings, newest first.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated booking list", body = BookingListResponse),
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let params = params.clamped();
    let bookings = state.reservations.list_bookings(user.id).await;

    let meta = params.meta(bookings.len());
    let data: Vec<BookingResponse> = bookings
        .into_iter()
        .skip(params.offset())
        .take(params.per_page as usize)
        .map(BookingResponse::from)
        .collect();

    Ok(Json(BookingListResponse {
        data,
        pagination: meta,
    }))
}

/// `GET /bookings/:id` — Get one of the caller's bookings.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown id or
/// [`ApiError::Forbidden`] for a booking owned by someone else.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    summary = "Get a booking",
    params(
        ("id" = uuid::Uuid, Path, description = "Booking UUID"),
    ),
    responses(
        (status = 200, description = "Booking details", body = BookingResponse),
        (status = 403, description = "Not the booking owner", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .reservations
        .get_booking(user.id, BookingId::from_uuid(id))
        .await?;
    Ok(Json(BookingResponse::from(booking)))
}

/// `PUT /bookings/:id/cancel` — Cancel a booking and credit capacity.
///
/// # Errors
///
/// Returns [`ApiError::InvalidState`] when the booking is already
/// cancelled or completed.
#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}/cancel",
    tag = "Bookings",
    summary = "Cancel a booking",
    description = "Credits the charged spots back to the tour, then marks the booking cancelled. Cancelling twice is rejected without further credit.",
    params(
        ("id" = uuid::Uuid, Path, description = "Booking UUID"),
    ),
    request_body = CancelBookingRequest,
    responses(
        (status = 200, description = "Booking cancelled", body = BookingResponse),
        (status = 409, description = "Booking already cancelled or completed", body = ErrorResponse),
    )
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .reservations
        .cancel_booking(user.id, BookingId::from_uuid(id), req.reason)
        .await?;
    Ok(Json(BookingResponse::from(booking)))
}

/// `PUT /bookings/:id/confirm` — Agency confirms a pending booking.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] unless the caller operates the tour.
pub async fn confirm_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .reservations
        .confirm_booking(user.id, BookingId::from_uuid(id))
        .await?;
    Ok(Json(BookingResponse::from(booking)))
}

/// `PUT /bookings/:id/complete` — Agency marks a booking completed.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] unless the caller operates the tour.
pub async fn complete_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .reservations
        .complete_booking(user.id, BookingId::from_uuid(id))
        .await?;
    Ok(Json(BookingResponse::from(booking)))
}

/// `PUT /bookings/:id/refund` — Agency records a refund.
///
/// # Errors
///
/// Returns [`ApiError::InvalidState`] unless the booking is cancelled
/// or completed.
pub async fn refund_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<RefundBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .reservations
        .refund_booking(user.id, BookingId::from_uuid(id), req.amount)
        .await?;
    Ok(Json(BookingResponse::from(booking)))
}

/// Booking routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/{id}", get(get_booking))
        .route("/bookings/{id}/cancel", put(cancel_booking))
        .route("/bookings/{id}/confirm", put(confirm_booking))
        .route("/bookings/{id}/complete", put(complete_booking))
        .route("/bookings/{id}/refund", put(refund_booking))
}
