//! Review handlers: create, list, and helpful votes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::api::auth::AuthenticatedUser;
use crate::api::dto::{CreateReviewRequest, ReviewResponse};
use crate::app_state::AppState;
use crate::domain::{BookingId, ReviewId, TourId};
use crate::error::{ApiError, ErrorResponse};
use crate::service::ReviewRequest;

/// `POST /reviews` — Post a review for a booked tour.
///
/// # Errors
///
/// Returns [`ApiError::Conflict`] when the caller already reviewed the
/// tour for the same booking.
#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    tag = "Reviews",
    summary = "Post a review",
    description = "Creates a review tied to one of the caller's bookings and folds the overall score into the tour's and park's rating aggregates.",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review posted", body = ReviewResponse),
        (status = 403, description = "Booking belongs to another user", body = ErrorResponse),
        (status = 409, description = "Duplicate review for this booking", body = ErrorResponse),
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state
        .reviews
        .create_review(
            user.id,
            ReviewRequest {
                tour: TourId::from_uuid(req.tour_id),
                booking: BookingId::from_uuid(req.booking_id),
                rating: req.rating,
                title: req.title,
                comment: req.comment,
                pros: req.pros,
                cons: req.cons,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(review))))
}

/// `GET /reviews` — List the caller's own reviews.
pub async fn list_own_reviews(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> impl IntoResponse {
    let reviews: Vec<ReviewResponse> = state
        .reviews
        .list_reviews_by_user(user.id)
        .await
        .into_iter()
        .map(ReviewResponse::from)
        .collect();
    Json(reviews)
}

/// `GET /reviews/tour/:tour_id` — Public reviews for a tour.
#[utoipa::path(
    get,
    path = "/api/v1/reviews/tour/{tour_id}",
    tag = "Reviews",
    summary = "List a tour's public reviews",
    params(
        ("tour_id" = uuid::Uuid, Path, description = "Tour UUID"),
    ),
    responses(
        (status = 200, description = "Public reviews, newest first", body = Vec<ReviewResponse>),
    )
)]
pub async fn list_tour_reviews(
    State(state): State<AppState>,
    Path(tour_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    let reviews: Vec<ReviewResponse> = state
        .reviews
        .list_reviews_for_tour(TourId::from_uuid(tour_id))
        .await
        .into_iter()
        .map(ReviewResponse::from)
        .collect();
    Json(reviews)
}

/// `PUT /reviews/:id/helpful` — Mark a review helpful.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown review id.
pub async fn mark_helpful(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state
        .reviews
        .mark_helpful(user.id, ReviewId::from_uuid(id))
        .await?;
    Ok(Json(ReviewResponse::from(review)))
}

/// `DELETE /reviews/:id/helpful` — Withdraw a helpful vote.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown review id.
pub async fn unmark_helpful(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state
        .reviews
        .unmark_helpful(user.id, ReviewId::from_uuid(id))
        .await?;
    Ok(Json(ReviewResponse::from(review)))
}

/// Review routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", post(create_review).get(list_own_reviews))
        .route("/reviews/tour/{tour_id}", get(list_tour_reviews))
        .route(
            "/reviews/{id}/helpful",
            put(mark_helpful).delete(unmark_helpful),
        )
}
