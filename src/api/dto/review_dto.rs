//! Review DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BookingId, Review, ReviewId, ReviewRating, TourId, UserId};

/// Request body for `POST /reviews`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    /// Reviewed tour.
    pub tour_id: uuid::Uuid,
    /// Booking the review is based on.
    pub booking_id: uuid::Uuid,
    /// Scores, all bounded 1–5.
    #[schema(value_type = Object)]
    pub rating: ReviewRating,
    /// Review title (max 100 chars).
    pub title: String,
    /// Review body (max 1000 chars).
    pub comment: String,
    /// Highlights.
    #[serde(default)]
    pub pros: Vec<String>,
    /// Drawbacks.
    #[serde(default)]
    pub cons: Vec<String>,
}

/// Review representation returned by review endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponse {
    /// Review identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: ReviewId,
    /// Author.
    #[schema(value_type = uuid::Uuid)]
    pub user_id: UserId,
    /// Reviewed tour.
    #[schema(value_type = uuid::Uuid)]
    pub tour_id: TourId,
    /// Underlying booking.
    #[schema(value_type = uuid::Uuid)]
    pub booking_id: BookingId,
    /// Scores.
    #[schema(value_type = Object)]
    pub rating: ReviewRating,
    /// Review title.
    pub title: String,
    /// Review body.
    pub comment: String,
    /// Highlights.
    pub pros: Vec<String>,
    /// Drawbacks.
    pub cons: Vec<String>,
    /// Whether the review is publicly visible.
    pub is_public: bool,
    /// Number of helpful votes.
    pub helpful_count: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            user_id: review.user,
            tour_id: review.tour,
            booking_id: review.booking,
            rating: review.rating,
            title: review.title,
            comment: review.comment,
            pros: review.pros,
            cons: review.cons,
            is_public: review.is_public,
            helpful_count: review.helpful.count,
            created_at: review.created_at,
        }
    }
}
