//! Tour DTOs for create, update, and filtered listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{Difficulty, ParkId, RatingStats, StartDate, Tour, TourId, UserId};
use crate::service::TourFilter;

/// Request body for `POST /tours`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTourRequest {
    /// Tour title (max 100 chars).
    pub title: String,
    /// Long description (max 2000 chars).
    pub description: String,
    /// Park the tour visits.
    pub park_id: uuid::Uuid,
    /// Length in days (1–30).
    pub duration_days: u32,
    /// Price per participant in USD.
    pub price_usd: f64,
    /// Total capacity (1–50).
    pub max_participants: u32,
    /// Physical difficulty.
    #[schema(value_type = String)]
    pub difficulty: Difficulty,
    /// What the price includes.
    #[serde(default)]
    pub includes: Vec<String>,
    /// What the price excludes.
    #[serde(default)]
    pub excludes: Vec<String>,
    /// Search tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Cancellation policy; a default applies when omitted.
    #[serde(default)]
    pub cancellation_policy: Option<String>,
    /// Scheduled departures with per-date spot allotments.
    #[schema(value_type = Vec<Object>)]
    pub start_dates: Vec<StartDate>,
}

/// Request body for `PUT /tours/:id`. Omitted fields are unchanged;
/// capacity counters are not writable here.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTourRequest {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New price per participant.
    #[serde(default)]
    pub price_usd: Option<f64>,
    /// New difficulty.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub difficulty: Option<Difficulty>,
    /// Replacement includes list.
    #[serde(default)]
    pub includes: Option<Vec<String>>,
    /// Replacement excludes list.
    #[serde(default)]
    pub excludes: Option<Vec<String>>,
    /// Replacement tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// New cancellation policy.
    #[serde(default)]
    pub cancellation_policy: Option<String>,
    /// Open or withdraw the tour from sale.
    #[serde(default)]
    pub is_available: Option<bool>,
}

/// Query parameters for `GET /tours`.
#[derive(Debug, Default, Deserialize)]
pub struct TourQuery {
    /// Restrict to one park.
    #[serde(default)]
    pub park_id: Option<uuid::Uuid>,
    /// Restrict to one agency.
    #[serde(default)]
    pub agency_id: Option<uuid::Uuid>,
    /// Case-insensitive text search over title, description, and tags.
    #[serde(default)]
    pub search: Option<String>,
    /// Inclusive lower price bound.
    #[serde(default)]
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    #[serde(default)]
    pub max_price: Option<f64>,
    /// Inclusive lower duration bound in days.
    #[serde(default)]
    pub min_duration: Option<u32>,
    /// Inclusive upper duration bound in days.
    #[serde(default)]
    pub max_duration: Option<u32>,
}

impl From<TourQuery> for TourFilter {
    fn from(query: TourQuery) -> Self {
        Self {
            park: query.park_id.map(ParkId::from_uuid),
            agency: query.agency_id.map(UserId::from_uuid),
            search: query.search,
            min_price: query.min_price,
            max_price: query.max_price,
            min_duration: query.min_duration,
            max_duration: query.max_duration,
        }
    }
}

/// Tour representation returned by tour endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct TourResponse {
    /// Tour identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: TourId,
    /// Tour title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Park the tour visits.
    #[schema(value_type = uuid::Uuid)]
    pub park_id: ParkId,
    /// Operating agency.
    #[schema(value_type = uuid::Uuid)]
    pub agency_id: UserId,
    /// Length in days.
    pub duration_days: u32,
    /// Price per participant in USD.
    pub price_usd: f64,
    /// Total capacity.
    pub max_participants: u32,
    /// Participants currently booked.
    pub current_participants: u32,
    /// Spots still bookable across the whole tour.
    pub spots_remaining: u32,
    /// Physical difficulty.
    #[schema(value_type = String)]
    pub difficulty: Difficulty,
    /// What the price includes.
    pub includes: Vec<String>,
    /// What the price excludes.
    pub excludes: Vec<String>,
    /// Search tags.
    pub tags: Vec<String>,
    /// Cancellation policy text.
    pub cancellation_policy: String,
    /// Whether the tour is open for booking.
    pub is_available: bool,
    /// Scheduled departures.
    #[schema(value_type = Vec<Object>)]
    pub start_dates: Vec<StartDate>,
    /// Review aggregate.
    #[schema(value_type = Object)]
    pub rating: RatingStats,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of last mutation.
    pub updated_at: DateTime<Utc>,
}

impl From<Tour> for TourResponse {
    fn from(tour: Tour) -> Self {
        let spots_remaining = tour.spots_remaining();
        Self {
            id: tour.id,
            title: tour.title,
            description: tour.description,
            park_id: tour.park,
            agency_id: tour.agency,
            duration_days: tour.duration_days,
            price_usd: tour.price_usd,
            max_participants: tour.max_participants,
            current_participants: tour.current_participants,
            spots_remaining,
            difficulty: tour.difficulty,
            includes: tour.includes,
            excludes: tour.excludes,
            tags: tour.tags,
            cancellation_policy: tour.cancellation_policy,
            is_available: tour.is_available,
            start_dates: tour.start_dates,
            rating: tour.rating,
            created_at: tour.created_at,
            updated_at: tour.updated_at,
        }
    }
}

/// Paginated list response for `GET /tours`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TourListResponse {
    /// Tours on this page.
    pub data: Vec<TourResponse>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
