//! Park, lodge, and user DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Coordinates, Lodge, LodgeId, LodgeType, Park, ParkId, RatingStats, User, UserId, UserRole,
};

/// Request body for `POST /parks`.
#[derive(Debug, Deserialize)]
pub struct CreateParkRequest {
    /// Park name (max 100 chars).
    pub name: String,
    /// Description (max 2000 chars).
    pub description: String,
    /// Human-readable location.
    pub location: String,
    /// Geographic position.
    pub coordinates: Coordinates,
    /// Area in square kilometres.
    pub area_km2: f64,
    /// Year established (1800 or later).
    pub established_year: u32,
    /// Entry fee per person in USD.
    pub entry_fee_usd: f64,
    /// Notable wildlife.
    #[serde(default)]
    pub wildlife: Vec<String>,
    /// Recommended visiting season.
    #[serde(default)]
    pub best_time_to_visit: String,
}

/// Request body for `PUT /parks/:id`. Omitted fields are unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateParkRequest {
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New entry fee.
    #[serde(default)]
    pub entry_fee_usd: Option<f64>,
    /// Replacement wildlife list.
    #[serde(default)]
    pub wildlife: Option<Vec<String>>,
    /// New recommended season.
    #[serde(default)]
    pub best_time_to_visit: Option<String>,
}

/// Park representation returned by park endpoints.
#[derive(Debug, Serialize)]
pub struct ParkResponse {
    /// Park identifier.
    pub id: ParkId,
    /// Park name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Human-readable location.
    pub location: String,
    /// Geographic position.
    pub coordinates: Coordinates,
    /// Area in square kilometres.
    pub area_km2: f64,
    /// Year established.
    pub established_year: u32,
    /// Entry fee per person in USD.
    pub entry_fee_usd: f64,
    /// Notable wildlife.
    pub wildlife: Vec<String>,
    /// Recommended visiting season.
    pub best_time_to_visit: String,
    /// Review aggregate.
    pub rating: RatingStats,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Park> for ParkResponse {
    fn from(park: Park) -> Self {
        Self {
            id: park.id,
            name: park.name,
            description: park.description,
            location: park.location,
            coordinates: park.coordinates,
            area_km2: park.area_km2,
            established_year: park.established_year,
            entry_fee_usd: park.entry_fee_usd,
            wildlife: park.wildlife,
            best_time_to_visit: park.best_time_to_visit,
            rating: park.rating,
            created_at: park.created_at,
        }
    }
}

/// Request body for `POST /lodges`.
#[derive(Debug, Deserialize)]
pub struct CreateLodgeRequest {
    /// Lodge name (max 100 chars).
    pub name: String,
    /// Human-readable location.
    pub location: String,
    /// Park the lodge serves.
    pub park_id: uuid::Uuid,
    /// Accommodation category.
    pub lodge_type: LodgeType,
    /// Guest capacity (at least 1).
    pub capacity: u32,
    /// Nightly rate in USD.
    pub price_per_night_usd: f64,
    /// Offered amenities.
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Description (max 2000 chars).
    pub description: String,
    /// Booking contact email.
    pub contact_email: String,
    /// Booking contact phone.
    pub contact_phone: String,
    /// Geographic position.
    pub coordinates: Coordinates,
}

/// Query parameters for `GET /lodges`.
#[derive(Debug, Default, Deserialize)]
pub struct LodgeQuery {
    /// Restrict to one park.
    #[serde(default)]
    pub park_id: Option<uuid::Uuid>,
    /// Restrict to one accommodation category.
    #[serde(default)]
    pub lodge_type: Option<LodgeType>,
}

/// Lodge representation returned by lodge endpoints.
#[derive(Debug, Serialize)]
pub struct LodgeResponse {
    /// Lodge identifier.
    pub id: LodgeId,
    /// Lodge name.
    pub name: String,
    /// Human-readable location.
    pub location: String,
    /// Park the lodge serves.
    pub park_id: ParkId,
    /// Owning user.
    pub owner_id: UserId,
    /// Accommodation category.
    pub lodge_type: LodgeType,
    /// Guest capacity.
    pub capacity: u32,
    /// Nightly rate in USD.
    pub price_per_night_usd: f64,
    /// Offered amenities.
    pub amenities: Vec<String>,
    /// Description.
    pub description: String,
    /// Booking contact email.
    pub contact_email: String,
    /// Booking contact phone.
    pub contact_phone: String,
    /// Geographic position.
    pub coordinates: Coordinates,
    /// Review aggregate.
    pub rating: RatingStats,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Lodge> for LodgeResponse {
    fn from(lodge: Lodge) -> Self {
        Self {
            id: lodge.id,
            name: lodge.name,
            location: lodge.location,
            park_id: lodge.park,
            owner_id: lodge.owner,
            lodge_type: lodge.lodge_type,
            capacity: lodge.capacity,
            price_per_night_usd: lodge.price_per_night_usd,
            amenities: lodge.amenities,
            description: lodge.description,
            contact_email: lodge.contact_email,
            contact_phone: lodge.contact_phone,
            coordinates: lodge.coordinates,
            rating: lodge.rating,
            created_at: lodge.created_at,
        }
    }
}

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    /// Email address, unique across the marketplace.
    pub email: String,
    /// Display name (max 100 chars).
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Marketplace role.
    pub role: UserRole,
}

/// Request body for `PUT /users/:id`. Email and role are immutable.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

/// User representation returned by user endpoints.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User identifier.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Marketplace role.
    pub role: UserRole,
    /// Whether the account passed identity verification.
    pub is_verified: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            role: user.role,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}
