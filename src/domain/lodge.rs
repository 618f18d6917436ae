//! Lodge catalog entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{LodgeId, ParkId, UserId};
use super::park::Coordinates;
use super::rating::RatingStats;
use crate::error::ApiError;

/// Accommodation category of a lodge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LodgeType {
    /// High-end full-service lodge.
    Luxury,
    /// Comfortable mid-range lodge.
    MidRange,
    /// Budget accommodation.
    Budget,
    /// Canvas tented camp.
    TentedCamp,
    /// Sustainability-focused lodge.
    EcoLodge,
}

/// Accommodation near a park, listed by a lodge owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lodge {
    /// Unique lodge identifier.
    pub id: LodgeId,
    /// Lodge name, at most 100 characters.
    pub name: String,
    /// Human-readable location string.
    pub location: String,
    /// Park the lodge serves.
    pub park: ParkId,
    /// Owning user.
    pub owner: UserId,
    /// Accommodation category.
    pub lodge_type: LodgeType,
    /// Guest capacity, at least 1.
    pub capacity: u32,
    /// Nightly rate in USD.
    pub price_per_night_usd: f64,
    /// Offered amenities.
    pub amenities: Vec<String>,
    /// Description, at most 2000 characters.
    pub description: String,
    /// Booking contact email.
    pub contact_email: String,
    /// Booking contact phone.
    pub contact_phone: String,
    /// Geographic position.
    pub coordinates: Coordinates,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Review aggregate.
    pub rating: RatingStats,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of last mutation.
    pub updated_at: DateTime<Utc>,
}

impl Lodge {
    /// Validates field bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] naming the first violation.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() || self.name.len() > 100 {
            return Err(ApiError::InvalidInput(
                "lodge name is required and cannot exceed 100 characters".to_string(),
            ));
        }
        if self.description.is_empty() || self.description.len() > 2000 {
            return Err(ApiError::InvalidInput(
                "lodge description is required and cannot exceed 2000 characters".to_string(),
            ));
        }
        if self.capacity < 1 {
            return Err(ApiError::InvalidInput(
                "capacity must be at least 1".to_string(),
            ));
        }
        if self.price_per_night_usd < 0.0 {
            return Err(ApiError::InvalidInput("price must be positive".to_string()));
        }
        if !self.contact_email.contains('@') {
            return Err(ApiError::InvalidInput(
                "contact email is invalid".to_string(),
            ));
        }
        self.coordinates.validate()
    }
}
