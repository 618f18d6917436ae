//! National park catalog entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ParkId;
use super::rating::RatingStats;
use crate::error::ApiError;

/// Geographic coordinates of a park or lodge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees, −90 to 90.
    pub latitude: f64,
    /// Longitude in degrees, −180 to 180.
    pub longitude: f64,
}

impl Coordinates {
    /// Validates coordinate ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] on an out-of-range value.
    pub fn validate(&self) -> Result<(), ApiError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ApiError::InvalidInput(
                "latitude must be between -90 and 90".to_string(),
            ));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ApiError::InvalidInput(
                "longitude must be between -180 and 180".to_string(),
            ));
        }
        Ok(())
    }
}

/// A national park that tours visit. Read-mostly reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Park {
    /// Unique park identifier.
    pub id: ParkId,
    /// Park name, at most 100 characters.
    pub name: String,
    /// Description, at most 2000 characters.
    pub description: String,
    /// Human-readable location string.
    pub location: String,
    /// Geographic position.
    pub coordinates: Coordinates,
    /// Park area in square kilometres.
    pub area_km2: f64,
    /// Year the park was established (1800 or later).
    pub established_year: u32,
    /// Entry fee per person in USD.
    pub entry_fee_usd: f64,
    /// Notable wildlife.
    pub wildlife: Vec<String>,
    /// Recommended visiting season.
    pub best_time_to_visit: String,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Review aggregate.
    pub rating: RatingStats,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of last mutation.
    pub updated_at: DateTime<Utc>,
}

impl Park {
    /// Validates field bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] naming the first violation.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() || self.name.len() > 100 {
            return Err(ApiError::InvalidInput(
                "park name is required and cannot exceed 100 characters".to_string(),
            ));
        }
        if self.description.is_empty() || self.description.len() > 2000 {
            return Err(ApiError::InvalidInput(
                "park description is required and cannot exceed 2000 characters".to_string(),
            ));
        }
        self.coordinates.validate()?;
        if self.area_km2 < 0.0 {
            return Err(ApiError::InvalidInput("area must be positive".to_string()));
        }
        if self.established_year < 1800 {
            return Err(ApiError::InvalidInput(
                "established year must be after 1800".to_string(),
            ));
        }
        if self.entry_fee_usd < 0.0 {
            return Err(ApiError::InvalidInput(
                "entry fee must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_park() -> Park {
        let now = Utc::now();
        Park {
            id: ParkId::new(),
            name: "Serengeti".to_string(),
            description: "Endless plains and the great migration.".to_string(),
            location: "Mara Region, Tanzania".to_string(),
            coordinates: Coordinates {
                latitude: -2.33,
                longitude: 34.83,
            },
            area_km2: 14_763.0,
            established_year: 1951,
            entry_fee_usd: 70.0,
            wildlife: vec!["lion".to_string(), "wildebeest".to_string()],
            best_time_to_visit: "June to October".to_string(),
            is_active: true,
            rating: RatingStats::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn valid_park_passes() {
        assert!(make_park().validate().is_ok());
    }

    #[test]
    fn bad_latitude_is_rejected() {
        let mut park = make_park();
        park.coordinates.latitude = 91.0;
        assert!(park.validate().is_err());
    }

    #[test]
    fn pre_1800_year_is_rejected() {
        let mut park = make_park();
        park.established_year = 1750;
        assert!(park.validate().is_err());
    }
}
