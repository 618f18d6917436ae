//! User profile entity.
//!
//! Credentials never live here: authentication is handled by an
//! upstream layer that forwards the caller's identity with each
//! request.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;
use crate::error::ApiError;

/// Marketplace role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// A traveller booking tours.
    Tourist,
    /// An agency operating tours.
    TravelAgency,
    /// An owner listing lodges.
    LodgeOwner,
    /// A restaurant owner.
    RestaurantOwner,
    /// A seller of travel gear.
    TravelGearSeller,
    /// A safari photographer.
    Photographer,
    /// An independent tour guide.
    TourGuide,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Tourist => "tourist",
            Self::TravelAgency => "travel_agency",
            Self::LodgeOwner => "lodge_owner",
            Self::RestaurantOwner => "restaurant_owner",
            Self::TravelGearSeller => "travel_gear_seller",
            Self::Photographer => "photographer",
            Self::TourGuide => "tour_guide",
        };
        write!(f, "{s}")
    }
}

impl FromStr for UserRole {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tourist" => Ok(Self::Tourist),
            "travel_agency" => Ok(Self::TravelAgency),
            "lodge_owner" => Ok(Self::LodgeOwner),
            "restaurant_owner" => Ok(Self::RestaurantOwner),
            "travel_gear_seller" => Ok(Self::TravelGearSeller),
            "photographer" => Ok(Self::Photographer),
            "tour_guide" => Ok(Self::TourGuide),
            other => Err(ApiError::InvalidInput(format!("unknown role: {other}"))),
        }
    }
}

/// A registered marketplace user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Email address, unique across the marketplace.
    pub email: String,
    /// Display name, at most 100 characters.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Marketplace role.
    pub role: UserRole,
    /// Soft-delete flag; inactive users cannot act.
    pub is_active: bool,
    /// Whether the account passed identity verification.
    pub is_verified: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of last mutation.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Validates field bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] naming the first violation.
    pub fn validate(&self) -> Result<(), ApiError> {
        if !self.email.contains('@') || self.email.trim().is_empty() {
            return Err(ApiError::InvalidInput("email is invalid".to_string()));
        }
        if self.name.trim().is_empty() || self.name.len() > 100 {
            return Err(ApiError::InvalidInput(
                "name is required and cannot exceed 100 characters".to_string(),
            ));
        }
        if self.phone.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "phone number is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            email: format!("user-{}@example.com", UserId::new()),
            name: "Asha Mwangi".to_string(),
            phone: "+255 700 123 456".to_string(),
            role,
            is_active: true,
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [
            UserRole::Tourist,
            UserRole::TravelAgency,
            UserRole::LodgeOwner,
            UserRole::TourGuide,
        ] {
            let s = role.to_string();
            let parsed = UserRole::from_str(&s).ok();
            assert_eq!(parsed, Some(role));
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(UserRole::from_str("astronaut").is_err());
    }

    #[test]
    fn missing_email_at_sign_is_rejected() {
        let mut user = make_user(UserRole::Tourist);
        user.email = "nobody.example.com".to_string();
        assert!(user.validate().is_err());
    }
}
