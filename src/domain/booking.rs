//! Booking entity with one-way status transitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BookingId, TourId, UserId};
use crate::error::ApiError;

/// Lifecycle status of a booking.
///
/// Transitions are one-way; nothing ever returns to `Pending`.
/// `Cancelled` and `Completed` are terminal for cancellation purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created, awaiting confirmation.
    Pending,
    /// Confirmed by the agency.
    Confirmed,
    /// Cancelled by the tourist; capacity has been credited back.
    Cancelled,
    /// Tour took place.
    Completed,
    /// Payment was returned after completion or cancellation.
    Refunded,
}

/// Payment state tracked alongside the booking status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No payment received yet.
    Pending,
    /// Payment settled.
    Paid,
    /// Payment attempt failed.
    Failed,
    /// Payment returned to the tourist.
    Refunded,
}

/// Settlement currency for a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US dollar (default).
    Usd,
    /// Tanzanian shilling.
    Tzs,
    /// Euro.
    Eur,
    /// British pound.
    Gbp,
}

/// Participant counts per age category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants {
    /// Adults on the booking (1–20).
    pub adults: u32,
    /// Children on the booking (0–20).
    #[serde(default)]
    pub children: u32,
    /// Infants on the booking (0–10).
    #[serde(default)]
    pub infants: u32,
}

impl Participants {
    /// Total headcount across all categories.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.adults + self.children + self.infants
    }

    /// Validates per-category bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] naming the violated bound.
    pub fn validate(&self) -> Result<(), ApiError> {
        if !(1..=20).contains(&self.adults) {
            return Err(ApiError::InvalidInput(
                "adults must be between 1 and 20".to_string(),
            ));
        }
        if self.children > 20 {
            return Err(ApiError::InvalidInput(
                "cannot exceed 20 children per booking".to_string(),
            ));
        }
        if self.infants > 10 {
            return Err(ApiError::InvalidInput(
                "cannot exceed 10 infants per booking".to_string(),
            ));
        }
        Ok(())
    }
}

/// Contact person reachable while the tourist is on tour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    /// Contact name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Relationship to the tourist.
    pub relationship: String,
}

impl EmergencyContact {
    /// Validates that all three fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] if any field is blank.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty()
            || self.phone.trim().is_empty()
            || self.relationship.trim().is_empty()
        {
            return Err(ApiError::InvalidInput(
                "emergency contact name, phone, and relationship are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// A reservation of tour spots by a user.
///
/// Owned exclusively by the requesting user; the tour holds only its
/// capacity counters, never a back-reference to individual bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: BookingId,
    /// Owning user.
    pub user: UserId,
    /// Booked tour.
    pub tour: TourId,
    /// Participant counts per category.
    pub participants: Participants,
    /// Derived headcount, always `participants.total()`.
    pub total_participants: u32,
    /// Departure day.
    pub start_date: NaiveDate,
    /// Derived return day, `start_date + tour.duration_days`.
    pub end_date: NaiveDate,
    /// Derived price, `tour.price_usd * total_participants`.
    pub total_price: f64,
    /// Settlement currency.
    pub currency: Currency,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Payment state.
    pub payment_status: PaymentStatus,
    /// Emergency contact, required at creation.
    pub emergency_contact: EmergencyContact,
    /// Free-form requests, at most 500 characters.
    pub special_requests: Option<String>,
    /// Reason given at cancellation, at most 500 characters.
    pub cancellation_reason: Option<String>,
    /// When the booking was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Refund amount, set by `refund`.
    pub refund_amount: Option<f64>,
    /// When the refund was processed.
    pub refunded_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of last mutation.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Human-facing booking reference: `NAP` plus the last eight hex
    /// characters of the id, uppercased.
    #[must_use]
    pub fn reference(&self) -> String {
        let hex = self.id.as_uuid().simple().to_string();
        let tail: String = hex
            .chars()
            .rev()
            .take(8)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("NAP{}", tail.to_uppercase())
    }

    /// `true` when the booking can still be cancelled.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        !matches!(
            self.status,
            BookingStatus::Cancelled | BookingStatus::Completed
        )
    }

    /// Marks the booking cancelled, recording the reason and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidState`] if the booking is already in a
    /// terminal state. No field is mutated on error.
    pub fn cancel(&mut self, reason: Option<String>, now: DateTime<Utc>) -> Result<(), ApiError> {
        if !self.is_cancellable() {
            return Err(ApiError::InvalidState(format!(
                "booking {} cannot be cancelled in status {:?}",
                self.id, self.status
            )));
        }
        self.status = BookingStatus::Cancelled;
        self.cancellation_reason = reason;
        self.cancelled_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Confirms a pending booking.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidState`] unless the booking is pending.
    pub fn confirm(&mut self, now: DateTime<Utc>) -> Result<(), ApiError> {
        if self.status != BookingStatus::Pending {
            return Err(ApiError::InvalidState(format!(
                "booking {} cannot be confirmed in status {:?}",
                self.id, self.status
            )));
        }
        self.status = BookingStatus::Confirmed;
        self.updated_at = now;
        Ok(())
    }

    /// Marks a confirmed booking as completed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidState`] unless the booking is
    /// confirmed.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<(), ApiError> {
        if self.status != BookingStatus::Confirmed {
            return Err(ApiError::InvalidState(format!(
                "booking {} cannot be completed in status {:?}",
                self.id, self.status
            )));
        }
        self.status = BookingStatus::Completed;
        self.updated_at = now;
        Ok(())
    }

    /// Processes a refund on a cancelled or completed booking.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidState`] if the booking is neither
    /// cancelled nor completed, or [`ApiError::InvalidInput`] for a
    /// negative amount.
    pub fn refund(&mut self, amount: f64, now: DateTime<Utc>) -> Result<(), ApiError> {
        if amount < 0.0 {
            return Err(ApiError::InvalidInput(
                "refund amount cannot be negative".to_string(),
            ));
        }
        if !matches!(
            self.status,
            BookingStatus::Cancelled | BookingStatus::Completed
        ) {
            return Err(ApiError::InvalidState(format!(
                "booking {} cannot be refunded in status {:?}",
                self.id, self.status
            )));
        }
        self.status = BookingStatus::Refunded;
        self.payment_status = PaymentStatus::Refunded;
        self.refund_amount = Some(amount);
        self.refunded_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_booking(user: UserId, tour: TourId, adults: u32) -> Booking {
        let now = Utc::now();
        let participants = Participants {
            adults,
            children: 0,
            infants: 0,
        };
        let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap_or_default();
        Booking {
            id: BookingId::new(),
            user,
            tour,
            participants,
            total_participants: participants.total(),
            start_date: start,
            end_date: start + chrono::Days::new(5),
            total_price: 1200.0 * f64::from(adults),
            currency: Currency::Usd,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            emergency_contact: EmergencyContact {
                name: "Asha M".to_string(),
                phone: "+255 700 000 000".to_string(),
                relationship: "sister".to_string(),
            },
            special_requests: None,
            cancellation_reason: None,
            cancelled_at: None,
            refund_amount: None,
            refunded_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn total_matches_category_sum() {
        let p = Participants {
            adults: 2,
            children: 1,
            infants: 1,
        };
        assert_eq!(p.total(), 4);
    }

    #[test]
    fn zero_adults_is_rejected() {
        let p = Participants {
            adults: 0,
            children: 1,
            infants: 0,
        };
        assert!(matches!(p.validate(), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn too_many_infants_is_rejected() {
        let p = Participants {
            adults: 1,
            children: 0,
            infants: 11,
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn reference_has_nap_prefix_and_eight_chars() {
        let booking = make_booking(UserId::new(), TourId::new(), 2);
        let reference = booking.reference();
        assert!(reference.starts_with("NAP"));
        assert_eq!(reference.len(), 11);
        assert_eq!(reference, reference.to_uppercase());
    }

    #[test]
    fn cancel_records_reason_and_timestamp() {
        let mut booking = make_booking(UserId::new(), TourId::new(), 2);
        let now = Utc::now();

        let result = booking.cancel(Some("change of plans".to_string()), now);
        assert!(result.is_ok());
        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert_eq!(
            booking.cancellation_reason.as_deref(),
            Some("change of plans")
        );
        assert_eq!(booking.cancelled_at, Some(now));
    }

    #[test]
    fn cancel_twice_is_invalid_state() {
        let mut booking = make_booking(UserId::new(), TourId::new(), 2);
        let now = Utc::now();
        let _ = booking.cancel(None, now);

        let result = booking.cancel(None, now);
        assert!(matches!(result, Err(ApiError::InvalidState(_))));
        // First cancellation untouched
        assert_eq!(booking.status, BookingStatus::Cancelled);
    }

    #[test]
    fn completed_booking_cannot_be_cancelled() {
        let mut booking = make_booking(UserId::new(), TourId::new(), 2);
        let now = Utc::now();
        let _ = booking.confirm(now);
        let _ = booking.complete(now);

        assert!(matches!(
            booking.cancel(None, now),
            Err(ApiError::InvalidState(_))
        ));
    }

    #[test]
    fn refund_requires_terminal_state() {
        let mut booking = make_booking(UserId::new(), TourId::new(), 2);
        let now = Utc::now();

        assert!(booking.refund(100.0, now).is_err());

        let _ = booking.cancel(None, now);
        assert!(booking.refund(100.0, now).is_ok());
        assert_eq!(booking.status, BookingStatus::Refunded);
        assert_eq!(booking.payment_status, PaymentStatus::Refunded);
        assert_eq!(booking.refund_amount, Some(100.0));
    }

    #[test]
    fn no_transition_back_to_pending() {
        let mut booking = make_booking(UserId::new(), TourId::new(), 1);
        let now = Utc::now();
        let _ = booking.confirm(now);

        // Confirming again fails; status stays Confirmed
        assert!(booking.confirm(now).is_err());
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }
}
