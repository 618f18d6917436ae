//! Tour entity and its embedded capacity ledger.
//!
//! A tour carries two levels of capacity accounting: the aggregate
//! `current_participants` / `max_participants` pair, and a per-departure
//! `available_spots` counter on each [`StartDate`]. Both are mutated only
//! by the reservation service while holding the tour's write lock.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ParkId, TourId, UserId};
use super::rating::RatingStats;
use crate::error::ApiError;

/// Physical difficulty rating of a tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Suitable for all fitness levels.
    Easy,
    /// Some walking or uneven terrain.
    Moderate,
    /// Sustained physical effort required.
    Challenging,
    /// Expedition-grade conditions.
    Extreme,
}

/// A scheduled departure date with its own spot allotment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartDate {
    /// Calendar day of departure.
    pub date: NaiveDate,
    /// Spots still bookable for this departure. Never negative.
    pub available_spots: u32,
}

/// A bookable safari tour offered by a travel agency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    /// Unique tour identifier (immutable after creation).
    pub id: TourId,
    /// Tour title, at most 100 characters.
    pub title: String,
    /// Long description, at most 2000 characters.
    pub description: String,
    /// Park this tour visits.
    pub park: ParkId,
    /// Agency user that owns and operates the tour.
    pub agency: UserId,
    /// Length of the tour in days (1–30).
    pub duration_days: u32,
    /// Price per participant in USD.
    pub price_usd: f64,
    /// Total capacity across a departure (1–50).
    pub max_participants: u32,
    /// Participants currently booked. Never exceeds `max_participants`.
    pub current_participants: u32,
    /// Physical difficulty rating.
    pub difficulty: Difficulty,
    /// What the price includes.
    pub includes: Vec<String>,
    /// What the price excludes.
    pub excludes: Vec<String>,
    /// Free-form search tags, lowercased.
    pub tags: Vec<String>,
    /// Cancellation policy text shown to tourists.
    pub cancellation_policy: String,
    /// Soft-delete flag; inactive tours are hidden everywhere.
    pub is_active: bool,
    /// Whether the tour is currently open for booking.
    pub is_available: bool,
    /// Scheduled departures with per-date spot allotments.
    pub start_dates: Vec<StartDate>,
    /// Review aggregate.
    pub rating: RatingStats,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of last mutation.
    pub updated_at: DateTime<Utc>,
}

impl Tour {
    /// Default cancellation policy applied when none is given.
    pub const DEFAULT_CANCELLATION_POLICY: &'static str =
        "Free cancellation up to 24 hours before tour start";

    /// Spots still bookable across the whole tour.
    #[must_use]
    pub const fn spots_remaining(&self) -> u32 {
        self.max_participants.saturating_sub(self.current_participants)
    }

    /// `true` when the aggregate capacity is exhausted.
    #[must_use]
    pub const fn is_fully_booked(&self) -> bool {
        self.current_participants >= self.max_participants
    }

    /// `true` when a departure exists on `date` with spots left.
    ///
    /// Matching is by calendar day; departures are stored as
    /// [`NaiveDate`] so there is no time-of-day component to ignore.
    #[must_use]
    pub fn is_available_on_date(&self, date: NaiveDate) -> bool {
        self.start_dates
            .iter()
            .any(|sd| sd.date == date && sd.available_spots > 0)
    }

    /// Returns the departure entry for `date`, if scheduled.
    #[must_use]
    pub fn start_date_entry(&self, date: NaiveDate) -> Option<&StartDate> {
        self.start_dates.iter().find(|sd| sd.date == date)
    }

    fn start_date_entry_mut(&mut self, date: NaiveDate) -> Option<&mut StartDate> {
        self.start_dates.iter_mut().find(|sd| sd.date == date)
    }

    /// Charges `spots` participants against this tour for the given
    /// departure: bumps `current_participants` and decrements the
    /// departure's `available_spots`.
    ///
    /// Caller must hold the tour's write lock; the checks and the
    /// mutation here are only race-free under that lock.
    ///
    /// # Errors
    ///
    /// - [`ApiError::DateUnavailable`] if no departure exists on `date`
    ///   or it has no spots left.
    /// - [`ApiError::CapacityExceeded`] if `spots` exceeds either the
    ///   aggregate remainder or the departure's `available_spots`. Both
    ///   ceilings are independent: a tour may partition its capacity
    ///   across dates more strictly or more loosely than the aggregate.
    pub fn book_spots(&mut self, spots: u32, date: NaiveDate) -> Result<(), ApiError> {
        let aggregate_remaining = self.spots_remaining();
        let date_remaining = self
            .start_date_entry(date)
            .map(|entry| entry.available_spots)
            .ok_or(ApiError::DateUnavailable)?;

        // Aggregate ceiling first: a fully-booked tour reads as "no
        // spots" rather than "date unavailable" even when the matching
        // departure is also drained.
        if spots > aggregate_remaining {
            return Err(ApiError::CapacityExceeded {
                requested: spots,
                remaining: aggregate_remaining.min(date_remaining),
            });
        }
        if date_remaining == 0 {
            return Err(ApiError::DateUnavailable);
        }
        if spots > date_remaining {
            return Err(ApiError::CapacityExceeded {
                requested: spots,
                remaining: aggregate_remaining.min(date_remaining),
            });
        }

        self.current_participants += spots;
        if let Some(entry) = self.start_date_entry_mut(date) {
            entry.available_spots -= spots;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Reverses a capacity charge after a booking is cancelled.
    ///
    /// The aggregate counter is clamped at zero. The per-date credit is
    /// applied only if the departure still exists in the schedule; when
    /// the agency has since removed the date, the credit is dropped and
    /// a warning is logged (the aggregate remains the source of truth).
    pub fn release_spots(&mut self, spots: u32, date: NaiveDate) {
        self.current_participants = self.current_participants.saturating_sub(spots);
        match self.start_date_entry_mut(date) {
            Some(entry) => entry.available_spots += spots,
            None => {
                tracing::warn!(
                    tour_id = %self.id,
                    %date,
                    spots,
                    "departure no longer scheduled; dropping per-date credit"
                );
            }
        }
        self.updated_at = Utc::now();
    }

    /// Validates field bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] naming the first violated
    /// bound.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() || self.title.len() > 100 {
            return Err(ApiError::InvalidInput(
                "title is required and cannot exceed 100 characters".to_string(),
            ));
        }
        if self.description.is_empty() || self.description.len() > 2000 {
            return Err(ApiError::InvalidInput(
                "description is required and cannot exceed 2000 characters".to_string(),
            ));
        }
        if !(1..=30).contains(&self.duration_days) {
            return Err(ApiError::InvalidInput(
                "duration must be between 1 and 30 days".to_string(),
            ));
        }
        if self.price_usd < 0.0 {
            return Err(ApiError::InvalidInput("price must be positive".to_string()));
        }
        if !(1..=50).contains(&self.max_participants) {
            return Err(ApiError::InvalidInput(
                "maximum participants must be between 1 and 50".to_string(),
            ));
        }
        if self.current_participants > self.max_participants {
            return Err(ApiError::InvalidInput(
                "current participants cannot exceed maximum".to_string(),
            ));
        }
        Ok(())
    }
}
