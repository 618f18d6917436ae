//! Review entity with bounded ratings and helpful-vote tracking.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BookingId, ReviewId, TourId, UserId};
use crate::error::ApiError;

/// Rating block attached to a review. Overall is required; sub-scores
/// are optional. All scores are bounded 1–5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRating {
    /// Overall score (1–5).
    pub overall: u8,
    /// Guide quality (1–5).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide: Option<u8>,
    /// Accommodation quality (1–5).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accommodation: Option<u8>,
    /// Food quality (1–5).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food: Option<u8>,
    /// Value for money (1–5).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u8>,
}

impl ReviewRating {
    /// Validates that every present score is within 1–5.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] naming the offending score.
    pub fn validate(&self) -> Result<(), ApiError> {
        let scores = [
            ("overall", Some(self.overall)),
            ("guide", self.guide),
            ("accommodation", self.accommodation),
            ("food", self.food),
            ("value", self.value),
        ];
        for (name, score) in scores {
            if let Some(s) = score
                && !(1..=5).contains(&s)
            {
                return Err(ApiError::InvalidInput(format!(
                    "{name} rating must be between 1 and 5"
                )));
            }
        }
        Ok(())
    }
}

/// Helpful-vote tally: the set of voters plus a count that must always
/// equal the set's size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpfulVotes {
    /// Users who marked the review helpful.
    pub users: HashSet<UserId>,
    /// Cached vote count, kept equal to `users.len()`.
    pub count: u32,
}

/// A tourist's review of a tour, tied to a specific booking.
///
/// At most one review exists per (user, tour, booking) triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Unique review identifier.
    pub id: ReviewId,
    /// Author.
    pub user: UserId,
    /// Reviewed tour.
    pub tour: TourId,
    /// Booking the review is based on.
    pub booking: BookingId,
    /// Scores.
    pub rating: ReviewRating,
    /// Review title, at most 100 characters.
    pub title: String,
    /// Review body, at most 1000 characters.
    pub comment: String,
    /// Highlights.
    pub pros: Vec<String>,
    /// Drawbacks.
    pub cons: Vec<String>,
    /// Whether the review is publicly visible.
    pub is_public: bool,
    /// Helpful-vote tally.
    pub helpful: HelpfulVotes,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Validates title, comment, and rating bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] naming the first violation.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() || self.title.len() > 100 {
            return Err(ApiError::InvalidInput(
                "review title is required and cannot exceed 100 characters".to_string(),
            ));
        }
        if self.comment.trim().is_empty() || self.comment.len() > 1000 {
            return Err(ApiError::InvalidInput(
                "review comment is required and cannot exceed 1000 characters".to_string(),
            ));
        }
        self.rating.validate()
    }

    /// Adds a helpful vote. Idempotent: voting twice is a no-op.
    ///
    /// Returns `true` if the vote was newly recorded.
    pub fn mark_helpful(&mut self, user: UserId) -> bool {
        if self.helpful.users.insert(user) {
            self.helpful.count += 1;
            true
        } else {
            false
        }
    }

    /// Removes a helpful vote. Idempotent: a non-voter is a no-op.
    ///
    /// Returns `true` if a vote was removed.
    pub fn unmark_helpful(&mut self, user: UserId) -> bool {
        if self.helpful.users.remove(&user) {
            self.helpful.count = self.helpful.count.saturating_sub(1);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_review(user: UserId, tour: TourId, booking: BookingId) -> Review {
        Review {
            id: ReviewId::new(),
            user,
            tour,
            booking,
            rating: ReviewRating {
                overall: 5,
                guide: Some(5),
                accommodation: None,
                food: None,
                value: Some(4),
            },
            title: "Unforgettable".to_string(),
            comment: "Saw the migration on day two.".to_string(),
            pros: vec!["guide".to_string()],
            cons: vec![],
            is_public: true,
            helpful: HelpfulVotes::default(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn rating_out_of_bounds_is_rejected() {
        let rating = ReviewRating {
            overall: 6,
            guide: None,
            accommodation: None,
            food: None,
            value: None,
        };
        assert!(rating.validate().is_err());

        let rating = ReviewRating {
            overall: 4,
            guide: Some(0),
            accommodation: None,
            food: None,
            value: None,
        };
        assert!(rating.validate().is_err());
    }

    #[test]
    fn helpful_count_tracks_set_size() {
        let mut review = make_review(UserId::new(), TourId::new(), BookingId::new());
        let voter_a = UserId::new();
        let voter_b = UserId::new();

        assert!(review.mark_helpful(voter_a));
        assert!(review.mark_helpful(voter_b));
        assert_eq!(review.helpful.count, 2);
        assert_eq!(review.helpful.count as usize, review.helpful.users.len());

        assert!(review.unmark_helpful(voter_a));
        assert_eq!(review.helpful.count, 1);
        assert_eq!(review.helpful.count as usize, review.helpful.users.len());
    }

    #[test]
    fn mark_helpful_is_idempotent() {
        let mut review = make_review(UserId::new(), TourId::new(), BookingId::new());
        let voter = UserId::new();

        assert!(review.mark_helpful(voter));
        assert!(!review.mark_helpful(voter));
        assert_eq!(review.helpful.count, 1);
    }

    #[test]
    fn unmark_nonvoter_is_noop() {
        let mut review = make_review(UserId::new(), TourId::new(), BookingId::new());
        assert!(!review.unmark_helpful(UserId::new()));
        assert_eq!(review.helpful.count, 0);
    }

    #[test]
    fn empty_comment_is_rejected() {
        let mut review = make_review(UserId::new(), TourId::new(), BookingId::new());
        review.comment = "  ".to_string();
        assert!(review.validate().is_err());
    }
}
