//! Booking DTOs for create, cancel, and list operations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{
    Booking, BookingId, BookingStatus, Currency, EmergencyContact, Participants, PaymentStatus,
    TourId, UserId,
};

/// Request body for `POST /bookings`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    /// Tour to book.
    pub tour_id: uuid::Uuid,
    /// Participant counts per category.
    #[schema(value_type = Object)]
    pub participants: Participants,
    /// Requested departure day (must match a scheduled start date).
    pub start_date: NaiveDate,
    /// Settlement currency. Defaults to USD.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub currency: Option<Currency>,
    /// Emergency contact, required.
    #[schema(value_type = Object)]
    pub emergency_contact: EmergencyContact,
    /// Free-form requests (max 500 chars).
    #[serde(default)]
    pub special_requests: Option<String>,
}

/// Request body for `PUT /bookings/:id/cancel`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CancelBookingRequest {
    /// Optional cancellation reason (max 500 chars).
    #[serde(default)]
    pub reason: Option<String>,
}

/// Request body for `PUT /bookings/:id/refund`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RefundBookingRequest {
    /// Refund amount; defaults to the full booking price.
    #[serde(default)]
    pub amount: Option<f64>,
}

/// Booking representation returned by every booking endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    /// Booking identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: BookingId,
    /// Human-facing booking reference (`NAP` + 8 hex chars).
    pub reference: String,
    /// Owning user.
    #[schema(value_type = uuid::Uuid)]
    pub user_id: UserId,
    /// Booked tour.
    #[schema(value_type = uuid::Uuid)]
    pub tour_id: TourId,
    /// Participant counts per category.
    #[schema(value_type = Object)]
    pub participants: Participants,
    /// Total headcount.
    pub total_participants: u32,
    /// Departure day.
    pub start_date: NaiveDate,
    /// Return day.
    pub end_date: NaiveDate,
    /// Total price.
    pub total_price: f64,
    /// Settlement currency.
    #[schema(value_type = String)]
    pub currency: Currency,
    /// Lifecycle status.
    #[schema(value_type = String)]
    pub status: BookingStatus,
    /// Payment state.
    #[schema(value_type = String)]
    pub payment_status: PaymentStatus,
    /// Free-form requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    /// Reason given at cancellation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    /// When the booking was cancelled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Refund amount, if processed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<f64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        let reference = booking.reference();
        Self {
            id: booking.id,
            reference,
            user_id: booking.user,
            tour_id: booking.tour,
            participants: booking.participants,
            total_participants: booking.total_participants,
            start_date: booking.start_date,
            end_date: booking.end_date,
            total_price: booking.total_price,
            currency: booking.currency,
            status: booking.status,
            payment_status: booking.payment_status,
            special_requests: booking.special_requests,
            cancellation_reason: booking.cancellation_reason,
            cancelled_at: booking.cancelled_at,
            refund_amount: booking.refund_amount,
            created_at: booking.created_at,
        }
    }
}

/// Paginated list response for `GET /bookings`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingListResponse {
    /// Bookings on this page.
    pub data: Vec<BookingResponse>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
