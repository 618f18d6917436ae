//! Data Transfer Objects for REST request/response serialization.
//!
//! The DTO layer keeps the wire shapes separate from the domain types:
//! requests carry raw UUIDs that handlers convert to typed identifiers,
//! responses add derived fields (booking reference, spots remaining).

pub mod booking_dto;
pub mod catalog_dto;
pub mod common_dto;
pub mod review_dto;
pub mod tour_dto;

pub use booking_dto::*;
pub use catalog_dto::*;
pub use common_dto::*;
pub use review_dto::*;
pub use tour_dto::*;
