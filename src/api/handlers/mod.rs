//! REST endpoint handlers organized by resource.

pub mod agencies;
pub mod bookings;
pub mod lodges;
pub mod parks;
pub mod reviews;
pub mod system;
pub mod tours;
pub mod users;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(bookings::routes())
        .merge(reviews::routes())
        .merge(tours::routes())
        .merge(parks::routes())
        .merge(lodges::routes())
        .merge(users::routes())
        .merge(agencies::routes())
}
