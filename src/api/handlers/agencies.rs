//! Travel agency directory handlers.
//!
//! Public read-only projection over the user registry so callers can
//! discover agency ids for the tour listing filter.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::UserResponse;
use crate::app_state::AppState;
use crate::domain::UserId;
use crate::error::ApiError;

/// `GET /agencies` — List active travel agencies.
pub async fn list_agencies(State(state): State<AppState>) -> impl IntoResponse {
    let agencies: Vec<UserResponse> = state
        .catalog
        .list_agencies()
        .await
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Json(agencies)
}

/// `GET /agencies/:id` — Get an agency profile.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] unless the id names an active travel
/// agency.
pub async fn get_agency(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let agency = state.catalog.get_agency(UserId::from_uuid(id)).await?;
    Ok(Json(UserResponse::from(agency)))
}

/// Agency directory routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/agencies", get(list_agencies))
        .route("/agencies/{id}", get(get_agency))
}
