//! User registration and profile handlers.
//!
//! Registration is the one endpoint with no identity requirement; the
//! upstream auth layer provisions credentials separately.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::AuthenticatedUser;
use crate::api::dto::{RegisterUserRequest, UpdateProfileRequest, UserResponse};
use crate::app_state::AppState;
use crate::domain::UserId;
use crate::error::ApiError;
use crate::service::{NewUser, ProfileUpdate};

/// `POST /users` — Register a new account.
///
/// # Errors
///
/// Returns [`ApiError::Conflict`] when the email is already registered.
pub async fn register_user(
    State(state): State<AppState>,
    Json(req): Json<RegisterUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .catalog
        .register_user(NewUser {
            email: req.email,
            name: req.name,
            phone: req.phone,
            role: req.role,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// `GET /users/:id` — Get a user profile.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown id.
pub async fn get_user(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.catalog.get_user(UserId::from_uuid(id)).await?;
    Ok(Json(UserResponse::from(user)))
}

/// `PUT /users/:id` — Update the caller's own profile.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] when updating another user's
/// profile.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .catalog
        .update_profile(
            user.id,
            UserId::from_uuid(id),
            ProfileUpdate {
                name: req.name,
                phone: req.phone,
            },
        )
        .await?;
    Ok(Json(UserResponse::from(updated)))
}

/// User routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register_user))
        .route("/users/{id}", get(get_user).put(update_profile))
}
