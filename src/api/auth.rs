//! Caller identity extraction.
//!
//! Authentication itself is external: an upstream gateway verifies
//! credentials and forwards the caller's identity in the `X-User-Id`
//! and `X-User-Role` headers. The extractor rejects requests where
//! either header is missing or malformed.

use std::str::FromStr;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::{UserId, UserRole};
use crate::error::ApiError;

/// Identity of the authenticated caller, extracted from request headers.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    /// Caller's user id.
    pub id: UserId,
    /// Caller's marketplace role as asserted by the auth layer.
    pub role: UserRole,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthenticated("missing X-User-Id header".to_string()))?;
        let id = uuid::Uuid::parse_str(id).map_err(|_| {
            ApiError::Unauthenticated("X-User-Id is not a valid UUID".to_string())
        })?;

        let role = parts
            .headers
            .get("x-user-role")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthenticated("missing X-User-Role header".to_string()))?;
        let role = UserRole::from_str(role)
            .map_err(|_| ApiError::Unauthenticated(format!("unknown role: {role}")))?;

        Ok(Self {
            id: UserId::from_uuid(id),
            role,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<AuthenticatedUser, ApiError> {
        let (mut parts, ()) = request.into_parts();
        AuthenticatedUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn valid_headers_yield_identity() {
        let id = uuid::Uuid::new_v4();
        let request = Request::builder()
            .header("x-user-id", id.to_string())
            .header("x-user-role", "tourist")
            .body(())
            .ok();
        let Some(request) = request else {
            panic!("request build failed");
        };

        let result = extract(request).await;
        let Ok(user) = result else {
            panic!("extraction failed");
        };
        assert_eq!(*user.id.as_uuid(), id);
        assert_eq!(user.role, UserRole::Tourist);
    }

    #[tokio::test]
    async fn missing_id_header_is_unauthenticated() {
        let request = Request::builder()
            .header("x-user-role", "tourist")
            .body(())
            .ok();
        let Some(request) = request else {
            panic!("request build failed");
        };

        let result = extract(request).await;
        assert!(matches!(result, Err(ApiError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn malformed_id_is_unauthenticated() {
        let request = Request::builder()
            .header("x-user-id", "not-a-uuid")
            .header("x-user-role", "tourist")
            .body(())
            .ok();
        let Some(request) = request else {
            panic!("request build failed");
        };

        let result = extract(request).await;
        assert!(matches!(result, Err(ApiError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn unknown_role_is_unauthenticated() {
        let request = Request::builder()
            .header("x-user-id", uuid::Uuid::new_v4().to_string())
            .header("x-user-role", "astronaut")
            .body(())
            .ok();
        let Some(request) = request else {
            panic!("request build failed");
        };

        let result = extract(request).await;
        assert!(matches!(result, Err(ApiError::Unauthenticated(_))));
    }
}
