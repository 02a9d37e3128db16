// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Errors returned by the profile API once the caller is authenticated.
//!
//! Authentication failures never pass through here; they are rendered by
//! [`AuthError`](crate::auth::AuthError) as an opaque 401. An `ApiError`
//! message is safe to show to the verified caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Client-visible failure of a profile operation.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// No profile (or preference) under the requested key.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// The verified caller may not act on this resource.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// The caller's profile already exists.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: &self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn rendered(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn duplicate_profile_renders_conflict() {
        let (status, body) =
            rendered(ApiError::conflict("User with this telegram_id already exists.")).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body,
            serde_json::json!({ "error": "User with this telegram_id already exists." })
        );
    }

    #[tokio::test]
    async fn foreign_profile_update_renders_forbidden() {
        let (status, body) =
            rendered(ApiError::forbidden("You can only modify your own profile")).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "You can only modify your own profile");
    }

    #[test]
    fn lookup_and_validation_statuses() {
        assert_eq!(ApiError::not_found("User not found").status, StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::bad_request("first_name must not be empty").status,
            StatusCode::BAD_REQUEST
        );
    }
}
