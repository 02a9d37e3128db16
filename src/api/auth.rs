// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication endpoints.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{Auth, AuthenticatedUser, ContactAuth, TelegramContact, TelegramUser, VerifiedContact};

/// Response for GET /v1/auth/me
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthMeResponse {
    pub message: String,
    /// Full verified Telegram user record
    pub user: TelegramUser,
    pub telegram_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
    pub photo_url: Option<String>,
}

impl From<AuthenticatedUser> for AuthMeResponse {
    fn from(user: AuthenticatedUser) -> Self {
        let user = user.into_user();
        Self {
            message: "Authentication successful!".to_string(),
            telegram_id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            language_code: user.language_code.clone(),
            photo_url: user.photo_url.clone(),
            user,
        }
    }
}

/// Response for POST /v1/auth/test
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthTestResponse {
    pub status: String,
    pub user_id: i64,
    /// Server time the request was verified at
    pub timestamp: DateTime<Utc>,
}

/// Response for POST /v1/auth/contact
#[derive(Debug, Serialize, ToSchema)]
pub struct ContactResponse {
    pub contact: TelegramContact,
    /// When Telegram issued the launch data
    pub auth_date: DateTime<Utc>,
}

impl From<VerifiedContact> for ContactResponse {
    fn from(contact: VerifiedContact) -> Self {
        let auth_date = contact.launch_data().auth_date();
        Self {
            contact: contact.into_contact(),
            auth_date,
        }
    }
}

/// Get the current authenticated Telegram user.
#[utoipa::path(
    get,
    path = "/v1/auth/me",
    tag = "Authentication",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Verified Telegram user", body = AuthMeResponse),
        (status = 401, description = "Unauthorized - invalid, expired or missing initData"),
    )
)]
pub async fn get_me(Auth(user): Auth) -> Json<AuthMeResponse> {
    Json(user.into())
}

/// Check that authentication works.
#[utoipa::path(
    post,
    path = "/v1/auth/test",
    tag = "Authentication",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Authenticated", body = AuthTestResponse),
        (status = 401, description = "Unauthorized - invalid, expired or missing initData"),
    )
)]
pub async fn test_auth(Auth(user): Auth) -> Json<AuthTestResponse> {
    Json(AuthTestResponse {
        status: "authenticated".to_string(),
        user_id: user.telegram_id(),
        timestamp: Utc::now(),
    })
}

/// Verify launch data carrying a shared contact.
///
/// The initData must carry a `contact` record (e.g. from `requestContact`)
/// instead of a `user` record.
#[utoipa::path(
    post,
    path = "/v1/auth/contact",
    tag = "Authentication",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Verified contact", body = ContactResponse),
        (status = 401, description = "Unauthorized - invalid, expired or missing initData"),
    )
)]
pub async fn verify_contact(ContactAuth(contact): ContactAuth) -> Json<ContactResponse> {
    Json(contact.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::authenticated_user;

    #[test]
    fn auth_me_response_from_authenticated_user() {
        let response: AuthMeResponse = authenticated_user(42, "Ann").into();

        assert_eq!(response.telegram_id, 42);
        assert_eq!(response.first_name, "Ann");
        assert_eq!(response.user.id, 42);
        assert_eq!(response.last_name, None);
    }

    #[tokio::test]
    async fn test_auth_reports_user_id() {
        let Json(response) = test_auth(Auth(authenticated_user(7, "Bob"))).await;
        assert_eq!(response.status, "authenticated");
        assert_eq!(response.user_id, 7);
    }
}
