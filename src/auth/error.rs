// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Every rejection is rendered to the client as the same opaque 401. The
//! specific reason is only ever written to the server log, so a caller cannot
//! use the responses as an oracle against the signature scheme.

use axum::{
    http::{header::WWW_AUTHENTICATE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message returned to the client for every authentication failure.
pub const CLIENT_ERROR_MESSAGE: &str = "Authentication failed";

/// Reason a launch-data credential was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is required")]
    MissingAuthHeader,
    /// Authorization header is not `Bearer <initData>`
    #[error("Invalid authorization header format (expected 'Bearer <initData>')")]
    InvalidAuthHeader,
    #[error("Launch data is empty")]
    EmptyData,
    #[error("Hash not found in launch data")]
    NoHash,
    #[error("Hash in launch data is empty")]
    EmptyHash,
    #[error("Launch data hash does not match")]
    InvalidHash,
    #[error("Auth date not found in launch data")]
    NoAuthDate,
    #[error("Auth date is not a valid Unix timestamp")]
    InvalidAuthDate,
    /// Older than the configured max age, or dated in the future
    #[error("Launch data expired")]
    Expired,
    #[error("User data not found in launch data")]
    NoUserData,
    #[error("User data is not a valid JSON object")]
    InvalidUserData,
    #[error("User data is missing id or first_name")]
    IncompleteUserData,
    #[error("Contact data not found in launch data")]
    NoContactData,
    #[error("Contact data is not a valid JSON object")]
    InvalidContactData,
    #[error("Contact data is missing phone_number or first_name")]
    IncompleteContactData,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
}

impl AuthError {
    /// Get the error code for this error. Logged, never sent to the client.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::EmptyData => "empty_data",
            AuthError::NoHash => "no_hash",
            AuthError::EmptyHash => "empty_hash",
            AuthError::InvalidHash => "invalid_hash",
            AuthError::NoAuthDate => "no_auth_date",
            AuthError::InvalidAuthDate => "invalid_auth_date",
            AuthError::Expired => "expired",
            AuthError::NoUserData => "no_user_data",
            AuthError::InvalidUserData => "invalid_user_data",
            AuthError::IncompleteUserData => "incomplete_user_data",
            AuthError::NoContactData => "no_contact_data",
            AuthError::InvalidContactData => "invalid_contact_data",
            AuthError::IncompleteContactData => "incomplete_contact_data",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::warn!(
            error_code = self.error_code(),
            reason = %self,
            "Rejected Telegram launch data"
        );

        let body = Json(AuthErrorBody {
            error: CLIENT_ERROR_MESSAGE,
        });
        (self.status_code(), [(WWW_AUTHENTICATE, "Bearer")], body).into_response()
    }
}

/// Fatal error raised while constructing the verifier at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Telegram bot token must not be empty")]
    EmptyBotToken,
    #[error("max auth age must be positive, got {0} seconds")]
    InvalidMaxAge(i64),
    #[error("failed to derive the launch data signing key")]
    KeyDerivation,
}
