// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for Telegram-authenticated callers.
//!
//! Use the `Auth` extractor in handlers to require a verified user:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, AuthenticatedUser, VerifiedContact};
use crate::state::AppState;

/// Authorization schemes accepted in front of the initData string.
const ACCEPTED_SCHEMES: [&str; 2] = ["bearer", "tma"];

/// Extractor for authenticated users.
///
/// Reads `Authorization: Bearer <initData>` and runs it through the shared
/// [`LaunchDataVerifier`](super::LaunchDataVerifier). The launch data must
/// carry a `user` record.
///
/// # Example
///
/// ```rust,ignore
/// async fn get_profile(
///     Auth(user): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<UserProfile>, ApiError> {
///     // user.telegram_id() is the only trusted identity
/// }
/// ```
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let init_data = init_data_credentials(parts)?;
        let user = state.verifier.authenticate(init_data)?;

        tracing::debug!(telegram_id = user.telegram_id(), "Authenticated Telegram user");
        Ok(Auth(user))
    }
}

/// Extractor for contact-sharing flows.
///
/// Same as [`Auth`] but the launch data must carry a `contact` record instead
/// of a `user` record.
pub struct ContactAuth(pub VerifiedContact);

impl FromRequestParts<AppState> for ContactAuth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let init_data = init_data_credentials(parts)?;
        let contact = state.verifier.authenticate_contact(init_data)?;

        tracing::debug!(
            contact_user_id = contact.contact().user_id,
            "Verified Telegram contact"
        );
        Ok(ContactAuth(contact))
    }
}

/// Extract the initData string from the Authorization header.
fn init_data_credentials(parts: &Parts) -> Result<&str, AuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let (scheme, credentials) = auth_header
        .split_once(' ')
        .ok_or(AuthError::InvalidAuthHeader)?;

    if !ACCEPTED_SCHEMES
        .iter()
        .any(|accepted| scheme.eq_ignore_ascii_case(accepted))
    {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok(credentials.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::{sign_launch_data, user_launch_data, TEST_BOT_TOKEN};
    use crate::state::AppState;
    use axum::http::Request;

    fn parts_with_auth(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = header {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let state = AppState::for_tests();
        let mut parts = parts_with_auth(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_unknown_scheme() {
        let state = AppState::for_tests();
        let header = format!("Basic {}", user_launch_data(42, "Ann"));
        let mut parts = parts_with_auth(Some(&header));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_header_without_credentials() {
        let state = AppState::for_tests();
        let mut parts = parts_with_auth(Some("Bearer"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_succeeds_with_signed_init_data() {
        let state = AppState::for_tests();
        let header = format!("Bearer {}", user_launch_data(42, "Ann"));
        let mut parts = parts_with_auth(Some(&header));

        let Auth(user) = Auth::from_request_parts(&mut parts, &state)
            .await
            .expect("signed launch data is accepted");
        assert_eq!(user.telegram_id(), 42);
    }

    #[tokio::test]
    async fn auth_extractor_accepts_tma_scheme() {
        let state = AppState::for_tests();
        let header = format!("tma {}", user_launch_data(7, "Bob"));
        let mut parts = parts_with_auth(Some(&header));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert_eq!(result.map(|Auth(user)| user.telegram_id()).ok(), Some(7));
    }

    #[tokio::test]
    async fn auth_extractor_propagates_verification_failure() {
        let state = AppState::for_tests();
        let mut parts = parts_with_auth(Some("Bearer auth_date=1&hash=00"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidHash)));
    }

    #[tokio::test]
    async fn contact_extractor_requires_contact_record() {
        let state = AppState::for_tests();
        let header = format!("Bearer {}", user_launch_data(42, "Ann"));
        let mut parts = parts_with_auth(Some(&header));

        let result = ContactAuth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::NoContactData)));
    }

    #[tokio::test]
    async fn contact_extractor_succeeds_with_contact() {
        let state = AppState::for_tests();
        let auth_date = chrono::Utc::now().timestamp().to_string();
        let init_data = sign_launch_data(
            TEST_BOT_TOKEN,
            &[
                ("contact", r#"{"phone_number":"+15550100","first_name":"Ann"}"#),
                ("auth_date", auth_date.as_str()),
            ],
        );
        let header = format!("Bearer {init_data}");
        let mut parts = parts_with_auth(Some(&header));

        let ContactAuth(contact) = ContactAuth::from_request_parts(&mut parts, &state)
            .await
            .expect("signed contact is accepted");
        assert_eq!(contact.contact().phone_number, "+15550100");
    }
}
