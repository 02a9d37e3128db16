// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User profile endpoints.
//!
//! The verified Telegram id from [`Auth`] is the only key used for writes.
//! A request that targets another user's profile is rejected with 403.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{Auth, AuthenticatedUser},
    error::ApiError,
    models::{
        CreateUserRequest, PreferenceValue, PreferencesUpdate, UpdateUserRequest, UserPreferences,
        UserProfile,
    },
    state::AppState,
};

/// Reject writes to a profile the caller does not own.
fn ensure_owner(caller: &AuthenticatedUser, telegram_id: i64) -> Result<(), ApiError> {
    if caller.telegram_id() == telegram_id {
        return Ok(());
    }

    tracing::warn!(
        caller = caller.telegram_id(),
        target = telegram_id,
        "Rejected update of another user's profile"
    );
    Err(ApiError::forbidden("You can only modify your own profile"))
}

/// Create the caller's profile.
///
/// Name, username and photo come from the verified launch data; the body
/// only supplies the phone number and preference overrides.
#[utoipa::path(
    post,
    path = "/v1/users",
    request_body = CreateUserRequest,
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 201, body = UserProfile),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Profile already exists"),
    )
)]
pub async fn create_user(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    let mut store = state.store.write().await;
    let profile = store.create_user(&user, request)?;
    tracing::info!(telegram_id = profile.telegram_id, "Created user profile");
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Get the caller's own profile.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = UserProfile),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not created yet"),
    )
)]
pub async fn get_current_user(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.user(user.telegram_id())?))
}

#[utoipa::path(
    get,
    path = "/v1/users/{telegram_id}",
    params(
        ("telegram_id" = i64, Path, description = "Telegram user id")
    ),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = UserProfile),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
    )
)]
pub async fn get_user(
    Auth(_caller): Auth,
    Path(telegram_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.user(telegram_id)?))
}

/// Update a profile. Only the owner may update it.
#[utoipa::path(
    put,
    path = "/v1/users/{telegram_id}",
    params(
        ("telegram_id" = i64, Path, description = "Telegram user id; must be the caller's")
    ),
    request_body = UpdateUserRequest,
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = UserProfile),
        (status = 400, description = "Invalid update"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Profile belongs to another user"),
        (status = 404, description = "User not found"),
    )
)]
pub async fn update_user(
    Auth(caller): Auth,
    Path(telegram_id): Path<i64>,
    State(state): State<AppState>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    ensure_owner(&caller, telegram_id)?;

    let mut store = state.store.write().await;
    Ok(Json(store.update_user(telegram_id, request)?))
}

/// Merge preference changes into the caller's profile.
#[utoipa::path(
    patch,
    path = "/v1/users/me/preferences",
    request_body = PreferencesUpdate,
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = UserPreferences),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not created yet"),
    )
)]
pub async fn update_preferences(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<UserPreferences>, ApiError> {
    let mut store = state.store.write().await;
    Ok(Json(store.update_preferences(user.telegram_id(), update)?))
}

#[utoipa::path(
    get,
    path = "/v1/users/me/preferences/{key}",
    params(
        ("key" = String, Path, description = "Preference name, e.g. `language`")
    ),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = PreferenceValue),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile or preference not found"),
    )
)]
pub async fn get_preference(
    Auth(user): Auth,
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PreferenceValue>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.preference(user.telegram_id(), &key)?))
}
