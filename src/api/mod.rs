// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{TelegramContact, TelegramUser},
    models::{
        CreateUserRequest, PreferenceValue, PreferencesUpdate, UpdateUserRequest, UserPreferences,
        UserProfile,
    },
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/auth/me", get(auth::get_me))
        .route("/auth/test", post(auth::test_auth))
        .route("/auth/contact", post(auth::verify_contact))
        .route("/users", post(users::create_user))
        .route("/users/me", get(users::get_current_user))
        .route("/users/me/preferences", patch(users::update_preferences))
        .route("/users/me/preferences/{key}", get(users::get_preference))
        .route(
            "/users/{telegram_id}",
            get(users::get_user).put(users::update_user),
        )
        .with_state(state);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Registers the `bearer` scheme used by every authenticated path.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("Telegram initData")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::root,
        health::health,
        health::liveness,
        auth::get_me,
        auth::test_auth,
        auth::verify_contact,
        users::create_user,
        users::get_current_user,
        users::get_user,
        users::update_user,
        users::update_preferences,
        users::get_preference
    ),
    components(
        schemas(
            TelegramUser,
            TelegramContact,
            UserProfile,
            UserPreferences,
            PreferencesUpdate,
            PreferenceValue,
            CreateUserRequest,
            UpdateUserRequest,
            auth::AuthMeResponse,
            auth::AuthTestResponse,
            auth::ContactResponse,
            health::HealthResponse,
            health::ServiceInfo
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Telegram initData verification"),
        (name = "Users", description = "Self-service user profiles"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;
