// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures for the user profile API. All types
//! derive `ToSchema` for OpenAPI documentation.
//!
//! Identity fields (`telegram_id`, names, username, photo) are seeded from
//! the verified launch data, never from a request body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Preferences
// =============================================================================

/// Per-user application preferences.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserPreferences {
    pub language: String,
    pub dark_mode: bool,
    pub notifications: bool,
    pub timezone: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            language: "ru".to_string(),
            dark_mode: false,
            notifications: true,
            timezone: "UTC+5".to_string(),
        }
    }
}

impl UserPreferences {
    /// Overwrite only the preferences present in `update`.
    pub fn merge(&mut self, update: PreferencesUpdate) {
        if let Some(language) = update.language {
            self.language = language;
        }
        if let Some(dark_mode) = update.dark_mode {
            self.dark_mode = dark_mode;
        }
        if let Some(notifications) = update.notifications {
            self.notifications = notifications;
        }
        if let Some(timezone) = update.timezone {
            self.timezone = timezone;
        }
    }

    /// Look up a single preference by its JSON name.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        match key {
            "language" => Some(self.language.clone().into()),
            "dark_mode" => Some(self.dark_mode.into()),
            "notifications" => Some(self.notifications.into()),
            "timezone" => Some(self.timezone.clone().into()),
            _ => None,
        }
    }
}

/// Partial preferences update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PreferencesUpdate {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub dark_mode: Option<bool>,
    #[serde(default)]
    pub notifications: Option<bool>,
    #[serde(default)]
    pub timezone: Option<String>,
}

// =============================================================================
// User Profile
// =============================================================================

/// A stored user profile, keyed by Telegram user id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserProfile {
    pub telegram_id: i64,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    pub preferences: UserPreferences,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating the caller's own profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Merged over the default preferences.
    #[serde(default)]
    pub preferences: Option<PreferencesUpdate>,
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// A single preference value.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PreferenceValue {
    pub key: String,
    pub value: serde_json::Value,
}
