// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory user profile store.
//!
//! Profiles are keyed by the verified Telegram user id. Every mutating method
//! takes that id from an [`AuthenticatedUser`] or from a handler that has
//! already checked ownership; the store never trusts ids from request bodies.

use std::collections::HashMap;

use chrono::Utc;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{
    CreateUserRequest, PreferenceValue, PreferencesUpdate, UpdateUserRequest, UserPreferences,
    UserProfile,
};

#[derive(Default)]
pub struct InMemoryStore {
    users: HashMap<i64, UserProfile>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the caller's profile from their verified Telegram identity.
    pub fn create_user(
        &mut self,
        identity: &AuthenticatedUser,
        request: CreateUserRequest,
    ) -> Result<UserProfile, ApiError> {
        let telegram_id = identity.telegram_id();
        if self.users.contains_key(&telegram_id) {
            return Err(ApiError::conflict(
                "User with this telegram_id already exists.",
            ));
        }

        let mut preferences = UserPreferences::default();
        if let Some(update) = request.preferences {
            preferences.merge(update);
        }

        let user = identity.user();
        let now = Utc::now();
        let profile = UserProfile {
            telegram_id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            phone_number: request.phone_number,
            photo_url: user.photo_url.clone(),
            language_code: user.language_code.clone(),
            preferences,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(telegram_id, profile.clone());
        Ok(profile)
    }

    pub fn user(&self, telegram_id: i64) -> Result<UserProfile, ApiError> {
        self.users
            .get(&telegram_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    pub fn update_user(
        &mut self,
        telegram_id: i64,
        request: UpdateUserRequest,
    ) -> Result<UserProfile, ApiError> {
        if request
            .first_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(ApiError::bad_request("first_name must not be empty"));
        }

        let profile = self.profile_mut(telegram_id)?;
        if let Some(first_name) = request.first_name {
            profile.first_name = first_name;
        }
        if let Some(last_name) = request.last_name {
            profile.last_name = Some(last_name);
        }
        if let Some(phone_number) = request.phone_number {
            profile.phone_number = Some(phone_number);
        }
        if let Some(username) = request.username {
            profile.username = Some(username);
        }
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    pub fn update_preferences(
        &mut self,
        telegram_id: i64,
        update: PreferencesUpdate,
    ) -> Result<UserPreferences, ApiError> {
        let profile = self.profile_mut(telegram_id)?;
        profile.preferences.merge(update);
        profile.updated_at = Utc::now();
        Ok(profile.preferences.clone())
    }

    pub fn preference(&self, telegram_id: i64, key: &str) -> Result<PreferenceValue, ApiError> {
        let profile = self
            .users
            .get(&telegram_id)
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        let value = profile
            .preferences
            .get(key)
            .ok_or_else(|| ApiError::not_found(format!("Preference '{key}' not found")))?;

        Ok(PreferenceValue {
            key: key.to_string(),
            value,
        })
    }

    fn profile_mut(&mut self, telegram_id: i64) -> Result<&mut UserProfile, ApiError> {
        self.users
            .get_mut(&telegram_id)
            .ok_or_else(|| ApiError::not_found("User not found"))
    }
}
