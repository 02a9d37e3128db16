// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified launch data and the identities carried inside it.
//!
//! [`VerifiedLaunchData`], [`AuthenticatedUser`] and [`VerifiedContact`] have
//! private fields and constructors visible only to the `auth` module, so the
//! only way to obtain one is a successful run of
//! [`LaunchDataVerifier`](super::LaunchDataVerifier).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Telegram user profile embedded in the `user` field of initData.
///
/// See: https://core.telegram.org/bots/webapps#webappuser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TelegramUser {
    /// Telegram user identifier
    pub id: i64,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// IETF language tag of the user's client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bot: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allows_write_to_pm: Option<bool>,
}

/// Contact shared by the user through `requestContact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TelegramContact {
    pub phone_number: String,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Telegram user the contact belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// The full field set of a launch payload that passed signature and
/// freshness checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedLaunchData {
    auth_date: DateTime<Utc>,
    query_id: Option<String>,
    user: Option<TelegramUser>,
    contact: Option<TelegramContact>,
    extra: BTreeMap<String, String>,
}

impl VerifiedLaunchData {
    pub(super) fn new(
        auth_date: DateTime<Utc>,
        query_id: Option<String>,
        user: Option<TelegramUser>,
        contact: Option<TelegramContact>,
        extra: BTreeMap<String, String>,
    ) -> Self {
        Self {
            auth_date,
            query_id,
            user,
            contact,
            extra,
        }
    }

    /// When Telegram issued the payload.
    pub fn auth_date(&self) -> DateTime<Utc> {
        self.auth_date
    }

    pub fn query_id(&self) -> Option<&str> {
        self.query_id.as_deref()
    }

    pub fn user(&self) -> Option<&TelegramUser> {
        self.user.as_ref()
    }

    pub fn contact(&self) -> Option<&TelegramContact> {
        self.contact.as_ref()
    }

    /// A signed scalar field not otherwise modelled (e.g. `chat_instance`,
    /// `start_param`), exactly as decoded from the query string.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }

    /// All signed scalar fields not otherwise modelled.
    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}

/// A caller whose launch data verified and carried a `user` record.
///
/// This is the only trusted source of caller identity for request handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    user: TelegramUser,
    launch_data: VerifiedLaunchData,
}

impl AuthenticatedUser {
    /// Returns `None` when the payload carries no `user` record.
    pub(super) fn from_launch_data(launch_data: VerifiedLaunchData) -> Option<Self> {
        let user = launch_data.user.clone()?;
        Some(Self { user, launch_data })
    }

    /// Verified Telegram user id.
    pub fn telegram_id(&self) -> i64 {
        self.user.id
    }

    pub fn user(&self) -> &TelegramUser {
        &self.user
    }

    pub fn launch_data(&self) -> &VerifiedLaunchData {
        &self.launch_data
    }

    pub fn into_user(self) -> TelegramUser {
        self.user
    }
}

/// Launch data that verified and carried a `contact` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedContact {
    contact: TelegramContact,
    launch_data: VerifiedLaunchData,
}

impl VerifiedContact {
    /// Returns `None` when the payload carries no `contact` record.
    pub(super) fn from_launch_data(launch_data: VerifiedLaunchData) -> Option<Self> {
        let contact = launch_data.contact.clone()?;
        Some(Self {
            contact,
            launch_data,
        })
    }

    pub fn contact(&self) -> &TelegramContact {
        &self.contact
    }

    pub fn launch_data(&self) -> &VerifiedLaunchData {
        &self.launch_data
    }

    pub fn into_contact(self) -> TelegramContact {
        self.contact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> TelegramUser {
        TelegramUser {
            id: 42,
            first_name: "Ann".to_string(),
            last_name: None,
            username: Some("ann".to_string()),
            language_code: Some("en".to_string()),
            photo_url: None,
            is_bot: None,
            is_premium: None,
            allows_write_to_pm: None,
        }
    }

    fn sample_launch_data(user: Option<TelegramUser>) -> VerifiedLaunchData {
        let mut extra = BTreeMap::new();
        extra.insert("chat_instance".to_string(), "-100".to_string());
        VerifiedLaunchData::new(
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            Some("AAE".to_string()),
            user,
            None,
            extra,
        )
    }

    #[test]
    fn authenticated_user_requires_user_record() {
        assert!(AuthenticatedUser::from_launch_data(sample_launch_data(None)).is_none());

        let user = AuthenticatedUser::from_launch_data(sample_launch_data(Some(sample_user())))
            .expect("user record present");
        assert_eq!(user.telegram_id(), 42);
        assert_eq!(user.launch_data().query_id(), Some("AAE"));
        assert_eq!(user.launch_data().field("chat_instance"), Some("-100"));
    }

    #[test]
    fn verified_contact_requires_contact_record() {
        assert!(VerifiedContact::from_launch_data(sample_launch_data(None)).is_none());
    }

    #[test]
    fn telegram_user_skips_absent_optionals_when_serialized() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 42,
                "first_name": "Ann",
                "username": "ann",
                "language_code": "en"
            })
        );
    }
}
