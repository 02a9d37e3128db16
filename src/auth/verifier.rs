// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Telegram Web App launch data (initData) verification.
//!
//! ## Algorithm
//!
//! 1. Parse the query string (percent-decoded, last value wins per key)
//! 2. Remove `hash`; every other non-blank pair is rendered as `key=value`
//! 3. Sort the rendered lines and join them with `\n` (the data-check string)
//! 4. `secret_key = HMAC-SHA256(key = "WebAppData", msg = bot_token)`
//! 5. `hash = hex(HMAC-SHA256(key = secret_key, msg = data_check_string))`
//! 6. Compare with the supplied hash in constant time
//! 7. Check `auth_date` freshness, then decode the `user` / `contact` JSON
//!
//! JSON sub-records are only decoded once the signature has been accepted.
//!
//! Pairs with a blank value are left out of the data-check string. This
//! matches the behaviour of the clients seen so far but has not been confirmed
//! against Telegram's signing documentation.
//!
//! See: https://core.telegram.org/bots/webapps#validating-data-received-via-the-mini-app

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::{
    AuthError, AuthenticatedUser, ConfigurationError, TelegramContact, TelegramUser,
    VerifiedContact, VerifiedLaunchData,
};

type HmacSha256 = Hmac<Sha256>;

/// Key used to derive the secret key from the bot token.
const WEB_APP_DATA_KEY: &[u8] = b"WebAppData";

/// Default maximum age of launch data (24 hours).
pub const DEFAULT_MAX_AUTH_AGE_SECS: i64 = 86_400;

const HASH_KEY: &str = "hash";
const AUTH_DATE_KEY: &str = "auth_date";
const QUERY_ID_KEY: &str = "query_id";
const USER_KEY: &str = "user";
const CONTACT_KEY: &str = "contact";

/// Verifies Telegram launch data against a bot token.
///
/// Immutable after construction and safe to share between request handlers.
/// The bot token itself is not retained, only the MAC keyed with the secret
/// derived from it.
#[derive(Clone)]
pub struct LaunchDataVerifier {
    mac: HmacSha256,
    max_age_secs: i64,
}

impl fmt::Debug for LaunchDataVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchDataVerifier")
            .field("secret_key", &"<redacted>")
            .field("max_age_secs", &self.max_age_secs)
            .finish()
    }
}

impl LaunchDataVerifier {
    /// Create a verifier with the default 24 hour max age.
    pub fn new(bot_token: impl AsRef<[u8]>) -> Result<Self, ConfigurationError> {
        Self::with_max_age(bot_token, DEFAULT_MAX_AUTH_AGE_SECS)
    }

    /// Create a verifier accepting launch data up to `max_age_secs` old.
    pub fn with_max_age(
        bot_token: impl AsRef<[u8]>,
        max_age_secs: i64,
    ) -> Result<Self, ConfigurationError> {
        let bot_token = bot_token.as_ref();
        if bot_token.trim_ascii().is_empty() {
            return Err(ConfigurationError::EmptyBotToken);
        }
        if max_age_secs <= 0 {
            return Err(ConfigurationError::InvalidMaxAge(max_age_secs));
        }

        let mut derive = HmacSha256::new_from_slice(WEB_APP_DATA_KEY)
            .map_err(|_| ConfigurationError::KeyDerivation)?;
        derive.update(bot_token);
        let secret_key = derive.finalize().into_bytes();

        let mac = HmacSha256::new_from_slice(&secret_key)
            .map_err(|_| ConfigurationError::KeyDerivation)?;

        Ok(Self { mac, max_age_secs })
    }

    pub fn max_age_secs(&self) -> i64 {
        self.max_age_secs
    }

    /// Verify launch data against the current server time.
    pub fn verify(&self, raw: &str) -> Result<VerifiedLaunchData, AuthError> {
        self.verify_at(raw, Utc::now())
    }

    /// Verify launch data as of `now`.
    pub fn verify_at(&self, raw: &str, now: DateTime<Utc>) -> Result<VerifiedLaunchData, AuthError> {
        if raw.trim().is_empty() {
            return Err(AuthError::EmptyData);
        }

        let mut fields = parse_fields(raw);

        let received_hash = fields.remove(HASH_KEY).ok_or(AuthError::NoHash)?;
        if received_hash.is_empty() {
            return Err(AuthError::EmptyHash);
        }

        // Blank values take no part in signing and are treated as absent.
        fields.retain(|_, value| !value.is_empty());

        let expected_hash = self.sign(&data_check_string(&fields));
        if !bool::from(expected_hash.as_bytes().ct_eq(received_hash.as_bytes())) {
            return Err(AuthError::InvalidHash);
        }

        let auth_date = fields.remove(AUTH_DATE_KEY).ok_or(AuthError::NoAuthDate)?;
        let auth_date = self.check_freshness(&auth_date, now)?;

        let user = fields
            .remove(USER_KEY)
            .map(|raw| parse_user(&raw))
            .transpose()?;
        let contact = fields
            .remove(CONTACT_KEY)
            .map(|raw| parse_contact(&raw))
            .transpose()?;
        let query_id = fields.remove(QUERY_ID_KEY);

        Ok(VerifiedLaunchData::new(
            auth_date, query_id, user, contact, fields,
        ))
    }

    /// Verify launch data that must carry a `user` record.
    pub fn authenticate(&self, raw: &str) -> Result<AuthenticatedUser, AuthError> {
        self.authenticate_at(raw, Utc::now())
    }

    pub fn authenticate_at(
        &self,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedUser, AuthError> {
        let launch_data = self.verify_at(raw, now)?;
        AuthenticatedUser::from_launch_data(launch_data).ok_or(AuthError::NoUserData)
    }

    /// Verify launch data that must carry a `contact` record.
    pub fn authenticate_contact(&self, raw: &str) -> Result<VerifiedContact, AuthError> {
        self.authenticate_contact_at(raw, Utc::now())
    }

    pub fn authenticate_contact_at(
        &self,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<VerifiedContact, AuthError> {
        let launch_data = self.verify_at(raw, now)?;
        VerifiedContact::from_launch_data(launch_data).ok_or(AuthError::NoContactData)
    }

    /// Lowercase hex HMAC of a data-check string.
    fn sign(&self, data_check_string: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(data_check_string.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// No clock-skew tolerance: future-dated payloads are rejected.
    fn check_freshness(
        &self,
        auth_date: &str,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, AuthError> {
        let timestamp: i64 = auth_date.parse().map_err(|_| AuthError::InvalidAuthDate)?;
        let issued_at = DateTime::from_timestamp(timestamp, 0).ok_or(AuthError::InvalidAuthDate)?;

        let age = now.timestamp() - timestamp;
        if !(0..=self.max_age_secs).contains(&age) {
            return Err(AuthError::Expired);
        }

        Ok(issued_at)
    }
}

/// Decode `key=value` pairs. The last non-blank value of a repeated key wins;
/// a blank value is only kept when the key has no other value.
fn parse_fields(raw: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        if value.is_empty() {
            fields.entry(key.into_owned()).or_insert_with(String::new);
        } else {
            fields.insert(key.into_owned(), value.into_owned());
        }
    }
    fields
}

/// Sorted `key=value` lines joined by `\n`.
fn data_check_string(fields: &BTreeMap<String, String>) -> String {
    let mut lines: Vec<String> = fields
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    lines.sort_unstable();
    lines.join("\n")
}

fn parse_user(raw: &str) -> Result<TelegramUser, AuthError> {
    decode_record(
        raw,
        AuthError::InvalidUserData,
        AuthError::IncompleteUserData,
        |record| {
            record.get("id").is_some_and(Value::is_i64)
                && record.get("first_name").is_some_and(Value::is_string)
        },
    )
}

fn parse_contact(raw: &str) -> Result<TelegramContact, AuthError> {
    decode_record(
        raw,
        AuthError::InvalidContactData,
        AuthError::IncompleteContactData,
        |record| {
            record.get("phone_number").is_some_and(Value::is_string)
                && record.get("first_name").is_some_and(Value::is_string)
        },
    )
}

/// Decode a JSON object, checking required members before deserializing so
/// that a missing member is reported separately from malformed data.
fn decode_record<T: DeserializeOwned>(
    raw: &str,
    invalid: AuthError,
    incomplete: AuthError,
    is_complete: impl FnOnce(&Map<String, Value>) -> bool,
) -> Result<T, AuthError> {
    let value: Value = serde_json::from_str(raw).map_err(|_| invalid)?;
    let record = value.as_object().ok_or(invalid)?;
    if !is_complete(record) {
        return Err(incomplete);
    }

    serde_json::from_value(value).map_err(|_| invalid)
}
