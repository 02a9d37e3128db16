// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Test helpers that sign launch data the way the Telegram client does.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{AuthenticatedUser, LaunchDataVerifier};

pub const TEST_BOT_TOKEN: &str = "TESTTOKEN";

fn hmac_sha256(key: &[u8], message: &[u8]) -> Vec<u8> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).unwrap();
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

/// Encode `pairs` as a query string and append a valid `hash`.
///
/// Pairs with a blank value are encoded but left out of the signature.
pub fn sign_launch_data(bot_token: &str, pairs: &[(&str, &str)]) -> String {
    let mut lines: Vec<String> = pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    lines.sort();

    let secret_key = hmac_sha256(b"WebAppData", bot_token.as_bytes());
    let hash = hex::encode(hmac_sha256(&secret_key, lines.join("\n").as_bytes()));

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    serializer.extend_pairs(pairs.iter().copied());
    serializer.append_pair("hash", &hash);
    serializer.finish()
}

pub fn user_json(id: i64, first_name: &str) -> String {
    serde_json::json!({ "id": id, "first_name": first_name }).to_string()
}

/// Signed launch data for `id`, issued now.
pub fn user_launch_data(id: i64, first_name: &str) -> String {
    let auth_date = chrono::Utc::now().timestamp().to_string();
    sign_launch_data(
        TEST_BOT_TOKEN,
        &[
            ("user", user_json(id, first_name).as_str()),
            ("auth_date", auth_date.as_str()),
        ],
    )
}

pub fn test_verifier() -> LaunchDataVerifier {
    LaunchDataVerifier::new(TEST_BOT_TOKEN).unwrap()
}

/// An identity obtained through a real verification run.
pub fn authenticated_user(id: i64, first_name: &str) -> AuthenticatedUser {
    test_verifier()
        .authenticate(&user_launch_data(id, first_name))
        .unwrap()
}
