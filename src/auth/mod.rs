// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! This module authenticates Telegram Mini App users from the launch data
//! (initData) the Telegram client hands to the web app.
//!
//! ## Auth Flow
//!
//! 1. Telegram opens the mini app and passes a signed initData query string
//! 2. Frontend sends `Authorization: Bearer <initData>`
//! 3. Server:
//!    - Recomputes the HMAC-SHA256 signature with the bot token
//!    - Compares it with the supplied `hash` in constant time
//!    - Checks `auth_date` is no older than the configured max age
//!    - Extracts:
//!      - `user.id` → canonical Telegram user id
//!      - `contact` record for contact-sharing flows
//!
//! ## Security
//!
//! - Handlers only ever see identities produced by [`LaunchDataVerifier`]
//! - Every rejection is the same opaque 401; the reason is logged server-side
//! - No clock-skew tolerance for `auth_date`

pub mod error;
pub mod extractor;
pub mod launch_data;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{AuthError, ConfigurationError};
pub use extractor::{Auth, ContactAuth};
pub use launch_data::{
    AuthenticatedUser, TelegramContact, TelegramUser, VerifiedContact, VerifiedLaunchData,
};
pub use verifier::{LaunchDataVerifier, DEFAULT_MAX_AUTH_AGE_SECS};
