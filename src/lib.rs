// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Telegram Mini App Server
//!
//! Backend for a Telegram Mini App. Callers authenticate with the signed
//! launch data (initData) Telegram hands to the web app; the verified
//! Telegram identity then keys a small self-service profile API.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - initData verification and request extractors
//! - `config` - Environment configuration
//! - `server` - HTTP(S) serving and graceful shutdown
//! - `store` - In-memory user profile store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod state;
pub mod store;
