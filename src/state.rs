// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::LaunchDataVerifier;
use crate::store::InMemoryStore;

/// Shared application state, built once at startup and cloned into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    /// Immutable after startup; verification needs no locking.
    pub verifier: Arc<LaunchDataVerifier>,
}

impl AppState {
    pub fn new(store: InMemoryStore, verifier: LaunchDataVerifier) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            verifier: Arc::new(verifier),
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::new(InMemoryStore::new(), crate::auth::testing::test_verifier())
    }
}
