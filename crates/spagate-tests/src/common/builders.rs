// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Builders

use std::sync::Arc;

use spagate_config::NoticeConfig;
use spagate_core::{
    KeyValueBackend, KeyValueSessionStore, MemoryBackend, RouteTable, SessionStore,
    StorageKeys, UnavailableBackend, UserProfile,
};
use spagate_web::GuardContext;

use super::harness::GuardHarness;
use super::mocks::{RecordingNavigator, RecordingNotifier};

// =============================================================================
// GuardHarnessBuilder
// =============================================================================

/// Builder for [`GuardHarness`].
pub struct GuardHarnessBuilder {
    backend: Arc<dyn KeyValueBackend>,
    keys: StorageKeys,
    token: Option<String>,
    profile: Option<UserProfile>,
    routes: RouteTable,
    notices: NoticeConfig,
}

impl Default for GuardHarnessBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GuardHarnessBuilder {
    /// Creates a builder over a fresh in-memory backend.
    pub fn new() -> Self {
        Self {
            backend: Arc::new(MemoryBackend::new()),
            keys: StorageKeys::default(),
            token: None,
            profile: None,
            routes: RouteTable::default(),
            notices: NoticeConfig::default(),
        }
    }

    /// Uses `backend` for storage.
    pub fn backend(mut self, backend: Arc<dyn KeyValueBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// Simulates a server-render context with no storage.
    pub fn without_storage(self) -> Self {
        self.backend(Arc::new(UnavailableBackend))
    }

    /// Uses custom storage keys.
    pub fn keys(mut self, keys: StorageKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Stores `token` before the harness is returned.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Caches `profile` before the harness is returned.
    pub fn profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Uses custom routes.
    pub fn routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Uses custom notices.
    pub fn notices(mut self, notices: NoticeConfig) -> Self {
        self.notices = notices;
        self
    }

    /// Turns every notice off.
    pub fn notices_disabled(mut self) -> Self {
        self.notices.enabled = false;
        self
    }

    /// Builds the harness.
    pub fn build(self) -> GuardHarness {
        let store: Arc<dyn SessionStore> =
            Arc::new(KeyValueSessionStore::with_keys(self.backend, self.keys));
        if let Some(token) = &self.token {
            store.write_token(token).expect("Failed to store token");
        }
        if let Some(profile) = &self.profile {
            store.write_profile(profile).expect("Failed to store profile");
        }

        let navigator = Arc::new(RecordingNavigator::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let ctx = GuardContext::new(store.clone(), navigator.clone(), notifier.clone())
            .with_routes(self.routes)
            .with_notices(self.notices);

        GuardHarness {
            store,
            navigator,
            notifier,
            ctx,
        }
    }
}
