// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Guard Harness
//!
//! A [`GuardContext`] whose navigator and notifier record what the guard did.

use std::sync::Arc;

use spagate_core::{Role, SessionStore};
use spagate_web::{GuardContext, GuardOptions, RoleGuard};

use super::mocks::{RecordingNavigator, RecordingNotifier};

/// Guard collaborators plus handles to inspect them.
pub struct GuardHarness {
    /// Session store shared with the context.
    pub store: Arc<dyn SessionStore>,
    /// Recording navigator shared with the context.
    pub navigator: Arc<RecordingNavigator>,
    /// Recording notifier shared with the context.
    pub notifier: Arc<RecordingNotifier>,
    /// Context handed to guards and flows.
    pub ctx: GuardContext,
}

impl GuardHarness {
    /// Creates an unmounted guard with default options.
    pub fn guard(&self, permitted: &[Role]) -> Arc<RoleGuard> {
        self.guard_with(permitted, GuardOptions::default())
    }

    /// Creates an unmounted guard with the given options.
    pub fn guard_with(&self, permitted: &[Role], options: GuardOptions) -> Arc<RoleGuard> {
        Arc::new(RoleGuard::new(permitted.to_vec(), self.ctx.clone(), options))
    }

    /// Replaces the stored token.
    pub fn store_token(&self, token: &str) {
        self.store
            .write_token(token)
            .expect("Failed to store token");
    }

    /// Every navigation so far.
    pub fn locations(&self) -> Vec<String> {
        self.navigator.locations()
    }

    /// Every notice so far.
    pub fn notices(&self) -> Vec<String> {
        self.notifier.messages()
    }
}
