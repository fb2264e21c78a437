// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Page guard.
//!
//! [`RoleGuard`] wraps [`evaluate_access`] with the side effects a page needs:
//! clearing a dead session, showing a notice and navigating away. One guard
//! instance lives as long as the page it protects.
//!
//! # Lifecycle
//!
//! ```text
//! new ──► mount ──► evaluate ──► (set_permitted / set_options ──► evaluate)* ──► unmount
//! ```
//!
//! Each evaluation takes a generation number. Its decision is committed only
//! if no newer evaluation started in the meantime and the guard is still
//! mounted.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use spagate_config::{GuardConfig, NoticeConfig};
use spagate_core::{
    evaluate_access, permits, AccessDecision, EvaluateOptions, Evaluation, GuardError, Outcome,
    Role, RouteTable, SessionStore,
};

use crate::navigate::Navigator;
use crate::notify::Notifier;

// =============================================================================
// GuardContext
// =============================================================================

/// Collaborators shared by every guard on a page.
#[derive(Clone)]
pub struct GuardContext {
    /// Session store holding the token and the cached profile.
    pub store: Arc<dyn SessionStore>,
    /// Navigation seam.
    pub navigator: Arc<dyn Navigator>,
    /// Notice seam.
    pub notifier: Arc<dyn Notifier>,
    /// Redirect targets.
    pub routes: RouteTable,
    /// Notice texts.
    pub notices: NoticeConfig,
}

impl GuardContext {
    /// Creates a context with default routes and notices.
    pub fn new(
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            navigator,
            notifier,
            routes: RouteTable::default(),
            notices: NoticeConfig::default(),
        }
    }

    /// Creates a context from a loaded configuration.
    pub fn from_config(
        config: &GuardConfig,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::new(store, navigator, notifier)
            .with_routes(config.routes.clone())
            .with_notices(config.notices.clone())
    }

    /// Sets the redirect targets.
    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Sets the notice texts.
    pub fn with_notices(mut self, notices: NoticeConfig) -> Self {
        self.notices = notices;
        self
    }
}

impl std::fmt::Debug for GuardContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardContext")
            .field("routes", &self.routes)
            .field("notices_enabled", &self.notices.enabled)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// GuardOptions
// =============================================================================

/// Per-guard options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardOptions {
    /// Never show notices from this guard.
    pub suppress_notices: bool,
}

impl GuardOptions {
    /// Options for a guard that probes without notices.
    pub fn silent() -> Self {
        Self {
            suppress_notices: true,
        }
    }
}

// =============================================================================
// RoleGuard
// =============================================================================

#[derive(Debug, Default)]
struct GuardState {
    committed: AccessDecision,
    last_redirect: Option<String>,
}

/// Guard for a page restricted to a set of roles.
pub struct RoleGuard {
    ctx: GuardContext,
    permitted: Mutex<Vec<Role>>,
    options: Mutex<GuardOptions>,
    // Lock order: `state` is never taken while `permitted` is held.
    state: Mutex<GuardState>,
    generation: AtomicU64,
    mounted: AtomicBool,
    session_notice_shown: AtomicBool,
    unauthorised_notice_shown: AtomicBool,
}

impl RoleGuard {
    /// Creates an unmounted guard. An empty `permitted` list admits any role.
    pub fn new(permitted: Vec<Role>, ctx: GuardContext, options: GuardOptions) -> Self {
        Self {
            ctx,
            permitted: Mutex::new(permitted),
            options: Mutex::new(options),
            state: Mutex::new(GuardState::default()),
            generation: AtomicU64::new(0),
            mounted: AtomicBool::new(false),
            session_notice_shown: AtomicBool::new(false),
            unauthorised_notice_shown: AtomicBool::new(false),
        }
    }

    /// Marks the guard active and runs the first evaluation.
    pub fn mount(&self) -> Evaluation {
        self.mount_at(Utc::now())
    }

    /// Like [`mount`](Self::mount), evaluating at `now`.
    pub fn mount_at(&self, now: DateTime<Utc>) -> Evaluation {
        self.mounted.store(true, Ordering::SeqCst);
        self.evaluate_at(now)
    }

    /// Marks the guard inactive. Pending commits are dropped.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    /// Returns `true` while the guard is mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Replaces the permitted roles, re-evaluating if they changed.
    pub fn set_permitted(&self, roles: Vec<Role>) -> Option<Evaluation> {
        {
            let mut permitted = self.permitted.lock();
            if *permitted == roles {
                return None;
            }
            *permitted = roles;
        }
        self.reevaluate()
    }

    /// Replaces the options, re-evaluating if they changed.
    pub fn set_options(&self, options: GuardOptions) -> Option<Evaluation> {
        {
            let mut current = self.options.lock();
            if *current == options {
                return None;
            }
            *current = options;
        }
        self.reevaluate()
    }

    fn reevaluate(&self) -> Option<Evaluation> {
        if self.is_mounted() {
            Some(self.evaluate())
        } else {
            None
        }
    }

    /// Runs one evaluation against the wall clock.
    pub fn evaluate(&self) -> Evaluation {
        self.evaluate_at(Utc::now())
    }

    /// Runs one evaluation at `now`.
    ///
    /// Side effects are skipped entirely when the guard is not mounted.
    pub fn evaluate_at(&self, now: DateTime<Utc>) -> Evaluation {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let permitted = self.permitted.lock().clone();
        let options = *self.options.lock();

        let token = self.ctx.store.read_token();
        let evaluate_options = EvaluateOptions::new(self.ctx.routes.clone()).at(now);
        let evaluation = evaluate_access(token.as_deref(), &permitted, &evaluate_options);

        if !self.is_mounted() {
            tracing::debug!(generation, "Guard not mounted, skipping side effects");
            return evaluation;
        }

        match &evaluation.outcome {
            Outcome::Granted => {
                tracing::debug!(
                    generation,
                    role = ?evaluation.decision.role,
                    "Access granted"
                );
                self.state.lock().last_redirect = None;
            }
            Outcome::Redirect {
                to,
                reason,
                clear_session,
            } => {
                tracing::info!(
                    generation,
                    reason = reason.code(),
                    location = %to,
                    clear_session = *clear_session,
                    "Access denied"
                );
                if *clear_session {
                    self.ctx.store.clear();
                }
                self.notify_once(reason, options);
                self.redirect(to);
            }
        }

        self.commit(generation, evaluation.decision);
        evaluation
    }

    fn notify_once(&self, reason: &GuardError, options: GuardOptions) {
        if options.suppress_notices || !self.ctx.notices.enabled {
            return;
        }

        let notice = reason.notice();
        let shown = if notice.is_session_notice() {
            &self.session_notice_shown
        } else {
            &self.unauthorised_notice_shown
        };
        if !shown.swap(true, Ordering::SeqCst) {
            self.ctx.notifier.error(self.ctx.notices.message(notice));
        }
    }

    fn redirect(&self, to: &str) {
        {
            let mut state = self.state.lock();
            if state.last_redirect.as_deref() == Some(to) {
                tracing::debug!(location = %to, "Redirect already issued");
                return;
            }
            state.last_redirect = Some(to.to_string());
        }
        // The state lock is released: a navigator may re-enter the guard.
        self.ctx.navigator.replace(to);
    }

    fn commit(&self, generation: u64, decision: AccessDecision) {
        let mut state = self.state.lock();
        if self.generation.load(Ordering::SeqCst) != generation || !self.is_mounted() {
            tracing::debug!(generation, "Dropping stale guard decision");
            return;
        }
        state.committed = decision;
    }

    /// Returns the current decision.
    ///
    /// `is_authorized` is derived from the committed role and the current
    /// permitted roles.
    pub fn decision(&self) -> AccessDecision {
        let committed = self.state.lock().committed;
        if committed.is_loading {
            return committed;
        }
        let is_authorized = match committed.role {
            Some(role) => committed.is_authorized && permits(&self.permitted.lock(), role),
            None => false,
        };
        AccessDecision {
            is_authorized,
            ..committed
        }
    }

    /// Returns the permitted roles.
    pub fn permitted(&self) -> Vec<Role> {
        self.permitted.lock().clone()
    }
}

impl std::fmt::Debug for RoleGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleGuard")
            .field("permitted", &*self.permitted.lock())
            .field("mounted", &self.is_mounted())
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
