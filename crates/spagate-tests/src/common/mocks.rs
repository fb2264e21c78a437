// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Recording collaborators for the guard and a storage backend that fails on
//! demand.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use spagate_core::{KeyValueBackend, MemoryBackend, StoreError, StoreResult};
use spagate_web::{Navigator, Notifier};

/// Callback run after a navigation is recorded.
pub type NavigationHook = Box<dyn Fn(&str) + Send + Sync>;

// =============================================================================
// RecordingNavigator
// =============================================================================

/// Navigator that records every location it is asked to open.
#[derive(Default)]
pub struct RecordingNavigator {
    locations: Mutex<Vec<String>>,
    hook: Mutex<Option<NavigationHook>>,
}

impl RecordingNavigator {
    /// Creates a navigator with no hook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `hook` after each recorded navigation.
    ///
    /// The hook runs without any lock of the navigator held, so it may call
    /// back into the guard that triggered the navigation.
    pub fn set_hook(&self, hook: impl Fn(&str) + Send + Sync + 'static) {
        *self.hook.lock() = Some(Box::new(hook));
    }

    /// Returns every recorded location.
    pub fn locations(&self) -> Vec<String> {
        self.locations.lock().clone()
    }

    /// Returns the last recorded location.
    pub fn last(&self) -> Option<String> {
        self.locations.lock().last().cloned()
    }

    /// Returns the number of recorded navigations.
    pub fn count(&self) -> usize {
        self.locations.lock().len()
    }
}

impl Navigator for RecordingNavigator {
    fn replace(&self, path: &str) {
        self.locations.lock().push(path.to_string());

        let hook = self.hook.lock().take();
        if let Some(hook) = hook {
            hook(path);
            let mut slot = self.hook.lock();
            if slot.is_none() {
                *slot = Some(hook);
            }
        }
    }
}

// =============================================================================
// RecordingNotifier
// =============================================================================

/// Notifier that records every notice.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Creates an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded notice.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Returns the number of recorded notices.
    pub fn count(&self) -> usize {
        self.messages.lock().len()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

// =============================================================================
// FlakyBackend
// =============================================================================

/// In-memory backend whose writes can be made to fail.
#[derive(Debug, Default)]
pub struct FlakyBackend {
    inner: MemoryBackend,
    fail_writes: AtomicBool,
}

impl FlakyBackend {
    /// Creates a backend that accepts writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following write fail (quota exceeded).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueBackend for FlakyBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::backend(key, "storage quota exceeded"));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) {
        self.inner.remove(key)
    }
}
