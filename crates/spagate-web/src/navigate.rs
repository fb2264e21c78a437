// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Navigation seam.

/// Replaces the current location.
///
/// Calls are fire-and-forget: the guard never waits for navigation to finish.
pub trait Navigator: Send + Sync {
    /// Navigates to `path` without adding a history entry.
    fn replace(&self, path: &str);
}

impl<T: Navigator + ?Sized> Navigator for std::sync::Arc<T> {
    fn replace(&self, path: &str) {
        (**self).replace(path)
    }
}

/// Navigator that only logs the requested location.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn replace(&self, path: &str) {
        tracing::info!(location = %path, "Navigation requested");
    }
}
