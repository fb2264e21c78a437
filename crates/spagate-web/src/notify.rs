// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Notice seam.

/// Shows transient error notices to the viewer.
pub trait Notifier: Send + Sync {
    /// Shows an error notice.
    fn error(&self, message: &str);
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

/// Notifier that writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(notice = %message, "Guard notice");
    }
}
