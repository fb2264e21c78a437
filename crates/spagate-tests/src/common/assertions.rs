// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions

use spagate_core::{AccessDecision, Evaluation, FailureKind, Outcome, Role};
use spagate_web::GateDecision;

// =============================================================================
// AccessDecision Assertions
// =============================================================================

/// Assertion extensions for [`AccessDecision`].
pub trait DecisionAssertions {
    /// Assert the page may render for `role`.
    fn assert_granted(&self, role: Role);

    /// Assert there is no usable session.
    fn assert_unauthenticated(&self);

    /// Assert a usable session for `role` that may not open the page.
    fn assert_forbidden(&self, role: Role);

    /// Assert no evaluation has been committed.
    fn assert_loading(&self);
}

impl DecisionAssertions for AccessDecision {
    fn assert_granted(&self, role: Role) {
        assert_eq!(
            *self,
            AccessDecision::resolved(role, true),
            "Expected access granted to {}",
            role
        );
    }

    fn assert_unauthenticated(&self) {
        assert_eq!(
            *self,
            AccessDecision::unauthenticated(),
            "Expected an unauthenticated decision"
        );
    }

    fn assert_forbidden(&self, role: Role) {
        assert_eq!(
            *self,
            AccessDecision::resolved(role, false),
            "Expected {} to be refused",
            role
        );
    }

    fn assert_loading(&self) {
        assert!(self.is_loading, "Expected a loading decision, got {:?}", self);
        assert!(!self.is_authorized);
        assert!(self.role.is_none());
    }
}

// =============================================================================
// Evaluation Assertions
// =============================================================================

/// Assertion extensions for [`Evaluation`].
pub trait EvaluationAssertions {
    /// Assert the evaluation grants access.
    fn assert_granted(&self);

    /// Assert a redirect to `to` with the given failure code.
    fn assert_redirect(&self, to: &str, code: &str);
}

impl EvaluationAssertions for Evaluation {
    fn assert_granted(&self) {
        assert_eq!(self.outcome, Outcome::Granted, "Expected Granted, got {:?}", self.outcome);
    }

    fn assert_redirect(&self, to: &str, code: &str) {
        match &self.outcome {
            Outcome::Redirect {
                to: target,
                reason,
                clear_session,
            } => {
                assert_eq!(target, to, "Unexpected redirect target");
                assert_eq!(reason.code(), code, "Unexpected failure code");
                assert_eq!(
                    *clear_session,
                    reason.kind() == FailureKind::Unauthenticated,
                    "Only unauthenticated sessions are cleared"
                );
            }
            Outcome::Granted => panic!("Expected redirect to {}, got Granted", to),
        }
    }
}

// =============================================================================
// Gate Assertions
// =============================================================================

/// Asserts the gate redirects to `location`.
pub fn assert_gate_redirect(decision: &GateDecision, location: &str) {
    assert_eq!(
        decision.location(),
        Some(location),
        "Expected gate redirect to {}, got {:?}",
        location,
        decision
    );
}

/// Asserts the gate lets the request through.
pub fn assert_gate_pass(decision: &GateDecision) {
    assert_eq!(*decision, GateDecision::Pass, "Expected gate pass");
}
