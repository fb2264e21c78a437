// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Viewer roles.

use serde::{Deserialize, Serialize};

// =============================================================================
// Role
// =============================================================================

/// Coarse-grained permission category of a signed-in viewer.
///
/// The role decides which area of the product a session may open and where
/// the viewer lands after signing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Books treatments at spas.
    Customer,
    /// Runs a spa: services, staff, bookings and payouts.
    Owner,
    /// Moderates the marketplace.
    Admin,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Role; 3] = [Role::Customer, Role::Owner, Role::Admin];

    /// Returns the wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::Owner => "OWNER",
            Role::Admin => "ADMIN",
        }
    }

    /// Parses a role from its wire name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CUSTOMER" => Some(Role::Customer),
            "OWNER" => Some(Role::Owner),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| format!("unknown role '{}'", s))
    }
}

// =============================================================================
// Membership
// =============================================================================

/// Returns `true` if `role` may open a page gated to `permitted`.
///
/// An empty permitted list means any signed-in role.
pub fn permits(permitted: &[Role], role: Role) -> bool {
    permitted.is_empty() || permitted.contains(&role)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("CUSTOMER"), Some(Role::Customer));
        assert_eq!(Role::parse("owner"), Some(Role::Owner));
        assert_eq!(Role::parse(" Admin "), Some(Role::Admin));
        assert_eq!(Role::parse("superadmin"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_role_wire_format() {
        let json = serde_json::to_string(&Role::Owner).unwrap();
        assert_eq!(json, "\"OWNER\"");

        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_permits_empty_set_means_any_role() {
        for role in Role::ALL {
            assert!(permits(&[], role));
        }
    }

    #[test]
    fn test_permits_membership() {
        assert!(permits(&[Role::Owner, Role::Admin], Role::Admin));
        assert!(!permits(&[Role::Admin], Role::Customer));
    }
}
