// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Redirect targets.

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Sign-in route and the home route of each role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTable {
    /// Where unauthenticated, invalid and expired sessions are sent.
    pub sign_in: String,
    /// Customer home.
    pub customer_home: String,
    /// Owner home.
    pub owner_home: String,
    /// Admin home.
    pub admin_home: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            sign_in: "/login".to_string(),
            customer_home: "/customer".to_string(),
            owner_home: "/owner".to_string(),
            admin_home: "/admin".to_string(),
        }
    }
}

impl RouteTable {
    /// Creates the default route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sign-in route.
    pub fn with_sign_in(mut self, route: impl Into<String>) -> Self {
        self.sign_in = route.into();
        self
    }

    /// Returns the home route of a role.
    pub fn home_for(&self, role: Role) -> &str {
        match role {
            Role::Customer => &self.customer_home,
            Role::Owner => &self.owner_home,
            Role::Admin => &self.admin_home,
        }
    }

    /// Returns the home route of a role, or the sign-in route when no role is known.
    pub fn home_for_opt(&self, role: Option<Role>) -> &str {
        match role {
            Some(role) => self.home_for(role),
            None => &self.sign_in,
        }
    }

    /// Returns the role whose area contains `path`, if any.
    ///
    /// A path belongs to an area when it equals the home route or continues
    /// it with a `/`.
    pub fn area_of(&self, path: &str) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|role| is_under(path, self.home_for(*role)))
    }
}

/// Returns `true` if `path` is `prefix` or a sub-path of it.
pub(crate) fn is_under(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_homes() {
        let routes = RouteTable::default();
        assert_eq!(routes.home_for(Role::Customer), "/customer");
        assert_eq!(routes.home_for(Role::Owner), "/owner");
        assert_eq!(routes.home_for(Role::Admin), "/admin");
        assert_eq!(routes.home_for_opt(None), "/login");
    }

    #[test]
    fn test_area_of() {
        let routes = RouteTable::default();
        assert_eq!(routes.area_of("/owner/staff"), Some(Role::Owner));
        assert_eq!(routes.area_of("/admin"), Some(Role::Admin));
        assert_eq!(routes.area_of("/customer?tab=spas"), Some(Role::Customer));
        assert_eq!(routes.area_of("/administrators"), None);
        assert_eq!(routes.area_of("/login"), None);
    }
}
