use std::fmt;

use serde::{Deserialize, Serialize};

use super::token::Claims;
use crate::screens::nav::Route;

pub const ADMIN_ROLE: &str = "ADMIN";
pub const CONSULTANT_ROLE: &str = "CONSULTANT";

/// Role carried by users and by the token's `role` claim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Consultant,
    Other(String),
}

impl Role {
    pub fn from_wire(value: &str) -> Self {
        match value {
            ADMIN_ROLE => Role::Admin,
            CONSULTANT_ROLE => Role::Consultant,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => ADMIN_ROLE,
            Role::Consultant => CONSULTANT_ROLE,
            Role::Other(value) => value,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Roles an administrator may assign when creating a user
    pub fn assignable() -> [Role; 2] {
        [Role::Consultant, Role::Admin]
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Consultant
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::from_wire(&value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Landing screen after login: admins get the admin tabs, everyone else the
/// consultant dashboard.
pub fn landing_route(claims: &Claims) -> Route {
    match claims.role() {
        Some(ADMIN_ROLE) => Route::AdminTabs,
        _ => Route::Dashboard,
    }
}
