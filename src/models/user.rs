use std::fmt;

use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::auth::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl User {
    pub fn is_consultant(&self) -> bool {
        matches!(self.role, Some(Role::Consultant))
    }

    pub fn role_label(&self) -> &str {
        self.role.as_ref().map(Role::as_str).unwrap_or("-")
    }
}

/// Body of `POST /auth/register`
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl Default for NewUser {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            role: Role::Consultant,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// Passwords stay out of debug output
impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"***")
            .field("role", &self.role)
            .finish()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}
