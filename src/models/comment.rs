use serde::{Deserialize, Serialize};

use super::format_date;
use crate::auth::Role;

pub const DEFAULT_AUTHOR: &str = "User";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(default)]
    pub contenu: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user: Option<CommentAuthor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentAuthor {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Body of comment create and update calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentBody {
    pub contenu: String,
}

impl Comment {
    pub fn text(&self) -> &str {
        self.contenu.as_deref().unwrap_or_default()
    }

    /// Author name, suffixed with ` (Admin)` for administrators
    pub fn author_label(&self) -> String {
        let author = self.user.as_ref();
        let name = author
            .and_then(|u| u.username.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_AUTHOR);

        if author.and_then(|u| u.role.as_ref()).is_some_and(Role::is_admin) {
            format!("{} (Admin)", name)
        } else {
            name.to_string()
        }
    }

    pub fn created_on(&self) -> String {
        format_date(self.created_at.as_deref())
    }
}
