//! View models for each screen of the app.
//!
//! A screen owns its local UI state and talks to the backend through an
//! injected [`BackendApi`](crate::api::BackendApi). Every action issues at
//! most one call; failures become an [`Alert`] and never discard data that is
//! already displayed.

pub mod admin;
pub mod comments;
pub mod dashboard;
pub mod login;
pub mod nav;

pub use admin::{AdminTab, AdminTabs, ObjectivesTrackingTab, UserManagementTab};
pub use comments::CommentThread;
pub use dashboard::DashboardScreen;
pub use login::LoginScreen;
pub use nav::{Navigator, Route};

use chrono::Datelike;
use serde::Serialize;

use crate::error::{ClientError, ErrorKind};

pub const EMPTY_COMMENT: &str = "Comment cannot be empty";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Error,
    Warning,
    Success,
}

/// Dismissible message shown over a screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Warning,
            title: "Warning".to_string(),
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            title: "Success".to_string(),
            message: message.into(),
        }
    }

    /// Alert for a failed action. Validation problems become a warning with
    /// their own message; any other failure reports `failure`.
    pub fn from_error(err: &ClientError, failure: &str) -> Self {
        match err.kind() {
            ErrorKind::Validation => Alert::warning(err.message()),
            ErrorKind::MalformedToken => Alert::error(err.to_string()),
            ErrorKind::Network => Alert::error(failure),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == AlertKind::Error
    }
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// `before` years before `center` through `after` years after it
pub fn year_range(center: i32, before: i32, after: i32) -> Vec<i32> {
    ((center - before)..=(center + after)).collect()
}
