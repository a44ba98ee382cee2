pub mod tracking;
pub mod users;

pub use tracking::ObjectivesTrackingTab;
pub use users::UserManagementTab;

use std::sync::Arc;

use serde::Serialize;

use crate::api::BackendApi;

use super::nav::Navigator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdminTab {
    Users,
    Tracking,
    Reports,
    Settings,
}

impl AdminTab {
    pub const ALL: [AdminTab; 4] = [AdminTab::Users, AdminTab::Tracking, AdminTab::Reports, AdminTab::Settings];

    pub fn label(&self) -> &'static str {
        match self {
            AdminTab::Users => "Users",
            AdminTab::Tracking => "Objectives",
            AdminTab::Reports => "Reports",
            AdminTab::Settings => "Settings",
        }
    }

    /// Caption of tabs that have no content yet
    pub fn placeholder(&self) -> Option<(&'static str, &'static str)> {
        match self {
            AdminTab::Reports => Some(("Reports and statistics", "Analytics dashboard coming soon")),
            AdminTab::Settings => Some(("Settings", "System configuration coming soon")),
            _ => None,
        }
    }
}

/// Admin area: a tab bar over user management and objectives tracking
pub struct AdminTabs {
    active: AdminTab,
    pub users: UserManagementTab,
    pub tracking: ObjectivesTrackingTab,
}

impl AdminTabs {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self {
            active: AdminTab::Users,
            users: UserManagementTab::new(api.clone()),
            tracking: ObjectivesTrackingTab::new(api),
        }
    }

    pub fn active(&self) -> AdminTab {
        self.active
    }

    pub fn select(&mut self, tab: AdminTab) {
        self.active = tab;
    }

    /// Initial loads of both working tabs
    pub async fn load(&mut self) {
        self.users.fetch_users().await;
        self.tracking.fetch_users().await;
    }

    pub fn logout(&mut self, nav: &mut Navigator) {
        self.tracking.close_objective();
        nav.reset_to_login();
    }
}
