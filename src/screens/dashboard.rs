use std::sync::Arc;

use crate::api::BackendApi;
use crate::models::Objective;

use super::comments::CommentThread;
use super::nav::Navigator;
use super::{current_year, year_range, Alert};

pub const FETCH_FAILED: &str = "Could not load your objectives. Please try again.";

/// Consultant dashboard: own objectives for a year, with a comment panel
pub struct DashboardScreen {
    api: Arc<dyn BackendApi>,
    selected_year: i32,
    objectives: Vec<Objective>,
    loading: bool,
    error: Option<String>,
    pub thread: CommentThread,
    alert: Option<Alert>,
}

impl DashboardScreen {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self::with_year(api, current_year())
    }

    pub fn with_year(api: Arc<dyn BackendApi>, year: i32) -> Self {
        Self {
            api,
            selected_year: year,
            objectives: Vec::new(),
            loading: true,
            error: None,
            thread: CommentThread::default(),
            alert: None,
        }
    }

    pub fn selected_year(&self) -> i32 {
        self.selected_year
    }

    /// Picker values, centred on the selected year
    pub fn available_years(&self) -> Vec<i32> {
        year_range(self.selected_year, 5, 4)
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error banner with a retry control
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn is_empty_state(&self) -> bool {
        !self.loading && self.error.is_none() && self.objectives.is_empty()
    }

    pub fn empty_message(&self) -> String {
        format!("No objectives found for {}", self.selected_year)
    }

    /// Load the objectives of the selected year. Also the retry action.
    pub async fn fetch_objectives(&mut self) {
        self.loading = true;
        match self.api.my_objectives(self.selected_year).await {
            Ok(objectives) => {
                tracing::debug!("loaded {} objectives for {}", objectives.len(), self.selected_year);
                self.objectives = objectives;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("failed to load objectives for {}: {}", self.selected_year, e);
                self.error = Some(FETCH_FAILED.to_string());
            }
        }
        self.loading = false;
    }

    pub async fn set_year(&mut self, year: i32) {
        self.selected_year = year;
        self.fetch_objectives().await;
    }

    pub async fn open_objective(&mut self, objective_id: i64) -> bool {
        let Some(objective) = self.objectives.iter().find(|o| o.id == objective_id).cloned() else {
            return false;
        };
        self.alert = self.thread.open(self.api.as_ref(), objective).await;
        true
    }

    pub fn close_objective(&mut self) {
        self.thread.close();
    }

    pub async fn add_comment(&mut self) {
        self.alert = self.thread.submit(self.api.as_ref()).await;
    }

    pub fn logout(&mut self, nav: &mut Navigator) {
        self.thread.close();
        nav.reset_to_login();
    }
}
