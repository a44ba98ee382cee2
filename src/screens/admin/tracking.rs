use std::sync::Arc;

use crate::api::BackendApi;
use crate::models::{Objective, User};
use crate::screens::comments::CommentThread;
use crate::screens::{current_year, year_range, Alert};

/// Admin view of one consultant's objectives: comments, edits and validation
pub struct ObjectivesTrackingTab {
    api: Arc<dyn BackendApi>,
    consultants: Vec<User>,
    selected_user: Option<User>,
    objectives: Vec<Objective>,
    loading: bool,
    objectives_loading: bool,
    selected_year: i32,
    current_year: i32,
    pub thread: CommentThread,
    alert: Option<Alert>,
}

impl ObjectivesTrackingTab {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self::with_year(api, current_year())
    }

    pub fn with_year(api: Arc<dyn BackendApi>, year: i32) -> Self {
        Self {
            api,
            consultants: Vec::new(),
            selected_user: None,
            objectives: Vec::new(),
            loading: true,
            objectives_loading: false,
            selected_year: year,
            current_year: year,
            thread: CommentThread::default(),
            alert: None,
        }
    }

    pub fn consultants(&self) -> &[User] {
        &self.consultants
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.selected_user.as_ref()
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn objectives_loading(&self) -> bool {
        self.objectives_loading
    }

    pub fn selected_year(&self) -> i32 {
        self.selected_year
    }

    pub fn available_years(&self) -> Vec<i32> {
        year_range(self.current_year, 5, 5)
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn title(&self) -> String {
        match &self.selected_user {
            Some(user) => format!("Objectives of {}", user.username),
            None => "Select a consultant".to_string(),
        }
    }

    /// Placeholder when the objective list is empty
    pub fn empty_message(&self) -> String {
        match &self.selected_user {
            Some(_) => format!("No objectives for this consultant in {}", self.selected_year),
            None => "Select a consultant to see their objectives".to_string(),
        }
    }

    /// Load every user and keep the consultants
    pub async fn fetch_users(&mut self) {
        self.loading = true;
        match self.api.list_users().await {
            Ok(users) => {
                self.consultants = users.into_iter().filter(User::is_consultant).collect();
                tracing::debug!("loaded {} consultants", self.consultants.len());
            }
            Err(e) => {
                tracing::warn!("failed to load consultants: {}", e);
                self.alert = Some(Alert::from_error(&e, "Could not load users"));
            }
        }
        self.loading = false;
    }

    pub async fn select_user(&mut self, user_id: i64) -> bool {
        let Some(user) = self.consultants.iter().find(|u| u.id == user_id).cloned() else {
            return false;
        };
        self.selected_user = Some(user);
        self.fetch_user_objectives().await;
        true
    }

    pub async fn fetch_user_objectives(&mut self) {
        let Some(user_id) = self.selected_user.as_ref().map(|u| u.id) else {
            return;
        };

        self.objectives_loading = true;
        match self.api.user_objectives(user_id, self.selected_year).await {
            Ok(objectives) => {
                self.objectives = objectives;
            }
            Err(e) => {
                tracing::warn!(
                    "failed to load objectives of user {} for {}: {}",
                    user_id,
                    self.selected_year,
                    e
                );
                self.alert = Some(Alert::from_error(&e, "Could not load objectives"));
            }
        }
        self.objectives_loading = false;
    }

    /// Change year; reloads only when a consultant is selected
    pub async fn set_year(&mut self, year: i32) {
        self.selected_year = year;
        if self.selected_user.is_some() {
            self.fetch_user_objectives().await;
        }
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

    pub fn start_editing(&mut self, comment_id: i64) -> bool {
        self.thread.start_editing(comment_id)
    }

    pub fn cancel_editing(&mut self) {
        self.thread.cancel_editing();
    }

    pub async fn update_comment(&mut self) {
        self.alert = self.thread.submit_edit(self.api.as_ref()).await;
    }

    pub async fn delete_comment(&mut self, comment_id: i64) {
        let alert = self.thread.delete(self.api.as_ref(), comment_id).await;
        if !alert.is_error() {
            if let Some(updated) = self.thread.objective().cloned() {
                if let Some(slot) = self.objectives.iter_mut().find(|o| o.id == updated.id) {
                    *slot = updated;
                }
            }
        }
        self.alert = Some(alert);
    }

    /// Mark an objective validated, in the list and in the open panel
    pub async fn validate_objective(&mut self, objective_id: i64) -> bool {
        match self.api.validate_objective(objective_id).await {
            Ok(()) => {
                tracing::info!("objective {} validated", objective_id);
                if let Some(objective) = self.objectives.iter_mut().find(|o| o.id == objective_id) {
                    objective.mark_validated();
                }
                if let Some(objective) = self.thread.objective_mut().filter(|o| o.id == objective_id) {
                    objective.mark_validated();
                }
                self.alert = Some(Alert::success("Objective validated"));
                true
            }
            Err(e) => {
                tracing::warn!("failed to validate objective {}: {}", objective_id, e);
                self.alert = Some(Alert::from_error(&e, "Could not validate the objective"));
                false
            }
        }
    }

    /// Validate the objective shown in the panel, then close the panel
    pub async fn validate_open_objective(&mut self) {
        let Some(objective_id) = self
            .thread
            .objective()
            .filter(|o| o.can_be_validated())
            .map(|o| o.id)
        else {
            return;
        };
        self.validate_objective(objective_id).await;
        self.thread.close();
    }
}
