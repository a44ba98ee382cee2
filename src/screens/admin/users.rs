use std::sync::Arc;

use crate::api::BackendApi;
use crate::auth::Role;
use crate::error::{ClientError, ClientResult};
use crate::models::{NewUser, ObjectiveAssignment, User};
use crate::screens::{current_year, year_range, Alert};

pub const ASSIGN_INCOMPLETE: &str = "Enter an objective and select at least one user.";
pub const USER_FIELDS_REQUIRED: &str = "All fields are required";

/// User administration and bulk objective assignment
pub struct UserManagementTab {
    api: Arc<dyn BackendApi>,
    users: Vec<User>,
    selected_ids: Vec<i64>,
    pub description: String,
    pub selected_year: i32,
    pub new_user: NewUser,
    loading: bool,
    alert: Option<Alert>,
    current_year: i32,
}

impl UserManagementTab {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self::with_year(api, current_year())
    }

    pub fn with_year(api: Arc<dyn BackendApi>, year: i32) -> Self {
        Self {
            api,
            users: Vec::new(),
            selected_ids: Vec::new(),
            description: String::new(),
            selected_year: year,
            new_user: NewUser::default(),
            loading: true,
            alert: None,
            current_year: year,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn selected_ids(&self) -> &[i64] {
        &self.selected_ids
    }

    pub fn is_selected(&self, user_id: i64) -> bool {
        self.selected_ids.contains(&user_id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Assignment years: five either side of the current year
    pub fn available_years(&self) -> Vec<i32> {
        year_range(self.current_year, 5, 5)
    }

    /// Roles offered by the new-user form
    pub fn available_roles(&self) -> [Role; 2] {
        Role::assignable()
    }

    pub async fn fetch_users(&mut self) {
        match self.api.list_users().await {
            Ok(users) => {
                tracing::debug!("loaded {} users", users.len());
                self.users = users;
            }
            Err(e) => {
                tracing::warn!("failed to load users: {}", e);
                self.alert = Some(Alert::from_error(&e, "Could not load users"));
            }
        }
        self.loading = false;
    }

    pub fn toggle_select(&mut self, user_id: i64) {
        if let Some(pos) = self.selected_ids.iter().position(|id| *id == user_id) {
            self.selected_ids.remove(pos);
        } else {
            self.selected_ids.push(user_id);
        }
    }

    /// Assign the typed objective to every selected user for the selected year
    pub async fn assign_objective(&mut self) {
        let assignment = match self.assignment() {
            Ok(assignment) => assignment,
            Err(e) => {
                self.alert = Some(Alert::from_error(&e, ASSIGN_INCOMPLETE));
                return;
            }
        };
        tracing::debug!(
            "assigning objective to {} users for {}",
            assignment.user_ids.len(),
            assignment.annee
        );

        match self.api.assign_objective(&assignment).await {
            Ok(()) => {
                self.alert = Some(Alert::success(format!(
                    "Objective assigned to the selected users for {}",
                    self.selected_year
                )));
                self.description.clear();
                self.selected_ids.clear();
            }
            Err(e) => {
                tracing::warn!("failed to assign objective: {}", e);
                self.alert = Some(Alert::from_error(&e, "Could not assign the objective"));
            }
        }
    }

    pub async fn add_user(&mut self) {
        if let Err(e) = self.check_new_user() {
            self.alert = Some(Alert::from_error(&e, USER_FIELDS_REQUIRED));
            return;
        }

        match self.api.register_user(&self.new_user).await {
            Ok(()) => {
                tracing::info!("created user '{}' ({})", self.new_user.username, self.new_user.role);
                self.alert = Some(Alert::success("User created"));
                self.new_user = NewUser::default();
                self.refresh_after_mutation().await;
            }
            Err(e) => {
                tracing::warn!("failed to create user '{}': {}", self.new_user.username, e);
                self.alert = Some(Alert::from_error(&e, "Could not create the user"));
            }
        }
    }

    pub async fn delete_user(&mut self, user_id: i64) {
        match self.api.delete_user(user_id).await {
            Ok(()) => {
                tracing::info!("deleted user {}", user_id);
                self.alert = Some(Alert::success("User deleted"));
                self.selected_ids.retain(|id| *id != user_id);
                self.refresh_after_mutation().await;
            }
            Err(e) => {
                tracing::warn!("failed to delete user {}: {}", user_id, e);
                self.alert = Some(Alert::from_error(&e, "Could not delete the user"));
            }
        }
    }

    fn assignment(&self) -> ClientResult<ObjectiveAssignment> {
        if self.description.is_empty() || self.selected_ids.is_empty() {
            return Err(ClientError::validation(ASSIGN_INCOMPLETE));
        }
        Ok(ObjectiveAssignment {
            description: self.description.clone(),
            user_ids: self.selected_ids.clone(),
            annee: self.selected_year,
        })
    }

    fn check_new_user(&self) -> ClientResult<()> {
        if self.new_user.username.is_empty() || self.new_user.password.is_empty() {
            return Err(ClientError::validation(USER_FIELDS_REQUIRED));
        }
        if !self.available_roles().contains(&self.new_user.role) {
            return Err(ClientError::validation(format!(
                "Unknown role '{}': expected CONSULTANT or ADMIN",
                self.new_user.role
            )));
        }
        Ok(())
    }

    // A failed reload must not hide the success message of the mutation
    async fn refresh_after_mutation(&mut self) {
        let success = self.alert.take();
        self.fetch_users().await;
        if self.alert.is_none() {
            self.alert = success;
        }
    }
}
