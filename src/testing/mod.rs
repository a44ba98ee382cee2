use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::json;

use crate::api::BackendApi;
use crate::error::{ClientError, ClientResult};
use crate::models::{Comment, LoginResponse, NewUser, Objective, ObjectiveAssignment, User};

/// In-memory backend for screen tests: records every call by name and fails
/// the ones listed in `failing` with a 500.
pub struct FakeBackend {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    pub login_token: Mutex<Option<String>>,
    pub users: Mutex<Vec<User>>,
    pub objectives: Mutex<Vec<Objective>>,
    pub comments: Mutex<Vec<Comment>>,
    pub registered: Mutex<Vec<NewUser>>,
    pub assignments: Mutex<Vec<ObjectiveAssignment>>,
    next_id: AtomicI64,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            login_token: Mutex::new(None),
            users: Mutex::new(Vec::new()),
            objectives: Mutex::new(Vec::new()),
            comments: Mutex::new(Vec::new()),
            registered: Mutex::new(Vec::new()),
            assignments: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1000),
        })
    }

    pub fn fail_on(&self, call: &'static str) {
        self.failing.lock().unwrap().insert(call);
    }

    pub fn recover(&self, call: &'static str) {
        self.failing.lock().unwrap().remove(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn set_users(&self, users: serde_json::Value) {
        *self.users.lock().unwrap() = serde_json::from_value(users).unwrap();
    }

    pub fn set_objectives(&self, objectives: serde_json::Value) {
        *self.objectives.lock().unwrap() = serde_json::from_value(objectives).unwrap();
    }

    pub fn set_comments(&self, comments: serde_json::Value) {
        *self.comments.lock().unwrap() = serde_json::from_value(comments).unwrap();
    }

    fn record(&self, call: &'static str) -> ClientResult<()> {
        self.calls.lock().unwrap().push(call.to_string());
        if self.failing.lock().unwrap().contains(call) {
            return Err(ClientError::from_status(500, r#"{"message":"boom"}"#));
        }
        Ok(())
    }
}

/// Unsigned token whose payload is `claims`
pub fn token_with_claims(claims: serde_json::Value) -> String {
    format!(
        "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.{}.c2lnbmF0dXJl",
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

pub fn token_for_role(role: &str) -> String {
    token_with_claims(json!({ "id": 1, "username": "tester", "role": role }))
}

#[async_trait]
impl BackendApi for FakeBackend {
    async fn login(&self, _username: &str, _password: &str) -> ClientResult<LoginResponse> {
        self.calls.lock().unwrap().push("login".to_string());
        if self.failing.lock().unwrap().contains("login") {
            return Err(ClientError::from_status(401, "Invalid credentials"));
        }
        Ok(LoginResponse {
            token: self.login_token.lock().unwrap().clone(),
        })
    }

    async fn register_user(&self, user: &NewUser) -> ClientResult<()> {
        self.record("register_user")?;
        self.registered.lock().unwrap().push(user.clone());
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.users.lock().unwrap().push(User {
            id,
            username: user.username.clone(),
            role: Some(user.role.clone()),
        });
        Ok(())
    }

    async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.record("list_users")?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn delete_user(&self, user_id: i64) -> ClientResult<()> {
        self.record("delete_user")?;
        self.users.lock().unwrap().retain(|u| u.id != user_id);
        Ok(())
    }

    async fn my_objectives(&self, _year: i32) -> ClientResult<Vec<Objective>> {
        self.record("my_objectives")?;
        Ok(self.objectives.lock().unwrap().clone())
    }

    async fn user_objectives(&self, _user_id: i64, _year: i32) -> ClientResult<Vec<Objective>> {
        self.record("user_objectives")?;
        Ok(self.objectives.lock().unwrap().clone())
    }

    async fn assign_objective(&self, assignment: &ObjectiveAssignment) -> ClientResult<()> {
        self.record("assign_objective")?;
        self.assignments.lock().unwrap().push(assignment.clone());
        Ok(())
    }

    async fn validate_objective(&self, _objective_id: i64) -> ClientResult<()> {
        self.record("validate_objective")
    }

    async fn list_comments(&self, _objective_id: i64) -> ClientResult<Vec<Comment>> {
        self.record("list_comments")?;
        Ok(self.comments.lock().unwrap().clone())
    }

    async fn add_comment(&self, _objective_id: i64, contenu: &str) -> ClientResult<Comment> {
        self.record("add_comment")?;
        Ok(Comment {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            contenu: Some(contenu.to_string()),
            created_at: Some("2025-01-15T09:00:00Z".to_string()),
            user: None,
        })
    }

    async fn update_comment(&self, comment_id: i64, contenu: &str) -> ClientResult<Comment> {
        self.record("update_comment")?;
        Ok(Comment {
            id: comment_id,
            contenu: Some(contenu.to_string()),
            created_at: None,
            user: None,
        })
    }

    async fn delete_comment(&self, _comment_id: i64) -> ClientResult<()> {
        self.record("delete_comment")
    }
}
