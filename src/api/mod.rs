//! Calls against the objectives backend.
//!
//! | Method | Path                            | Call                 |
//! |--------|---------------------------------|----------------------|
//! | POST   | `/auth/login`                   | `login`              |
//! | POST   | `/auth/register`                | `register_user`      |
//! | GET    | `/users`                        | `list_users`         |
//! | DELETE | `/users/{id}`                   | `delete_user`        |
//! | GET    | `/objectifs/mine/{year}`        | `my_objectives`      |
//! | GET    | `/objectifs/{userId}/{year}`    | `user_objectives`    |
//! | POST   | `/objectifs/admin/multiple`     | `assign_objective`   |
//! | PUT    | `/objectifs/{id}/valider`       | `validate_objective` |
//! | GET    | `/objectifs/{id}/commentaires`  | `list_comments`      |
//! | POST   | `/objectifs/{id}/commentaires`  | `add_comment`        |
//! | PUT    | `/objectifs/commentaire/{id}`   | `update_comment`     |
//! | DELETE | `/objectifs/commentaire/{id}`   | `delete_comment`     |

pub mod client;

pub use client::ApiClient;

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::models::{Comment, LoginResponse, NewUser, Objective, ObjectiveAssignment, User};

/// Backend seam consumed by the screens. Every call except `login` carries
/// the session's bearer token.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse>;

    async fn register_user(&self, user: &NewUser) -> ClientResult<()>;

    async fn list_users(&self) -> ClientResult<Vec<User>>;

    async fn delete_user(&self, user_id: i64) -> ClientResult<()>;

    /// Objectives of the signed-in consultant for `year`
    async fn my_objectives(&self, year: i32) -> ClientResult<Vec<Objective>>;

    async fn user_objectives(&self, user_id: i64, year: i32) -> ClientResult<Vec<Objective>>;

    /// Assign one objective to several users at once
    async fn assign_objective(&self, assignment: &ObjectiveAssignment) -> ClientResult<()>;

    async fn validate_objective(&self, objective_id: i64) -> ClientResult<()>;

    async fn list_comments(&self, objective_id: i64) -> ClientResult<Vec<Comment>>;

    async fn add_comment(&self, objective_id: i64, contenu: &str) -> ClientResult<Comment>;

    async fn update_comment(&self, comment_id: i64, contenu: &str) -> ClientResult<Comment>;

    async fn delete_comment(&self, comment_id: i64) -> ClientResult<()>;
}
