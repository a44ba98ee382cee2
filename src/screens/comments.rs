use crate::api::BackendApi;
use crate::error::{ClientError, ClientResult};
use crate::models::{Comment, Objective};

use super::{Alert, EMPTY_COMMENT};

/// Trimmed comment text; blank input never reaches the backend
fn comment_text(raw: &str) -> ClientResult<String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ClientError::validation(EMPTY_COMMENT));
    }
    Ok(text.to_string())
}

/// Comment being rewritten in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEdit {
    pub comment_id: i64,
    pub text: String,
}

/// Detail panel of one objective with its comments. Shared by the consultant
/// dashboard and the admin tracking tab.
#[derive(Debug, Clone, Default)]
pub struct CommentThread {
    objective: Option<Objective>,
    comments: Vec<Comment>,
    pub draft: String,
    submitting: bool,
    editing: Option<CommentEdit>,
}

impl CommentThread {
    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    pub fn objective_mut(&mut self) -> Option<&mut Objective> {
        self.objective.as_mut()
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn is_open(&self) -> bool {
        self.objective.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn editing(&self) -> Option<&CommentEdit> {
        self.editing.as_ref()
    }

    /// Send button state
    pub fn can_submit(&self) -> bool {
        !self.draft.trim().is_empty() && !self.submitting
    }

    /// Show `objective` and load its comments. The list always comes from the
    /// backend; the objective's embedded `commentaires` are not shown.
    pub async fn open(&mut self, api: &dyn BackendApi, objective: Objective) -> Option<Alert> {
        let same = self.objective.as_ref().map(|o| o.id) == Some(objective.id);
        if !same {
            self.comments.clear();
            self.draft.clear();
            self.editing = None;
        }
        let objective_id = objective.id;
        self.objective = Some(objective);

        match api.list_comments(objective_id).await {
            Ok(comments) => {
                tracing::debug!("loaded {} comments for objective {}", comments.len(), objective_id);
                self.comments = comments;
                None
            }
            Err(e) => {
                tracing::warn!("failed to load comments for objective {}: {}", objective_id, e);
                Some(Alert::from_error(&e, "Could not load comments"))
            }
        }
    }

    pub fn close(&mut self) {
        self.objective = None;
        self.comments.clear();
        self.draft.clear();
        self.editing = None;
        self.submitting = false;
    }

    /// Post the draft; the created comment goes to the top of the list
    pub async fn submit(&mut self, api: &dyn BackendApi) -> Option<Alert> {
        let text = match comment_text(&self.draft) {
            Ok(text) => text,
            Err(e) => return Some(Alert::from_error(&e, EMPTY_COMMENT)),
        };
        let objective_id = self.objective.as_ref()?.id;

        self.submitting = true;
        let result = api.add_comment(objective_id, &text).await;
        self.submitting = false;

        match result {
            Ok(comment) => {
                self.comments.insert(0, comment);
                self.draft.clear();
                None
            }
            Err(e) => {
                tracing::warn!("failed to add comment on objective {}: {}", objective_id, e);
                Some(Alert::from_error(&e, "Could not add the comment"))
            }
        }
    }

    pub fn start_editing(&mut self, comment_id: i64) -> bool {
        match self.comments.iter().find(|c| c.id == comment_id) {
            Some(comment) => {
                self.editing = Some(CommentEdit {
                    comment_id,
                    text: comment.text().to_string(),
                });
                true
            }
            None => false,
        }
    }

    pub fn set_edit_text(&mut self, text: impl Into<String>) {
        if let Some(edit) = self.editing.as_mut() {
            edit.text = text.into();
        }
    }

    pub fn cancel_editing(&mut self) {
        self.editing = None;
    }

    /// Save the comment being edited and replace it in the list
    pub async fn submit_edit(&mut self, api: &dyn BackendApi) -> Option<Alert> {
        let edit = self.editing.as_ref()?;
        let text = match comment_text(&edit.text) {
            Ok(text) => text,
            Err(e) => return Some(Alert::from_error(&e, EMPTY_COMMENT)),
        };
        let comment_id = edit.comment_id;

        match api.update_comment(comment_id, &text).await {
            Ok(updated) => {
                if let Some(slot) = self.comments.iter_mut().find(|c| c.id == updated.id) {
                    *slot = updated;
                }
                self.editing = None;
                None
            }
            Err(e) => {
                tracing::warn!("failed to update comment {}: {}", comment_id, e);
                Some(Alert::from_error(&e, "Could not update the comment"))
            }
        }
    }

    /// Delete a comment from the list and from the objective's embedded copy
    pub async fn delete(&mut self, api: &dyn BackendApi, comment_id: i64) -> Alert {
        match api.delete_comment(comment_id).await {
            Ok(()) => {
                self.comments.retain(|c| c.id != comment_id);
                if let Some(objective) = self.objective.as_mut() {
                    objective.remove_embedded_comment(comment_id);
                }
                if self.editing.as_ref().map(|e| e.comment_id) == Some(comment_id) {
                    self.editing = None;
                }
                Alert::success("Comment deleted")
            }
            Err(e) => {
                tracing::warn!("failed to delete comment {}: {}", comment_id, e);
                Alert::from_error(&e, "Could not delete the comment")
            }
        }
    }
}
