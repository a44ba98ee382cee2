use serde::{Deserialize, Serialize};

use super::{format_date, null_as_default, Comment};

pub const STATUS_IN_PROGRESS: &str = "En cours";
pub const STATUS_ACHIEVED: &str = "Atteint";
pub const STATUS_ACHIEVED_EN: &str = "ACHIEVED";
pub const STATUS_VALIDATED: &str = "Validé";

pub const NO_DESCRIPTION: &str = "(no description)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub annee: Option<i32>,
    #[serde(default, rename = "validatedbyadmin", deserialize_with = "null_as_default")]
    pub validated_by_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentaires: Option<Vec<Comment>>,
}

/// Colour family of a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    InProgress,
    Achieved,
    Validated,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: String,
    pub tone: StatusTone,
}

impl Objective {
    pub fn description(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(NO_DESCRIPTION)
    }

    pub fn is_achieved(&self) -> bool {
        matches!(self.status.as_deref(), Some(STATUS_ACHIEVED) | Some(STATUS_ACHIEVED_EN))
    }

    /// An admin may validate an objective the consultant marked as reached
    pub fn can_be_validated(&self) -> bool {
        !self.validated_by_admin && self.status.as_deref() == Some(STATUS_ACHIEVED)
    }

    pub fn mark_validated(&mut self) {
        self.validated_by_admin = true;
        self.status = Some(STATUS_VALIDATED.to_string());
    }

    pub fn badge(&self) -> StatusBadge {
        let (label, tone) = if self.validated_by_admin {
            (STATUS_VALIDATED, StatusTone::Validated)
        } else if self.is_achieved() {
            (STATUS_ACHIEVED, StatusTone::Achieved)
        } else {
            match self.status.as_deref().filter(|s| !s.is_empty()) {
                None | Some(STATUS_IN_PROGRESS) => (STATUS_IN_PROGRESS, StatusTone::InProgress),
                Some(STATUS_VALIDATED) => (STATUS_VALIDATED, StatusTone::Validated),
                Some(other) => (other, StatusTone::Other),
            }
        };

        StatusBadge {
            label: label.to_string(),
            tone,
        }
    }

    pub fn created_on(&self) -> String {
        format_date(self.created_at.as_deref())
    }

    /// Year of the objective, falling back to the year being browsed
    pub fn year_or(&self, selected_year: i32) -> i32 {
        self.annee.unwrap_or(selected_year)
    }

    pub fn remove_embedded_comment(&mut self, comment_id: i64) {
        if let Some(comments) = self.commentaires.as_mut() {
            comments.retain(|c| c.id != comment_id);
        }
    }
}

/// Body of `POST /objectifs/admin/multiple`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveAssignment {
    pub description: String,
    #[serde(rename = "userIds")]
    pub user_ids: Vec<i64>,
    pub annee: i32,
}
