//! Server-owned entities as the client sees them.
//!
//! The backend owns every invariant; these types only mirror its JSON and
//! tolerate missing or null fields so a partial record still renders.

pub mod comment;
pub mod objective;
pub mod user;

pub use comment::{Comment, CommentAuthor, CommentBody};
pub use objective::{Objective, ObjectiveAssignment, StatusBadge, StatusTone};
pub use user::{LoginRequest, LoginResponse, NewUser, User};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

pub const UNKNOWN_DATE: &str = "Unknown date";

/// Treat an explicit JSON `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Render a server timestamp as `dd/mm/yyyy`, or a placeholder when it is
/// missing or unparsable.
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return UNKNOWN_DATE.to_string();
    };

    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => UNKNOWN_DATE.to_string(),
    }
}
