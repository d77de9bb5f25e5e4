use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AtomError, AtomResult};

pub const MAX_NAME_LEN: usize = 80;

/// A named kanban board owned by one driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub board_id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Filled in at read time from the task store.
    #[serde(default)]
    pub task_count: u32,
    #[serde(default)]
    pub archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardPayload {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoardPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub tags: Option<Vec<String>>,
}

pub(crate) fn validate_name(name: &str) -> AtomResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AtomError::validation("name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AtomError::validation(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Accepts `#rgb` / `#rrggbb` hex colors; blank clears the color.
pub(crate) fn validate_color(color: Option<String>) -> AtomResult<Option<String>> {
    let Some(color) = color.map(|c| c.trim().to_string()) else {
        return Ok(None);
    };
    if color.is_empty() {
        return Ok(None);
    }
    let hex = color.strip_prefix('#').unwrap_or("");
    let valid = matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(AtomError::validation(format!("invalid color '{color}', expected #rrggbb")));
    }
    Ok(Some(color.to_ascii_lowercase()))
}
