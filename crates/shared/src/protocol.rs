use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::BoardList;

/// The board as served by `GET /api/boards`.
///
/// When no board has been written yet only `lists` is present (and empty).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub lists: Vec<BoardList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BoardDocument {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Body of `POST /api/boards`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaceListsRequest {
    pub lists: Vec<BoardList>,
}

/// Summary returned after an upsert of the board document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    #[serde(default)]
    pub upserted_id: Option<i64>,
}

impl WriteResult {
    pub fn inserted(id: i64) -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(id),
        }
    }

    pub fn updated() -> Self {
        Self {
            acknowledged: true,
            matched_count: 1,
            modified_count: 1,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}
