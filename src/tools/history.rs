use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::history::HistorySummary;
use crate::record::HistoryEntry;

/// Log that the team ate at a registered venue today.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct MarkEatenRequest {
    /// Venue name exactly as registered.
    pub name: String,
    /// Who is logging the meal (defaults to "팀원").
    pub author: Option<String>,
    /// Free-text note (defaults to "추천 통해 방문").
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct HistoryRequest {
    /// Return at most this many entries, newest first (default: all).
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub summary: HistorySummary,
    pub entries: Vec<HistoryEntry>,
}
