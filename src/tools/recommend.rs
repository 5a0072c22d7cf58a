use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::options::Mode;
use crate::query::{DistanceFilter, QueryFilters, Recommendation};

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RecommendRequest {
    /// "food" (default) or "cafe". Restricts results to that mode's categories.
    pub mode: Option<Mode>,
    /// Exact category (e.g. "한식"), or "전체" / omitted for every category of the mode.
    pub category: Option<String>,
    /// Maximum distance: "도보 5분 이내", "도보 10분 이내", or "차량 이동(전체)" for any distance.
    /// Omitted means any distance.
    pub distance: Option<String>,
    /// Menu keywords. A venue matches if its menu contains ANY of them as a substring.
    pub menu: Option<Vec<String>>,
    /// Vibe keywords. Same substring-ANY matching as `menu`.
    pub vibe: Option<Vec<String>>,
}

impl RecommendRequest {
    pub fn filters(&self) -> Result<QueryFilters, String> {
        let distance = match self.distance.as_deref().map(str::trim) {
            None | Some("") => DistanceFilter::Unrestricted,
            Some(label) => DistanceFilter::parse(label)
                .ok_or_else(|| format!("unknown distance option: {label}"))?,
        };
        Ok(QueryFilters {
            mode: self.mode.unwrap_or_default(),
            category: self.category.clone(),
            distance,
            menu: clean(self.menu.as_deref()),
            vibe: clean(self.vibe.as_deref()),
        })
    }
}

fn clean(keywords: Option<&[String]>) -> Vec<String> {
    keywords
        .unwrap_or_default()
        .iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub mode: Mode,
    pub count: usize,
    pub results: Vec<Recommendation>,
}
