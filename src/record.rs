//! Row types stored in the worksheets and their column layout.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::LunchError;
use crate::options::OptionLists;

/// Column headers of the venue worksheet, in storage order.
pub const VENUE_COLUMNS: &[&str] = &[
    "식당명",
    "카테고리",
    "메뉴키워드",
    "분위기키워드",
    "가격대",
    "거리",
    "최대수용인원",
    "전화번호",
    "네이버지도URL",
    "예약필수여부",
    "웨이팅정도",
    "휴무일",
    "작성자",
    "평점",
    "한줄평",
];

/// Column headers of the history worksheet, in storage order.
pub const HISTORY_COLUMNS: &[&str] = &["날짜", "식당명", "카테고리", "메뉴", "작성자", "평점", "비고"];

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(https?://\S+)").expect("static regex"));

/// One review/registration row. Several rows may share a `name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VenueRecord {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub menu_keywords: String,
    #[serde(default)]
    pub vibe_keywords: String,
    #[serde(default)]
    pub price_tier: String,
    #[serde(default)]
    pub distance_tier: String,
    #[serde(default)]
    pub capacity_tier: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub map_url: String,
    #[serde(default)]
    pub reservation_policy: String,
    #[serde(default)]
    pub waiting_level: String,
    #[serde(default)]
    pub closed_days: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
}

impl VenueRecord {
    /// Build a record from a worksheet row, mapping cells by header name.
    /// Missing columns become empty strings; an unparseable rating becomes 0.0.
    pub fn from_row(index: &HashMap<&str, usize>, row: &[String]) -> Self {
        let cell = |col: &str| -> String {
            index
                .get(col)
                .and_then(|&i| row.get(i))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };
        Self {
            name: cell("식당명"),
            category: cell("카테고리"),
            menu_keywords: cell("메뉴키워드"),
            vibe_keywords: cell("분위기키워드"),
            price_tier: cell("가격대"),
            distance_tier: cell("거리"),
            capacity_tier: cell("최대수용인원"),
            phone: cell("전화번호"),
            map_url: cell("네이버지도URL"),
            reservation_policy: cell("예약필수여부"),
            waiting_level: cell("웨이팅정도"),
            closed_days: cell("휴무일"),
            author: cell("작성자"),
            rating: parse_rating(&cell("평점")),
            comment: cell("한줄평"),
        }
    }

    /// Cells in [`VENUE_COLUMNS`] order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.category.clone(),
            self.menu_keywords.clone(),
            self.vibe_keywords.clone(),
            self.price_tier.clone(),
            self.distance_tier.clone(),
            self.capacity_tier.clone(),
            self.phone.clone(),
            self.map_url.clone(),
            self.reservation_policy.clone(),
            self.waiting_level.clone(),
            self.closed_days.clone(),
            self.author.clone(),
            format_rating(self.rating),
            self.comment.clone(),
        ]
    }

    /// Reject writes that would store an incomplete or off-list row.
    ///
    /// Keyword fields stay free text; enumerated fields must be empty or one
    /// of the configured options.
    pub fn validate(&self, options: &OptionLists) -> Result<(), LunchError> {
        self.check(options, false)
    }

    /// Like [`validate`](Self::validate), but also accepts the 0.0 an
    /// unparseable or blank stored rating loads as. Used when a whole sheet
    /// read back from storage is written again.
    pub fn validate_stored(&self, options: &OptionLists) -> Result<(), LunchError> {
        self.check(options, true)
    }

    fn check(&self, options: &OptionLists, allow_unrated: bool) -> Result<(), LunchError> {
        if self.name.trim().is_empty() {
            return Err(LunchError::Validation("venue name is required".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(LunchError::Validation("category is required".to_string()));
        }
        if !options.is_known_category(&self.category) {
            return Err(LunchError::Validation(format!(
                "unknown category: {}",
                self.category
            )));
        }
        let unrated = allow_unrated && self.rating == 0.0;
        if !unrated && (!(1.0..=5.0).contains(&self.rating) || (self.rating * 2.0).fract() != 0.0) {
            return Err(LunchError::Validation(format!(
                "rating must be between 1.0 and 5.0 in 0.5 steps, got {}",
                self.rating
            )));
        }

        let checks: [(&str, &str, &[String]); 5] = [
            ("price", self.price_tier.as_str(), options.prices.as_slice()),
            ("distance", self.distance_tier.as_str(), options.distances.as_slice()),
            ("capacity", self.capacity_tier.as_str(), options.capacities.as_slice()),
            ("reservation", self.reservation_policy.as_str(), options.reservations.as_slice()),
            ("waiting", self.waiting_level.as_str(), options.waiting_levels.as_slice()),
        ];
        for (field, value, allowed) in checks {
            if !value.is_empty() && !allowed.iter().any(|a| a == value) {
                return Err(LunchError::Validation(format!("unknown {field} option: {value}")));
            }
        }
        for day in split_keywords(&self.closed_days) {
            if !options.days.iter().any(|d| d == day) {
                return Err(LunchError::Validation(format!("unknown closed day: {day}")));
            }
        }
        Ok(())
    }
}

/// One "we ate here" entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HistoryEntry {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub menu: String,
    #[serde(default)]
    pub author: String,
    /// Rating snapshot at the time of the visit, stored as text.
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub note: String,
}

impl HistoryEntry {
    pub fn from_row(index: &HashMap<&str, usize>, row: &[String]) -> Self {
        let cell = |col: &str| -> String {
            index
                .get(col)
                .and_then(|&i| row.get(i))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };
        Self {
            date: cell("날짜"),
            name: cell("식당명"),
            category: cell("카테고리"),
            menu: cell("메뉴"),
            author: cell("작성자"),
            rating: cell("평점"),
            note: cell("비고"),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.name.clone(),
            self.category.clone(),
            self.menu.clone(),
            self.author.clone(),
            self.rating.clone(),
            self.note.clone(),
        ]
    }
}

/// Map header names to column positions. Later duplicates are ignored.
pub fn header_index(headers: &[String]) -> HashMap<&str, usize> {
    let mut index = HashMap::new();
    for (i, h) in headers.iter().enumerate() {
        index.entry(h.trim()).or_insert(i);
    }
    index
}

/// Parse a rating cell; anything unparseable or non-finite is 0.0.
pub fn parse_rating(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .unwrap_or(0.0)
}

/// Render a rating the way the sheet shows it: `4.0`, `4.5`, `3.75`.
pub fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{rating:.1}")
    } else {
        rating.to_string()
    }
}

/// First `http(s)://` URL in pasted text, or the text itself when none is found.
pub fn extract_url(text: &str) -> String {
    match URL_RE.captures(text) {
        Some(caps) => caps[1].to_string(),
        None => text.to_string(),
    }
}

/// Split a comma-joined keyword cell into trimmed, non-empty tokens.
pub fn split_keywords(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Join keyword tokens back into a storage cell.
pub fn join_keywords<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
