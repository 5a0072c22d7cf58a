//! Static option lists and the small enumerations derived from them.
//!
//! Every list can be overridden from the `[options]` table of the config file;
//! see [`crate::config`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Sentinel category meaning "every category of the current mode".
pub const ALL_CATEGORIES: &str = "전체";

/// Default author used when marking a venue as eaten.
pub const DEFAULT_HISTORY_AUTHOR: &str = "팀원";

/// Default note attached to history entries created from a recommendation.
pub const DEFAULT_HISTORY_NOTE: &str = "추천 통해 방문";

/// Search mode: which category universe a query runs in.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Food,
    Cafe,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Cafe => "cafe",
        }
    }
}

/// Ordinal distance bucket. Unknown labels are treated as [`DistanceTier::Far`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DistanceTier {
    Near,
    Mid,
    Far,
}

impl DistanceTier {
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Near => 1,
            Self::Mid => 2,
            Self::Far => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Near => "도보 5분 이내",
            Self::Mid => "도보 10분 이내",
            Self::Far => "차량 이동",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "도보 5분 이내" => Some(Self::Near),
            "도보 10분 이내" => Some(Self::Mid),
            "차량 이동" => Some(Self::Far),
            _ => None,
        }
    }

    /// Ordinal of a stored distance label; unparseable values count as farthest.
    pub fn ordinal_of(label: &str) -> u8 {
        Self::parse(label).unwrap_or(Self::Far).ordinal()
    }
}

/// Fixed option lists offered to clients and used to validate writes.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OptionLists {
    pub food_categories: Vec<String>,
    pub cafe_categories: Vec<String>,
    pub food_menus: Vec<String>,
    pub cafe_menus: Vec<String>,
    pub vibes: Vec<String>,
    pub prices: Vec<String>,
    pub distances: Vec<String>,
    pub capacities: Vec<String>,
    pub reservations: Vec<String>,
    pub waiting_levels: Vec<String>,
    pub days: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for OptionLists {
    fn default() -> Self {
        Self {
            food_categories: strings(&["한식", "중식", "일식", "양식", "아시안", "분식/기타"]),
            cafe_categories: strings(&["카페", "베이커리", "디저트 전문", "브런치"]),
            food_menus: strings(&[
                "김치찌개", "된장찌개", "제육볶음", "돈가스", "파스타", "짜장면", "짬뽕", "삼겹살",
                "국밥", "샌드위치", "샐러드", "회/초밥",
            ]),
            cafe_menus: strings(&[
                "아메리카노", "라떼", "아인슈페너", "케이크", "스콘", "빙수", "소금빵", "크로플",
                "휘낭시에", "티(Tea)",
            ]),
            vibes: strings(&[
                "조용한", "깔끔한", "시끌벅적한", "노포감성", "빨리나옴", "혼밥가능", "회식추천",
                "손님접대", "가성비", "비오는날", "해장", "감성적인",
            ]),
            prices: strings(&["1만원 미만", "1~1.5만원", "1.5~2만원", "2만원 이상"]),
            distances: [DistanceTier::Near, DistanceTier::Mid, DistanceTier::Far]
                .iter()
                .map(|t| t.label().to_string())
                .collect(),
            capacities: strings(&["2명", "4명", "6명", "8명", "단체가능"]),
            reservations: strings(&["예약 불필요", "예약 가능", "예약 필수", "현장 대기"]),
            waiting_levels: strings(&["없음", "보통", "심함"]),
            days: strings(&["월", "화", "수", "목", "금", "토", "일", "연중무휴"]),
        }
    }
}

impl OptionLists {
    /// Category allow-list for a mode.
    pub fn categories(&self, mode: Mode) -> &[String] {
        match mode {
            Mode::Food => &self.food_categories,
            Mode::Cafe => &self.cafe_categories,
        }
    }

    /// Common menu keyword suggestions for a mode.
    pub fn menus(&self, mode: Mode) -> &[String] {
        match mode {
            Mode::Food => &self.food_menus,
            Mode::Cafe => &self.cafe_menus,
        }
    }

    /// True if the category belongs to either mode.
    pub fn is_known_category(&self, category: &str) -> bool {
        self.food_categories.iter().any(|c| c == category)
            || self.cafe_categories.iter().any(|c| c == category)
    }

    /// Rating steps 1.0..=5.0 in half points.
    pub fn rating_steps() -> Vec<f64> {
        (2..=10).map(|x| x as f64 * 0.5).collect()
    }
}
