//! Recommendation filtering over aggregated venues.

use std::collections::HashSet;

use serde::Serialize;

use crate::aggregate::AggregatedVenue;
use crate::options::{ALL_CATEGORIES, DistanceTier, Mode, OptionLists};
use crate::record::HistoryEntry;

/// How many of the latest history entries count as "recently visited".
pub const RECENT_LOOKBACK: usize = 10;

/// Distance selection. `Unrestricted` skips the ordinal comparison entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DistanceFilter {
    Within(DistanceTier),
    #[default]
    Unrestricted,
}

impl DistanceFilter {
    /// Parse a client-facing label. Anything mentioning `차량` means "any distance".
    pub fn parse(label: &str) -> Option<Self> {
        if label.contains("차량") {
            return Some(Self::Unrestricted);
        }
        DistanceTier::parse(label).map(Self::Within)
    }

    fn admits(self, stored: &str) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Within(tier) => DistanceTier::ordinal_of(stored) <= tier.ordinal(),
        }
    }
}

/// Request-scoped filter selection. Every field is optional; set fields are ANDed.
#[derive(Debug, Clone, Default)]
pub struct QueryFilters {
    pub mode: Mode,
    /// Exact category, or `None` / [`ALL_CATEGORIES`] for the whole mode.
    pub category: Option<String>,
    pub distance: DistanceFilter,
    pub menu: Vec<String>,
    pub vibe: Vec<String>,
}

/// A query hit. Recently visited venues are flagged, never dropped.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub venue: AggregatedVenue,
    pub recently_visited: bool,
}

/// Names among the last [`RECENT_LOOKBACK`] history entries.
pub fn recent_names(history: &[HistoryEntry]) -> HashSet<&str> {
    let start = history.len().saturating_sub(RECENT_LOOKBACK);
    history[start..].iter().map(|e| e.name.as_str()).collect()
}

/// True if any selected keyword is a substring of the stored cell.
/// An empty selection matches everything.
fn contains_any(stored: &str, selected: &[String]) -> bool {
    selected.is_empty() || selected.iter().any(|k| stored.contains(k.as_str()))
}

/// Filter `venues` with `filters`, preserving input order, and flag recent visits.
pub fn query(
    venues: &[AggregatedVenue],
    filters: &QueryFilters,
    options: &OptionLists,
    history: &[HistoryEntry],
) -> Vec<Recommendation> {
    let allowed = options.categories(filters.mode);
    let category = filters
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES);
    let recent = recent_names(history);

    let hits: Vec<Recommendation> = venues
        .iter()
        .filter(|v| allowed.iter().any(|c| *c == v.category))
        .filter(|v| category.is_none_or(|c| v.category == c))
        .filter(|v| filters.distance.admits(&v.distance_tier))
        .filter(|v| contains_any(&v.menu_keywords, &filters.menu))
        .filter(|v| contains_any(&v.vibe_keywords, &filters.vibe))
        .map(|v| Recommendation {
            recently_visited: recent.contains(v.name.as_str()),
            venue: v.clone(),
        })
        .collect();

    tracing::debug!(
        mode = filters.mode.as_str(),
        candidates = venues.len(),
        hits = hits.len(),
        "query evaluated"
    );
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue(name: &str, category: &str, distance: &str, menu: &str, vibe: &str) -> AggregatedVenue {
        AggregatedVenue {
            name: name.to_string(),
            category: category.to_string(),
            menu_keywords: menu.to_string(),
            vibe_keywords: vibe.to_string(),
            price_tier: String::new(),
            distance_tier: distance.to_string(),
            capacity_tier: String::new(),
            phone: String::new(),
            map_url: String::new(),
            closed_days: String::new(),
            rating: 4.0,
            comments: vec![String::new()],
            authors: vec![String::new()],
        }
    }

    fn visit(name: &str) -> HistoryEntry {
        HistoryEntry {
            date: "2026-10-01".to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn names(hits: &[Recommendation]) -> Vec<&str> {
        hits.iter().map(|h| h.venue.name.as_str()).collect()
    }

    fn sample() -> Vec<AggregatedVenue> {
        vec![
            venue("국밥집", "한식", "도보 5분 이내", "국밥,수육", "해장,노포감성"),
            venue("스벅", "카페", "도보 5분 이내", "아이스커피,라떼", "조용한"),
            venue("파스타", "양식", "차량 이동", "파스타", "감성적인"),
            venue("분식", "분식/기타", "", "떡볶이", "가성비"),
            venue("짬뽕", "중식", "도보 10분 이내", "짬뽕", "시끌벅적한"),
        ]
    }

    #[test]
    fn empty_filters_return_mode_set() {
        let opts = OptionLists::default();
        let hits = query(&sample(), &QueryFilters::default(), &opts, &[]);
        assert_eq!(names(&hits), vec!["국밥집", "파스타", "분식", "짬뽕"]);

        let cafe = QueryFilters {
            mode: Mode::Cafe,
            ..Default::default()
        };
        assert_eq!(names(&query(&sample(), &cafe, &opts, &[])), vec!["스벅"]);
    }

    #[test]
    fn never_leaves_mode_allow_list() {
        let opts = OptionLists::default();
        let filters = QueryFilters {
            category: Some("카페".to_string()),
            ..Default::default()
        };
        assert!(query(&sample(), &filters, &opts, &[]).is_empty());
    }

    #[test]
    fn category_exact_and_sentinel() {
        let opts = OptionLists::default();
        let exact = QueryFilters {
            category: Some("중식".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&query(&sample(), &exact, &opts, &[])), vec!["짬뽕"]);

        let all = QueryFilters {
            category: Some(ALL_CATEGORIES.to_string()),
            ..Default::default()
        };
        assert_eq!(query(&sample(), &all, &opts, &[]).len(), 4);
    }

    #[test]
    fn distance_mid_excludes_far_and_unknown() {
        let opts = OptionLists::default();
        let mid = QueryFilters {
            distance: DistanceFilter::Within(DistanceTier::Mid),
            ..Default::default()
        };
        assert_eq!(names(&query(&sample(), &mid, &opts, &[])), vec!["국밥집", "짬뽕"]);

        let any = QueryFilters {
            distance: DistanceFilter::Unrestricted,
            ..Default::default()
        };
        let hits = query(&sample(), &any, &opts, &[]);
        assert!(names(&hits).contains(&"파스타"));
        assert!(names(&hits).contains(&"분식"));
    }

    #[test]
    fn distance_label_parsing() {
        assert_eq!(DistanceFilter::parse("차량 이동(전체)"), Some(DistanceFilter::Unrestricted));
        assert_eq!(DistanceFilter::parse("차량 이동"), Some(DistanceFilter::Unrestricted));
        assert_eq!(
            DistanceFilter::parse("도보 10분 이내"),
            Some(DistanceFilter::Within(DistanceTier::Mid))
        );
        assert_eq!(DistanceFilter::parse("순간이동"), None);
    }

    #[test]
    fn menu_match_is_substring_any() {
        let opts = OptionLists::default();
        let coffee = QueryFilters {
            mode: Mode::Cafe,
            menu: vec!["커피".to_string()],
            ..Default::default()
        };
        assert_eq!(names(&query(&sample(), &coffee, &opts, &[])), vec!["스벅"]);

        let only_iced = vec![venue("x", "카페", "", "아이스커피", "")];
        let latte = QueryFilters {
            mode: Mode::Cafe,
            menu: vec!["라떼".to_string()],
            ..Default::default()
        };
        assert!(query(&only_iced, &latte, &opts, &[]).is_empty());

        let either = QueryFilters {
            menu: vec!["없는메뉴".to_string(), "짬뽕".to_string()],
            ..Default::default()
        };
        assert_eq!(names(&query(&sample(), &either, &opts, &[])), vec!["짬뽕"]);
    }

    #[test]
    fn vibe_filter_is_independent() {
        let opts = OptionLists::default();
        let filters = QueryFilters {
            menu: vec!["국밥".to_string()],
            vibe: vec!["조용한".to_string()],
            ..Default::default()
        };
        assert!(query(&sample(), &filters, &opts, &[]).is_empty());

        let filters = QueryFilters {
            vibe: vec!["해장".to_string(), "가성비".to_string()],
            ..Default::default()
        };
        assert_eq!(names(&query(&sample(), &filters, &opts, &[])), vec!["국밥집", "분식"]);
    }

    #[test]
    fn recent_visits_are_flagged_not_removed() {
        let opts = OptionLists::default();
        let history = vec![visit("짬뽕")];
        let hits = query(&sample(), &QueryFilters::default(), &opts, &history);
        assert_eq!(hits.len(), 4);
        for h in &hits {
            assert_eq!(h.recently_visited, h.venue.name == "짬뽕");
        }
    }

    #[test]
    fn lookback_is_last_ten_entries() {
        let mut history = vec![visit("국밥집")];
        history.extend((0..10).map(|i| visit(&format!("other{i}"))));
        let recent = recent_names(&history);
        assert!(!recent.contains("국밥집"));
        assert_eq!(recent.len(), 10);

        history.push(visit("국밥집"));
        assert!(recent_names(&history).contains("국밥집"));
    }

    #[test]
    fn zero_hits_is_fine() {
        let opts = OptionLists::default();
        let filters = QueryFilters {
            menu: vec!["랍스터".to_string()],
            ..Default::default()
        };
        assert!(query(&sample(), &filters, &opts, &[]).is_empty());
        assert!(query(&[], &QueryFilters::default(), &opts, &[]).is_empty());
    }

    #[test]
    fn recommendation_serializes_flat() {
        let rec = Recommendation {
            venue: venue("A", "한식", "", "", ""),
            recently_visited: true,
        };
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["name"], "A");
        assert_eq!(v["recently_visited"], true);
    }
}
