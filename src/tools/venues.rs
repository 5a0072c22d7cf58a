use schemars::JsonSchema;
use serde::Deserialize;

use crate::record::{VenueRecord, extract_url, join_keywords};

/// Register one review of a venue. Repeat registrations of the same name
/// are folded together when recommending.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RegisterVenueRequest {
    /// Venue name (required).
    pub name: String,
    /// Category from the `options` tool (required), e.g. "한식" or "카페".
    pub category: String,
    /// Menu / signature drink keywords (free text).
    pub menu: Option<Vec<String>>,
    /// Vibe keywords (free text), e.g. "조용한", "혼밥가능".
    pub vibe: Option<Vec<String>>,
    /// Price option, e.g. "1~1.5만원".
    pub price: Option<String>,
    /// Distance option, e.g. "도보 10분 이내".
    pub distance: Option<String>,
    /// Capacity option, e.g. "4명" or "단체가능".
    pub capacity: Option<String>,
    pub phone: Option<String>,
    /// Map link, or any pasted text containing one; the first URL is kept.
    pub map_link: Option<String>,
    /// Reservation option, e.g. "예약 가능".
    pub reservation: Option<String>,
    /// Usual waiting option: "없음", "보통", "심함".
    pub waiting: Option<String>,
    /// Closed days, e.g. ["월", "일"].
    pub closed_days: Option<Vec<String>>,
    /// 1.0 to 5.0 in 0.5 steps.
    pub rating: f64,
    /// One-line review.
    pub comment: Option<String>,
    /// Reviewer name.
    pub author: Option<String>,
}

fn text(v: &Option<String>) -> String {
    v.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn keywords(v: &Option<Vec<String>>) -> String {
    join_keywords(v.as_deref().unwrap_or_default())
}

impl RegisterVenueRequest {
    pub fn to_record(&self) -> VenueRecord {
        VenueRecord {
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            menu_keywords: keywords(&self.menu),
            vibe_keywords: keywords(&self.vibe),
            price_tier: text(&self.price),
            distance_tier: text(&self.distance),
            capacity_tier: text(&self.capacity),
            phone: text(&self.phone),
            map_url: extract_url(&text(&self.map_link)),
            reservation_policy: text(&self.reservation),
            waiting_level: text(&self.waiting),
            closed_days: keywords(&self.closed_days),
            author: text(&self.author),
            rating: self.rating,
            comment: text(&self.comment),
        }
    }
}

/// Replace the whole venue sheet (bulk edit). Every row is validated first;
/// one bad row rejects the whole write.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReplaceVenuesRequest {
    pub venues: Vec<VenueRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_builds_record() {
        let req = RegisterVenueRequest {
            name: " 을지면옥 ".to_string(),
            category: "한식".to_string(),
            menu: Some(vec!["평양냉면".to_string(), " 수육".to_string()]),
            closed_days: Some(vec!["월".to_string()]),
            map_link: Some("[네이버 지도] 을지면옥 https://naver.me/x1".to_string()),
            rating: 4.5,
            ..Default::default()
        };
        let r = req.to_record();
        assert_eq!(r.name, "을지면옥");
        assert_eq!(r.menu_keywords, "평양냉면,수육");
        assert_eq!(r.closed_days, "월");
        assert_eq!(r.map_url, "https://naver.me/x1");
        assert_eq!(r.vibe_keywords, "");
    }

    #[test]
    fn replace_request_accepts_sparse_rows() {
        let req: ReplaceVenuesRequest =
            serde_json::from_str(r#"{"venues":[{"name":"A","category":"한식","rating":3.0}]}"#)
                .unwrap();
        assert_eq!(req.venues.len(), 1);
        assert_eq!(req.venues[0].phone, "");
    }
}
