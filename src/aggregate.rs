//! Collapse raw review rows into one summarized venue per name.

use std::collections::HashMap;

use serde::Serialize;

use crate::record::VenueRecord;

/// One venue with its reviews folded together.
///
/// Descriptive fields come from the first row seen for the name. `comments`
/// and `authors` hold one entry per raw row, in row order, so they always
/// have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedVenue {
    pub name: String,
    pub category: String,
    pub menu_keywords: String,
    pub vibe_keywords: String,
    pub price_tier: String,
    pub distance_tier: String,
    pub capacity_tier: String,
    pub phone: String,
    pub map_url: String,
    pub closed_days: String,
    /// Mean of all raw ratings, rounded to one decimal (half to even).
    pub rating: f64,
    pub comments: Vec<String>,
    pub authors: Vec<String>,
}

impl AggregatedVenue {
    pub fn review_count(&self) -> usize {
        self.comments.len()
    }
}

struct Group<'a> {
    first: &'a VenueRecord,
    rating_sum: f64,
    comments: Vec<String>,
    authors: Vec<String>,
}

/// Group rows by venue name, keeping the order in which names first appear.
pub fn aggregate(records: &[VenueRecord]) -> Vec<AggregatedVenue> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Group<'_>> = HashMap::new();

    for record in records {
        let group = groups.entry(record.name.as_str()).or_insert_with(|| {
            order.push(record.name.as_str());
            Group {
                first: record,
                rating_sum: 0.0,
                comments: Vec::new(),
                authors: Vec::new(),
            }
        });
        group.rating_sum += record.rating;
        group.comments.push(record.comment.clone());
        group.authors.push(record.author.clone());
    }

    order
        .into_iter()
        .filter_map(|name| groups.remove(name))
        .map(|g| {
            let count = g.comments.len() as f64;
            AggregatedVenue {
                name: g.first.name.clone(),
                category: g.first.category.clone(),
                menu_keywords: g.first.menu_keywords.clone(),
                vibe_keywords: g.first.vibe_keywords.clone(),
                price_tier: g.first.price_tier.clone(),
                distance_tier: g.first.distance_tier.clone(),
                capacity_tier: g.first.capacity_tier.clone(),
                phone: g.first.phone.clone(),
                map_url: g.first.map_url.clone(),
                closed_days: g.first.closed_days.clone(),
                rating: round_one_decimal(g.rating_sum / count),
                comments: g.comments,
                authors: g.authors,
            }
        })
        .collect()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
