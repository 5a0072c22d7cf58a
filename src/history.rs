//! Append-only log of visited venues.

use std::collections::HashMap;

use serde::Serialize;

use crate::aggregate::AggregatedVenue;
use crate::error::LunchError;
use crate::options::{DEFAULT_HISTORY_AUTHOR, DEFAULT_HISTORY_NOTE};
use crate::record::{HistoryEntry, format_rating};
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistorySummary {
    pub total_count: usize,
    /// Most visited venue. Ties go to whichever tied name was seen first;
    /// treat the choice as unspecified.
    pub most_frequent_venue: Option<String>,
    /// Date of the last entry in append order.
    pub last_visit_date: Option<String>,
}

/// History operations over a [`Store`]'s history worksheet.
pub struct HistoryLog<'a> {
    store: &'a Store,
}

impl<'a> HistoryLog<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Every entry in append order; an unreachable store reads as empty.
    pub async fn entries(&self) -> Vec<HistoryEntry> {
        match self.store.try_load_history().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("history load failed, showing empty log: {e}");
                Vec::new()
            }
        }
    }

    /// Append one entry. The read is strict so a transport failure can't
    /// truncate the log to a single row.
    pub async fn append(&self, entry: HistoryEntry) -> Result<(), LunchError> {
        if entry.name.trim().is_empty() {
            return Err(LunchError::Validation(
                "history entry needs a venue name".to_string(),
            ));
        }
        let mut entries = self.store.try_load_history().await?;
        entries.push(entry);
        self.store
            .save_history(&entries)
            .await
            .inspect_err(|e| tracing::warn!("history append failed: {e}"))?;
        tracing::info!(total = entries.len(), "history entry appended");
        Ok(())
    }

    pub async fn recent(&self, n: usize) -> Vec<HistoryEntry> {
        recent(&self.entries().await, n).to_vec()
    }

    pub async fn summary(&self) -> HistorySummary {
        summarize(&self.entries().await)
    }

    /// Record that the team ate at `venue` on `today`.
    pub async fn mark_eaten(
        &self,
        venue: &AggregatedVenue,
        author: Option<&str>,
        note: Option<&str>,
        today: &str,
    ) -> Result<HistoryEntry, LunchError> {
        let entry = entry_for_visit(venue, author, note, today);
        self.append(entry.clone()).await?;
        Ok(entry)
    }
}

/// The last `n` entries in append order.
pub fn recent(entries: &[HistoryEntry], n: usize) -> &[HistoryEntry] {
    &entries[entries.len().saturating_sub(n)..]
}

pub fn summarize(entries: &[HistoryEntry]) -> HistorySummary {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for e in entries {
        let count = counts.entry(e.name.as_str()).or_insert_with(|| {
            order.push(e.name.as_str());
            0
        });
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for name in order {
        let count = counts[name];
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((name, count));
        }
    }

    HistorySummary {
        total_count: entries.len(),
        most_frequent_venue: best.map(|(name, _)| name.to_string()),
        last_visit_date: entries.last().map(|e| e.date.clone()),
    }
}

/// All entries, newest date first. Same-date entries keep append order.
pub fn by_date_desc(entries: &[HistoryEntry]) -> Vec<HistoryEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

pub fn entry_for_visit(
    venue: &AggregatedVenue,
    author: Option<&str>,
    note: Option<&str>,
    today: &str,
) -> HistoryEntry {
    fn non_blank(s: Option<&str>) -> Option<&str> {
        s.map(str::trim).filter(|s| !s.is_empty())
    }
    HistoryEntry {
        date: today.to_string(),
        name: venue.name.clone(),
        category: venue.category.clone(),
        menu: venue.menu_keywords.clone(),
        author: non_blank(author)
            .unwrap_or(DEFAULT_HISTORY_AUTHOR)
            .to_string(),
        rating: format_rating(venue.rating),
        note: non_blank(note).unwrap_or(DEFAULT_HISTORY_NOTE).to_string(),
    }
}

/// Today's date in local time, `YYYY-MM-DD`.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, name: &str) -> HistoryEntry {
        HistoryEntry {
            date: date.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn summary_of_empty_log() {
        let s = summarize(&[]);
        assert_eq!(s.total_count, 0);
        assert!(s.most_frequent_venue.is_none());
        assert!(s.last_visit_date.is_none());
    }

    #[test]
    fn summary_counts_and_last_date() {
        let log = vec![
            entry("2026-10-01", "국밥집"),
            entry("2026-10-02", "짬뽕"),
            entry("2026-10-03", "짬뽕"),
            entry("2026-09-30", "스벅"),
        ];
        let s = summarize(&log);
        assert_eq!(s.total_count, 4);
        assert_eq!(s.most_frequent_venue.as_deref(), Some("짬뽕"));
        // storage order, not max date
        assert_eq!(s.last_visit_date.as_deref(), Some("2026-09-30"));
    }

    #[test]
    fn tie_goes_to_first_seen() {
        let log = vec![entry("1", "B"), entry("2", "A"), entry("3", "A"), entry("4", "B")];
        assert_eq!(summarize(&log).most_frequent_venue.as_deref(), Some("B"));
    }

    #[test]
    fn recent_takes_tail() {
        let log = vec![entry("1", "a"), entry("2", "b"), entry("3", "c")];
        assert_eq!(recent(&log, 2), &log[1..]);
        assert_eq!(recent(&log, 10).len(), 3);
        assert!(recent(&log, 0).is_empty());
    }

    #[test]
    fn date_desc_is_stable() {
        let log = vec![
            entry("2026-10-01", "a"),
            entry("2026-10-03", "b"),
            entry("2026-10-01", "c"),
        ];
        let names: Vec<String> = by_date_desc(&log).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn visit_entry_defaults() {
        let venue = crate::aggregate::aggregate(&[crate::record::VenueRecord {
            name: "국밥집".to_string(),
            category: "한식".to_string(),
            menu_keywords: "국밥".to_string(),
            rating: 4.0,
            ..Default::default()
        }])
        .remove(0);
        let e = entry_for_visit(&venue, None, Some("  "), "2026-10-19");
        assert_eq!(e.date, "2026-10-19");
        assert_eq!(e.menu, "국밥");
        assert_eq!(e.author, DEFAULT_HISTORY_AUTHOR);
        assert_eq!(e.note, DEFAULT_HISTORY_NOTE);
        assert_eq!(e.rating, "4.0");

        let e = entry_for_visit(&venue, Some("kim"), Some("회식"), "2026-10-19");
        assert_eq!(e.author, "kim");
        assert_eq!(e.note, "회식");
    }

    #[test]
    fn today_is_iso_date() {
        let d = today();
        assert_eq!(d.len(), 10, "expected YYYY-MM-DD, got: {d}");
        assert_eq!(&d[4..5], "-");
    }
}
