//! Keyword suggestions: values already in the sheet merged with configured defaults.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::options::{Mode, OptionLists};
use crate::record::{VenueRecord, split_keywords};

/// Comma-split every cell, union with `defaults`, sorted and deduplicated.
pub fn unique_values<'a, I, S>(cells: I, defaults: &[String]) -> Vec<String>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + 'a + ?Sized,
{
    let mut set: BTreeSet<String> = defaults.iter().cloned().collect();
    for cell in cells {
        set.extend(split_keywords(cell.as_ref()).map(str::to_string));
    }
    set.into_iter().collect()
}

/// Picker contents for one mode.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestions {
    pub mode: Mode,
    /// Categories of the mode that actually occur in the data, or the whole
    /// allow-list when none do.
    pub categories: Vec<String>,
    pub menus: Vec<String>,
    pub vibes: Vec<String>,
    pub authors: Vec<String>,
}

pub fn suggestions(records: &[VenueRecord], options: &OptionLists, mode: Mode) -> Suggestions {
    let allowed = options.categories(mode);

    let present = unique_values(records.iter().map(|r| &r.category), &[]);
    let mut categories: Vec<String> = present
        .into_iter()
        .filter(|c| allowed.contains(c))
        .collect();
    if categories.is_empty() {
        categories = allowed.to_vec();
    }

    let in_mode = records.iter().filter(|r| allowed.contains(&r.category));

    Suggestions {
        mode,
        categories,
        menus: unique_values(in_mode.map(|r| &r.menu_keywords), options.menus(mode)),
        vibes: unique_values(records.iter().map(|r| &r.vibe_keywords), &options.vibes),
        authors: unique_values(records.iter().map(|r| &r.author), &[]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(category: &str, menu: &str, author: &str) -> VenueRecord {
        VenueRecord {
            name: "x".to_string(),
            category: category.to_string(),
            menu_keywords: menu.to_string(),
            author: author.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn union_sorted_dedup() {
        let cells = vec!["b, a".to_string(), "".to_string(), "c,a".to_string()];
        let out = unique_values(cells.iter(), &["d".to_string(), "a".to_string()]);
        assert_eq!(out, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn str_cells_work_too() {
        let out = unique_values(["x,y", "y"].iter().copied(), &[]);
        assert_eq!(out, vec!["x", "y"]);
    }

    #[test]
    fn menus_are_mode_filtered() {
        let opts = OptionLists::default();
        let records = vec![rec("한식", "곰탕", "kim"), rec("카페", "말차라떼", "lee")];
        let food = suggestions(&records, &opts, Mode::Food);
        assert!(food.menus.contains(&"곰탕".to_string()));
        assert!(!food.menus.contains(&"말차라떼".to_string()));
        assert!(food.menus.contains(&"김치찌개".to_string()));
        assert_eq!(food.categories, vec!["한식"]);
        assert_eq!(food.authors, vec!["kim", "lee"]);
    }

    #[test]
    fn categories_fall_back_to_allow_list() {
        let opts = OptionLists::default();
        let cafe = suggestions(&[], &opts, Mode::Cafe);
        assert_eq!(cafe.categories, opts.cafe_categories);
    }
}
