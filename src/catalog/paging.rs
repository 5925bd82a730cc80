//! Deduplication, search filtering and pagination over entry sequences

use std::collections::HashSet;

use crate::errors::{AddonError, AddonResult};
use crate::models::PlaylistEntry;

/// Drop duplicate entries by title, first occurrence wins
///
/// Comparison is case-insensitive while the surviving entry keeps its
/// original casing. Order is preserved, and the operation is idempotent.
pub fn dedup_by_title(entries: Vec<PlaylistEntry>) -> Vec<PlaylistEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.title.to_lowercase()))
        .collect()
}

/// Case-insensitive substring search over item names
///
/// An empty result is a caller-visible `NoResults` rejection, distinct from
/// "zero items existed at all" which callers detect before searching.
pub fn search<T>(items: Vec<T>, query: &str, name: impl Fn(&T) -> &str) -> AddonResult<Vec<T>> {
    let needle = query.to_lowercase();
    let results: Vec<T> = items
        .into_iter()
        .filter(|item| name(item).to_lowercase().contains(&needle))
        .collect();

    if results.is_empty() {
        Err(AddonError::no_results(query))
    } else {
        Ok(results)
    }
}

/// Standard slice windowing over an item sequence
///
/// An out-of-range `skip` yields an empty result, never an error.
pub fn paginate<T>(items: Vec<T>, skip: usize, page_size: usize) -> Vec<T> {
    items.into_iter().skip(skip).take(page_size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, locator: &str) -> PlaylistEntry {
        PlaylistEntry {
            title: title.to_string(),
            group: None,
            logo: None,
            locator: locator.to_string(),
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence_and_order() {
        let entries = vec![
            entry("Channel A", "http://src/a.m3u8"),
            entry("Channel B", "http://src/b.m3u8"),
            entry("channel a", "http://src/dup.m3u8"),
            entry("Channel C", "http://src/c.m3u8"),
        ];

        let deduped = dedup_by_title(entries);
        assert_eq!(deduped.len(), 3);
        // First occurrence wins and keeps its casing and locator
        assert_eq!(deduped[0].title, "Channel A");
        assert_eq!(deduped[0].locator, "http://src/a.m3u8");
        assert_eq!(deduped[1].title, "Channel B");
        assert_eq!(deduped[2].title, "Channel C");
    }

    #[test]
    fn dedup_is_idempotent() {
        let entries = vec![
            entry("A", "http://1"),
            entry("a", "http://2"),
            entry("B", "http://3"),
        ];
        let once = dedup_by_title(entries);
        let twice = dedup_by_title(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let items = vec!["BBC News", "CNN", "bbc world"];
        let results = search(items, "BBC", |s| *s).unwrap();
        assert_eq!(results, vec!["BBC News", "bbc world"]);
    }

    #[test]
    fn search_with_no_match_is_a_rejection() {
        let items: Vec<&str> = (0..50).map(|_| "Channel").collect();
        let err = search(items, "zzz", |s| *s).unwrap_err();
        assert!(matches!(err, AddonError::NoResults { .. }));
        assert_eq!(err.to_string(), "No search results for: zzz");
    }

    #[test]
    fn paginate_length_law() {
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(paginate(items.clone(), 0, 10).len(), 10);
        assert_eq!(paginate(items.clone(), 20, 10).len(), 5);
        assert_eq!(paginate(items.clone(), 25, 10).len(), 0);
        assert_eq!(paginate(items.clone(), 1000, 10).len(), 0);
        assert_eq!(paginate(items, 10, 10), (10..20).collect::<Vec<u32>>());
    }
}
