use crate::models::{AnalysisRecord, WeightRecord};
use chrono::NaiveDate;

/// Anything keyed by a calendar date string.
pub trait Dated {
    fn date(&self) -> &str;
}

impl Dated for WeightRecord {
    fn date(&self) -> &str {
        &self.date
    }
}

impl Dated for AnalysisRecord {
    fn date(&self) -> &str {
        &self.date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

/// Replaces the entry sharing `item`'s date, or appends it, then re-sorts.
pub fn upsert_by_date<T: Dated>(items: &mut Vec<T>, item: T) -> Upsert {
    let outcome = match items.iter().position(|existing| existing.date() == item.date()) {
        Some(index) => {
            items[index] = item;
            Upsert::Replaced
        }
        None => {
            items.push(item);
            Upsert::Inserted
        }
    };
    sort_by_date(items);
    outcome
}

/// Removes every entry dated `date`. Returns whether anything was removed.
pub fn remove_by_date<T: Dated>(items: &mut Vec<T>, date: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.date() != date);
    items.len() != before
}

/// Stable ascending sort by parsed date. Unparseable dates go last.
pub fn sort_by_date<T: Dated>(items: &mut [T]) {
    items.sort_by_cached_key(|item| {
        let parsed = parse_date(item.date());
        (parsed.is_none(), parsed, item.date().to_owned())
    });
}

/// Newest-first view of at most `limit` entries.
pub fn newest_first<T: Dated + Clone>(items: &[T], limit: usize) -> Vec<T> {
    let mut sorted = items.to_vec();
    sort_by_date(&mut sorted);
    sorted.into_iter().rev().take(limit).collect()
}

/// Lenient parse used for ordering stored values, which may be legacy text.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Strict parse for new submissions: the text must already be the zero-padded
/// `YYYY-MM-DD` form, so each calendar day has exactly one key.
pub fn canonical_date(value: &str) -> Option<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    (parsed.format("%Y-%m-%d").to_string() == value).then_some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, weight: &str) -> WeightRecord {
        WeightRecord {
            date: date.to_string(),
            weight: weight.to_string(),
            exercise: None,
            diet: None,
        }
    }

    fn dates(items: &[WeightRecord]) -> Vec<&str> {
        items.iter().map(|item| item.date.as_str()).collect()
    }

    #[test]
    fn upsert_replaces_without_growing() {
        let mut items = vec![record("2024-01-01", "80.0"), record("2024-01-02", "79.8")];
        let outcome = upsert_by_date(&mut items, record("2024-01-01", "79.5"));

        assert_eq!(outcome, Upsert::Replaced);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].weight, "79.5");
    }

    #[test]
    fn upsert_inserts_and_sorts() {
        let mut items = vec![record("2024-01-03", "77.0")];
        let outcome = upsert_by_date(&mut items, record("2024-01-01", "78.0"));

        assert_eq!(outcome, Upsert::Inserted);
        assert_eq!(dates(&items), ["2024-01-01", "2024-01-03"]);
    }

    #[test]
    fn sort_compares_calendar_dates_and_keeps_garbage_last() {
        let mut items = vec![
            record("not-a-date", "70.0"),
            record("2024-02-01", "70.0"),
            record(" 2023-12-31", "70.0"),
        ];
        sort_by_date(&mut items);
        assert_eq!(dates(&items), [" 2023-12-31", "2024-02-01", "not-a-date"]);
    }

    #[test]
    fn every_date_appears_once_after_many_upserts() {
        let mut items = Vec::new();
        for (day, weight) in [(5, "80.0"), (1, "81.0"), (5, "79.9"), (3, "80.5"), (1, "80.8")] {
            upsert_by_date(&mut items, record(&format!("2024-03-0{day}"), weight));
        }

        assert_eq!(dates(&items), ["2024-03-01", "2024-03-03", "2024-03-05"]);
        assert_eq!(items[0].weight, "80.8");
        assert_eq!(items[2].weight, "79.9");
    }

    #[test]
    fn remove_reports_whether_anything_matched() {
        let mut items = vec![record("2024-01-01", "80.0")];
        assert!(!remove_by_date(&mut items, "2024-01-02"));
        assert!(remove_by_date(&mut items, "2024-01-01"));
        assert!(items.is_empty());
    }

    #[test]
    fn newest_first_limits_window() {
        let items: Vec<_> = (1..=9)
            .map(|day| record(&format!("2024-01-0{day}"), "80.0"))
            .collect();
        let recent = newest_first(&items, 7);
        assert_eq!(recent.len(), 7);
        assert_eq!(recent[0].date, "2024-01-09");
        assert_eq!(recent[6].date, "2024-01-03");
    }

    #[test]
    fn canonical_date_requires_zero_padded_form() {
        assert!(canonical_date("2024-01-01").is_some());
        assert!(canonical_date("2024-1-1").is_none());
        assert!(canonical_date(" 2024-01-01").is_none());
        assert!(canonical_date("2024-01-01 ").is_none());
        assert!(canonical_date("2024-02-30").is_none());
        assert!(parse_date(" 2024-01-01").is_some());
    }
}
