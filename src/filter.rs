use crate::results::ProductRecord;
use std::collections::HashSet;

/// Drops records whose title was already accepted in the current collection run.
///
/// Titles are not unique product identifiers; two distinct listings sharing a title
/// collapse into one. The filter lives for a single run only.
#[derive(Debug, Default)]
pub struct TitleFilter {
    seen: HashSet<String>,
}

impl TitleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` and remembers the key when the record is new
    pub fn accept(&mut self, record: &ProductRecord) -> bool {
        let key = record.identity_key();
        if self.seen.contains(key) {
            ::log::debug!("Skipping repeated listing: {}", key);
            return false;
        }
        self.seen.insert(key.to_string());
        true
    }

    /// Forget every key, starting a new run
    pub fn reset(&mut self) {
        self.seen.clear();
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(title: &str) -> ProductRecord {
        ProductRecord {
            title: title.to_string(),
            grammage: "No Grammage".to_string(),
            selling_price: "No Price".to_string(),
            reference_price: "No Price".to_string(),
            discount_percent: 0.0,
            deal_tag: "No Deal".to_string(),
            recent_purchase_volume: "No data".to_string(),
            rating: "No Rating".to_string(),
            review_count: "No Reviews".to_string(),
            link: "No Link".to_string(),
            is_sponsored: false,
            captured_at: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            search_term: "atta".to_string(),
            geo_context: "560064".to_string(),
            category: "atta".to_string(),
        }
    }

    #[test]
    fn test_second_identical_title_is_rejected() {
        let mut filter = TitleFilter::new();
        assert!(filter.accept(&record("Aashirvaad Atta 5kg")));
        assert!(!filter.accept(&record("Aashirvaad Atta 5kg")));
        assert!(filter.accept(&record("Pillsbury Atta 5kg")));
        assert_eq!(filter.seen_count(), 2);
    }

    #[test]
    fn test_key_is_trimmed() {
        let mut filter = TitleFilter::new();
        assert!(filter.accept(&record("  Atta 1kg ")));
        assert!(!filter.accept(&record("Atta 1kg")));
    }

    #[test]
    fn test_sentinel_titles_deduplicate_too() {
        let mut filter = TitleFilter::new();
        assert!(filter.accept(&record("No Title")));
        assert!(!filter.accept(&record("No Title")));
    }

    #[test]
    fn test_reset_starts_new_run() {
        let mut filter = TitleFilter::new();
        assert!(filter.accept(&record("Atta 1kg")));
        filter.reset();
        assert_eq!(filter.seen_count(), 0);
        assert!(filter.accept(&record("Atta 1kg")));
    }
}
