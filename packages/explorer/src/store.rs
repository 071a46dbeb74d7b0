//! Immutable record set with its derived indices.

use std::collections::BTreeSet;

use crime_explorer_models::{CategoryFilter, Period, RawRecord};

/// The parsed records of one data load plus the distinct periods,
/// categories, and regions they mention.
///
/// Built once per load and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<RawRecord>,
    periods: Vec<Period>,
    categories: Vec<String>,
    regions: Vec<String>,
}

impl RecordStore {
    /// Builds a store, taking the period list from the union of every
    /// record's count keys.
    #[must_use]
    pub fn new(records: Vec<RawRecord>) -> Self {
        let periods = records
            .iter()
            .flat_map(|r| r.counts.keys().cloned())
            .collect::<BTreeSet<_>>();
        Self::with_periods(records, periods)
    }

    /// Builds a store with an explicit period list (typically the period
    /// columns of the source table). Periods mentioned by records but not
    /// listed are added.
    #[must_use]
    pub fn with_periods(records: Vec<RawRecord>, periods: impl IntoIterator<Item = Period>) -> Self {
        let mut period_set: BTreeSet<Period> = periods.into_iter().collect();
        period_set.extend(records.iter().flat_map(|r| r.counts.keys().cloned()));

        let categories: BTreeSet<&str> = records
            .iter()
            .filter(|r| r.has_region())
            .map(|r| r.category.as_str())
            .filter(|c| !c.is_empty())
            .collect();
        let regions: BTreeSet<&str> = records
            .iter()
            .filter(|r| r.has_region())
            .map(|r| r.region.as_str())
            .collect();

        let categories = categories.into_iter().map(str::to_string).collect();
        let regions = regions.into_iter().map(str::to_string).collect();

        Self {
            periods: period_set.into_iter().collect(),
            categories,
            regions,
            records,
        }
    }

    /// All records, including ones without a region.
    #[must_use]
    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    /// Distinct periods in chronological order.
    #[must_use]
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Distinct non-empty categories of records with a region, sorted.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Distinct non-empty region names, sorted.
    #[must_use]
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// The "all categories" sentinel followed by every category.
    #[must_use]
    pub fn category_options(&self) -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(self.categories.iter().cloned().map(CategoryFilter::Only))
            .collect()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(key: &str) -> Period {
        Period::parse(key).unwrap()
    }

    fn sample() -> Vec<RawRecord> {
        vec![
            RawRecord::new("Westminster", "Theft").with_count(period("202402"), 4),
            RawRecord::new("Camden", "Burglary").with_count(period("202401"), 2),
            RawRecord::new("", "Robbery").with_count(period("202403"), 9),
            RawRecord::new("Camden", "Theft").with_count(period("202401"), 1),
        ]
    }

    #[test]
    fn derives_sorted_distinct_indices() {
        let store = RecordStore::new(sample());
        let periods: Vec<&str> = store.periods().iter().map(Period::as_str).collect();
        assert_eq!(periods, ["202401", "202402", "202403"]);
        assert_eq!(store.categories(), ["Burglary", "Theft"]);
        assert_eq!(store.regions(), ["Camden", "Westminster"]);
        assert_eq!(store.records().len(), 4);
    }

    #[test]
    fn explicit_periods_are_kept_even_without_counts() {
        let store = RecordStore::with_periods(sample(), [period("202312")]);
        assert_eq!(store.periods().first().map(Period::as_str), Some("202312"));
        assert_eq!(store.periods().len(), 4);
    }

    #[test]
    fn category_options_start_with_all() {
        let store = RecordStore::new(sample());
        let options = store.category_options();
        assert_eq!(options[0], CategoryFilter::All);
        assert_eq!(options.len(), 3);
        assert_eq!(options[1], CategoryFilter::from("Burglary"));
    }

    #[test]
    fn empty_store() {
        let store = RecordStore::default();
        assert!(store.is_empty());
        assert!(store.periods().is_empty());
        assert_eq!(store.category_options(), [CategoryFilter::All]);
    }
}
