//! Per-region aggregation under a category filter and period range.
//!
//! Aggregates are a pure function of the records, the filter, and the
//! selected periods. They are recomputed from scratch on every change rather
//! than patched incrementally.

use crime_explorer_models::{AggregateMap, CategoryFilter, Period, RawRecord, RegionAggregate};

/// Sums the records that pass `filter` over `periods`, per region.
///
/// Records without a region are skipped. Records whose category does not
/// match are excluded entirely, so a region with no matching records has no
/// entry at all. Every surviving record contributes a `by_period` entry for
/// each selected period and a `by_category` entry for its category, even when
/// the counts are zero.
///
/// An empty `periods` slice yields an empty map.
#[must_use]
pub fn compute_aggregates(
    records: &[RawRecord],
    filter: &CategoryFilter,
    periods: &[Period],
) -> AggregateMap {
    let mut result = AggregateMap::new();

    if periods.is_empty() {
        return result;
    }

    for record in records
        .iter()
        .filter(|r| r.has_region() && filter.matches(&r.category))
    {
        let aggregate = result
            .entry(record.region.clone())
            .or_insert_with(|| RegionAggregate::new(record.region.clone()));

        let mut record_total = 0_u64;
        for period in periods {
            let count = record.count_at(period);
            record_total = record_total.saturating_add(count);
            let slot = aggregate.by_period.entry(period.clone()).or_insert(0);
            *slot = slot.saturating_add(count);
        }

        aggregate.total = aggregate.total.saturating_add(record_total);
        let slot = aggregate
            .by_category
            .entry(record.category.clone())
            .or_insert(0);
        *slot = slot.saturating_add(record_total);
    }

    result
}

/// Sum of every region's total.
#[must_use]
pub fn total_count(aggregates: &AggregateMap) -> u64 {
    aggregates
        .values()
        .fold(0, |sum, a| sum.saturating_add(a.total))
}

#[cfg(test)]
mod tests {
    use crate::normalize::ColorScale;

    use super::*;

    fn period(key: &str) -> Period {
        Period::parse(key).unwrap()
    }

    fn periods(keys: &[&str]) -> Vec<Period> {
        keys.iter().map(|k| period(k)).collect()
    }

    fn record(region: &str, category: &str, counts: &[(&str, u64)]) -> RawRecord {
        counts
            .iter()
            .fold(RawRecord::new(region, category), |r, (p, c)| {
                r.with_count(period(p), *c)
            })
    }

    fn two_boroughs() -> Vec<RawRecord> {
        vec![
            record("A", "Burglary", &[("202401", 10), ("202402", 5)]),
            record("B", "Burglary", &[("202401", 2), ("202402", 2)]),
        ]
    }

    fn mixed() -> Vec<RawRecord> {
        vec![
            record("A", "Burglary", &[("202401", 10), ("202402", 5), ("202403", 1)]),
            record("A", "Robbery", &[("202401", 3), ("202403", 7)]),
            record("B", "Burglary", &[("202401", 2), ("202402", 2)]),
            record("C", "Robbery", &[("202402", 6)]),
            record("", "Robbery", &[("202402", 100)]),
        ]
    }

    #[test]
    fn sums_full_range() {
        let aggs = compute_aggregates(
            &two_boroughs(),
            &CategoryFilter::All,
            &periods(&["202401", "202402"]),
        );
        assert_eq!(aggs.len(), 2);
        assert_eq!(aggs["A"].total, 15);
        assert_eq!(aggs["B"].total, 4);
        assert_eq!(aggs["A"].by_period[&period("202401")], 10);
        assert_eq!(aggs["A"].by_category["Burglary"], 15);
    }

    #[test]
    fn sums_narrowed_range() {
        let aggs = compute_aggregates(&two_boroughs(), &CategoryFilter::All, &periods(&["202402"]));
        assert_eq!(aggs["A"].total, 5);
        assert_eq!(aggs["B"].total, 2);
        assert_eq!(aggs["A"].by_period.len(), 1);
        assert_eq!(
            ColorScale::from_aggregates(&aggs),
            ColorScale { min: 2, max: 5 }
        );
    }

    #[test]
    fn category_filter_excludes_rather_than_zeroes() {
        let aggs = compute_aggregates(
            &mixed(),
            &CategoryFilter::from("Robbery"),
            &periods(&["202401", "202402", "202403"]),
        );
        assert!(!aggs.contains_key("B"));
        assert_eq!(aggs["A"].total, 10);
        assert_eq!(aggs["C"].total, 6);
        assert!(!aggs["A"].by_category.contains_key("Burglary"));
    }

    #[test]
    fn unknown_category_yields_no_regions() {
        let aggs = compute_aggregates(
            &mixed(),
            &CategoryFilter::from("Arson"),
            &periods(&["202401"]),
        );
        assert!(aggs.is_empty());
    }

    #[test]
    fn regionless_records_are_skipped() {
        let aggs = compute_aggregates(&mixed(), &CategoryFilter::All, &periods(&["202402"]));
        assert!(!aggs.contains_key(""));
        assert_eq!(total_count(&aggs), 5 + 2 + 6);
    }

    #[test]
    fn zero_counts_still_produce_entries() {
        let aggs = compute_aggregates(&mixed(), &CategoryFilter::All, &periods(&["202403"]));
        let b = &aggs["B"];
        assert_eq!(b.total, 0);
        assert_eq!(b.by_period[&period("202403")], 0);
        assert_eq!(b.by_category["Burglary"], 0);
        assert_eq!(aggs["C"].total, 0);
    }

    #[test]
    fn empty_range_yields_no_regions() {
        assert!(compute_aggregates(&mixed(), &CategoryFilter::All, &[]).is_empty());
    }

    #[test]
    fn duplicate_rows_are_additive() {
        let records = vec![
            record("A", "Burglary", &[("202401", 4)]),
            record("A", "Burglary", &[("202401", 6)]),
        ];
        let aggs = compute_aggregates(&records, &CategoryFilter::All, &periods(&["202401"]));
        assert_eq!(aggs["A"].total, 10);
        assert_eq!(aggs["A"].by_category["Burglary"], 10);
    }

    #[test]
    fn totals_agree_with_breakdowns() {
        let range = periods(&["202401", "202402", "202403"]);
        for filter in [CategoryFilter::All, CategoryFilter::from("Burglary")] {
            for agg in compute_aggregates(&mixed(), &filter, &range).values() {
                assert!(agg.is_consistent(), "{} is inconsistent", agg.name);
            }
        }
    }

    #[test]
    fn grand_total_equals_included_cells() {
        let records = mixed();
        let range = periods(&["202401", "202403"]);
        let expected: u64 = records
            .iter()
            .filter(|r| r.has_region())
            .flat_map(|r| range.iter().map(|p| r.count_at(p)))
            .sum();
        let aggs = compute_aggregates(&records, &CategoryFilter::All, &range);
        assert_eq!(total_count(&aggs), expected);
    }

    #[test]
    fn result_is_independent_of_record_order() {
        let range = periods(&["202401", "202402", "202403"]);
        let forward = compute_aggregates(&mixed(), &CategoryFilter::All, &range);
        let mut reversed_records = mixed();
        reversed_records.reverse();
        let reversed = compute_aggregates(&reversed_records, &CategoryFilter::All, &range);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn narrowing_never_increases_totals() {
        let records = mixed();
        let wide = compute_aggregates(
            &records,
            &CategoryFilter::All,
            &periods(&["202401", "202402", "202403"]),
        );
        let narrow = compute_aggregates(&records, &CategoryFilter::All, &periods(&["202402"]));
        for (name, agg) in &narrow {
            assert!(agg.total <= wide[name].total, "{name} grew when narrowed");
        }
    }

    #[test]
    fn huge_counts_saturate_instead_of_overflowing() {
        let records = vec![
            record("A", "Burglary", &[("202401", u64::MAX), ("202402", 1)]),
            record("A", "Robbery", &[("202401", u64::MAX)]),
            record("B", "Burglary", &[("202401", u64::MAX)]),
        ];
        let aggs = compute_aggregates(
            &records,
            &CategoryFilter::All,
            &periods(&["202401", "202402"]),
        );
        assert_eq!(aggs["A"].total, u64::MAX);
        assert_eq!(aggs["A"].by_period[&period("202401")], u64::MAX);
        assert_eq!(aggs["A"].by_category["Burglary"], u64::MAX);
        assert_eq!(total_count(&aggs), u64::MAX);
    }
}
