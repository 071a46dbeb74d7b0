//! Contiguous month-range selection over the fixed period list.

use crime_explorer_models::Period;
use serde::Serialize;

/// Reasons a range request is rejected. The previous range is always kept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// No periods are loaded, so no range exists.
    #[error("no periods are available")]
    NoPeriods,

    /// The requested boundary is not one of the loaded periods.
    #[error("unknown period '{period}'")]
    UnknownPeriod {
        /// The requested boundary.
        period: Period,
    },

    /// The requested range would start after it ends.
    #[error("range start {start} is after range end {end}")]
    Inverted {
        /// Requested start.
        start: Period,
        /// Requested end.
        end: Period,
    },
}

/// Inclusive index bounds into the period list. Always `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRange {
    /// Index of the first selected period.
    pub start: usize,
    /// Index of the last selected period.
    pub end: usize,
}

impl PeriodRange {
    /// Number of periods covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always `false`; a range covers at least one period.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// Holds the sorted period list and the currently selected sub-range.
#[derive(Debug, Clone, Default)]
pub struct PeriodRangeSelector {
    periods: Vec<Period>,
    range: Option<PeriodRange>,
}

impl PeriodRangeSelector {
    /// Creates a selector over `periods` (sorted and deduplicated here),
    /// initially spanning all of them.
    #[must_use]
    pub fn new(mut periods: Vec<Period>) -> Self {
        periods.sort();
        periods.dedup();
        let range = (!periods.is_empty()).then(|| PeriodRange {
            start: 0,
            end: periods.len() - 1,
        });
        Self { periods, range }
    }

    /// All available periods.
    #[must_use]
    pub fn available(&self) -> &[Period] {
        &self.periods
    }

    /// The current range, `None` when no periods are loaded.
    #[must_use]
    pub const fn range(&self) -> Option<PeriodRange> {
        self.range
    }

    /// The selected periods in order; empty when no periods are loaded.
    #[must_use]
    pub fn selected(&self) -> &[Period] {
        match self.range {
            Some(r) => &self.periods[r.start..=r.end],
            None => &[],
        }
    }

    /// First and last selected period.
    #[must_use]
    pub fn bounds(&self) -> Option<(&Period, &Period)> {
        self.range
            .map(|r| (&self.periods[r.start], &self.periods[r.end]))
    }

    /// Moves the start boundary, keeping the current end.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError`] if `period` is unknown or after the current
    /// end. The range is unchanged on error.
    pub fn set_start(&mut self, period: &Period) -> Result<PeriodRange, RangeError> {
        let current = self.range.ok_or(RangeError::NoPeriods)?;
        let start = self.index_of(period)?;
        self.apply(start, current.end)
    }

    /// Moves the end boundary, keeping the current start.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError`] if `period` is unknown or before the current
    /// start. The range is unchanged on error.
    pub fn set_end(&mut self, period: &Period) -> Result<PeriodRange, RangeError> {
        let current = self.range.ok_or(RangeError::NoPeriods)?;
        let end = self.index_of(period)?;
        self.apply(current.start, end)
    }

    /// Replaces both boundaries at once. Both are validated before anything
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError`] if either boundary is unknown or `start` is
    /// after `end`. The range is unchanged on error.
    pub fn set_range(&mut self, start: &Period, end: &Period) -> Result<PeriodRange, RangeError> {
        if self.range.is_none() {
            return Err(RangeError::NoPeriods);
        }
        let start = self.index_of(start)?;
        let end = self.index_of(end)?;
        self.apply(start, end)
    }

    /// Restores the full span.
    pub fn reset(&mut self) {
        self.range = (!self.periods.is_empty()).then(|| PeriodRange {
            start: 0,
            end: self.periods.len() - 1,
        });
    }

    fn index_of(&self, period: &Period) -> Result<usize, RangeError> {
        self.periods
            .binary_search(period)
            .map_err(|_| RangeError::UnknownPeriod {
                period: period.clone(),
            })
    }

    fn apply(&mut self, start: usize, end: usize) -> Result<PeriodRange, RangeError> {
        if start > end {
            return Err(RangeError::Inverted {
                start: self.periods[start].clone(),
                end: self.periods[end].clone(),
            });
        }
        let range = PeriodRange { start, end };
        self.range = Some(range);
        Ok(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(key: &str) -> Period {
        Period::parse(key).unwrap()
    }

    fn selector(keys: &[&str]) -> PeriodRangeSelector {
        PeriodRangeSelector::new(keys.iter().map(|k| period(k)).collect())
    }

    fn selected(sel: &PeriodRangeSelector) -> Vec<&str> {
        sel.selected().iter().map(Period::as_str).collect()
    }

    #[test]
    fn defaults_to_full_span() {
        let sel = selector(&["202403", "202401", "202402"]);
        assert_eq!(selected(&sel), ["202401", "202402", "202403"]);
        assert_eq!(sel.range().map(|r| r.len()), Some(3));
    }

    #[test]
    fn narrows_from_either_side() {
        let mut sel = selector(&["202401", "202402", "202403", "202404"]);
        sel.set_start(&period("202402")).unwrap();
        sel.set_end(&period("202403")).unwrap();
        assert_eq!(selected(&sel), ["202402", "202403"]);
    }

    #[test]
    fn single_period_range_is_allowed() {
        let mut sel = selector(&["202401", "202402"]);
        sel.set_start(&period("202402")).unwrap();
        assert_eq!(selected(&sel), ["202402"]);
    }

    #[test]
    fn start_after_end_is_rejected_and_range_kept() {
        let mut sel = selector(&["202401", "202402"]);
        sel.set_end(&period("202401")).unwrap();
        let before = sel.range();

        let err = sel.set_start(&period("202402")).unwrap_err();
        assert_eq!(
            err,
            RangeError::Inverted {
                start: period("202402"),
                end: period("202401"),
            }
        );
        assert_eq!(sel.range(), before);
        assert_eq!(selected(&sel), ["202401"]);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut sel = selector(&["202401", "202402", "202403"]);
        sel.set_start(&period("202403")).unwrap();
        assert!(sel.set_end(&period("202401")).is_err());
        assert_eq!(selected(&sel), ["202403"]);
    }

    #[test]
    fn unknown_boundary_is_rejected() {
        let mut sel = selector(&["202401", "202402"]);
        assert!(matches!(
            sel.set_start(&period("209912")),
            Err(RangeError::UnknownPeriod { .. })
        ));
        assert_eq!(selected(&sel), ["202401", "202402"]);
    }

    #[test]
    fn set_range_validates_both_before_mutating() {
        let mut sel = selector(&["202401", "202402", "202403"]);
        assert!(sel.set_range(&period("202402"), &period("209901")).is_err());
        assert_eq!(selected(&sel), ["202401", "202402", "202403"]);
        assert!(sel.set_range(&period("202403"), &period("202402")).is_err());
        sel.set_range(&period("202402"), &period("202403")).unwrap();
        assert_eq!(selected(&sel), ["202402", "202403"]);
    }

    #[test]
    fn empty_selector_has_no_range() {
        let mut sel = PeriodRangeSelector::new(Vec::new());
        assert!(sel.range().is_none());
        assert!(sel.selected().is_empty());
        assert_eq!(sel.set_start(&period("202401")), Err(RangeError::NoPeriods));
    }

    #[test]
    fn reset_restores_full_span() {
        let mut sel = selector(&["202401", "202402", "202403"]);
        sel.set_start(&period("202403")).unwrap();
        sel.reset();
        assert_eq!(selected(&sel).len(), 3);
    }
}
