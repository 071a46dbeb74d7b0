#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record, aggregate, color, and selection types for the crime explorer.
//!
//! These types carry per-region, per-category, per-month crime counts from
//! ingestion through aggregation to the map and detail views. They hold no
//! aggregation logic of their own; see the `crime_explorer` crate for that.

pub mod color;

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use color::{ColorRamp, InvalidColorError, Rgba};

/// Sentinel string for the "all categories" filter.
pub const ALL_CATEGORIES: &str = "ALL";

/// Error returned when a string is not a valid six-digit period key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid period key '{value}': expected six digits (YYYYMM)")]
pub struct InvalidPeriodError {
    /// The rejected input.
    pub value: String,
}

/// A calendar month identified by a fixed-width `YYYYMM` key.
///
/// Ordering is lexicographic, which matches chronological order because the
/// key is fixed-width.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period(String);

impl Period {
    /// Parses a period key.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPeriodError`] unless the input is exactly six ASCII
    /// digits.
    pub fn parse(value: &str) -> Result<Self, InvalidPeriodError> {
        if Self::is_period_key(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(InvalidPeriodError {
                value: value.to_string(),
            })
        }
    }

    /// Returns `true` if `value` looks like a period key (`^\d{6}$`).
    #[must_use]
    pub fn is_period_key(value: &str) -> bool {
        value.len() == 6 && value.bytes().all(|b| b.is_ascii_digit())
    }

    /// Returns the raw `YYYYMM` key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Four-digit year component.
    #[must_use]
    pub fn year(&self) -> &str {
        &self.0[..4]
    }

    /// Two-digit month component.
    #[must_use]
    pub fn month(&self) -> &str {
        &self.0[4..]
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Period {
    type Err = InvalidPeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Period {
    type Error = InvalidPeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_period_key(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidPeriodError { value })
        }
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.0
    }
}

/// Coerces a raw count cell to a non-negative integer.
///
/// Leading whitespace is ignored and the longest run of leading digits is
/// taken, so `"12"` and `"3abc"` parse while `""`, `"n/a"`, and negative
/// values become zero. Runs too large for a `u64` also become zero.
#[must_use]
pub fn parse_count(cell: &str) -> u64 {
    let trimmed = cell.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed, |end| &trimmed[..end]);
    digits.parse().unwrap_or(0)
}

/// One row of the source table: a region, a category, and a count per month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Region name (e.g. a borough). Empty when the source row had none.
    pub region: String,
    /// Crime category label.
    pub category: String,
    /// Count per period. Periods absent from the map count as zero.
    pub counts: BTreeMap<Period, u64>,
}

impl RawRecord {
    /// Creates a record with no counts.
    #[must_use]
    pub fn new(region: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            category: category.into(),
            counts: BTreeMap::new(),
        }
    }

    /// Adds `count` at `period`, accumulating onto any existing value.
    #[must_use]
    pub fn with_count(mut self, period: Period, count: u64) -> Self {
        self.add_count(period, count);
        self
    }

    /// Accumulates `count` at `period`.
    pub fn add_count(&mut self, period: Period, count: u64) {
        let slot = self.counts.entry(period).or_insert(0);
        *slot = slot.saturating_add(count);
    }

    /// Accumulates a raw cell at `period`, coercing it with [`parse_count`].
    pub fn add_cell(&mut self, period: Period, cell: &str) {
        self.add_count(period, parse_count(cell));
    }

    /// Count at `period`, or zero if the record has none.
    #[must_use]
    pub fn count_at(&self, period: &Period) -> u64 {
        self.counts.get(period).copied().unwrap_or(0)
    }

    /// Whether this record can be attributed to a region.
    #[must_use]
    pub fn has_region(&self) -> bool {
        !self.region.is_empty()
    }
}

/// Category filter applied before aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    /// Every category is included.
    #[default]
    All,
    /// Only records with exactly this category are included.
    Only(String),
}

impl CategoryFilter {
    /// Whether a record with `category` passes this filter.
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == category,
        }
    }

    /// Whether this is the "all categories" sentinel.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL_CATEGORIES),
            Self::Only(category) => f.write_str(category),
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(value)
        }
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => ALL_CATEGORIES.to_string(),
            CategoryFilter::Only(category) => category,
        }
    }
}

/// Summed counts for one region under the active filter and period range.
///
/// `total`, the sum of `by_period`, and the sum of `by_category` are always
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionAggregate {
    /// Region name, keyed identically to the boundary feature property.
    pub name: String,
    /// Total count across the selected periods and categories.
    pub total: u64,
    /// Breakdown by category.
    pub by_category: BTreeMap<String, u64>,
    /// Breakdown by period, one entry per selected period.
    pub by_period: BTreeMap<Period, u64>,
}

impl RegionAggregate {
    /// Creates an empty aggregate for `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total: 0,
            by_category: BTreeMap::new(),
            by_period: BTreeMap::new(),
        }
    }

    /// Checks that the total agrees with both breakdowns.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        saturating_sum(self.by_period.values()) == self.total
            && saturating_sum(self.by_category.values()) == self.total
    }
}

fn saturating_sum<'a>(counts: impl Iterator<Item = &'a u64>) -> u64 {
    counts.fold(0, |acc, n| acc.saturating_add(*n))
}

/// Per-region aggregates keyed by region name.
pub type AggregateMap = BTreeMap<String, RegionAggregate>;

/// Which region is hovered and which is pinned by a click.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    /// Region under the pointer.
    pub hovered: Option<String>,
    /// Region pinned by a click.
    pub pinned: Option<String>,
}

/// Which detail view is authoritative.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DetailKind {
    /// The lightweight hover card with the monthly time series.
    Hover,
    /// The pinned detail panel.
    Pinned,
    /// No detail view.
    None,
}

/// The detail view to show and the region it describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailTarget {
    /// Kind of detail view.
    pub kind: DetailKind,
    /// Region shown, `None` when `kind` is [`DetailKind::None`].
    pub region: Option<String>,
}

impl DetailTarget {
    /// No detail view.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            kind: DetailKind::None,
            region: None,
        }
    }
}

/// A count at a single period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodCount {
    /// Period key.
    pub period: Period,
    /// Count at that period.
    pub count: u64,
}

/// Headline statistics over a region's monthly series, shown in the pinned
/// detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    /// Number of periods in the series.
    pub periods: usize,
    /// Sum over the series.
    pub total: u64,
    /// `total / periods`, rounded half away from zero.
    pub average: u64,
    /// Earliest period holding the maximum count.
    pub peak: Option<PeriodCount>,
    /// Up to three highest periods, descending, ties in chronological order.
    pub top_periods: Vec<Period>,
}
