//! Min/max normalization of region totals onto the color ramp.

use crime_explorer_models::{AggregateMap, ColorRamp, Rgba};
use serde::Serialize;

/// How a region should be filled on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum RegionFill {
    /// The region has an aggregate; `ratio` is its position on the ramp.
    Data {
        /// Normalized intensity in `[0, 1]`.
        ratio: f64,
        /// Interpolated fill color.
        color: Rgba,
    },
    /// The dataset does not cover this region.
    NoData {
        /// The ramp's no-data color.
        color: Rgba,
    },
}

impl RegionFill {
    /// The color to paint, whichever variant this is.
    #[must_use]
    pub const fn color(&self) -> Rgba {
        match self {
            Self::Data { color, .. } | Self::NoData { color } => *color,
        }
    }

    /// Normalized intensity, or `None` for regions without data.
    #[must_use]
    pub const fn ratio(&self) -> Option<f64> {
        match self {
            Self::Data { ratio, .. } => Some(*ratio),
            Self::NoData { .. } => None,
        }
    }

    /// Whether this is the no-data marker.
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}

/// Range of region totals for the current aggregate set.
///
/// `max` falls back to 1 and `min` to 0 when there are no regions, so an
/// empty set still has a non-degenerate spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScale {
    /// Smallest region total.
    pub min: u64,
    /// Largest region total.
    pub max: u64,
}

impl ColorScale {
    /// Derives the scale from the totals in `aggregates`.
    #[must_use]
    pub fn from_aggregates(aggregates: &AggregateMap) -> Self {
        let totals = || aggregates.values().map(|a| a.total);
        Self {
            min: totals().min().unwrap_or(0),
            max: totals().max().unwrap_or(1),
        }
    }

    /// Position of `total` between `min` and `max`, clamped to `[0, 1]`.
    ///
    /// Every total maps to 0 when all regions tie.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self, total: u64) -> f64 {
        if self.max <= self.min {
            return 0.0;
        }
        let offset = total.saturating_sub(self.min) as f64;
        let spread = (self.max - self.min) as f64;
        (offset / spread).clamp(0.0, 1.0)
    }

    /// Fill for `region`: interpolated if it has an aggregate, the no-data
    /// marker otherwise.
    #[must_use]
    pub fn fill_for(&self, aggregates: &AggregateMap, region: &str, ramp: &ColorRamp) -> RegionFill {
        aggregates.get(region).map_or(
            RegionFill::NoData {
                color: ramp.no_data,
            },
            |aggregate| {
                let ratio = self.ratio(aggregate.total);
                RegionFill::Data {
                    ratio,
                    color: ramp.at(ratio),
                }
            },
        )
    }
}
