#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation, color normalization, and selection engine for the crime
//! explorer.
//!
//! Turns raw per-region, per-category, per-month counts into filtered
//! per-region totals and a normalized color ramp, and arbitrates hover
//! versus click selection against them. [`CrimeExplorer`] ties the pieces
//! together behind the API the map and sidebar consume:
//!
//! | Piece | Module |
//! |-------|--------|
//! | Record set and its indices | [`store`] |
//! | Per-region sums | [`aggregate`] |
//! | Min/max color ramp | [`normalize`] |
//! | Hover/pin state machine | [`selection`] |
//! | Month range boundaries | [`period_range`] |
//! | Labels and panel statistics | [`summary`] |
//!
//! Nothing here performs I/O. Records arrive already parsed (see the
//! `crime_explorer_ingest` crate).

pub mod aggregate;
pub mod explorer;
pub mod normalize;
pub mod period_range;
pub mod selection;
pub mod store;
pub mod summary;

pub use aggregate::{compute_aggregates, total_count};
pub use explorer::{CrimeExplorer, DataStatus, HoverCard};
pub use normalize::{ColorScale, RegionFill};
pub use period_range::{PeriodRange, PeriodRangeSelector, RangeError};
pub use selection::{SelectionCoordinator, SelectionPhase};
pub use store::RecordStore;
pub use summary::{format_period, summarize_series};
