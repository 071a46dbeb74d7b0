//! The controller that owns the active filter, range, aggregates, and
//! selection, and exposes them to the map and sidebar.
//!
//! Every mutating call updates all derived state before returning, so a
//! renderer reading the controller afterwards never sees a filter paired
//! with aggregates computed for a different one.

use crime_explorer_models::{
    AggregateMap, CategoryFilter, ColorRamp, DetailKind, DetailTarget, Period, RegionAggregate,
    SelectionState, SeriesSummary,
};

use crate::aggregate::{compute_aggregates, total_count};
use crate::normalize::{ColorScale, RegionFill};
use crate::period_range::{PeriodRange, PeriodRangeSelector, RangeError};
use crate::selection::{SelectionCoordinator, SelectionPhase};
use crate::store::RecordStore;
use crate::summary::{format_period, summarize_series};

/// Whether data is available to explore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataStatus {
    /// A record set is loaded (possibly empty).
    Ready,
    /// Ingestion failed; the explorer stays empty for the rest of its life
    /// unless a new store is loaded.
    Unavailable {
        /// Why ingestion failed.
        reason: String,
    },
}

/// Key identifying one aggregate computation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AggregateKey {
    version: u64,
    filter: CategoryFilter,
    range: Option<PeriodRange>,
}

/// What the pointer-following card should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverCard<'a> {
    /// The hovered region's monthly series.
    Series(&'a RegionAggregate),
    /// The hovered region is not covered by the dataset.
    NoData(&'a str),
}

/// Owns the record set and every piece of UI-facing state derived from it.
#[derive(Debug, Clone)]
pub struct CrimeExplorer {
    store: RecordStore,
    status: DataStatus,
    version: u64,
    filter: CategoryFilter,
    periods: PeriodRangeSelector,
    selection: SelectionCoordinator,
    ramp: ColorRamp,
    key: Option<AggregateKey>,
    aggregates: AggregateMap,
    scale: ColorScale,
}

impl CrimeExplorer {
    /// Creates an explorer over `store` with the full period range and no
    /// category filter.
    #[must_use]
    pub fn new(store: RecordStore) -> Self {
        Self::with_ramp(store, ColorRamp::default())
    }

    /// Like [`Self::new`] with custom colors.
    #[must_use]
    pub fn with_ramp(store: RecordStore, ramp: ColorRamp) -> Self {
        let periods = PeriodRangeSelector::new(store.periods().to_vec());
        log::info!(
            "Loaded {} records: {} regions, {} categories, {} periods",
            store.records().len(),
            store.regions().len(),
            store.categories().len(),
            store.periods().len()
        );

        let mut explorer = Self {
            store,
            status: DataStatus::Ready,
            version: 0,
            filter: CategoryFilter::All,
            periods,
            selection: SelectionCoordinator::new(),
            ramp,
            key: None,
            aggregates: AggregateMap::new(),
            scale: ColorScale::from_aggregates(&AggregateMap::new()),
        };
        explorer.recompute();
        explorer
    }

    /// Creates an explorer in the terminal "no data" state after an
    /// ingestion failure.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        log::warn!("Crime data unavailable: {reason}");
        let mut explorer = Self::new(RecordStore::default());
        explorer.status = DataStatus::Unavailable { reason };
        explorer
    }

    /// Replaces the record set. The range resets to the full span, the
    /// category filter is kept, and selection is cleared.
    pub fn load(&mut self, store: RecordStore) {
        log::info!(
            "Reloading {} records ({} periods)",
            store.records().len(),
            store.periods().len()
        );
        self.version += 1;
        self.periods = PeriodRangeSelector::new(store.periods().to_vec());
        self.store = store;
        self.status = DataStatus::Ready;
        self.selection = SelectionCoordinator::new();
        self.recompute();
    }

    /// Current data status.
    #[must_use]
    pub const fn status(&self) -> &DataStatus {
        &self.status
    }

    /// The colors in use.
    #[must_use]
    pub const fn ramp(&self) -> &ColorRamp {
        &self.ramp
    }

    // ── Dataset indices ────────────────────────────────────────────────

    /// Every period in the dataset, chronologically.
    #[must_use]
    pub fn available_periods(&self) -> &[Period] {
        self.periods.available()
    }

    /// Every category in the dataset, sorted.
    #[must_use]
    pub fn available_categories(&self) -> &[String] {
        self.store.categories()
    }

    /// Every region in the dataset, sorted.
    #[must_use]
    pub fn available_regions(&self) -> &[String] {
        self.store.regions()
    }

    /// Filter choices for the sidebar: "all" then each category.
    #[must_use]
    pub fn category_options(&self) -> Vec<CategoryFilter> {
        self.store.category_options()
    }

    // ── Filter and range ───────────────────────────────────────────────

    /// The active category filter.
    #[must_use]
    pub const fn category_filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Sets the category filter. A category absent from the dataset is
    /// accepted and simply matches nothing.
    pub fn set_category_filter(&mut self, filter: impl Into<CategoryFilter>) {
        let filter = filter.into();
        if let CategoryFilter::Only(category) = &filter
            && !self.store.categories().iter().any(|c| c == category)
        {
            log::warn!("Category '{category}' does not occur in the dataset");
        }
        self.filter = filter;
        self.recompute();
    }

    /// The selected periods, in order.
    #[must_use]
    pub fn selected_periods(&self) -> &[Period] {
        self.periods.selected()
    }

    /// First and last selected period.
    #[must_use]
    pub fn period_bounds(&self) -> Option<(&Period, &Period)> {
        self.periods.bounds()
    }

    /// Human-readable label for the selected range, e.g.
    /// `"Feb 2024 – Jan 2026"`.
    #[must_use]
    pub fn period_range_label(&self) -> Option<String> {
        self.period_bounds()
            .map(|(start, end)| format!("{} – {}", format_period(start), format_period(end)))
    }

    /// Replaces both range boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError`] for an unknown or inverted range; the
    /// previous range and aggregates are kept.
    pub fn set_period_range(&mut self, start: &Period, end: &Period) -> Result<(), RangeError> {
        let result = self.periods.set_range(start, end);
        self.after_range_change(result)
    }

    /// Moves the range start.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError`] if `period` is unknown or after the
    /// current end; nothing changes.
    pub fn set_period_start(&mut self, period: &Period) -> Result<(), RangeError> {
        let result = self.periods.set_start(period);
        self.after_range_change(result)
    }

    /// Moves the range end.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError`] if `period` is unknown or before the
    /// current start; nothing changes.
    pub fn set_period_end(&mut self, period: &Period) -> Result<(), RangeError> {
        let result = self.periods.set_end(period);
        self.after_range_change(result)
    }

    fn after_range_change(
        &mut self,
        result: Result<PeriodRange, RangeError>,
    ) -> Result<(), RangeError> {
        match result {
            Ok(_) => {
                self.recompute();
                Ok(())
            }
            Err(e) => {
                log::warn!("Rejected period range change: {e}");
                Err(e)
            }
        }
    }

    // ── Aggregates and colors ──────────────────────────────────────────

    /// Per-region aggregates for the active filter and range.
    #[must_use]
    pub const fn aggregates(&self) -> &AggregateMap {
        &self.aggregates
    }

    /// Aggregate for one region.
    #[must_use]
    pub fn aggregate(&self, region: &str) -> Option<&RegionAggregate> {
        self.aggregates.get(region)
    }

    /// Sum of all region totals.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        total_count(&self.aggregates)
    }

    /// Min/max of the current totals.
    #[must_use]
    pub const fn color_scale(&self) -> ColorScale {
        self.scale
    }

    /// Map fill for `region`.
    #[must_use]
    pub fn color_for(&self, region: &str) -> RegionFill {
        self.scale.fill_for(&self.aggregates, region, &self.ramp)
    }

    /// Pinned-panel statistics for `region`, if it has data.
    #[must_use]
    pub fn series_summary(&self, region: &str) -> Option<SeriesSummary> {
        self.aggregate(region).map(|a| summarize_series(&a.by_period))
    }

    fn recompute(&mut self) {
        let key = AggregateKey {
            version: self.version,
            filter: self.filter.clone(),
            range: self.periods.range(),
        };
        if self.key.as_ref() == Some(&key) {
            log::trace!("Aggregates up to date for {key:?}");
            return;
        }

        self.aggregates =
            compute_aggregates(self.store.records(), &self.filter, self.periods.selected());
        self.scale = ColorScale::from_aggregates(&self.aggregates);
        log::debug!(
            "Recomputed {} regions for filter={} over {} periods (min={}, max={})",
            self.aggregates.len(),
            self.filter,
            self.periods.selected().len(),
            self.scale.min,
            self.scale.max
        );
        self.key = Some(key);
    }

    // ── Pointer events ─────────────────────────────────────────────────

    /// The pointer entered `region`.
    pub fn on_pointer_enter_region(&mut self, region: &str) {
        self.selection.on_pointer_enter_region(region);
    }

    /// The pointer left every region.
    pub fn on_pointer_leave_all_regions(&mut self) {
        self.selection.on_pointer_leave_all_regions();
    }

    /// `region` was clicked.
    pub fn on_click_region(&mut self, region: &str) {
        self.selection.on_click_region(region);
        log::debug!("Pinned region is now {:?}", self.selection.pinned());
    }

    /// The pinned panel was closed.
    pub fn on_close_detail_panel(&mut self) {
        self.selection.on_close_detail_panel();
    }

    /// Hovered and pinned regions.
    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    /// Current selection phase.
    #[must_use]
    pub fn selection_phase(&self) -> SelectionPhase<'_> {
        self.selection.phase()
    }

    /// Regions to draw with the highlight outline.
    #[must_use]
    pub fn highlight_set(&self) -> Vec<&str> {
        self.selection.highlight_set().into_iter().collect()
    }

    /// The authoritative detail view for the current selection and range.
    #[must_use]
    pub fn detail_view_target(&self) -> DetailTarget {
        self.selection.detail_view(self.periods.selected().len())
    }

    /// Content of the pointer-following card, if one is shown.
    ///
    /// Regions without data get a notice whatever the range length; regions
    /// with data get their series only when the hover card is shown.
    #[must_use]
    pub fn hover_card(&self) -> Option<HoverCard<'_>> {
        let SelectionPhase::Hovering(region) = self.selection.phase() else {
            return None;
        };
        match self.aggregates.get(region) {
            None => Some(HoverCard::NoData(region)),
            Some(aggregate) => (self.detail_view_target().kind == DetailKind::Hover)
                .then_some(HoverCard::Series(aggregate)),
        }
    }
}
