//! Hover and click selection state machine.
//!
//! The coordinator owns a [`SelectionState`] and derives every visibility
//! decision from it. There are no separate "card visible" flags that could
//! drift out of sync with the hovered or pinned region.

use std::collections::BTreeSet;

use crime_explorer_models::{DetailKind, DetailTarget, SelectionState};

/// Minimum number of selected periods for the hover card's time series.
pub const MIN_HOVER_SERIES_PERIODS: usize = 2;

/// Observable phase of the selection state machine.
///
/// Hovering another region while one is pinned stays in [`Self::Pinned`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase<'a> {
    /// Nothing hovered or pinned.
    Idle,
    /// A region is hovered and nothing is pinned.
    Hovering(&'a str),
    /// A region is pinned; hover may still be tracked for the outline.
    Pinned(&'a str),
}

/// Tracks the hovered and pinned regions.
#[derive(Debug, Clone, Default)]
pub struct SelectionCoordinator {
    state: SelectionState,
}

impl SelectionCoordinator {
    /// Creates an idle coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw state.
    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Hovered region, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.state.hovered.as_deref()
    }

    /// Pinned region, if any.
    #[must_use]
    pub fn pinned(&self) -> Option<&str> {
        self.state.pinned.as_deref()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SelectionPhase<'_> {
        match (self.hovered(), self.pinned()) {
            (_, Some(pinned)) => SelectionPhase::Pinned(pinned),
            (Some(hovered), None) => SelectionPhase::Hovering(hovered),
            (None, None) => SelectionPhase::Idle,
        }
    }

    /// The pointer entered `region`. Pinning is unaffected.
    pub fn on_pointer_enter_region(&mut self, region: &str) {
        if self.hovered() != Some(region) {
            self.state.hovered = Some(region.to_string());
        }
    }

    /// The pointer left every region.
    pub fn on_pointer_leave_all_regions(&mut self) {
        self.state.hovered = None;
    }

    /// `region` was clicked: pins it, or unpins it if it is already pinned.
    pub fn on_click_region(&mut self, region: &str) {
        if self.pinned() == Some(region) {
            self.state.pinned = None;
        } else {
            self.state.pinned = Some(region.to_string());
        }
    }

    /// The pinned panel was dismissed. Clears hover too, so the card does
    /// not reopen under a stationary pointer.
    pub fn on_close_detail_panel(&mut self) {
        self.state = SelectionState::default();
    }

    /// Whether the hover card is shown for a range of `selected_periods`
    /// months.
    #[must_use]
    pub fn shows_hover_card(&self, selected_periods: usize) -> bool {
        self.hovered().is_some()
            && self.pinned().is_none()
            && selected_periods >= MIN_HOVER_SERIES_PERIODS
    }

    /// Whether the pinned panel is shown. Independent of range length.
    #[must_use]
    pub fn shows_pinned_panel(&self) -> bool {
        self.pinned().is_some()
    }

    /// The single authoritative detail view.
    #[must_use]
    pub fn detail_view(&self, selected_periods: usize) -> DetailTarget {
        if let Some(pinned) = self.pinned() {
            return DetailTarget {
                kind: DetailKind::Pinned,
                region: Some(pinned.to_string()),
            };
        }
        if self.shows_hover_card(selected_periods) {
            return DetailTarget {
                kind: DetailKind::Hover,
                region: self.state.hovered.clone(),
            };
        }
        DetailTarget::none()
    }

    /// Regions to outline: the hovered and pinned ones, deduplicated.
    #[must_use]
    pub fn highlight_set(&self) -> BTreeSet<&str> {
        self.hovered().into_iter().chain(self.pinned()).collect()
    }
}
