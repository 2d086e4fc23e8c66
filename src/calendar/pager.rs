use super::grid::{build_grid, CalendarGrid, GridError, YearMonth};
use crate::content::{ContentItem, PlatformFilter};
use crate::summary::ContentSummary;
use thiserror::Error;
use time::Date;

/// The month currently on screen, together with everything needed to rebuild
/// its grid whenever the month or the platform filter changes
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthPager {
    pub(super) today: Date,
    items: Vec<ContentItem>,
    filter: PlatformFilter,
    grid: CalendarGrid,
}

impl MonthPager {
    pub(crate) fn new(
        today: Date,
        month: YearMonth,
        items: Vec<ContentItem>,
        filter: PlatformFilter,
    ) -> Result<Self, GridError> {
        let grid = build_grid(month, &items, &filter)?;
        Ok(MonthPager {
            today,
            items,
            filter,
            grid,
        })
    }

    pub(crate) fn grid(&self) -> &CalendarGrid {
        &self.grid
    }

    pub(crate) fn month(&self) -> YearMonth {
        self.grid.month()
    }

    pub(crate) fn filter(&self) -> &PlatformFilter {
        &self.filter
    }

    pub(crate) fn summary(&self) -> ContentSummary {
        ContentSummary::for_month(self.month(), &self.items)
    }

    pub(crate) fn next_month(&mut self) -> Result<(), OutOfTimeError> {
        let month = self.month().succ().ok_or(OutOfTimeError)?;
        self.show(month)
    }

    pub(crate) fn prev_month(&mut self) -> Result<(), OutOfTimeError> {
        let month = self.month().pred().ok_or(OutOfTimeError)?;
        self.show(month)
    }

    pub(crate) fn jump_to_today(&mut self) -> Result<(), OutOfTimeError> {
        self.show(YearMonth::containing(self.today))
    }

    pub(crate) fn jump_to(&mut self, month: YearMonth) -> Result<(), OutOfTimeError> {
        self.show(month)
    }

    pub(crate) fn cycle_filter(&mut self) {
        let filter = self.filter.cycle();
        self.set_filter(filter);
    }

    pub(crate) fn set_filter(&mut self, filter: PlatformFilter) {
        // The month has already been laid out once, so rebuilding it can only
        // change which items are placed.
        if let Ok(grid) = build_grid(self.month(), &self.items, &filter) {
            self.grid = grid;
            self.filter = filter;
        }
    }

    // Leaves the current month in place if the new month's grid would run off
    // the end of time
    fn show(&mut self, month: YearMonth) -> Result<(), OutOfTimeError> {
        let grid = build_grid(month, &self.items, &self.filter).map_err(|_| OutOfTimeError)?;
        tracing::debug!(%month, "showing month");
        self.grid = grid;
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;
