use super::util::{iter_days_after, iter_days_before, iter_days_from, WeekdayExt, DAYS_IN_WEEK};
use crate::content::{ContentItem, PlatformFilter};
use std::fmt;
use std::slice::Chunks;
use thiserror::Error;
use time::{Date, Month};

/// Number of week rows in every grid, regardless of how many weeks the month
/// actually spans
pub(crate) const WEEKS_IN_GRID: usize = 6;

pub(crate) const GRID_CELLS: usize = WEEKS_IN_GRID * DAYS_IN_WEEK;

/// Range of years that can be shown.  The time crate's `large-dates` range
/// extends well beyond this, so the padding days of every allowed month
/// exist.
const MIN_YEAR: i32 = -9999;
const MAX_YEAR: i32 = 9999;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    pub(crate) fn new(year: i32, month: Month) -> Result<YearMonth, GridError> {
        if (MIN_YEAR..=MAX_YEAR).contains(&year) {
            Ok(YearMonth { year, month })
        } else {
            Err(GridError::YearOutOfRange(i64::from(year)))
        }
    }

    /// Construct from a zero-based month index (0 = January).  Indices
    /// outside 0–11 roll over into neighboring years, so `(2024, 12)` is
    /// January 2025 and `(2024, -1)` is December 2023.
    pub(crate) fn from_index0(year: i32, month0: i32) -> Result<YearMonth, GridError> {
        let total = i64::from(year) * 12 + i64::from(month0);
        let y = total.div_euclid(12);
        let offset = u8::try_from(total.rem_euclid(12))
            .expect("remainder of division by 12 should fit in a u8");
        let year = i32::try_from(y).map_err(|_| GridError::YearOutOfRange(y))?;
        YearMonth::new(year, Month::January.nth_next(offset))
    }

    pub(crate) fn containing(date: Date) -> YearMonth {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub(crate) fn index0(&self) -> i32 {
        i32::from(u8::from(self.month)) - 1
    }

    pub(crate) fn first_day(&self) -> Date {
        Date::from_calendar_date(self.year, self.month, 1)
            .expect("first day of a month within the calendar range should exist")
    }

    pub(crate) fn last_day(&self) -> Date {
        let first = self.first_day();
        iter_days_from(first)
            .take_while(|d| d.month() == self.month)
            .last()
            .unwrap_or(first)
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub(crate) fn succ(&self) -> Option<YearMonth> {
        YearMonth::from_index0(self.year, self.index0() + 1).ok()
    }

    pub(crate) fn pred(&self) -> Option<YearMonth> {
        YearMonth::from_index0(self.year, self.index0() - 1).ok()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DayCell {
    pub(crate) date: Date,
    pub(crate) is_current_month: bool,
    /// Content scheduled on this day, in input order.  Always empty for days
    /// outside the target month.
    pub(crate) items: Vec<ContentItem>,
}

impl DayCell {
    fn padding(date: Date) -> DayCell {
        DayCell {
            date,
            is_current_month: false,
            items: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CalendarGrid {
    month: YearMonth,
    // Invariant: exactly GRID_CELLS consecutive days, Sunday first
    cells: Vec<DayCell>,
}

impl CalendarGrid {
    pub(crate) fn month(&self) -> YearMonth {
        self.month
    }

    pub(crate) fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    pub(crate) fn weeks(&self) -> Chunks<'_, DayCell> {
        self.cells.chunks(DAYS_IN_WEEK)
    }

    #[cfg(test)]
    pub(crate) fn cell_for(&self, date: Date) -> Option<&DayCell> {
        self.cells.iter().find(|c| c.date == date)
    }

    pub(crate) fn current_month_cells(&self) -> impl Iterator<Item = &DayCell> + '_ {
        self.cells().iter().filter(|c| c.is_current_month)
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum GridError {
    #[error("year {0} is outside the supported calendar range")]
    YearOutOfRange(i64),
    #[error("calendar for {0} extends past the end of time")]
    OutOfTime(YearMonth),
}

/// Lay out `month` as six Sunday-first weeks and place each item on the day
/// it is scheduled for.
///
/// Items that are unscheduled, have an unparsable date, fall outside
/// `month`, or don't match `filter` are left out.  Only days of `month`
/// itself ever carry items; the leading and trailing days borrowed from the
/// neighboring months are always empty.
pub(crate) fn build_grid(
    month: YearMonth,
    items: &[ContentItem],
    filter: &PlatformFilter,
) -> Result<CalendarGrid, GridError> {
    let first = month.first_day();
    let last = month.last_day();
    let days_in_month = usize::from(last.day());

    let leading_qty = usize::from(first.weekday().index0());
    let mut leading = iter_days_before(first)
        .take(leading_qty)
        .collect::<Vec<_>>();
    if leading.len() < leading_qty {
        return Err(GridError::OutOfTime(month));
    }
    leading.reverse();

    let trailing_qty = GRID_CELLS.saturating_sub(leading_qty + days_in_month);
    let trailing = iter_days_after(last)
        .take(trailing_qty)
        .collect::<Vec<_>>();
    if trailing.len() < trailing_qty {
        return Err(GridError::OutOfTime(month));
    }

    let mut buckets = vec![Vec::new(); days_in_month];
    let mut unscheduled = 0usize;
    let mut placed = 0usize;
    for item in items {
        let Some(day) = item.scheduled_day() else {
            unscheduled += 1;
            continue;
        };
        if !month.contains(day) || !filter.matches(&item.platform) {
            continue;
        }
        if let Some(bucket) = buckets.get_mut(usize::from(day.day()) - 1) {
            bucket.push(item.clone());
            placed += 1;
        }
    }

    let mut cells = Vec::with_capacity(GRID_CELLS);
    cells.extend(leading.into_iter().map(DayCell::padding));
    cells.extend(
        std::iter::zip(iter_days_from(first), buckets).map(|(date, items)| DayCell {
            date,
            is_current_month: true,
            items,
        }),
    );
    cells.extend(trailing.into_iter().map(DayCell::padding));
    debug_assert_eq!(
        cells.len(),
        GRID_CELLS,
        "calendar grid should always have {GRID_CELLS} cells"
    );
    tracing::debug!(%month, %filter, placed, unscheduled, "built calendar grid");
    Ok(CalendarGrid { month, cells })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{test_item, Platform};
    use std::collections::HashSet;
    use time::macros::date;

    fn ym(year: i32, month: Month) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn ids(cell: &DayCell) -> Vec<&str> {
        cell.items.iter().map(|i| i.id.as_str()).collect()
    }

    fn check_invariants(grid: &CalendarGrid) {
        let month = grid.month();
        let cells = grid.cells();
        assert_eq!(cells.len(), GRID_CELLS, "{month}: wrong cell count");
        for pair in cells.windows(2) {
            assert_eq!(
                pair[0].date.next_day(),
                Some(pair[1].date),
                "{month}: days not contiguous"
            );
        }
        let dates = cells.iter().map(|c| c.date).collect::<HashSet<_>>();
        assert_eq!(dates.len(), GRID_CELLS, "{month}: duplicate dates");
        let first = month.first_day();
        let offset = usize::from(first.weekday().index0());
        assert_eq!(cells[offset].date, first, "{month}: first day misplaced");
        for cell in cells {
            assert_eq!(
                cell.is_current_month,
                month.contains(cell.date),
                "{month}: wrong current-month flag on {}",
                cell.date
            );
            if !cell.is_current_month {
                assert!(cell.items.is_empty(), "{month}: padding cell has items");
            }
        }
        assert_eq!(
            grid.current_month_cells().count(),
            usize::from(month.last_day().day()),
            "{month}: month not fully covered"
        );
        assert_eq!(cells[0].date.weekday(), time::Weekday::Sunday);
    }

    #[test]
    fn test_february_2024() {
        let grid = build_grid(ym(2024, Month::February), &[], &PlatformFilter::All).unwrap();
        let cells = grid.cells();
        assert_eq!(cells[0].date, date!(2024 - 01 - 28));
        assert_eq!(cells[3].date, date!(2024 - 01 - 31));
        assert!(!cells[3].is_current_month);
        assert_eq!(cells[4].date, date!(2024 - 02 - 01));
        assert!(cells[4].is_current_month);
        assert_eq!(cells[32].date, date!(2024 - 02 - 29));
        assert_eq!(cells[33].date, date!(2024 - 03 - 01));
        assert!(!cells[33].is_current_month);
        assert_eq!(cells[41].date, date!(2024 - 03 - 09));
        assert_eq!(cells.iter().filter(|c| !c.is_current_month).count(), 13);
        check_invariants(&grid);
    }

    #[test]
    fn test_month_starting_on_sunday() {
        // February 2015 fits in exactly four weeks
        let grid = build_grid(ym(2015, Month::February), &[], &PlatformFilter::All).unwrap();
        let cells = grid.cells();
        assert_eq!(cells[0].date, date!(2015 - 02 - 01));
        assert_eq!(cells[27].date, date!(2015 - 02 - 28));
        assert_eq!(cells[41].date, date!(2015 - 03 - 14));
        check_invariants(&grid);
    }

    #[test]
    fn test_month_spanning_six_weeks() {
        let grid = build_grid(ym(2025, Month::August), &[], &PlatformFilter::All).unwrap();
        let cells = grid.cells();
        assert_eq!(cells[5].date, date!(2025 - 08 - 01));
        assert_eq!(cells[35].date, date!(2025 - 08 - 31));
        assert_eq!(cells[36].date, date!(2025 - 09 - 01));
        check_invariants(&grid);
    }

    #[test]
    fn test_across_year() {
        let grid = build_grid(ym(2023, Month::December), &[], &PlatformFilter::All).unwrap();
        assert_eq!(grid.cells()[41].date, date!(2024 - 01 - 06));
        let grid = build_grid(ym(2025, Month::January), &[], &PlatformFilter::All).unwrap();
        assert_eq!(grid.cells()[0].date, date!(2024 - 12 - 29));
    }

    #[test]
    fn test_invariants_over_many_months() {
        for year in [1900, 1999, 2000, 2023, 2024, 2100] {
            for month0 in 0..12 {
                let month = YearMonth::from_index0(year, month0).unwrap();
                let grid = build_grid(month, &[], &PlatformFilter::All).unwrap();
                check_invariants(&grid);
            }
        }
    }

    #[test]
    fn test_weeks() {
        let grid = build_grid(ym(2024, Month::February), &[], &PlatformFilter::All).unwrap();
        let weeks = grid.weeks().collect::<Vec<_>>();
        assert_eq!(weeks.len(), WEEKS_IN_GRID);
        assert!(weeks.iter().all(|w| w.len() == DAYS_IN_WEEK));
        assert_eq!(weeks[1][0].date, date!(2024 - 02 - 04));
    }

    #[test]
    fn test_item_placement_and_filter() {
        let items = [test_item("a", "instagram", Some("2024-02-15T10:00:00Z"))];
        let month = ym(2024, Month::February);
        for filter in [
            PlatformFilter::All,
            PlatformFilter::Only(Platform::Instagram),
        ] {
            let grid = build_grid(month, &items, &filter).unwrap();
            let cell = grid.cell_for(date!(2024 - 02 - 15)).unwrap();
            assert_eq!(ids(cell), ["a"]);
            check_invariants(&grid);
        }
        let grid = build_grid(month, &items, &PlatformFilter::Only(Platform::Facebook)).unwrap();
        assert!(grid.cells().iter().all(|c| c.items.is_empty()));
    }

    #[test]
    fn test_unscheduled_and_malformed_excluded() {
        let items = [
            test_item("a", "instagram", None),
            test_item("b", "instagram", Some("not a date")),
            test_item("c", "instagram", Some("2024-02-30")),
            test_item("d", "instagram", Some("2024-02-10")),
        ];
        let grid = build_grid(ym(2024, Month::February), &items, &PlatformFilter::All).unwrap();
        let placed = grid
            .cells()
            .iter()
            .flat_map(|c| c.items.iter().map(|i| i.id.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(placed, ["d"]);
    }

    #[test]
    fn test_same_day_keeps_input_order() {
        let items = [
            test_item("z", "twitter", Some("2024-02-15T18:00:00Z")),
            test_item("x", "facebook", Some("2024-02-16T09:00:00Z")),
            test_item("y", "linkedin", Some("2024-02-15T08:00:00Z")),
        ];
        let grid = build_grid(ym(2024, Month::February), &items, &PlatformFilter::All).unwrap();
        assert_eq!(ids(grid.cell_for(date!(2024 - 02 - 15)).unwrap()), ["z", "y"]);
        assert_eq!(ids(grid.cell_for(date!(2024 - 02 - 16)).unwrap()), ["x"]);
    }

    #[test]
    fn test_time_of_day_ignored() {
        let items = [
            test_item("early", "tiktok", Some("2024-02-15T00:00:00Z")),
            test_item("late", "tiktok", Some("2024-02-15T23:59:59Z")),
            test_item("bare", "tiktok", Some("2024-02-15")),
        ];
        let grid = build_grid(ym(2024, Month::February), &items, &PlatformFilter::All).unwrap();
        assert_eq!(
            ids(grid.cell_for(date!(2024 - 02 - 15)).unwrap()),
            ["early", "late", "bare"]
        );
    }

    #[test]
    fn test_padding_days_never_hold_items() {
        let items = [
            test_item("jan", "instagram", Some("2024-01-31T12:00:00Z")),
            test_item("mar", "instagram", Some("2024-03-01T12:00:00Z")),
        ];
        let grid = build_grid(ym(2024, Month::February), &items, &PlatformFilter::All).unwrap();
        assert!(grid.cells().iter().all(|c| c.items.is_empty()));
        check_invariants(&grid);
    }

    #[test]
    fn test_all_filter_matches_no_filter() {
        let items = [
            test_item("a", "instagram", Some("2024-02-15T10:00:00Z")),
            test_item("b", "mastodon", Some("2024-02-15T11:00:00Z")),
        ];
        let month = ym(2024, Month::February);
        let unfiltered = build_grid(month, &items, &PlatformFilter::from(None)).unwrap();
        let all = build_grid(month, &items, &PlatformFilter::from(Some("all"))).unwrap();
        assert_eq!(unfiltered, all);
        assert_eq!(ids(all.cell_for(date!(2024 - 02 - 15)).unwrap()), ["a", "b"]);
    }

    #[test]
    fn test_other_platform_filter() {
        let items = [
            test_item("a", "instagram", Some("2024-02-15T10:00:00Z")),
            test_item("b", "mastodon", Some("2024-02-15T11:00:00Z")),
        ];
        let filter = PlatformFilter::from(Some("mastodon"));
        let grid = build_grid(ym(2024, Month::February), &items, &filter).unwrap();
        assert_eq!(ids(grid.cell_for(date!(2024 - 02 - 15)).unwrap()), ["b"]);
    }

    #[test]
    fn test_deterministic() {
        let items = [
            test_item("a", "instagram", Some("2024-02-15T10:00:00Z")),
            test_item("b", "facebook", Some("2024-02-01")),
            test_item("c", "twitter", None),
        ];
        let month = ym(2024, Month::February);
        assert_eq!(
            build_grid(month, &items, &PlatformFilter::All).unwrap(),
            build_grid(month, &items, &PlatformFilter::All).unwrap()
        );
    }

    #[test]
    fn test_from_index0_rollover() {
        assert_eq!(
            YearMonth::from_index0(2024, 1).unwrap(),
            ym(2024, Month::February)
        );
        assert_eq!(
            YearMonth::from_index0(2024, 12).unwrap(),
            ym(2025, Month::January)
        );
        assert_eq!(
            YearMonth::from_index0(2024, -1).unwrap(),
            ym(2023, Month::December)
        );
        assert_eq!(
            YearMonth::from_index0(2024, 25).unwrap(),
            ym(2026, Month::February)
        );
        assert_eq!(
            YearMonth::from_index0(2024, -13).unwrap(),
            ym(2022, Month::December)
        );
    }

    #[test]
    fn test_year_out_of_range() {
        assert_eq!(
            YearMonth::from_index0(10000, 0),
            Err(GridError::YearOutOfRange(10000))
        );
        assert_eq!(
            YearMonth::from_index0(9999, 12),
            Err(GridError::YearOutOfRange(10000))
        );
        assert_eq!(
            YearMonth::from_index0(i32::MAX, 24),
            Err(GridError::YearOutOfRange(i64::from(i32::MAX) + 2))
        );
        assert!(YearMonth::new(-10000, Month::May).is_err());
    }

    #[test]
    fn test_succ_pred() {
        let dec = ym(2023, Month::December);
        assert_eq!(dec.succ(), Some(ym(2024, Month::January)));
        assert_eq!(ym(2024, Month::January).pred(), Some(dec));
        assert_eq!(ym(9999, Month::December).succ(), None);
    }

    #[test]
    fn test_last_day() {
        assert_eq!(ym(2024, Month::February).last_day(), date!(2024 - 02 - 29));
        assert_eq!(ym(2023, Month::February).last_day(), date!(2023 - 02 - 28));
        assert_eq!(ym(2024, Month::April).last_day(), date!(2024 - 04 - 30));
        assert_eq!(ym(9999, Month::December).last_day(), date!(9999 - 12 - 31));
    }

    #[test]
    fn test_last_supported_month() {
        // December 1, 9999 is a Wednesday; the grid runs into the year 10000
        let items = vec![test_item("a", "instagram", Some("9999-12-31T12:00:00Z"))];
        let grid = build_grid(ym(9999, Month::December), &items, &PlatformFilter::All).unwrap();
        check_invariants(&grid);
        assert_eq!(grid.cells()[0].date, date!(9999 - 11 - 28));
        assert_eq!(
            grid.cells()[GRID_CELLS - 1].date,
            Date::from_calendar_date(10000, Month::January, 8).unwrap()
        );
        assert_eq!(ids(grid.cell_for(date!(9999 - 12 - 31)).unwrap()), ["a"]);
    }

    #[test]
    fn test_first_supported_month() {
        let grid = build_grid(ym(-9999, Month::January), &[], &PlatformFilter::All).unwrap();
        check_invariants(&grid);
        assert_eq!(grid.current_month_cells().count(), 31);
        assert!(grid.cells()[0].date.year() <= -9999);
    }

    #[test]
    fn test_display() {
        assert_eq!(ym(2024, Month::February).to_string(), "February 2024");
    }
}
