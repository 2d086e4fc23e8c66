mod grid;
mod pager;
mod util;
mod widget;
pub(crate) use self::grid::{CalendarGrid, YearMonth};
pub(crate) use self::pager::MonthPager;
pub(crate) use self::widget::MonthView;
