use super::grid::{DayCell, WEEKS_IN_GRID};
use super::pager::MonthPager;
use super::util::{WeekdayExt, DAYS_IN_WEEK};
use crate::theme::{
    platform_style, status_style, BASE_STYLE, FILTER_STYLE, MONTH_STYLE, MORE_STYLE,
    OTHER_MONTH_STYLE, RULE_STYLE, TODAY_STYLE, WEEKDAY_STYLE,
};
use ratatui::{prelude::*, widgets::*};

static WEEKDAY_NAMES: [&str; DAYS_IN_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Number of lines above the first week: the title, the weekday names, and
/// a rule
const HEADER_LINES: u16 = 3;

/// Number of lines below the last week, used for the month summary
const FOOTER_LINES: u16 = 1;

const MIN_DAY_WIDTH: u16 = 5;

const MAX_DAY_WIDTH: u16 = 24;

/// Columns left blank at the right of each day so that neighboring days'
/// item titles don't run together
const DAY_GUTTER: u16 = 1;

/// Most items listed in a single day before the rest are collapsed into a
/// "+N more" line
pub(crate) const MAX_VISIBLE_ITEMS: usize = 3;

const ACS_HLINE: char = '─';

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct MonthView;

impl MonthView {
    fn day_width(area_width: u16) -> u16 {
        (area_width / 7).clamp(MIN_DAY_WIDTH, MAX_DAY_WIDTH)
    }

    fn week_lines(area_height: u16) -> u16 {
        (area_height.saturating_sub(HEADER_LINES + FOOTER_LINES) / 6).max(1)
    }
}

impl StatefulWidget for MonthView {
    type State = MonthPager;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let day_width = Self::day_width(area.width);
        let main_width = day_width * 7;
        let left = area.width.saturating_sub(main_width) / 2;
        let area = Rect {
            x: area.x + left,
            width: area.width - left,
            ..area
        };
        let week_lines = Self::week_lines(area.height);
        let mut canvas = BufferCanvas::new(area, buf, day_width, week_lines);

        canvas.draw_title(&state.month().to_string());
        canvas.draw_filter(&format!("Platform: {}", state.filter()), main_width);
        canvas.draw_header(main_width);
        for (week_no, week) in std::iter::zip(0u16.., state.grid().weeks()) {
            for cell in week {
                canvas.draw_cell(week_no, cell, cell.date == state.today);
            }
        }
        canvas.draw_summary(&state.summary().to_string());
    }
}

/// Split `item_qty` items between the `slots` lines available below a day's
/// number, returning how many items to list and how many to fold into a
/// "+N more" line
pub(crate) fn split_overflow(item_qty: usize, slots: usize) -> (usize, usize) {
    if item_qty <= slots.min(MAX_VISIBLE_ITEMS) {
        (item_qty, 0)
    } else {
        let shown = slots.saturating_sub(1).min(MAX_VISIBLE_ITEMS);
        (shown, item_qty - shown)
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
    day_width: u16,
    week_lines: u16,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer, day_width: u16, week_lines: u16) -> Self {
        Self {
            area,
            buf,
            day_width,
            week_lines,
        }
    }

    fn draw_title(&mut self, title: &str) {
        self.mvprint(0, 0, Line::styled(title.to_owned(), MONTH_STYLE), None);
    }

    // Right-aligned with the grid; left out entirely if it doesn't fit
    fn draw_filter(&mut self, label: &str, main_width: u16) {
        let line = Line::styled(label.to_owned(), FILTER_STYLE);
        let width = u16::try_from(line.width()).unwrap_or(u16::MAX);
        if let Some(x) = main_width.checked_sub(width.saturating_add(DAY_GUTTER)) {
            self.mvprint(0, x, line, None);
        }
    }

    fn draw_header(&mut self, main_width: u16) {
        for (name, col) in std::iter::zip(WEEKDAY_NAMES, 0u16..) {
            self.mvprint(
                1,
                col * self.day_width,
                Line::styled(name, WEEKDAY_STYLE),
                Some(self.day_width),
            );
        }
        self.hline(2, 0, ACS_HLINE, main_width);
    }

    fn draw_cell(&mut self, week_no: u16, cell: &DayCell, is_today: bool) {
        let y = HEADER_LINES + week_no * self.week_lines;
        let x = cell.date.weekday().index0() * self.day_width;
        let text_width = self.day_width.saturating_sub(DAY_GUTTER);
        let label = if is_today {
            format!("[{:2}]", cell.date.day())
        } else {
            format!(" {:2} ", cell.date.day())
        };
        let style = if is_today {
            TODAY_STYLE
        } else if cell.is_current_month {
            BASE_STYLE
        } else {
            OTHER_MONTH_STYLE
        };
        self.mvprint(y, x, Line::styled(label, style), Some(text_width));

        let slots = usize::from(self.week_lines - 1);
        let (shown, hidden) = split_overflow(cell.items.len(), slots);
        let mut line_y = y + 1;
        for item in cell.items.iter().take(shown) {
            let line = Line::from(vec![
                Span::styled(item.platform.abbrev(), platform_style(&item.platform)),
                Span::raw(" "),
                Span::styled(item.title.clone(), status_style(item.status.as_ref())),
            ]);
            self.mvprint(line_y, x, line, Some(text_width));
            line_y += 1;
        }
        if hidden > 0 && shown < slots {
            self.mvprint(
                line_y,
                x,
                Line::styled(format!("+{hidden} more"), MORE_STYLE),
                Some(text_width),
            );
        }
    }

    fn draw_summary(&mut self, summary: &str) {
        let y = HEADER_LINES + self.week_lines * u16::try_from(WEEKS_IN_GRID).unwrap_or(6);
        self.mvprint(y, 0, Line::raw(summary.to_owned()), None);
    }

    // Prints `line` at the given coordinates, cut off at `max_width` columns
    // or at the edge of the canvas, whichever comes first
    fn mvprint(&mut self, y: u16, x: u16, line: Line<'_>, max_width: Option<u16>) {
        if y < self.area.height && x < self.area.width {
            let width = u16::try_from(line.width())
                .unwrap_or(u16::MAX)
                .min(max_width.unwrap_or(u16::MAX));
            // Using a Paragraph lets us truncate text that extends beyond the
            // given width, though we need to be sure that the Rect passed to
            // the Paragraph is entirely within the frame lest a panic result.
            Paragraph::new(line).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(
            y,
            x,
            Line::styled(String::from(ch).repeat(length.into()), RULE_STYLE),
            None,
        );
    }
}
