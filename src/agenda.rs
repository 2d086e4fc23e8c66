use crate::calendar::CalendarGrid;
use crate::content::{ContentItem, PlatformFilter};
use crate::summary::ContentSummary;
use std::io::{self, Write};

/// Write a plain-text listing of the month's scheduled content grouped by
/// day.  Each item gets one line, followed by the first line of its body if
/// it has one.
pub(crate) fn write_agenda<W: Write>(
    out: &mut W,
    grid: &CalendarGrid,
    summary: &ContentSummary,
    filter: &PlatformFilter,
) -> io::Result<()> {
    writeln!(out, "{} (platform: {filter})", grid.month())?;
    let mut any = false;
    for cell in grid.current_month_cells().filter(|c| !c.items.is_empty()) {
        any = true;
        writeln!(out)?;
        writeln!(out, "{} ({})", cell.date, cell.date.weekday())?;
        for item in &cell.items {
            writeln!(out, "  {}", item_line(item))?;
            if let Some(body) = item.content.lines().map(str::trim).find(|l| !l.is_empty()) {
                writeln!(out, "      {body}")?;
            }
        }
    }
    if !any {
        writeln!(out)?;
        writeln!(out, "No content scheduled.")?;
    }
    writeln!(out)?;
    writeln!(out, "{summary}")?;
    Ok(())
}

fn item_line(item: &ContentItem) -> String {
    let mut s = format!(
        "{:<10} {:<10} {}",
        item.platform,
        item.status_str(),
        item.title
    );
    if let Some(kind) = item.content_type.as_deref().filter(|k| !k.is_empty()) {
        s.push_str(" (");
        s.push_str(kind);
        s.push(')');
    }
    if let Some(name) = item.campaign_label() {
        s.push_str(" [");
        s.push_str(name);
        s.push(']');
    }
    s
}
