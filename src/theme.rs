use crate::content::{Platform, Status};
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const MONTH_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const FILTER_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const RULE_STYLE: Style = BASE_STYLE;

pub(crate) const TODAY_STYLE: Style = Style::new()
    .fg(Color::LightYellow)
    .bg(Color::Black)
    .add_modifier(Modifier::BOLD);

pub(crate) const OTHER_MONTH_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const MORE_STYLE: Style = BASE_STYLE
    .fg(Color::DarkGray)
    .add_modifier(Modifier::ITALIC);

pub(crate) fn platform_style(platform: &Platform) -> Style {
    let color = match platform {
        Platform::Instagram => Color::LightMagenta,
        Platform::Facebook => Color::Blue,
        Platform::LinkedIn => Color::Cyan,
        Platform::Twitter => Color::LightCyan,
        Platform::TikTok | Platform::Other(_) => Color::Gray,
    };
    BASE_STYLE.fg(color).add_modifier(Modifier::BOLD)
}

pub(crate) fn status_style(status: Option<&Status>) -> Style {
    match status {
        None | Some(Status::Draft | Status::Other(_)) => BASE_STYLE.fg(Color::Gray),
        Some(Status::Scheduled) => BASE_STYLE.fg(Color::LightBlue),
        Some(Status::Published) => BASE_STYLE.fg(Color::LightGreen),
        Some(Status::Failed) => BASE_STYLE.fg(Color::LightRed),
    }
}

pub(crate) mod jumpto {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
