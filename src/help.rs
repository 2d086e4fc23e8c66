use crate::theme::BASE_STYLE;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Paragraph, Widget},
};

static KEYS: &[(&str, &str)] = &[
    ("h, LEFT", "Previous month"),
    ("l, RIGHT", "Next month"),
    ("0, HOME", "Jump to this month"),
    ("g", "Input month to jump to"),
    ("p", "Cycle platform filter"),
    ("?", "Show this help"),
    ("q, ESC", "Quit"),
];

const DISMISS: &str = "Press the Any Key to dismiss.";

/// Popup listing the key bindings, centered over the calendar
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Help;

impl Help {
    fn text() -> Text<'static> {
        let key_width = KEYS.iter().map(|(keys, _)| keys.len()).max().unwrap_or(0);
        let mut text = KEYS
            .iter()
            .map(|(keys, action)| Line::raw(format!("{keys:<key_width$}   {action}")))
            .collect::<Text<'static>>();
        text.push_line(Line::raw(""));
        text.push_line(Line::raw(DISMISS));
        text
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Self::text();
        // Two columns of border and two of padding; two rows of border
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .saturating_add(4);
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let [popup] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(popup);
        Clear.render(popup, buf);
        Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center)
                    .padding(Padding::horizontal(1)),
            )
            .style(BASE_STYLE)
            .render(popup, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(buf: &Buffer) -> Vec<String> {
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_render_centered() {
        let area = Rect::new(0, 0, 60, 20);
        let mut buffer = Buffer::empty(area);
        Help.render(area, &mut buffer);
        let rows = rows(&buffer);
        let top = rows
            .iter()
            .position(|r| r.contains(" Commands "))
            .expect("popup title should be drawn");
        assert!(top > 0, "popup should be centered vertically");
        assert!(rows[top + 1].contains("│ h, LEFT    Previous month"));
        assert!(rows[top + 5].contains("p          Cycle platform filter"));
        assert!(rows[top + 9].contains("Press the Any Key to dismiss."));
        assert!(rows[top + 10].contains('└'));
    }

    #[test]
    fn test_render_tiny_area() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        Help.render(area, &mut buffer);
    }
}
