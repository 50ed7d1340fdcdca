//! Popup dialogs

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, Clear, Padding, Row, Table},
    Frame,
};

use crate::ui::palette;

/// Draw the help popup
pub fn draw_help_popup(frame: &mut Frame, area: Rect) {
    let rows = vec![
        Row::new(vec!["Navigation", ""]).style(Style::new().bold().fg(palette::GAIN)),
        Row::new(vec!["Tab / Down", "Next field"]),
        Row::new(vec!["Shift+Tab / Up", "Previous field"]),
        Row::new(vec!["", ""]),
        Row::new(vec!["Editing", ""]).style(Style::new().bold().fg(palette::GAIN)),
        Row::new(vec!["0-9 / .", "Type a figure"]),
        Row::new(vec!["Backspace", "Delete char"]),
        Row::new(vec!["Delete", "Clear field"]),
        Row::new(vec!["Ctrl+r", "Reset all fields"]),
        Row::new(vec!["", ""]),
        Row::new(vec!["General", ""]).style(Style::new().bold().fg(palette::GAIN)),
        Row::new(vec!["Enter", "Calculate"]),
        Row::new(vec!["? / F1", "Toggle help"]),
        Row::new(vec!["Esc / Ctrl+c", "Quit / Close help"]),
    ];

    // Calculate dimensions: rows + header (2) + borders (2) + padding (2)
    let content_height = (rows.len() as u16 + 6).min(area.height.saturating_sub(4));
    let content_width = 50_u16.min(area.width.saturating_sub(4));

    let popup_area = centered_rect(area, content_width, content_height);

    frame.render_widget(Clear, popup_area);

    let table = Table::new(
        rows,
        [Constraint::Percentage(45), Constraint::Percentage(55)],
    )
    .block(
        Block::bordered()
            .title(" Help ")
            .title_style(Style::new().bold().fg(palette::ACCENT))
            .style(Style::new().bg(Color::Black))
            .padding(Padding::horizontal(1)),
    )
    .header(
        Row::new(vec!["Key", "Action"])
            .style(Style::new().bold().fg(palette::ACCENT).bg(Color::DarkGray))
            .bottom_margin(1),
    )
    .column_spacing(1);

    frame.render_widget(table, popup_area);
}

/// Center a rect with fixed width and height
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(area, 50, 20);
        assert_eq!(rect, Rect::new(25, 10, 50, 20));
    }
}
