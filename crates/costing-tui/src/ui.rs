//! UI rendering

use costing_core::report::{self, format_money, format_percent, Metric, Trend};
use costing_core::{ChartData, Presence, Resolution, FIELDS};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, Wrap},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::app::App;
use crate::popups;

/// Color palette - minimal and elegant (TTY 16-color compatible)
pub mod palette {
    use ratatui::style::Color;

    pub const DIM: Color = Color::DarkGray;
    pub const ACCENT: Color = Color::Cyan;
    pub const NUMBER: Color = Color::Yellow;
    pub const GAIN: Color = Color::LightGreen;
    pub const LOSS: Color = Color::Red;
    pub const ERROR: Color = Color::Red;
    pub const TEXT: Color = Color::Gray;
}

const NO_CHART: &str = "No chart: needs a positive cost and discounted price within range.";

/// Fields 0..4 are prices and discount, the rest are profit/loss metrics
const INPUT_GROUP: usize = 4;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: Header | Form/Results | Footer
    let [header_area, main_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    draw_header(frame, header_area, app);

    let [form_area, result_area] =
        Layout::horizontal([Constraint::Length(40), Constraint::Fill(1)]).areas(main_area);

    draw_form(frame, form_area, app);

    match (&app.error, app.resolution()) {
        (Some(error), _) => draw_error_panel(frame, result_area, error),
        (None, Some(resolution)) => draw_results(frame, result_area, resolution),
        (None, None) => draw_usage(frame, result_area),
    }

    draw_footer(frame, footer_area, app);

    if app.show_help {
        popups::draw_help_popup(frame, area);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let mode = match app.session.presence() {
        Presence::ZeroIsAbsent => "",
        Presence::Explicit => " [explicit zero]",
    };
    let title = format!(" costing - Costing Calculator{mode} ");

    let block = Block::default().style(Style::new().bg(palette::DIM).fg(Color::White));
    let paragraph = Paragraph::new(title).block(block);
    frame.render_widget(paragraph, area);
}

fn draw_form(frame: &mut Frame, area: Rect, app: &App) {
    let [inputs_area, metrics_area] = Layout::vertical([
        Constraint::Length(INPUT_GROUP as u16 * 2 + 2),
        Constraint::Fill(1),
    ])
    .areas(area);

    draw_field_group(frame, inputs_area, app, " Inputs ", 0..INPUT_GROUP);
    draw_field_group(frame, metrics_area, app, " Profit / Loss ", INPUT_GROUP..FIELDS.len());
}

fn draw_field_group(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    title: &str,
    range: std::ops::Range<usize>,
) {
    let mut lines = Vec::new();
    for idx in range {
        let def = &FIELDS[idx];
        let focused = idx == app.focus;
        let label_style = if focused {
            Style::new().fg(palette::ACCENT).bold()
        } else {
            Style::new().fg(palette::TEXT)
        };
        lines.push(Line::styled(def.label, label_style));
        lines.push(field_line(&app.buffers[idx], focused));
    }

    let block = Block::bordered()
        .title(title)
        .title_style(Style::new().fg(palette::ACCENT))
        .border_style(Style::new().fg(palette::DIM));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Field value with a block cursor when focused
fn field_line(text: &str, focused: bool) -> Line<'static> {
    let marker = if focused { "> " } else { "  " };
    let mut spans = vec![
        Span::styled(marker, Style::new().fg(palette::ACCENT)),
        Span::styled(text.to_string(), Style::new().fg(palette::NUMBER)),
    ];
    if focused {
        spans.push(Span::styled(
            " ",
            Style::new().bg(Color::White).fg(Color::Black),
        ));
    }
    Line::from(spans)
}

fn draw_usage(frame: &mut Frame, area: Rect) {
    let block = Block::bordered()
        .title(" How to use ")
        .title_style(Style::new().fg(palette::ACCENT))
        .border_style(Style::new().fg(palette::DIM));
    let paragraph = Paragraph::new(report::USAGE)
        .style(Style::new().fg(palette::TEXT))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn draw_error_panel(frame: &mut Frame, area: Rect, error: &str) {
    let [panel_area, _] =
        Layout::vertical([Constraint::Length(6), Constraint::Fill(1)]).areas(area);

    // Create a red bordered block
    let block = Block::bordered()
        .title(" error ")
        .title_style(Style::new().fg(palette::ERROR).bold())
        .border_style(Style::new().fg(palette::ERROR));

    let paragraph = Paragraph::new(error.to_string())
        .style(Style::new().fg(palette::ERROR))
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, panel_area);
}

fn draw_results(frame: &mut Frame, area: Rect, resolution: &Resolution) {
    let [scenario_area, metrics_area, body_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
    ])
    .areas(area);

    let scenario = Paragraph::new(resolution.scenario.to_string().fg(palette::ACCENT).bold());
    frame.render_widget(scenario, scenario_area);

    draw_metrics(frame, metrics_area, &report::summary(&resolution.record));

    let [table_area, chart_area] =
        Layout::horizontal([Constraint::Length(36), Constraint::Fill(1)]).areas(body_area);

    draw_breakdown(frame, table_area, resolution);

    match ChartData::from_record(&resolution.record) {
        Some(chart) => draw_chart(frame, chart_area, &chart),
        None => {
            let note = Paragraph::new(NO_CHART)
                .style(Style::new().fg(palette::DIM))
                .block(Block::bordered().border_style(Style::new().fg(palette::DIM)))
                .wrap(Wrap { trim: true });
            frame.render_widget(note, chart_area);
        }
    }
}

fn draw_metrics(frame: &mut Frame, area: Rect, metrics: &[Metric]) {
    let columns = Layout::horizontal(metrics.iter().map(|_| Constraint::Fill(1))).split(area);

    for (metric, column) in metrics.iter().zip(columns.iter()) {
        let mut lines = vec![Line::from(metric.value.clone().fg(palette::NUMBER).bold())];
        if let Some((delta, trend)) = &metric.delta {
            let (arrow, color) = match trend {
                Trend::Up => ("+", palette::GAIN),
                Trend::Down => ("", palette::LOSS),
            };
            lines.push(Line::from(format!("{arrow}{delta}").fg(color)));
        }

        let block = Block::bordered()
            .title(metric.label)
            .title_style(Style::new().fg(palette::TEXT))
            .border_style(Style::new().fg(palette::DIM));
        frame.render_widget(Paragraph::new(lines).block(block), *column);
    }
}

fn draw_breakdown(frame: &mut Frame, area: Rect, resolution: &Resolution) {
    let rows: Vec<Row> = report::breakdown(&resolution.record)
        .into_iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(row.metric),
                Cell::from(Line::from(row.value).alignment(Alignment::Right)),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Fill(1), Constraint::Length(14)])
        .block(
            Block::bordered()
                .title(" Detailed Breakdown ")
                .title_style(Style::new().fg(palette::ACCENT))
                .border_style(Style::new().fg(palette::DIM)),
        )
        .header(
            Row::new(vec!["Metric", "Value"])
                .style(Style::new().bold().fg(palette::ACCENT))
                .bottom_margin(1),
        )
        .column_spacing(1);

    frame.render_widget(table, area);
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Halfway between two ordered, non-negative bounds without summing them
fn midpoint(lo: Decimal, hi: Decimal) -> Decimal {
    lo + (hi - lo) / Decimal::TWO
}

/// Margin curve with the current record marked and a zero line
fn draw_chart(frame: &mut Frame, area: Rect, chart: &ChartData) {
    let [plot_area, caption_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(area);

    let curve: Vec<(f64, f64)> = chart
        .points
        .iter()
        .map(|p| (to_f64(p.cost), to_f64(p.margin_pct)))
        .collect();
    let current = [(to_f64(chart.current.cost), to_f64(chart.current.margin_pct))];

    let (x_min, x_max) = match (chart.points.first(), chart.points.last()) {
        (Some(first), Some(last)) => (first.cost, last.cost),
        _ => (chart.current.cost, chart.current.cost),
    };
    let zero = [(to_f64(x_min), 0.0), (to_f64(x_max), 0.0)];

    // Keep the zero line in view and leave some headroom around the curve
    let (lo, hi) = chart.margin_bounds();
    let (lo, hi) = (to_f64(lo).min(0.0), to_f64(hi).max(0.0));
    let pad = ((hi - lo) * 0.1).max(1.0);
    let (y_min, y_max) = (lo - pad, hi + pad);

    let datasets = vec![
        Dataset::default()
            .name("Margin")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::new().fg(palette::ACCENT))
            .data(&curve),
        Dataset::default()
            .name("Break-even")
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::new().fg(palette::DIM))
            .data(&zero),
        Dataset::default()
            .name("Current")
            .marker(Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::new().fg(palette::NUMBER))
            .data(&current),
    ];

    let x_mid = midpoint(x_min, x_max);
    let x_axis = Axis::default()
        .title("Cost")
        .style(Style::new().fg(palette::DIM))
        .bounds([to_f64(x_min), to_f64(x_max)])
        .labels(vec![
            format_money(Some(x_min)),
            format_money(Some(x_mid)),
            format_money(Some(x_max)),
        ]);

    let y_axis = Axis::default()
        .title("Margin %")
        .style(Style::new().fg(palette::DIM))
        .bounds([y_min, y_max])
        .labels(vec![
            format!("{y_min:.0}%"),
            format!("{:.0}%", (y_min + y_max) / 2.0),
            format!("{y_max:.0}%"),
        ]);

    let widget = Chart::new(datasets)
        .block(
            Block::bordered()
                .title(format!(" {} ", chart.title))
                .title_style(Style::new().fg(palette::ACCENT))
                .border_style(Style::new().fg(palette::DIM)),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);
    frame.render_widget(widget, plot_area);

    let caption_text = format!(
        "{} Current: {} at {}.",
        chart.caption,
        format_percent(Some(chart.current.margin_pct)),
        format_money(Some(chart.current.cost)),
    );
    let caption = Paragraph::new(caption_text)
        .style(Style::new().fg(palette::DIM))
        .wrap(Wrap { trim: true });
    frame.render_widget(caption, caption_area);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let mut hints = vec![
        " ".into(),
        "tab".fg(palette::ACCENT),
        " next ".dim(),
        "enter".fg(palette::ACCENT),
        " calculate ".dim(),
        "del".fg(palette::ACCENT),
        " clear field ".dim(),
        "^r".fg(palette::ACCENT),
        " reset ".dim(),
        "?".fg(palette::ACCENT),
        " help ".dim(),
        "esc".fg(palette::ACCENT),
        " quit ".dim(),
    ];

    if let Some(message) = &app.status_message {
        hints.push(format!(" {message}").fg(palette::GAIN));
    }

    let footer = Paragraph::new(Line::from(hints)).style(Style::new().bg(palette::DIM));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use costing_core::Field;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App) -> String {
        let backend = TestBackend::new(160, 48);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app_with(figures: &[(Field, &str)]) -> App {
        let mut app = App::default();
        for (field, text) in figures {
            app.buffers[field.index()] = text.to_string();
        }
        app
    }

    #[test]
    fn test_empty_form_shows_usage() {
        let screen = render(&App::default());
        assert!(screen.contains("Total Cost ($)"));
        assert!(screen.contains("Loss Percentage (%)"));
        assert!(screen.contains("How to use"));
    }

    #[test]
    fn test_results_render() {
        let mut app = app_with(&[(Field::Cost, "100"), (Field::DiscountedPrice, "150")]);
        app.calculate();
        let screen = render(&app);

        assert!(screen.contains("Scenario 2"));
        assert!(screen.contains("Detailed Breakdown"));
        assert!(screen.contains("$50.00"));
        assert!(screen.contains("Fixed Discounted Price: $150.00"));
    }

    #[test]
    fn test_error_panel_replaces_results() {
        let mut app = app_with(&[(Field::Cost, "100"), (Field::DiscountedPrice, "150")]);
        app.calculate();
        app.buffers[Field::DiscountedPrice.index()].clear();
        app.calculate();
        let screen = render(&app);

        assert!(screen.contains("error"));
        assert!(screen.contains("Please provide sufficient"));
        assert!(!screen.contains("Detailed Breakdown"));
    }

    #[test]
    fn test_partial_record_has_no_chart() {
        let mut app = app_with(&[(Field::SellingPrice, "100"), (Field::DiscountPct, "10")]);
        app.calculate();
        let screen = render(&app);

        assert!(screen.contains("Scenario 4"));
        assert!(screen.contains("N/A"));
        assert!(!screen.contains("Fixed Discounted Price"));
    }

    #[test]
    fn test_help_popup() {
        let mut app = App::default();
        app.toggle_help();
        let screen = render(&app);
        assert!(screen.contains("Toggle help"));
    }

    #[test]
    fn test_midpoint_near_decimal_max() {
        assert_eq!(midpoint(Decimal::from(50), Decimal::from(150)), Decimal::from(100));
        let mid = midpoint(Decimal::MAX - Decimal::TEN, Decimal::MAX);
        assert_eq!(mid, Decimal::MAX - Decimal::from(5));
    }

    #[test]
    fn test_field_line_cursor() {
        let line = field_line("12", true);
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "12");
        assert_eq!(field_line("12", false).spans.len(), 2);
    }
}
