// Result and status widgets
//
// The result area is read-only and only ever replaced by a successful
// predict request; validation errors go to the status line underneath,
// leaving the previous result visible.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::cli::PredictorApp;

/// Render the read-only prediction result area.
pub fn render_result(frame: &mut Frame, area: Rect, app: &PredictorApp) {
    let text = match app.result() {
        Some(result) => Line::from(Span::styled(
            result.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            "(no prediction yet)",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Prediction Result ")
                .style(Style::default().fg(Color::Gray)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

/// Render the status line: the current validation error, or key help.
pub fn render_status(frame: &mut Frame, area: Rect, app: &PredictorApp) {
    let line = match app.error() {
        Some(error) => Line::from(Span::styled(
            format!(" ✗ {error}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            " Tab/↓ next · Shift-Tab/↑ previous · Enter predict · Esc quit",
            Style::default().fg(Color::Cyan),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}
