// Form widget - renders the per-feature input fields
//
// One row per feature, label on the left, text field on the right. The
// focused row is highlighted. When the schema has more fields than the
// area has rows, a window around the focused field is shown.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::cli::PredictorApp;

/// Render the input form into `area`.
pub fn render_form(frame: &mut Frame, area: Rect, app: &PredictorApp) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Enter Feature Values ")
        .style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    let visible_rows = inner.height as usize;
    let first = app.form_scroll(visible_rows);
    let label_width = app.label_width() as u16;

    for (offset, field_idx) in (first..app.field_count()).take(visible_rows).enumerate() {
        let row = Rect {
            x: inner.x,
            y: inner.y + offset as u16,
            width: inner.width,
            height: 1,
        };
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(label_width + 2), // "name: "
                Constraint::Min(1),                  // text field
            ])
            .split(row);

        let focused = field_idx == app.focus();
        let label_style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let label = format!("{:>width$}: ", app.field_name(field_idx), width = label_width as usize);
        frame.render_widget(Paragraph::new(Span::styled(label, label_style)), chunks[0]);

        frame.render_widget(app.field(field_idx), chunks[1]);
    }
}
