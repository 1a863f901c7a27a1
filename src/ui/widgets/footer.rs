// src/ui/widgets/footer.rs

use crate::app::{App, AppState};
use ratatui::{prelude::*, widgets::Paragraph};

pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::new().bold().fg(Color::Yellow));
    let spans = match app.state {
        AppState::Scanning => Line::from(vec![
            Span::raw("Scanning... "),
            key("↑/↓"),
            Span::raw(" scroll, "),
            key("Q"),
            Span::raw(" abort"),
        ]),
        AppState::Finished => Line::from(vec![
            key("↑/↓"),
            Span::raw(" scroll, "),
            key("Q"),
            Span::raw(" close dashboard"),
        ]),
    };
    frame.render_widget(Paragraph::new(spans).alignment(Alignment::Center), area);
}
