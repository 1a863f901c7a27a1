// src/ui/widgets/header.rs

use crate::app::{App, AppState, SPINNER_CHARS};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("VulnX");
    let status = match app.state {
        AppState::Scanning => Span::styled(
            format!("{} scanning", SPINNER_CHARS[app.spinner_frame]),
            Style::default().fg(Color::Cyan),
        ),
        AppState::Finished => Span::styled("✓ completed", Style::default().fg(Color::Green)),
    };
    let line = Line::from(vec![
        Span::raw("Target: "),
        Span::styled(app.target.clone(), Style::default().fg(Color::Yellow)),
        Span::raw(format!("   Profile: {}   ", app.profile)),
        status,
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);
}
