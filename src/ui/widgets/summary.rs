// src/ui/widgets/summary.rs

use super::severity_color;
use crate::app::App;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use vulnx::core::models::Severity;

/// Severity counts of the findings collected so far.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Summary");
    let counts = [
        (Severity::Critical, app.summary.critical),
        (Severity::High, app.summary.high),
        (Severity::Medium, app.summary.medium),
        (Severity::Low, app.summary.low),
        (Severity::Info, app.summary.info),
    ];
    let mut lines: Vec<Line> = counts
        .into_iter()
        .map(|(severity, count)| {
            Line::from(vec![
                Span::raw(format!("{:<10}", format!("{severity}:"))),
                Span::styled(count.to_string(), Style::default().fg(severity_color(severity)).bold()),
            ])
        })
        .collect();
    if let Some(result) = &app.result {
        lines.push(Line::from(format!("Total: {}", result.findings_count).bold()));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
