// src/ui/widgets/progress.rs

use crate::app::{App, SPINNER_CHARS, ToolStatus};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph},
};
use vulnx::core::orchestrator::SkipReason;

pub fn render_progress(frame: &mut Frame, app: &App, area: Rect) {
    let container = Block::default().borders(Borders::ALL).title("Tools");
    frame.render_widget(container, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let ratio = app.progress_ratio().clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0))
        .gauge_style(Style::default().fg(if ratio >= 1.0 { Color::Green } else { Color::Cyan }));
    frame.render_widget(gauge, chunks[0]);

    let lines: Vec<Line> = app
        .tools
        .iter()
        .map(|entry| {
            let (icon, note, style) = match entry.status {
                ToolStatus::Pending => ("·".to_string(), "pending".to_string(), Style::default().fg(Color::DarkGray)),
                ToolStatus::Running => (
                    SPINNER_CHARS[app.spinner_frame].to_string(),
                    entry.tool.activity().to_string(),
                    Style::default().fg(Color::Cyan),
                ),
                ToolStatus::Done(n) => ("✓".to_string(), format!("{n} findings"), Style::default().fg(Color::Green)),
                ToolStatus::Skipped(SkipReason::Unavailable) => {
                    ("✗".to_string(), "not available".to_string(), Style::default().fg(Color::Red))
                }
                ToolStatus::Skipped(SkipReason::ProfileTooLight) => {
                    ("-".to_string(), "skipped for profile".to_string(), Style::default().fg(Color::DarkGray))
                }
            };
            Line::from(vec![
                Span::styled(format!("{icon} "), style),
                Span::styled(format!("{:<7}", entry.tool.label()), Style::default().bold()),
                Span::raw(format!(" {note}")),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), chunks[2]);
}
