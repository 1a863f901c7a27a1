// src/ui/widgets/findings.rs

use super::severity_color;
use crate::app::{App, AppState};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

/// Renders every finding collected so far, newest last.
pub fn render_findings(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Findings ({})", app.findings.len()));

    if app.findings.is_empty() {
        let text = match app.state {
            AppState::Scanning => "Waiting for the first tool to finish...",
            AppState::Finished => "No vulnerabilities found.",
        };
        let placeholder = Paragraph::new(text)
            .block(block)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        frame.render_widget(placeholder, area);
        return;
    }

    let rows = app.findings.iter().map(|finding| {
        Row::new(vec![
            Cell::from(finding.tool.label()),
            Cell::from(finding.severity.to_string()).style(Style::default().fg(severity_color(finding.severity)).bold()),
            Cell::from(finding.description.clone()),
        ])
    });
    let header = Row::new(vec!["Tool", "Severity", "Description"])
        .style(Style::default().bold().underlined());

    let table = Table::new(rows, [Constraint::Length(8), Constraint::Length(9), Constraint::Min(20)])
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    frame.render_stateful_widget(table, area, &mut app.table_state);
}
