// src/ui/layout.rs

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen regions of the scan dashboard.
pub struct AppLayout {
    pub header: Rect,
    pub findings: Rect,
    pub progress: Rect,
    pub summary: Rect,
    pub footer: Rect,
}

/// Splits the frame into a header bar, the findings table on the left,
/// tool progress and severity counts on the right, and a one-line footer.
pub fn create_layout(frame_size: Rect) -> AppLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
        .split(frame_size);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(main_chunks[1]);

    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(9), Constraint::Length(9)])
        .split(content_chunks[1]);

    AppLayout {
        header: main_chunks[0],
        findings: content_chunks[0],
        progress: side_chunks[0],
        summary: side_chunks[1],
        footer: main_chunks[2],
    }
}
