// src/ui/mod.rs

use crate::app::App;
use ratatui::prelude::*;

mod layout;
mod widgets;

pub fn render(app: &mut App, frame: &mut Frame) {
    let layout = layout::create_layout(frame.area());

    widgets::header::render_header(frame, app, layout.header);
    widgets::findings::render_findings(frame, app, layout.findings);
    widgets::progress::render_progress(frame, app, layout.progress);
    widgets::summary::render_summary(frame, app, layout.summary);
    widgets::footer::render_footer(frame, app, layout.footer);
}
