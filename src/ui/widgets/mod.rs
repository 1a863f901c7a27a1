// src/ui/widgets/mod.rs

pub mod findings; // Live findings table.
pub mod footer;
pub mod header;
pub mod progress; // Per-tool status and overall gauge.
pub mod summary;

use ratatui::style::Color;
use vulnx::core::models::Severity;

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => Color::Magenta,
        Severity::High => Color::Red,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Green,
        Severity::Info => Color::Cyan,
    }
}
