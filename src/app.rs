// src/app.rs

use ratatui::widgets::TableState;
use std::sync::Arc;
use vulnx::core::models::{Finding, ScanProfile, ScanResult, Severity, ToolName};
use vulnx::core::orchestrator::{ScanEvent, SkipReason};
use vulnx::core::store::FindingStore;

pub const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub enum AppState {
    Scanning,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    Pending,
    Running,
    Done(usize),
    Skipped(SkipReason),
}

#[derive(Debug, Clone)]
pub struct ToolProgress {
    pub tool: ToolName,
    pub status: ToolStatus,
}

#[derive(Debug, Default)]
pub struct ScanSummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub target: String,
    pub profile: ScanProfile,
    pub tools: Vec<ToolProgress>,
    pub findings: Vec<Finding>,
    pub result: Option<ScanResult>,
    pub summary: ScanSummary,
    pub table_state: TableState,
    pub spinner_frame: usize,
    store: Arc<FindingStore>,
}

impl App {
    pub fn new(target: &str, profile: ScanProfile, store: Arc<FindingStore>) -> Self {
        Self {
            should_quit: false,
            state: AppState::Scanning,
            target: target.to_string(),
            profile,
            tools: Vec::new(),
            findings: Vec::new(),
            result: None,
            summary: ScanSummary::default(),
            table_state: TableState::default(),
            spinner_frame: 0,
            store,
        }
    }

    /// Folds one orchestrator event into the dashboard state.
    pub fn apply(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::Started { tools, .. } => {
                let skipped: Vec<ToolProgress> =
                    self.tools.drain(..).filter(|t| matches!(t.status, ToolStatus::Skipped(_))).collect();
                self.tools = tools
                    .into_iter()
                    .map(|tool| ToolProgress { tool, status: ToolStatus::Pending })
                    .chain(skipped)
                    .collect();
            }
            ScanEvent::ToolSkipped { tool, reason } => {
                self.tools.push(ToolProgress { tool, status: ToolStatus::Skipped(reason) });
            }
            ScanEvent::ToolStarted { tool } => self.set_status(tool, ToolStatus::Running),
            ScanEvent::ToolFinished { tool, findings } => {
                self.set_status(tool, ToolStatus::Done(findings));
                self.refresh_findings();
            }
            ScanEvent::Completed(result) => {
                self.result = Some(result);
                self.state = AppState::Finished;
                self.refresh_findings();
            }
        }
    }

    fn set_status(&mut self, tool: ToolName, status: ToolStatus) {
        if let Some(entry) = self.tools.iter_mut().find(|t| t.tool == tool) {
            entry.status = status;
        }
    }

    fn refresh_findings(&mut self) {
        self.findings = self.store.snapshot();
        self.update_summary();
    }

    /// Fraction of runnable tools that have completed.
    pub fn progress_ratio(&self) -> f64 {
        let runnable = self.tools.iter().filter(|t| !matches!(t.status, ToolStatus::Skipped(_))).count();
        if runnable == 0 {
            return if matches!(self.state, AppState::Finished) { 1.0 } else { 0.0 };
        }
        let done = self.tools.iter().filter(|t| matches!(t.status, ToolStatus::Done(_))).count();
        done as f64 / runnable as f64
    }

    pub fn update_summary(&mut self) {
        let count = |severity: Severity| self.store.count_by_severity(severity);
        self.summary = ScanSummary {
            critical: count(Severity::Critical),
            high: count(Severity::High),
            medium: count(Severity::Medium),
            low: count(Severity::Low),
            info: count(Severity::Info),
        };
    }

    pub fn on_tick(&mut self) {
        if matches!(self.state, AppState::Scanning) {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
    }

    pub fn scroll_up(&mut self) {
        if self.findings.is_empty() {
            return;
        }
        let next = self.table_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.table_state.select(Some(next));
    }

    pub fn scroll_down(&mut self) {
        if self.findings.is_empty() {
            return;
        }
        let last = self.findings.len() - 1;
        let next = self.table_state.selected().map_or(0, |i| (i + 1).min(last));
        self.table_state.select(Some(next));
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
