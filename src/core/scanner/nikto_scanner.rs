// src/core/scanner/nikto_scanner.rs

use crate::core::config::ScanOptions;
use crate::core::context::ScanContext;
use crate::core::error::Result;
use crate::core::models::{Finding, ScanProfile, ScanTarget, Severity, ToolName};
use crate::core::scanner::{ToolAdapter, process};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Instrument, Span, error, info};

pub const NIKTO_TIMEOUT: Duration = Duration::from_secs(600);

/// Prefix nikto puts in front of every reported item.
const ITEM_MARKER: &str = "+ ";

pub struct NiktoScanner {
    program: PathBuf,
    timeout: Duration,
    span: Span,
}

impl NiktoScanner {
    pub fn new(program: impl Into<PathBuf>, ctx: &ScanContext) -> Self {
        Self {
            program: program.into(),
            timeout: NIKTO_TIMEOUT,
            span: ctx.component("nikto"),
        }
    }

    /// Runs nikto against `url` and returns the cleaned item lines.
    pub async fn scan(&self, url: &str) -> Result<Vec<String>> {
        let args = vec!["-h".to_string(), url.to_string(), "-nointeractive".to_string()];
        info!(url, "Starting nikto scan.");
        let stdout = process::run_tool(ToolName::WebServerScanner, &self.program, &args, self.timeout).await?;
        let items = parse_output(&stdout);
        info!(items = items.len(), "Nikto scan finished.");
        Ok(items)
    }
}

impl ToolAdapter for NiktoScanner {
    fn tool(&self) -> ToolName {
        ToolName::WebServerScanner
    }

    async fn run(&self, target: &ScanTarget, _profile: ScanProfile, _options: &ScanOptions) -> Vec<Finding> {
        match self.scan(target.url()).instrument(self.span.clone()).await {
            Ok(items) => items
                .into_iter()
                .map(|item| {
                    Finding::new(self.tool(), Severity::Medium, item).with_detail("type", "web_vulnerability")
                })
                .collect(),
            Err(e) => {
                self.span.in_scope(|| error!(error = %e, "Nikto scan failed."));
                vec![Finding::scan_failed(self.tool(), e)]
            }
        }
    }
}

/// Every `+ `-prefixed line except the `Server:` banner is one item.
pub fn parse_output(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.contains("Server:"))
        .filter_map(|line| line.trim_start().strip_prefix(ITEM_MARKER))
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
