// src/core/scanner/sqlmap_scanner.rs

use crate::core::config::ScanOptions;
use crate::core::context::ScanContext;
use crate::core::error::Result;
use crate::core::models::{Finding, ScanProfile, ScanTarget, Severity, ToolName};
use crate::core::scanner::{ToolAdapter, process};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Instrument, Span, error, info};

pub const SQLMAP_TIMEOUT: Duration = Duration::from_secs(900);

const INJECTION_MARKER: &str = "sqlmap identified the following injection point";

/// Test level sqlmap runs at for a profile.
pub fn level_for_profile(profile: ScanProfile) -> u8 {
    match profile {
        ScanProfile::Deep => 2,
        ScanProfile::Quick | ScanProfile::Full => 1,
    }
}

pub struct SqlmapScanner {
    program: PathBuf,
    output_dir: PathBuf,
    timeout: Duration,
    span: Span,
}

impl SqlmapScanner {
    pub fn new(program: impl Into<PathBuf>, ctx: &ScanContext) -> Self {
        Self {
            program: program.into(),
            output_dir: std::env::temp_dir().join("vulnx_sqlmap"),
            timeout: SQLMAP_TIMEOUT,
            span: ctx.component("sqlmap"),
        }
    }

    /// Runs sqlmap non-interactively; `true` when an injection point was found.
    pub async fn scan(&self, url: &str, level: u8) -> Result<bool> {
        let args = vec![
            "-u".to_string(),
            url.to_string(),
            "--level".to_string(),
            level.to_string(),
            "--batch".to_string(),
            "--output-dir".to_string(),
            self.output_dir.display().to_string(),
        ];
        info!(url, level, "Starting sqlmap scan.");
        let stdout = process::run_tool(ToolName::SqlInjectionTester, &self.program, &args, self.timeout).await?;
        let vulnerable = stdout.contains(INJECTION_MARKER);
        info!(vulnerable, "Sqlmap scan finished.");
        Ok(vulnerable)
    }
}

impl ToolAdapter for SqlmapScanner {
    fn tool(&self) -> ToolName {
        ToolName::SqlInjectionTester
    }

    async fn run(&self, target: &ScanTarget, profile: ScanProfile, options: &ScanOptions) -> Vec<Finding> {
        let level = options.sqlmap_level.unwrap_or_else(|| level_for_profile(profile));
        match self.scan(target.url(), level).instrument(self.span.clone()).await {
            Ok(true) => vec![
                Finding::new(self.tool(), Severity::High, "SQL injection vulnerability detected")
                    .with_detail("type", "sql_injection")
                    .with_detail("confidence", "high")
                    .with_detail("level", level.to_string()),
            ],
            Ok(false) => Vec::new(),
            Err(e) => {
                self.span.in_scope(|| error!(error = %e, "Sqlmap scan failed."));
                vec![Finding::scan_failed(self.tool(), e)]
            }
        }
    }
}
