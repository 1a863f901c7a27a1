// src/core/report.rs

use crate::core::error::Result;
use crate::core::models::Finding;
use crate::core::store::FindingStore;
use std::collections::BTreeMap;
use std::path::PathBuf;
use strum::Display;
use tabled::{Table, Tabled};
use tracing::info;

/// Longest details cell shown in the console table.
const DETAILS_PREVIEW: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, clap::ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Txt,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Txt => "txt",
        }
    }
}

/// Encodes findings in the requested format.
pub fn render(format: ExportFormat, findings: &[Finding]) -> Result<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(findings)?),
        ExportFormat::Csv => render_csv(findings),
        ExportFormat::Txt => Ok(render_txt(findings)),
    }
}

fn render_csv(findings: &[Finding]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if !findings.is_empty() {
        writer.write_record(["tool", "severity", "description", "details", "timestamp"])?;
    }
    for finding in findings {
        writer.write_record([
            finding.tool.label().to_string(),
            finding.severity.to_string(),
            finding.description.clone(),
            serde_json::to_string(&finding.details)?,
            finding.timestamp.to_rfc3339(),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn render_txt(findings: &[Finding]) -> String {
    let rule = "-".repeat(50);
    findings
        .iter()
        .map(|f| {
            format!(
                "Tool: {}\nSeverity: {}\nDescription: {}\nDetails: {}\n{}\n",
                f.tool.label(),
                f.severity,
                f.description,
                details_inline(&f.details),
                rule
            )
        })
        .collect()
}

fn details_inline(details: &BTreeMap<String, String>) -> String {
    let pairs: Vec<String> = details.iter().map(|(k, v)| format!("{k}: {v}")).collect();
    format!("{{{}}}", pairs.join(", "))
}

/// Writes the store to `<stem>.<ext>` and returns the path written.
pub fn save_results(store: &FindingStore, format: ExportFormat, stem: &str) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{stem}.{}", format.extension()));
    let content = render(format, &store.snapshot())?;
    std::fs::write(&path, content)?;
    info!(path = %path.display(), %format, "Results saved.");
    Ok(path)
}

/// Default export stem for a target: `vulnx_scan_` plus the target with
/// every non-alphanumeric character replaced by `_`.
pub fn default_file_stem(target: &str) -> String {
    let safe: String = target
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("vulnx_scan_{safe}")
}

#[derive(Tabled)]
struct FindingRow {
    #[tabled(rename = "Tool")]
    tool: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Details")]
    details: String,
}

/// Console table of the findings, details cut to a short preview.
pub fn render_table(findings: &[Finding]) -> String {
    if findings.is_empty() {
        return "No vulnerabilities found.".to_string();
    }
    let rows = findings.iter().map(|f| FindingRow {
        tool: f.tool.label().to_string(),
        severity: f.severity.to_string(),
        description: f.description.clone(),
        details: details_preview(&f.details),
    });
    Table::new(rows).to_string()
}

pub fn details_preview(details: &BTreeMap<String, String>) -> String {
    let full = details
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n");
    if full.chars().count() > DETAILS_PREVIEW {
        let cut: String = full.chars().take(DETAILS_PREVIEW).collect();
        format!("{cut}...")
    } else {
        full
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Severity, ToolName};

    fn sample() -> Vec<Finding> {
        vec![
            Finding::new(ToolName::NetworkMapper, Severity::Info, "Open port: 22 - ssh").with_detail("port", "22"),
            Finding::new(ToolName::WebServerScanner, Severity::Medium, "/admin/: Directory indexing, found."),
        ]
    }

    #[test]
    fn json_export_keeps_every_finding_verbatim() {
        let findings = sample();
        let json = render(ExportFormat::Json, &findings).unwrap();
        let parsed: Vec<Finding> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), findings.len());
        for (original, exported) in findings.iter().zip(&parsed) {
            assert_eq!(original.tool, exported.tool);
            assert_eq!(original.severity, exported.severity);
            assert_eq!(original.description, exported.description);
        }
    }

    #[test]
    fn csv_has_header_and_quotes_commas() {
        let csv = render(ExportFormat::Csv, &sample()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("tool,severity,description,details,timestamp"));
        assert!(lines.next().unwrap().starts_with("Nmap,info,Open port: 22 - ssh,"));
        assert!(lines.next().unwrap().starts_with("Nikto,medium,\"/admin/: Directory indexing, found.\""));
    }

    #[test]
    fn csv_of_empty_store_is_empty() {
        assert_eq!(render(ExportFormat::Csv, &[]).unwrap(), "");
    }

    #[test]
    fn txt_blocks_are_separated_by_rules() {
        let txt = render(ExportFormat::Txt, &sample()).unwrap();
        assert!(txt.starts_with("Tool: Nmap\nSeverity: info\nDescription: Open port: 22 - ssh\nDetails: {port: 22}\n"));
        assert_eq!(txt.matches(&"-".repeat(50)).count(), 2);
    }

    #[test]
    fn file_stem_is_sanitized() {
        assert_eq!(default_file_stem("http://10.0.0.1:8080"), "vulnx_scan_http___10_0_0_1_8080");
    }

    #[test]
    fn long_details_are_truncated() {
        let details: BTreeMap<String, String> = [("solution".to_string(), "x".repeat(300))].into();
        let preview = details_preview(&details);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), DETAILS_PREVIEW + 3);
    }

    #[test]
    fn save_writes_file_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = FindingStore::new();
        store.extend(sample());
        let stem = dir.path().join("report");
        let path = save_results(&store, ExportFormat::Json, stem.to_str().unwrap()).unwrap();
        assert_eq!(path.extension().unwrap(), "json");
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("Open port: 22 - ssh"));
    }
}
