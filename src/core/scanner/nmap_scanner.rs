// src/core/scanner/nmap_scanner.rs

use crate::core::context::ScanContext;
use crate::core::error::Result;
use crate::core::models::{Finding, ScanProfile, ScanTarget, Severity, ToolName};
use crate::core::scanner::{ToolAdapter, process};
use crate::core::config::ScanOptions;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Instrument, Span, debug, error, info};

pub const NMAP_TIMEOUT: Duration = Duration::from_secs(300);

/// Matches the `<port>/<protocol>` field nmap prints in its port table.
static RE_PORT_FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)/([a-z]+)$").unwrap());

/// Argument presets for the network mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NmapMode {
    /// Fast scan of the most common ports.
    Quick,
    /// Service, version and OS detection with default scripts.
    Deep,
    /// The `vuln` NSE script category.
    Vuln,
}

impl NmapMode {
    pub fn for_profile(profile: ScanProfile) -> Self {
        match profile {
            ScanProfile::Quick => NmapMode::Quick,
            ScanProfile::Deep => NmapMode::Deep,
            ScanProfile::Full => NmapMode::Vuln,
        }
    }

    pub fn args(self) -> &'static [&'static str] {
        match self {
            NmapMode::Quick => &["-T4", "-F"],
            NmapMode::Deep => &["-sS", "-sV", "-sC", "-A", "-O"],
            NmapMode::Vuln => &["--script", "vuln"],
        }
    }
}

/// One open-port row from nmap's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenPort {
    pub port: u16,
    pub protocol: String,
    pub state: String,
    pub service: String,
}

pub struct NmapScanner {
    program: PathBuf,
    timeout: Duration,
    span: Span,
}

impl NmapScanner {
    pub fn new(program: impl Into<PathBuf>, ctx: &ScanContext) -> Self {
        Self {
            program: program.into(),
            timeout: NMAP_TIMEOUT,
            span: ctx.component("nmap"),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs nmap against `host` and returns the open ports it reported.
    pub async fn scan(&self, host: &str, mode: NmapMode) -> Result<Vec<OpenPort>> {
        let mut args: Vec<String> = mode.args().iter().map(|a| a.to_string()).collect();
        args.push(host.to_string());

        info!(host, ?mode, "Starting nmap scan.");
        let stdout = process::run_tool(ToolName::NetworkMapper, &self.program, &args, self.timeout).await?;
        let ports = parse_output(&stdout);
        info!(open_ports = ports.len(), "Nmap scan finished.");
        Ok(ports)
    }
}

impl ToolAdapter for NmapScanner {
    fn tool(&self) -> ToolName {
        ToolName::NetworkMapper
    }

    async fn run(&self, target: &ScanTarget, profile: ScanProfile, _options: &ScanOptions) -> Vec<Finding> {
        let mode = NmapMode::for_profile(profile);
        match self.scan(target.host(), mode).instrument(self.span.clone()).await {
            Ok(ports) => ports.into_iter().map(port_to_finding).collect(),
            Err(e) => {
                self.span.in_scope(|| error!(error = %e, "Nmap scan failed."));
                vec![Finding::scan_failed(self.tool(), e)]
            }
        }
    }
}

fn port_to_finding(port: OpenPort) -> Finding {
    Finding::new(
        ToolName::NetworkMapper,
        Severity::Info,
        format!("Open port: {} - {}", port.port, port.service),
    )
    .with_detail("type", "open_port")
    .with_detail("port", port.port.to_string())
    .with_detail("protocol", port.protocol)
    .with_detail("state", port.state)
    .with_detail("service", port.service)
}

/// Extracts open-port records from nmap's line-oriented text output.
///
/// A record is a line whose first field is a `<port>/<proto>` marker and whose
/// second field is exactly `open`; the third field is the service name.
pub fn parse_output(output: &str) -> Vec<OpenPort> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let (port_field, state, service) = (fields.next()?, fields.next()?, fields.next()?);
            if state != "open" {
                return None;
            }
            let caps = RE_PORT_FIELD.captures(port_field)?;
            let port = caps[1].parse().ok()?;
            debug!(port, service, "Open port record parsed.");
            Some(OpenPort {
                port,
                protocol: caps[2].to_string(),
                state: state.to_string(),
                service: service.to_string(),
            })
        })
        .collect()
}
