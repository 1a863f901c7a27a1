// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

// --- Core Enumerations ---

/// Severity level of a finding, ordered from most to least severe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

/// The closed set of tools the orchestrator knows how to drive.
///
/// `Display`/`FromStr` use the short command-line key (`nmap`, `zap`, ...),
/// while serialized findings carry the human label returned by [`ToolName::label`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ToolName {
    #[serde(rename = "Nmap")]
    #[strum(serialize = "nmap")]
    NetworkMapper,
    #[serde(rename = "Nikto")]
    #[strum(serialize = "nikto")]
    WebServerScanner,
    #[serde(rename = "SQLMap")]
    #[strum(serialize = "sqlmap")]
    SqlInjectionTester,
    #[serde(rename = "ZAP")]
    #[strum(serialize = "zap")]
    DynamicAppScanner,
    #[serde(rename = "Fuzzer")]
    #[strum(serialize = "fuzzer")]
    EndpointFuzzer,
}

impl ToolName {
    /// Label used in reports and exports.
    pub fn label(self) -> &'static str {
        match self {
            ToolName::NetworkMapper => "Nmap",
            ToolName::WebServerScanner => "Nikto",
            ToolName::SqlInjectionTester => "SQLMap",
            ToolName::DynamicAppScanner => "ZAP",
            ToolName::EndpointFuzzer => "Fuzzer",
        }
    }

    /// One-line description shown by the `plugins` listing.
    pub fn description(self) -> &'static str {
        match self {
            ToolName::NetworkMapper => "Network port scanning",
            ToolName::WebServerScanner => "Web server scanning",
            ToolName::SqlInjectionTester => "SQL injection testing",
            ToolName::DynamicAppScanner => "OWASP ZAP integration",
            ToolName::EndpointFuzzer => "Endpoint discovery",
        }
    }

    /// Short text shown next to the progress gauge while the tool runs.
    pub fn activity(self) -> &'static str {
        match self {
            ToolName::NetworkMapper => "Network mapping",
            ToolName::WebServerScanner => "Web server analysis",
            ToolName::SqlInjectionTester => "SQL injection testing",
            ToolName::DynamicAppScanner => "Web application testing",
            ToolName::EndpointFuzzer => "Endpoint discovery",
        }
    }
}

/// Named preset controlling which tools run and with what intensity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumIter, EnumString, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ScanProfile {
    #[default]
    Quick,
    Deep,
    Full,
}

impl ScanProfile {
    /// The static profile-to-toolset table, in execution order.
    pub fn default_tools(self) -> &'static [ToolName] {
        match self {
            ScanProfile::Quick => &[ToolName::NetworkMapper, ToolName::WebServerScanner],
            ScanProfile::Deep => &[
                ToolName::NetworkMapper,
                ToolName::WebServerScanner,
                ToolName::EndpointFuzzer,
                ToolName::SqlInjectionTester,
            ],
            ScanProfile::Full => &[
                ToolName::NetworkMapper,
                ToolName::WebServerScanner,
                ToolName::SqlInjectionTester,
                ToolName::DynamicAppScanner,
                ToolName::EndpointFuzzer,
            ],
        }
    }
}

// --- Scan Target ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TargetKind {
    Ip,
    Url,
}

/// Canonical, scheme-qualified form of the user's target.
///
/// Built only by [`crate::core::target::validate`]; fields are private so the
/// value cannot change once a scan has started.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanTarget {
    kind: TargetKind,
    url: String,
    host: String,
}

impl ScanTarget {
    pub(crate) fn new(kind: TargetKind, url: String, host: String) -> Self {
        Self { kind, url, host }
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Host portion without scheme or port, as handed to network-level tools.
    pub fn host(&self) -> &str {
        &self.host
    }
}

// --- Findings ---

/// One normalized unit of scan output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    pub tool: ToolName,
    pub severity: Severity,
    pub description: String,
    pub details: BTreeMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

impl Finding {
    pub fn new(tool: ToolName, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            tool,
            severity,
            description: description.into(),
            details: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Adds one detail entry, builder style.
    pub fn with_detail(mut self, key: &str, value: impl Into<String>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    /// The single Info finding an adapter emits when it could not complete.
    pub fn scan_failed(tool: ToolName, error: impl std::fmt::Display) -> Self {
        Self::new(tool, Severity::Info, format!("Scan failed: {error}")).with_detail("type", "scan_error")
    }
}

/// A path the fuzzer found on the target. Lives only for one fuzz run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredEndpoint {
    pub url: String,
    pub status_code: u16,
    pub content_length: usize,
}

// --- Availability ---

/// Which tools are usable in this session. Computed once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AvailabilityMap {
    tools: BTreeMap<ToolName, bool>,
}

impl AvailabilityMap {
    /// Every tool marked available. Mostly useful for tests and dry runs.
    pub fn all_available() -> Self {
        ToolName::iter().map(|tool| (tool, true)).collect()
    }

    pub fn is_available(&self, tool: ToolName) -> bool {
        self.tools.get(&tool).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ToolName, bool)> + '_ {
        self.tools.iter().map(|(tool, available)| (*tool, *available))
    }

    /// Splits `requested` into (available, unavailable), preserving order.
    pub fn partition(&self, requested: &[ToolName]) -> (Vec<ToolName>, Vec<ToolName>) {
        requested.iter().copied().partition(|tool| self.is_available(*tool))
    }
}

impl FromIterator<(ToolName, bool)> for AvailabilityMap {
    fn from_iter<I: IntoIterator<Item = (ToolName, bool)>>(iter: I) -> Self {
        Self { tools: iter.into_iter().collect() }
    }
}

// --- Scan Result ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScanStatus {
    Completed,
}

/// Terminal summary of one orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanResult {
    pub status: ScanStatus,
    pub findings_count: usize,
    pub target: String,
    pub profile: ScanProfile,
    pub tools_used: Vec<ToolName>,
    pub timestamp: DateTime<Utc>,
}
