// src/core/scanner/zap_scanner.rs

use crate::core::config::{ScanOptions, ZapConfig};
use crate::core::context::ScanContext;
use crate::core::error::{Result, VulnxError};
use crate::core::models::{Finding, ScanProfile, ScanTarget, Severity, ToolName};
use crate::core::scanner::ToolAdapter;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::str::FromStr;
use std::time::Duration;
use strum::EnumString;
use tokio::time::{Instant, sleep_until};
use tracing::{Instrument, Span, debug, error, info, warn};

pub const DEFAULT_POLICY: &str = "Default Policy";

/// Wall-clock budgets for a ZAP run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZapScanMode {
    Quick,
    Deep,
}

impl ZapScanMode {
    /// Deep profile gets the short budget, Full the long one. Quick never runs ZAP.
    pub fn for_profile(profile: ScanProfile) -> Option<Self> {
        match profile {
            ScanProfile::Quick => None,
            ScanProfile::Deep => Some(ZapScanMode::Quick),
            ScanProfile::Full => Some(ZapScanMode::Deep),
        }
    }

    pub fn timeout(self) -> Duration {
        match self {
            ZapScanMode::Quick => Duration::from_secs(600),
            ZapScanMode::Deep => Duration::from_secs(3600),
        }
    }
}

/// Risk vocabulary used by ZAP alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum ZapRisk {
    High,
    Medium,
    Low,
    Informational,
}

impl From<ZapRisk> for Severity {
    fn from(risk: ZapRisk) -> Self {
        match risk {
            ZapRisk::High => Severity::High,
            ZapRisk::Medium => Severity::Medium,
            ZapRisk::Low => Severity::Low,
            ZapRisk::Informational => Severity::Info,
        }
    }
}

/// Where the spider/active-scan protocol currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ZapPhase {
    Spidering { id: String },
    Scanning { id: String },
    Done,
    TimedOut,
}

// --- API payloads ---

#[derive(Debug, Deserialize)]
struct VersionResponse {
    version: String,
}

#[derive(Debug, Deserialize)]
struct ScanIdResponse {
    #[serde(default)]
    scan: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct AlertsResponse {
    #[serde(default)]
    alerts: Vec<ZapAlert>,
}

/// One alert as returned by `/JSON/alert/view/alerts/`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ZapAlert {
    pub alert: String,
    pub risk: String,
    pub url: String,
    pub param: String,
    pub attack: String,
    pub evidence: String,
    pub confidence: String,
    pub cweid: String,
    pub wascid: String,
    pub solution: String,
}

impl ZapAlert {
    pub fn to_finding(&self) -> Finding {
        let severity = ZapRisk::from_str(&self.risk).map(Severity::from).unwrap_or(Severity::Info);
        let description = if self.alert.is_empty() { "Unknown alert" } else { self.alert.as_str() };
        Finding::new(ToolName::DynamicAppScanner, severity, description)
            .with_detail("url", self.url.as_str())
            .with_detail("parameter", self.param.as_str())
            .with_detail("attack", self.attack.as_str())
            .with_detail("evidence", self.evidence.as_str())
            .with_detail("confidence", self.confidence.as_str())
            .with_detail("cwe_id", self.cweid.as_str())
            .with_detail("wasc_id", self.wascid.as_str())
            .with_detail("solution", self.solution.as_str())
    }
}

/// Percent complete from a status payload. Anything but an integer is an error.
fn parse_progress(status: &str) -> Result<u8> {
    status
        .trim()
        .parse::<u32>()
        .map(|p| p.min(100) as u8)
        .map_err(|_| VulnxError::RemoteService(format!("unexpected scan status {status:?}")))
}

/// Sleeps one poll interval, cut short at `deadline`. `false` once the deadline has passed.
async fn wait_for_poll(interval: Duration, deadline: Option<Instant>) -> bool {
    let wake = Instant::now() + interval;
    match deadline {
        Some(deadline) => {
            sleep_until(wake.min(deadline)).await;
            Instant::now() < deadline
        }
        None => {
            sleep_until(wake).await;
            true
        }
    }
}

/// Client for a running ZAP daemon's JSON API.
pub struct ZapScanner {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    spider_poll: Duration,
    scan_poll: Duration,
    span: Span,
}

impl ZapScanner {
    pub fn new(config: &ZapConfig, ctx: &ScanContext) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url(),
            api_key: config.api_key.clone(),
            spider_poll: config.spider_poll,
            scan_poll: config.scan_poll,
            span: ctx.component("zap"),
        })
    }

    /// Points the client at an explicit base URL instead of `http://host:port`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn request<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T> {
        let mut query: Vec<(&str, &str)> = params.to_vec();
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.as_str()));
        }

        debug!(endpoint, "ZAP API request.");
        let response = self
            .client
            .get(format!("{}{}", self.base_url, endpoint))
            .query(&query)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| {
                error!(endpoint, error = %e, "ZAP API request failed.");
                VulnxError::from(e)
            })?;
        Ok(response.json::<T>().await?)
    }

    pub async fn version(&self) -> Result<String> {
        let res: VersionResponse = self.request("/JSON/core/view/version/", &[]).await?;
        Ok(res.version)
    }

    /// Reachability check used by the availability probe.
    pub async fn is_accessible(&self) -> bool {
        self.version().await.is_ok()
    }

    async fn start_spider(&self, target: &str) -> Result<String> {
        let res: ScanIdResponse = self
            .request(
                "/JSON/spider/action/scan/",
                &[("url", target), ("maxChildren", "50"), ("recurse", "true"), ("contextName", ""), ("subtreeOnly", "false")],
            )
            .await?;
        Ok(res.scan)
    }

    async fn start_active_scan(&self, target: &str, policy: &str) -> Result<String> {
        let res: ScanIdResponse = self
            .request(
                "/JSON/ascan/action/scan/",
                &[
                    ("url", target),
                    ("recurse", "true"),
                    ("inScopeOnly", "true"),
                    ("scanPolicyName", policy),
                    ("method", "GET"),
                    ("postData", ""),
                ],
            )
            .await?;
        Ok(res.scan)
    }

    async fn progress(&self, endpoint: &str, id: &str) -> Result<u8> {
        let res: StatusResponse = self.request(endpoint, &[("scanId", id)]).await?;
        parse_progress(&res.status)
    }

    pub async fn alerts(&self, target: &str) -> Result<Vec<ZapAlert>> {
        let res: AlertsResponse = self.request("/JSON/alert/view/alerts/", &[("baseurl", target)]).await?;
        Ok(res.alerts)
    }

    /// Full protocol: version check, spider, active scan, alert retrieval.
    ///
    /// The spider is polled until it reports 100%. The active scan is polled
    /// until 100% or until `limit` has elapsed since it started; hitting the
    /// limit truncates the scan and alerts gathered so far are still returned.
    pub async fn scan(&self, target: &str, policy: &str, limit: Duration) -> Result<Vec<Finding>> {
        let version = self.version().await?;
        info!(url = target, %version, "Starting ZAP scan.");

        let mut phase = ZapPhase::Spidering { id: self.start_spider(target).await? };
        let mut deadline = None;
        loop {
            let next = match &phase {
                ZapPhase::Spidering { id } => {
                    wait_for_poll(self.spider_poll, None).await;
                    let progress = self.progress("/JSON/spider/view/status/", id).await?;
                    info!(progress, "Spider progress.");
                    if progress >= 100 {
                        info!("Starting active scan.");
                        deadline = Some(Instant::now() + limit);
                        ZapPhase::Scanning { id: self.start_active_scan(target, policy).await? }
                    } else {
                        ZapPhase::Spidering { id: id.clone() }
                    }
                }
                ZapPhase::Scanning { id } => {
                    if !wait_for_poll(self.scan_poll, deadline).await {
                        ZapPhase::TimedOut
                    } else {
                        let progress = self.progress("/JSON/ascan/view/status/", id).await?;
                        info!(progress, "Active scan progress.");
                        if progress >= 100 { ZapPhase::Done } else { ZapPhase::Scanning { id: id.clone() } }
                    }
                }
                ZapPhase::Done | ZapPhase::TimedOut => break,
            };
            phase = next;
        }

        if phase == ZapPhase::TimedOut {
            warn!(?limit, "ZAP scan timeout reached, collecting partial results.");
        }

        let findings: Vec<Finding> = self.alerts(target).await?.iter().map(ZapAlert::to_finding).collect();
        info!(findings = findings.len(), "ZAP scan completed.");
        Ok(findings)
    }
}

impl ToolAdapter for ZapScanner {
    fn tool(&self) -> ToolName {
        ToolName::DynamicAppScanner
    }

    async fn run(&self, target: &ScanTarget, profile: ScanProfile, _options: &ScanOptions) -> Vec<Finding> {
        let Some(mode) = ZapScanMode::for_profile(profile) else {
            self.span.in_scope(|| info!(%profile, "ZAP skipped for this profile."));
            return Vec::new();
        };

        match self.scan(target.url(), DEFAULT_POLICY, mode.timeout()).instrument(self.span.clone()).await {
            Ok(findings) => findings,
            Err(e) => {
                self.span.in_scope(|| error!(error = %e, "ZAP scan failed."));
                vec![Finding::scan_failed(self.tool(), e)]
            }
        }
    }
}
