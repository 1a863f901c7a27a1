// src/core/scanner/fuzzer.rs

use crate::core::config::{FuzzerConfig, ScanOptions};
use crate::core::context::ScanContext;
use crate::core::error::{Result, VulnxError};
use crate::core::models::{DiscoveredEndpoint, Finding, ScanProfile, ScanTarget, Severity, ToolName};
use crate::core::scanner::ToolAdapter;
use futures::stream::{self, StreamExt};
use reqwest::StatusCode;
use reqwest::redirect::Policy;
use std::path::Path;
use std::time::Duration;
use tracing::{Instrument, Span, debug, info};

/// Paths probed during a profile scan.
pub const DEFAULT_SCAN_WORDLIST: &[&str] = &[
    "admin", "login", "config", "backup", "api", "test", "debug", "phpinfo", "wp-admin",
    "administrator", "uploads", "images", "css", "js", "src", "source", "old", "temp", "tmp", "logs",
];

/// Paths probed by the standalone `fuzz` command when no wordlist is given.
pub const DEFAULT_FUZZ_WORDLIST: &[&str] = &[
    "admin", "login", "api", "config", "backup", "test", "debug", "phpinfo", "wp-admin", "administrator",
];

/// Reads a wordlist file: one word per line, blanks and `#` comments skipped.
pub fn load_wordlist(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| VulnxError::Wordlist(format!("{}: {e}", path.display())))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

/// Built-in path discovery against a web target.
pub struct Fuzzer {
    client: reqwest::Client,
    delay: Duration,
    span: Span,
}

impl Fuzzer {
    pub fn new(config: &FuzzerConfig, ctx: &ScanContext) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("VulnX/", env!("CARGO_PKG_VERSION")))
            .redirect(Policy::none())
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            delay: config.delay,
            span: ctx.component("fuzzer"),
        })
    }

    /// Probes `base_url/<word>` for every word with at most `concurrency`
    /// requests in flight. Results arrive in completion order.
    pub async fn fuzz_endpoints(&self, base_url: &str, wordlist: &[String], concurrency: usize) -> Vec<DiscoveredEndpoint> {
        let base = base_url.trim_end_matches('/');
        let workers = concurrency.max(1);
        info!(base, words = wordlist.len(), workers, "Starting endpoint fuzzing.");

        let discovered: Vec<DiscoveredEndpoint> = stream::iter(wordlist.to_vec())
            .map(|word: String| self.check_endpoint(format!("{base}/{word}")))
            .buffer_unordered(workers)
            .filter_map(|endpoint| async move { endpoint })
            .collect()
            .await;

        info!(discovered = discovered.len(), "Endpoint fuzzing finished.");
        discovered
    }

    async fn check_endpoint(&self, url: String) -> Option<DiscoveredEndpoint> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let response = match self.client.get(&url).send().await {
            Ok(res) => res,
            Err(e) => {
                debug!(%url, error = %e, "Request failed, treating as not found.");
                return None;
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::FORBIDDEN {
            return None;
        }

        match response.bytes().await {
            Ok(body) => {
                debug!(%url, %status, bytes = body.len(), "Endpoint discovered.");
                Some(DiscoveredEndpoint {
                    url,
                    status_code: status.as_u16(),
                    content_length: body.len(),
                })
            }
            Err(e) => {
                debug!(%url, error = %e, "Failed to read response body, treating as not found.");
                None
            }
        }
    }
}

impl ToolAdapter for Fuzzer {
    fn tool(&self) -> ToolName {
        ToolName::EndpointFuzzer
    }

    async fn run(&self, target: &ScanTarget, _profile: ScanProfile, options: &ScanOptions) -> Vec<Finding> {
        let wordlist: Vec<String> = match &options.wordlist {
            Some(words) => words.clone(),
            None => DEFAULT_SCAN_WORDLIST.iter().map(|w| w.to_string()).collect(),
        };

        self.fuzz_endpoints(target.url(), &wordlist, options.threads)
            .instrument(self.span.clone())
            .await
            .into_iter()
            .map(endpoint_to_finding)
            .collect()
    }
}

fn endpoint_to_finding(endpoint: DiscoveredEndpoint) -> Finding {
    Finding::new(
        ToolName::EndpointFuzzer,
        Severity::Info,
        format!("Discovered endpoint: {} (Status: {})", endpoint.url, endpoint.status_code),
    )
    .with_detail("url", endpoint.url)
    .with_detail("status_code", endpoint.status_code.to_string())
    .with_detail("content_length", endpoint.content_length.to_string())
}
