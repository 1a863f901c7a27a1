// src/core/orchestrator.rs

use crate::core::availability::AvailabilityProber;
use crate::core::config::{ScanOptions, VulnxConfig};
use crate::core::context::ScanContext;
use crate::core::error::Result;
use crate::core::models::{AvailabilityMap, ScanProfile, ScanResult, ScanStatus, ToolName};
use crate::core::scanner::Adapters;
use crate::core::store::FindingStore;
use crate::core::target;
use chrono::Utc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{Instrument, Span, info, warn};

/// Why a requested tool did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Unavailable,
    ProfileTooLight,
}

/// Progress notifications streamed while a scan runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    Started { target: String, profile: ScanProfile, tools: Vec<ToolName> },
    ToolSkipped { tool: ToolName, reason: SkipReason },
    ToolStarted { tool: ToolName },
    ToolFinished { tool: ToolName, findings: usize },
    Completed(ScanResult),
}

/// Effective toolset before availability filtering: the override when given
/// (duplicates dropped, first occurrence wins), else the profile table.
pub fn resolve_toolset(profile: ScanProfile, tools: Option<&[ToolName]>) -> Vec<ToolName> {
    match tools {
        Some(requested) => requested.iter().fold(Vec::new(), |mut acc, tool| {
            if !acc.contains(tool) {
                acc.push(*tool);
            }
            acc
        }),
        None => profile.default_tools().to_vec(),
    }
}

/// Runs the adapters of one session. Findings go into the store the caller
/// hands to each run.
pub struct Orchestrator {
    adapters: Adapters,
    availability: AvailabilityMap,
    events: Option<UnboundedSender<ScanEvent>>,
    span: Span,
}

impl Orchestrator {
    pub fn new(adapters: Adapters, availability: AvailabilityMap, ctx: &ScanContext) -> Self {
        Self {
            adapters,
            availability,
            events: None,
            span: ctx.component("orchestrator"),
        }
    }

    /// Builds the adapters from `config` and probes tool availability.
    pub async fn connect(config: &VulnxConfig, ctx: &ScanContext) -> Result<Self> {
        let adapters = Adapters::new(config, ctx)?;
        let availability = AvailabilityProber::new(config, &adapters.zap, ctx).probe().await;
        Ok(Self::new(adapters, availability, ctx))
    }

    /// Returns a receiver for progress events of subsequent scans.
    pub fn subscribe(&mut self) -> UnboundedReceiver<ScanEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    fn emit(&self, event: ScanEvent) {
        if let Some(tx) = &self.events {
            // A closed receiver only means nobody is watching anymore.
            let _ = tx.send(event);
        }
    }

    /// Validates `raw_target`, runs every usable tool in toolset order and
    /// returns the run summary. Only an invalid target is an error; tool
    /// failures end up in `store` as findings.
    ///
    /// `findings_count` covers only what this run appended, so a store that
    /// is reused across runs never inflates the summary.
    pub async fn run_scan(
        &self,
        store: &FindingStore,
        raw_target: &str,
        profile: ScanProfile,
        tools: Option<&[ToolName]>,
        options: &ScanOptions,
    ) -> Result<ScanResult> {
        let target = target::validate(raw_target)?;
        let span = self.span.clone();

        async {
            info!(url = %target.url(), kind = ?target.kind(), %profile, "Starting {} scan for {}", profile, target.url());

            let requested = resolve_toolset(profile, tools);
            let (available, unavailable) = self.availability.partition(&requested);
            if !unavailable.is_empty() {
                let names: Vec<&str> = unavailable.iter().map(|t| t.label()).collect();
                warn!("Unavailable tools skipped: {}", names.join(", "));
                for tool in unavailable {
                    self.emit(ScanEvent::ToolSkipped { tool, reason: SkipReason::Unavailable });
                }
            }

            let mut runnable = Vec::with_capacity(available.len());
            for tool in available {
                if tool == ToolName::DynamicAppScanner && profile == ScanProfile::Quick {
                    warn!(%tool, "ZAP only runs with the deep or full profile, skipping.");
                    self.emit(ScanEvent::ToolSkipped { tool, reason: SkipReason::ProfileTooLight });
                } else {
                    runnable.push(tool);
                }
            }

            self.emit(ScanEvent::Started {
                target: target.url().to_string(),
                profile,
                tools: runnable.clone(),
            });

            let mut total = 0;
            for tool in &runnable {
                self.emit(ScanEvent::ToolStarted { tool: *tool });
                let findings = self.adapters.run(*tool, &target, profile, options).await;
                let count = findings.len();
                total += count;
                store.extend(findings);
                info!(tool = %tool, findings = count, "Tool finished.");
                self.emit(ScanEvent::ToolFinished { tool: *tool, findings: count });
            }

            let result = ScanResult {
                status: ScanStatus::Completed,
                findings_count: total,
                target: target.url().to_string(),
                profile,
                tools_used: runnable,
                timestamp: Utc::now(),
            };
            info!(findings = result.findings_count, "Scan completed.");
            self.emit(ScanEvent::Completed(result.clone()));
            Ok(result)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toolset_defaults_to_profile_table() {
        for profile in [ScanProfile::Quick, ScanProfile::Deep, ScanProfile::Full] {
            assert_eq!(resolve_toolset(profile, None), profile.default_tools());
        }
    }

    #[test]
    fn override_replaces_profile_and_drops_duplicates() {
        let requested = [ToolName::EndpointFuzzer, ToolName::NetworkMapper, ToolName::EndpointFuzzer];
        assert_eq!(
            resolve_toolset(ScanProfile::Full, Some(&requested)),
            vec![ToolName::EndpointFuzzer, ToolName::NetworkMapper]
        );
    }
}
