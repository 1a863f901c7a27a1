// tests/orchestrator_test.rs
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use vulnx::core::config::{ScanOptions, ToolCommands, VulnxConfig};
use vulnx::core::context::ScanContext;
use vulnx::core::error::VulnxError;
use vulnx::core::models::{AvailabilityMap, ScanProfile, ScanStatus, Severity, ToolName};
use vulnx::core::orchestrator::{Orchestrator, ScanEvent, SkipReason};
use vulnx::core::scanner::Adapters;
use vulnx::core::scanner::nmap_scanner::NmapScanner;
use vulnx::core::store::FindingStore;

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn silent_config() -> VulnxConfig {
    VulnxConfig {
        commands: ToolCommands {
            nmap: PathBuf::from("true"),
            nikto: PathBuf::from("true"),
            sqlmap: PathBuf::from("true"),
        },
        ..VulnxConfig::default()
    }
}

fn scripted_config(dir: &TempDir) -> VulnxConfig {
    VulnxConfig {
        commands: ToolCommands {
            nmap: script(dir.path(), "nmap", "printf '22/tcp open ssh\\n80/tcp closed http\\nNmap done: 1 IP address\\n'"),
            nikto: script(dir.path(), "nikto", "printf '+ Server: Apache\\n+ /admin/: Directory indexing found.\\n'"),
            sqlmap: script(dir.path(), "sqlmap", "echo 'sqlmap identified the following injection point(s) with a total of 42 HTTP(s) requests:'"),
        },
        ..VulnxConfig::default()
    }
}

fn orchestrator(config: &VulnxConfig, availability: AvailabilityMap) -> (Orchestrator, ScanContext) {
    let ctx = ScanContext::new("test");
    let adapters = Adapters::new(config, &ctx).unwrap();
    (Orchestrator::new(adapters, availability, &ctx), ctx)
}

fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<ScanEvent>) -> Vec<ScanEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn quick_scan_of_silent_tools_completes_with_no_findings() {
    let (orchestrator, _ctx) = orchestrator(&silent_config(), AvailabilityMap::all_available());
    let store = FindingStore::new();
    let result = orchestrator
        .run_scan(&store, "192.168.1.1", ScanProfile::Quick, None, &ScanOptions::default())
        .await
        .unwrap();

    assert_eq!(result.status, ScanStatus::Completed);
    assert_eq!(result.findings_count, 0);
    assert_eq!(result.target, "http://192.168.1.1");
    assert_eq!(result.tools_used, vec![ToolName::NetworkMapper, ToolName::WebServerScanner]);
}

#[tokio::test]
async fn tool_output_lands_in_store_in_tool_order() {
    let dir = tempfile::tempdir().unwrap();
    let (mut orchestrator, _ctx) = orchestrator(&scripted_config(&dir), AvailabilityMap::all_available());
    let mut rx = orchestrator.subscribe();

    let tools = [ToolName::NetworkMapper, ToolName::WebServerScanner, ToolName::SqlInjectionTester];
    let store = FindingStore::new();
    let result = orchestrator
        .run_scan(&store, "http://example.com/?id=1", ScanProfile::Deep, Some(&tools), &ScanOptions::default())
        .await
        .unwrap();

    let findings = store.snapshot();
    assert_eq!(result.findings_count, 3);
    assert_eq!(findings.len(), 3);
    assert_eq!(findings[0].description, "Open port: 22 - ssh");
    assert_eq!(findings[1].severity, Severity::Medium);
    assert_eq!(findings[1].description, "/admin/: Directory indexing found.");
    assert_eq!(findings[2].severity, Severity::High);
    assert_eq!(findings[2].details["level"], "2");

    let events = drain(&mut rx);
    assert!(matches!(events.first(), Some(ScanEvent::Started { tools, .. }) if tools.len() == 3));
    assert!(matches!(events.last(), Some(ScanEvent::Completed(r)) if r.findings_count == 3));
}

#[tokio::test]
async fn timed_out_tool_yields_one_finding_and_scan_continues() {
    let dir = tempfile::tempdir().unwrap();
    let config = silent_config();
    let (orchestrator, _ctx) = {
        let ctx = ScanContext::new("test");
        let mut adapters = Adapters::new(&config, &ctx).unwrap();
        adapters.nmap = NmapScanner::new(script(dir.path(), "nmap", "sleep 5"), &ctx)
            .with_timeout(Duration::from_millis(200));
        (Orchestrator::new(adapters, AvailabilityMap::all_available(), &ctx), ctx)
    };

    let store = FindingStore::new();
    let result = orchestrator
        .run_scan(&store, "192.168.1.1", ScanProfile::Quick, None, &ScanOptions::default())
        .await
        .unwrap();

    let findings = store.snapshot();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].tool, ToolName::NetworkMapper);
    assert_eq!(findings[0].severity, Severity::Info);
    assert!(findings[0].description.contains("timed out"), "{}", findings[0].description);
    assert_eq!(result.tools_used, vec![ToolName::NetworkMapper, ToolName::WebServerScanner]);
    assert_eq!(result.status, ScanStatus::Completed);
}

#[tokio::test]
async fn unavailable_tools_are_skipped_not_failed() {
    let availability: AvailabilityMap = [
        (ToolName::NetworkMapper, true),
        (ToolName::WebServerScanner, true),
        (ToolName::SqlInjectionTester, false),
        (ToolName::DynamicAppScanner, false),
        (ToolName::EndpointFuzzer, true),
    ]
    .into_iter()
    .collect();
    let (mut orchestrator, _ctx) = orchestrator(&silent_config(), availability);
    let mut rx = orchestrator.subscribe();

    let tools = [ToolName::SqlInjectionTester, ToolName::NetworkMapper];
    let store = FindingStore::new();
    let result = orchestrator
        .run_scan(&store, "example.com", ScanProfile::Deep, Some(&tools), &ScanOptions::default())
        .await
        .unwrap();

    assert_eq!(result.status, ScanStatus::Completed);
    assert_eq!(result.tools_used, vec![ToolName::NetworkMapper]);
    let events = drain(&mut rx);
    assert!(events.contains(&ScanEvent::ToolSkipped {
        tool: ToolName::SqlInjectionTester,
        reason: SkipReason::Unavailable,
    }));
}

#[tokio::test]
async fn zap_is_not_run_under_quick_profile() {
    let (mut orchestrator, _ctx) = orchestrator(&silent_config(), AvailabilityMap::all_available());
    let mut rx = orchestrator.subscribe();

    let tools = [ToolName::DynamicAppScanner];
    let store = FindingStore::new();
    let result = orchestrator
        .run_scan(&store, "example.com", ScanProfile::Quick, Some(&tools), &ScanOptions::default())
        .await
        .unwrap();

    assert!(result.tools_used.is_empty());
    assert_eq!(result.findings_count, 0);
    assert!(drain(&mut rx).contains(&ScanEvent::ToolSkipped {
        tool: ToolName::DynamicAppScanner,
        reason: SkipReason::ProfileTooLight,
    }));
}

#[tokio::test]
async fn invalid_target_is_rejected_before_any_tool_runs() {
    let (mut orchestrator, _ctx) = orchestrator(&silent_config(), AvailabilityMap::all_available());
    let mut rx = orchestrator.subscribe();

    let store = FindingStore::new();
    let err = orchestrator
        .run_scan(&store, "   ", ScanProfile::Quick, None, &ScanOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, VulnxError::InvalidTarget(_)));
    assert!(drain(&mut rx).is_empty());
    assert!(store.is_empty());
}

#[tokio::test]
async fn consecutive_runs_do_not_share_findings() {
    let dir = tempfile::tempdir().unwrap();
    let config = VulnxConfig {
        commands: ToolCommands {
            nmap: script(dir.path(), "nmap", "echo '22/tcp open ssh'"),
            ..silent_config().commands
        },
        ..VulnxConfig::default()
    };
    let (orchestrator, _ctx) = orchestrator(&config, AvailabilityMap::all_available());
    let tools = [ToolName::NetworkMapper];

    let first_store = FindingStore::new();
    let first = orchestrator
        .run_scan(&first_store, "10.0.0.1", ScanProfile::Quick, Some(&tools), &ScanOptions::default())
        .await
        .unwrap();
    let second_store = FindingStore::new();
    let second = orchestrator
        .run_scan(&second_store, "10.0.0.2", ScanProfile::Quick, Some(&tools), &ScanOptions::default())
        .await
        .unwrap();

    assert_eq!(first.findings_count, 1);
    assert_eq!(second.findings_count, 1);
    assert_eq!(first_store.len(), 1);
    assert_eq!(second_store.len(), 1);
}

#[tokio::test]
async fn reused_store_only_counts_findings_of_the_current_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = VulnxConfig {
        commands: ToolCommands {
            nmap: script(dir.path(), "nmap", "echo '22/tcp open ssh'"),
            ..silent_config().commands
        },
        ..VulnxConfig::default()
    };
    let (orchestrator, _ctx) = orchestrator(&config, AvailabilityMap::all_available());
    let tools = [ToolName::NetworkMapper];
    let store = FindingStore::new();

    for _ in 0..2 {
        let result = orchestrator
            .run_scan(&store, "10.0.0.1", ScanProfile::Quick, Some(&tools), &ScanOptions::default())
            .await
            .unwrap();
        assert_eq!(result.findings_count, 1);
    }
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn scan_runs_on_a_spawned_task() {
    let (orchestrator, _ctx) = orchestrator(&silent_config(), AvailabilityMap::all_available());
    let store = std::sync::Arc::new(FindingStore::new());
    let run_store = std::sync::Arc::clone(&store);

    let tools = vec![ToolName::NetworkMapper, ToolName::EndpointFuzzer];
    let options = ScanOptions {
        wordlist: Some(vec!["admin".to_string()]),
        ..ScanOptions::default()
    };
    let handle = tokio::spawn(async move {
        orchestrator
            .run_scan(&run_store, "http://127.0.0.1:9", ScanProfile::Quick, Some(&tools), &options)
            .await
    });

    let result = handle.await.unwrap().unwrap();
    assert_eq!(result.tools_used, vec![ToolName::NetworkMapper, ToolName::EndpointFuzzer]);
    assert_eq!(result.findings_count, 0);
    assert!(store.is_empty());
}
