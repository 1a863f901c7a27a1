// tests/zap_test.rs

use serde_json::json;
use std::time::Duration;
use vulnx::core::config::{ScanOptions, ZapConfig};
use vulnx::core::context::ScanContext;
use vulnx::core::models::{ScanProfile, Severity, ToolName};
use vulnx::core::scanner::ToolAdapter;
use vulnx::core::scanner::zap_scanner::{DEFAULT_POLICY, ZapScanner};
use vulnx::core::target;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_config() -> ZapConfig {
    ZapConfig {
        api_key: Some("s3cret".to_string()),
        spider_poll: Duration::from_millis(10),
        scan_poll: Duration::from_millis(10),
        request_timeout: Duration::from_secs(5),
        ..ZapConfig::default()
    }
}

fn zap(server: &MockServer) -> ZapScanner {
    ZapScanner::new(&fast_config(), &ScanContext::new("test"))
        .unwrap()
        .with_base_url(server.uri())
}

async fn mount_json(server: &MockServer, endpoint: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .and(query_param("apikey", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_common(server: &MockServer) {
    mount_json(server, "/JSON/core/view/version/", json!({"version": "2.14.0"})).await;
    mount_json(server, "/JSON/spider/action/scan/", json!({"scan": "1"})).await;
    mount_json(server, "/JSON/spider/view/status/", json!({"status": "100"})).await;
    mount_json(server, "/JSON/ascan/action/scan/", json!({"scan": "7"})).await;
    mount_json(
        server,
        "/JSON/alert/view/alerts/",
        json!({"alerts": [
            {"alert": "SQL Injection", "risk": "High", "url": "http://example.com/?id=1", "param": "id", "cweid": "89"},
            {"alert": "X-Frame-Options Header Not Set", "risk": "Medium"},
            {"alert": "", "risk": "Informational"}
        ]}),
    )
    .await;
}

#[tokio::test]
async fn full_protocol_maps_alerts() {
    let server = MockServer::start().await;
    mount_common(&server).await;
    mount_json(&server, "/JSON/ascan/view/status/", json!({"status": "100"})).await;

    let findings = zap(&server)
        .scan("http://example.com", DEFAULT_POLICY, Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(findings.len(), 3);
    assert!(findings.iter().all(|f| f.tool == ToolName::DynamicAppScanner));
    assert_eq!(findings[0].severity, Severity::High);
    assert_eq!(findings[0].details["parameter"], "id");
    assert_eq!(findings[0].details["cwe_id"], "89");
    assert_eq!(findings[1].severity, Severity::Medium);
    assert_eq!(findings[2].severity, Severity::Info);
    assert_eq!(findings[2].description, "Unknown alert");
}

#[tokio::test]
async fn stalled_active_scan_is_truncated_but_alerts_are_kept() {
    let server = MockServer::start().await;
    mount_common(&server).await;
    mount_json(&server, "/JSON/ascan/view/status/", json!({"status": "40"})).await;

    let findings = zap(&server)
        .scan("http://example.com", DEFAULT_POLICY, Duration::from_millis(100))
        .await
        .unwrap();
    assert_eq!(findings.len(), 3);
}

#[tokio::test]
async fn version_and_accessibility() {
    let server = MockServer::start().await;
    mount_json(&server, "/JSON/core/view/version/", json!({"version": "2.14.0"})).await;

    let scanner = zap(&server);
    assert_eq!(scanner.version().await.unwrap(), "2.14.0");
    assert!(scanner.is_accessible().await);
}

#[tokio::test]
async fn unreachable_daemon_is_reported_as_single_finding() {
    let scanner = ZapScanner::new(&fast_config(), &ScanContext::new("test"))
        .unwrap()
        .with_base_url("http://127.0.0.1:9");
    assert!(!scanner.is_accessible().await);

    let target = target::validate("http://example.com").unwrap();
    let findings = scanner.run(&target, ScanProfile::Deep, &ScanOptions::default()).await;

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Info);
    assert!(findings[0].description.starts_with("Scan failed: ZAP API connection failed"));
    assert_eq!(findings[0].details["type"], "scan_error");
}

#[tokio::test]
async fn quick_profile_does_not_contact_zap() {
    let server = MockServer::start().await;
    let target = target::validate("http://example.com").unwrap();

    let findings = zap(&server).run(&target, ScanProfile::Quick, &ScanOptions::default()).await;
    assert!(findings.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_spider_status_fails_instead_of_polling_forever() {
    let server = MockServer::start().await;
    mount_json(&server, "/JSON/core/view/version/", json!({"version": "2.14.0"})).await;
    mount_json(&server, "/JSON/spider/action/scan/", json!({"scan": "1"})).await;
    mount_json(&server, "/JSON/spider/view/status/", json!({"status": "does_not_exist"})).await;

    let scanner = zap(&server);
    let scan = scanner.scan("http://example.com", DEFAULT_POLICY, Duration::from_secs(5));
    let err = tokio::time::timeout(Duration::from_secs(3), scan)
        .await
        .expect("scan kept polling")
        .unwrap_err();
    assert!(err.to_string().contains("does_not_exist"), "{err}");

    let target = target::validate("http://example.com").unwrap();
    let findings = scanner.run(&target, ScanProfile::Deep, &ScanOptions::default()).await;
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Info);
    assert_eq!(findings[0].details["type"], "scan_error");
}

#[tokio::test]
async fn missing_status_field_is_an_error() {
    let server = MockServer::start().await;
    mount_json(&server, "/JSON/core/view/version/", json!({"version": "2.14.0"})).await;
    mount_json(&server, "/JSON/spider/action/scan/", json!({"scan": "1"})).await;
    mount_json(&server, "/JSON/spider/view/status/", json!({})).await;

    let client = zap(&server);
    let scan = client.scan("http://example.com", DEFAULT_POLICY, Duration::from_secs(5));
    let result = tokio::time::timeout(Duration::from_secs(3), scan).await.expect("scan kept polling");
    assert!(result.is_err());
}
