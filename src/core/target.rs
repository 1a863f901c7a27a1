// src/core/target.rs

use crate::core::error::{Result, VulnxError};
use crate::core::models::{ScanTarget, TargetKind};
use std::net::IpAddr;
use tracing::{debug, warn};
use url::Url;

/// Normalizes raw user input into a [`ScanTarget`].
///
/// IP literals become `http://<ip>`; anything else gets an `http://` prefix
/// unless it already carries `http://` or `https://`, and must then parse as
/// a URL with a host. No network access happens here.
pub fn validate(raw: &str) -> Result<ScanTarget> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(VulnxError::InvalidTarget("Target cannot be empty".to_string()));
    }

    if let Ok(ip) = trimmed.parse::<IpAddr>() {
        debug!(%ip, "Target is an IP literal.");
        if ip.is_ipv6() {
            // `http://<v6>` has no brackets; only host-based tools can use it.
            warn!(%ip, "IPv6 target URL is not fetchable, HTTP-based tools will find nothing.");
        }
        return Ok(ScanTarget::new(TargetKind::Ip, format!("http://{trimmed}"), ip.to_string()));
    }

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let parsed = Url::parse(&candidate)
        .map_err(|e| VulnxError::InvalidTarget(format!("{trimmed}: {e}")))?;
    let host = match parsed.host_str() {
        Some(h) if !h.is_empty() => h.trim_start_matches('[').trim_end_matches(']').to_string(),
        _ => return Err(VulnxError::InvalidTarget(format!("{trimmed}: missing host"))),
    };

    debug!(url = %candidate, %host, "Target normalized.");
    Ok(ScanTarget::new(TargetKind::Url, candidate, host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_literal_becomes_http_ip_target() {
        let target = validate("192.168.1.1").unwrap();
        assert_eq!(target.kind(), TargetKind::Ip);
        assert_eq!(target.url(), "http://192.168.1.1");
        assert_eq!(target.host(), "192.168.1.1");
    }

    #[test]
    fn ipv6_literal_becomes_http_ip_target() {
        for literal in ["::1", "fe80::1", "2001:db8::42"] {
            let target = validate(literal).unwrap();
            assert_eq!(target.kind(), TargetKind::Ip);
            assert_eq!(target.url(), format!("http://{literal}"));
            assert_eq!(target.host(), literal);
        }
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let target = validate("  10.0.0.7 \n").unwrap();
        assert_eq!(target.url(), "http://10.0.0.7");
    }

    #[test]
    fn existing_scheme_is_preserved() {
        assert_eq!(validate("https://example.com/app").unwrap().url(), "https://example.com/app");
        assert_eq!(validate("http://example.com").unwrap().url(), "http://example.com");
    }

    #[test]
    fn bare_host_gets_http_prefix() {
        let target = validate("example.com:8443").unwrap();
        assert_eq!(target.kind(), TargetKind::Url);
        assert_eq!(target.url(), "http://example.com:8443");
        assert_eq!(target.host(), "example.com");
    }

    #[test]
    fn empty_and_blank_inputs_are_rejected() {
        for raw in ["", "   ", "\t\n"] {
            assert!(matches!(validate(raw), Err(VulnxError::InvalidTarget(_))));
        }
    }

    #[test]
    fn unparsable_host_is_rejected() {
        assert!(matches!(validate("http://"), Err(VulnxError::InvalidTarget(_))));
        assert!(matches!(validate("exa mple.com"), Err(VulnxError::InvalidTarget(_))));
    }
}
