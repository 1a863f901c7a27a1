// src/core/config.rs

use std::path::PathBuf;
use std::time::Duration;

/// Executables used by the process-based adapters.
#[derive(Debug, Clone)]
pub struct ToolCommands {
    pub nmap: PathBuf,
    pub nikto: PathBuf,
    pub sqlmap: PathBuf,
}

impl Default for ToolCommands {
    fn default() -> Self {
        Self {
            nmap: PathBuf::from("nmap"),
            nikto: PathBuf::from("nikto"),
            sqlmap: PathBuf::from("sqlmap"),
        }
    }
}

/// Connection and polling parameters for the ZAP control API.
#[derive(Debug, Clone)]
pub struct ZapConfig {
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
    pub spider_poll: Duration,
    pub scan_poll: Duration,
    pub request_timeout: Duration,
}

impl ZapConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for ZapConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            api_key: None,
            spider_poll: Duration::from_secs(5),
            scan_poll: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FuzzerConfig {
    pub request_timeout: Duration,
    /// Pause each worker takes before issuing a request.
    pub delay: Duration,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            delay: Duration::ZERO,
        }
    }
}

/// Per-run knobs passed to every adapter.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Fuzzer worker pool size.
    pub threads: usize,
    /// Replaces the built-in fuzzer wordlist when set.
    pub wordlist: Option<Vec<String>>,
    /// Overrides the profile-derived SQLMap level.
    pub sqlmap_level: Option<u8>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            threads: 10,
            wordlist: None,
            sqlmap_level: None,
        }
    }
}

/// Everything needed to build the adapter set for a session.
#[derive(Debug, Clone, Default)]
pub struct VulnxConfig {
    pub commands: ToolCommands,
    pub zap: ZapConfig,
    pub fuzzer: FuzzerConfig,
}
