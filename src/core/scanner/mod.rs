// src/core/scanner/mod.rs

// One module per external capability, plus the shared subprocess runner.
pub mod fuzzer;
pub mod nikto_scanner;
pub mod nmap_scanner;
pub mod process;
pub mod sqlmap_scanner;
pub mod zap_scanner;

use crate::core::config::{ScanOptions, VulnxConfig};
use crate::core::context::ScanContext;
use crate::core::error::Result;
use crate::core::models::{Finding, ScanProfile, ScanTarget, ToolName};
use std::future::Future;
use std::path::Path;

use self::fuzzer::Fuzzer;
use self::nikto_scanner::NiktoScanner;
use self::nmap_scanner::NmapScanner;
use self::sqlmap_scanner::SqlmapScanner;
use self::zap_scanner::ZapScanner;

/// Contract shared by every tool adapter.
///
/// `run` is fail-soft: it never returns an error. Anything that goes wrong
/// inside the adapter comes back as a single Info "Scan failed" finding.
pub trait ToolAdapter {
    fn tool(&self) -> ToolName;

    fn run(
        &self,
        target: &ScanTarget,
        profile: ScanProfile,
        options: &ScanOptions,
    ) -> impl Future<Output = Vec<Finding>> + Send;
}

/// The five adapters of a session, dispatched by [`ToolName`].
pub struct Adapters {
    pub nmap: NmapScanner,
    pub nikto: NiktoScanner,
    pub sqlmap: SqlmapScanner,
    pub zap: ZapScanner,
    pub fuzzer: Fuzzer,
}

impl Adapters {
    pub fn new(config: &VulnxConfig, ctx: &ScanContext) -> Result<Self> {
        Ok(Self {
            nmap: NmapScanner::new(&config.commands.nmap, ctx),
            nikto: NiktoScanner::new(&config.commands.nikto, ctx),
            sqlmap: SqlmapScanner::new(&config.commands.sqlmap, ctx),
            zap: ZapScanner::new(&config.zap, ctx)?,
            fuzzer: Fuzzer::new(&config.fuzzer, ctx)?,
        })
    }

    pub async fn run(&self, tool: ToolName, target: &ScanTarget, profile: ScanProfile, options: &ScanOptions) -> Vec<Finding> {
        match tool {
            ToolName::NetworkMapper => self.nmap.run(target, profile, options).await,
            ToolName::WebServerScanner => self.nikto.run(target, profile, options).await,
            ToolName::SqlInjectionTester => self.sqlmap.run(target, profile, options).await,
            ToolName::DynamicAppScanner => self.zap.run(target, profile, options).await,
            ToolName::EndpointFuzzer => self.fuzzer.run(target, profile, options).await,
        }
    }
}

/// Executable backing a process-based tool; `None` for the HTTP-driven ones.
pub fn executable_for(config: &VulnxConfig, tool: ToolName) -> Option<&Path> {
    match tool {
        ToolName::NetworkMapper => Some(config.commands.nmap.as_path()),
        ToolName::WebServerScanner => Some(config.commands.nikto.as_path()),
        ToolName::SqlInjectionTester => Some(config.commands.sqlmap.as_path()),
        ToolName::DynamicAppScanner | ToolName::EndpointFuzzer => None,
    }
}
