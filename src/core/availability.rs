// src/core/availability.rs

use crate::core::config::VulnxConfig;
use crate::core::context::ScanContext;
use crate::core::models::{AvailabilityMap, ToolName};
use crate::core::scanner::zap_scanner::ZapScanner;
use crate::core::scanner::executable_for;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use tracing::{Instrument, Span, info, warn};

/// Resolves `program` the way a shell would: explicit paths are checked
/// directly, bare names are searched on `PATH`.
pub fn find_executable(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 {
        return is_executable(program).then(|| program.to_path_buf());
    }
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

/// Decides once per session which tools can actually run.
pub struct AvailabilityProber<'a> {
    config: &'a VulnxConfig,
    zap: &'a ZapScanner,
    span: Span,
}

impl<'a> AvailabilityProber<'a> {
    pub fn new(config: &'a VulnxConfig, zap: &'a ZapScanner, ctx: &ScanContext) -> Self {
        Self { config, zap, span: ctx.component("availability") }
    }

    /// Never fails: a missing tool is recorded as `false` and logged.
    pub async fn probe(&self) -> AvailabilityMap {
        async {
            let mut entries = Vec::new();
            for tool in ToolName::iter() {
                let available = match tool {
                    ToolName::DynamicAppScanner => self.zap.is_accessible().await,
                    ToolName::EndpointFuzzer => true,
                    _ => executable_for(self.config, tool).and_then(find_executable).is_some(),
                };
                if available {
                    info!(%tool, "Tool {} is available", tool.label());
                } else {
                    warn!(%tool, "Tool {} is not available", tool.label());
                }
                entries.push((tool, available));
            }
            let map: AvailabilityMap = entries.into_iter().collect();
            let usable = map.iter().filter(|(_, available)| *available).count();
            info!(usable, "Availability probe finished.");
            map
        }
        .instrument(self.span.clone())
        .await
    }
}
