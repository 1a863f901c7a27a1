// src/core/error.rs

use crate::core::models::ToolName;
use std::time::Duration;
use thiserror::Error;

/// Every failure the core can produce.
///
/// Only `InvalidTarget` is meant to reach the orchestration caller; adapter
/// variants are caught at the adapter boundary and turned into findings.
#[derive(Debug, Error)]
pub enum VulnxError {
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("{} execution failed: {message}", .tool.label())]
    AdapterExecution { tool: ToolName, message: String },

    #[error("{} scan timed out after {:?}", .tool.label(), .limit)]
    Timeout { tool: ToolName, limit: Duration },

    #[error("ZAP API connection failed: {0}")]
    RemoteService(String),

    #[error("cannot read wordlist: {0}")]
    Wordlist(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<reqwest::Error> for VulnxError {
    fn from(e: reqwest::Error) -> Self {
        VulnxError::RemoteService(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VulnxError>;
