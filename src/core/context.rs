// src/core/context.rs

use tracing::{Span, info_span};

/// Logging context for one orchestration session.
///
/// Created once per session and handed to every component constructor. Each
/// component derives its own child span so log lines carry the session and
/// component without any module-level logger.
#[derive(Debug, Clone)]
pub struct ScanContext {
    span: Span,
}

impl ScanContext {
    pub fn new(session: &str) -> Self {
        Self { span: info_span!("session", id = %session) }
    }

    pub fn component(&self, name: &'static str) -> Span {
        info_span!(parent: &self.span, "component", name)
    }
}
