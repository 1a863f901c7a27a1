// src/core/store.rs

use crate::core::models::{Finding, Severity};
use std::sync::{Mutex, MutexGuard};

/// Append-only, insertion-ordered collection of findings for one run.
///
/// Appends go through a single mutex so the store can be shared (`Arc`) with
/// concurrent writers, even though the orchestrator itself appends from one task.
#[derive(Debug, Default)]
pub struct FindingStore {
    findings: Mutex<Vec<Finding>>,
}

impl FindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Finding>> {
        // A panic while holding the lock cannot leave a half-pushed Vec behind.
        self.findings.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add(&self, finding: Finding) {
        self.guard().push(finding);
    }

    /// Appends a batch atomically, keeping its internal order.
    pub fn extend(&self, findings: impl IntoIterator<Item = Finding>) {
        let batch: Vec<Finding> = findings.into_iter().collect();
        self.guard().extend(batch);
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    /// Copy of the current contents in insertion order.
    pub fn snapshot(&self) -> Vec<Finding> {
        self.guard().clone()
    }

    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.guard().iter().filter(|f| f.severity == severity).count()
    }

    pub fn clear(&self) {
        self.guard().clear();
    }
}
