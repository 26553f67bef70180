//! Compliance status rule
//!
//! The synchronizer in the backend is the only writer of an establishment's
//! compliance status; the decision itself lives here so it can be tested
//! without a database.

use serde::{Deserialize, Serialize};

use crate::models::{ComplianceStatus, ViolationSeverity};

/// Which violation severities block compliance while unresolved.
///
/// The default matches the regulation: a single unresolved critical
/// violation makes the establishment non-compliant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceRule {
    pub blocking_severities: Vec<ViolationSeverity>,
}

impl Default for ComplianceRule {
    fn default() -> Self {
        Self {
            blocking_severities: vec![ViolationSeverity::Critical],
        }
    }
}

impl ComplianceRule {
    pub fn new(blocking_severities: Vec<ViolationSeverity>) -> Self {
        Self {
            blocking_severities,
        }
    }

    pub fn is_blocking(&self, severity: ViolationSeverity) -> bool {
        self.blocking_severities.contains(&severity)
    }

    /// Status for an establishment given the severities of its unresolved
    /// violations. Idempotent by construction.
    pub fn status_for(&self, unresolved: &[ViolationSeverity]) -> ComplianceStatus {
        if unresolved.iter().any(|s| self.is_blocking(*s)) {
            ComplianceStatus::NonCompliant
        } else {
            ComplianceStatus::Compliant
        }
    }
}
