//! Arrival-order accumulation of coordinator findings.

use std::path::Path;

use tracing::debug;

use goblin_core::{Finding, Interest};

/// Collects findings in canonical order: interest order, then file order,
/// then finding order as received.
///
/// No deduplication or filtering happens here; the coordinator is
/// authoritative on finding identity.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    findings: Vec<Finding>,
}

impl ResultAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the findings returned for one file under one interest.
    pub fn append(&mut self, interest: &Interest, path: &Path, findings: Vec<Finding>) {
        if !findings.is_empty() {
            debug!(
                tag = %interest.tag,
                path = %path.display(),
                count = findings.len(),
                "recording findings"
            );
        }
        self.findings.extend(findings);
    }

    /// Number of findings accumulated so far.
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Whether anything has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Consume the aggregator and return the accumulated findings.
    ///
    /// Taking `self` by value makes this callable exactly once.
    pub fn finalize(self) -> Vec<Finding> {
        self.findings
    }
}
