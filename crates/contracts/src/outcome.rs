//! Dispatch outcomes - per-target, per-source, and whole-invocation results
//!
//! Failures are scoped to the smallest unit and never abort siblings; these
//! structures carry every collected error upward for diagnostics.

use crate::ContractError;

/// Result of one target's dispatch within one source
#[derive(Debug, Default)]
pub struct TargetOutcome {
    /// Target identifier
    pub target_id: String,

    /// Blocks delivered successfully
    pub blocks_sent: usize,

    /// Blocks whose send failed
    pub blocks_failed: usize,

    /// Records delivered in successful blocks
    pub records_delivered: usize,

    /// Records dropped at packing (unit size exceeded)
    pub records_dropped: usize,

    /// Collected errors: drops, block failures, or one fatal target error
    pub errors: Vec<ContractError>,
}

impl TargetOutcome {
    /// Create an empty outcome for a target
    pub fn new(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            ..Default::default()
        }
    }

    /// Outcome that failed before any block was attempted
    pub fn fatal(target_id: impl Into<String>, error: ContractError) -> Self {
        Self {
            target_id: target_id.into(),
            errors: vec![error],
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Result of one source's fan-out
#[derive(Debug, Default)]
pub struct SourceOutcome {
    /// Source identifier
    pub source_id: String,

    /// Records ingested for this source
    pub records: usize,

    /// Records that matched no target filter (skipped, non-fatal)
    pub records_skipped: usize,

    /// Per-target outcomes
    pub targets: Vec<TargetOutcome>,

    /// Source-fatal error (target lookup failure), if any
    pub error: Option<ContractError>,
}

impl SourceOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.targets.iter().all(TargetOutcome::is_success)
    }

    /// Number of constituent errors under this source
    pub fn error_count(&self) -> usize {
        self.error.iter().count() + self.targets.iter().map(|t| t.errors.len()).sum::<usize>()
    }
}

/// Aggregated result of one `handle` invocation
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Per-source outcomes, in input batch order
    pub sources: Vec<SourceOutcome>,
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        self.sources.iter().all(SourceOutcome::is_success)
    }

    /// Total constituent errors across all sources
    pub fn error_count(&self) -> usize {
        self.sources.iter().map(SourceOutcome::error_count).sum()
    }

    /// Total records across all sources
    pub fn record_count(&self) -> usize {
        self.sources.iter().map(|s| s.records).sum()
    }

    /// Total records delivered in successful blocks
    pub fn records_delivered(&self) -> usize {
        self.sources
            .iter()
            .flat_map(|s| s.targets.iter())
            .map(|t| t.records_delivered)
            .sum()
    }

    /// Total records skipped by routing
    pub fn records_skipped(&self) -> usize {
        self.sources.iter().map(|s| s.records_skipped).sum()
    }

    /// Total records dropped at packing
    pub fn records_dropped(&self) -> usize {
        self.sources
            .iter()
            .flat_map(|s| s.targets.iter())
            .map(|t| t.records_dropped)
            .sum()
    }

    /// Total blocks delivered
    pub fn blocks_sent(&self) -> usize {
        self.sources
            .iter()
            .flat_map(|s| s.targets.iter())
            .map(|t| t.blocks_sent)
            .sum()
    }

    /// Iterate every collected error with its source and target context
    pub fn iter_errors(&self) -> impl Iterator<Item = (&str, Option<&str>, &ContractError)> {
        self.sources.iter().flat_map(|source| {
            let source_fatal = source
                .error
                .iter()
                .map(move |e| (source.source_id.as_str(), None, e));
            let target_errors = source.targets.iter().flat_map(move |target| {
                target
                    .errors
                    .iter()
                    .map(move |e| (source.source_id.as_str(), Some(target.target_id.as_str()), e))
            });
            source_fatal.chain(target_errors)
        })
    }
}
