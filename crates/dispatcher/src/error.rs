//! Dispatcher error types

use thiserror::Error;

use contracts::{ContractError, DispatchReport};

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// At least one constituent of the invocation failed; the report
    /// enumerates every per-source/per-target error. Nothing is retried.
    #[error("dispatch finished with {} failure(s) across {} source(s)", report.error_count(), report.sources.len())]
    Aggregate { report: DispatchReport },

    /// Contract-level error outside any dispatch scope
    #[error("contract error: {0}")]
    Contract(#[from] ContractError),
}

impl DispatcherError {
    /// The dispatch report, when this error carries one
    pub fn report(&self) -> Option<&DispatchReport> {
        match self {
            Self::Aggregate { report } => Some(report),
            Self::Contract(_) => None,
        }
    }
}
