//! RoutingTable - Config Loader output
//!
//! The full routing configuration: every source and its targets.

use serde::{Deserialize, Serialize};

use crate::TargetDefinition;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingTable {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Source subscriptions, target order within a source is significant
    /// (first-match-wins routing)
    pub sources: Vec<SourceRoute>,
}

/// One source's registered targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRoute {
    /// Stream source identifier
    pub source_id: String,

    /// Targets subscribed to this source
    #[serde(default)]
    pub targets: Vec<TargetDefinition>,
}

impl RoutingTable {
    /// Targets registered for a source, empty when the source is unknown
    pub fn targets_for(&self, source_id: &str) -> &[TargetDefinition] {
        self.sources
            .iter()
            .find(|route| route.source_id == source_id)
            .map(|route| route.targets.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of targets across all sources
    pub fn target_count(&self) -> usize {
        self.sources.iter().map(|route| route.targets.len()).sum()
    }
}
