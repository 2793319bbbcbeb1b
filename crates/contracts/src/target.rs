//! TargetDefinition - configuration describing one delivery destination

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Destination type tag, resolved through the transport registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Sharded ordered FIFO queue (reference transport)
    FifoQueue,
    /// Append-only NDJSON delivery journal on disk
    File,
    /// Tracing-backed debug destination
    Log,
    /// In-process destination for tests and dry runs
    Memory,
}

/// How multiple records map to transport calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollapseMode {
    /// One message per record (the default)
    #[default]
    None,
    /// Records of a block collapsed into a single JSON envelope
    Json,
}

/// One delivery destination plus its routing and addressing rules
///
/// Read-only during dispatch; supplied by the configuration collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDefinition {
    /// Unique identifier within the source
    pub id: String,

    /// Destination type
    pub kind: TargetKind,

    /// Event types this target subscribes to
    pub event_types: HashSet<String>,

    /// Number of physical shards (sharded destinations only)
    #[serde(default)]
    pub shard_count: Option<u32>,

    /// Destination region, substituted into the address template
    #[serde(default)]
    pub region: String,

    /// External account/namespace identifier
    #[serde(default)]
    pub external_id: String,

    /// Base name of the physical destination, suffixed with the shard
    #[serde(default)]
    pub destination_base_name: String,

    /// Record collapse policy
    #[serde(default)]
    pub collapse: CollapseMode,

    /// Allow concurrent block posting for this target
    ///
    /// Ordered destinations must leave this false: cross-block completion
    /// order is unguaranteed once posting is parallel.
    #[serde(default)]
    pub parallel: bool,

    /// Kind-specific parameters (gateway address, base path, ...)
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl TargetDefinition {
    /// Whether this target subscribes to the given event type
    pub fn matches(&self, event_type: &str) -> bool {
        self.event_types.contains(event_type)
    }

    /// Shard count, defaulting to a single shard
    pub fn shards(&self) -> u32 {
        self.shard_count.unwrap_or(1)
    }
}
