//! StaticTargetStore - in-memory TargetStore over a loaded routing table

use async_trait::async_trait;
use std::collections::HashMap;

use contracts::{ContractError, RoutingTable, TargetDefinition, TargetStore};

/// TargetStore backed by a routing table loaded at startup.
///
/// Lookups never fail; an unknown source simply has nothing to fan out to.
pub struct StaticTargetStore {
    targets_by_source: HashMap<String, Vec<TargetDefinition>>,
}

impl StaticTargetStore {
    /// Build the lookup index from a validated routing table
    pub fn new(table: &RoutingTable) -> Self {
        let targets_by_source = table
            .sources
            .iter()
            .map(|route| (route.source_id.clone(), route.targets.clone()))
            .collect();
        Self { targets_by_source }
    }

    /// Number of sources with registered targets
    pub fn source_count(&self) -> usize {
        self.targets_by_source.len()
    }
}

#[async_trait]
impl TargetStore for StaticTargetStore {
    async fn lookup_targets(&self, source_id: &str) -> Result<Vec<TargetDefinition>, ContractError> {
        Ok(self
            .targets_by_source
            .get(source_id)
            .cloned()
            .unwrap_or_default())
    }
}
