//! TargetStore trait - configuration collaborator interface

use async_trait::async_trait;

use crate::{ContractError, TargetDefinition};

/// Supplies target definitions per source.
///
/// A lookup failure is fatal for that source only; an unknown source yields
/// an empty list (nothing to fan out to), not an error.
#[async_trait]
pub trait TargetStore: Send + Sync {
    /// All targets registered under a source, in configuration order
    ///
    /// # Errors
    /// Returns lookup error (should include context)
    async fn lookup_targets(&self, source_id: &str) -> Result<Vec<TargetDefinition>, ContractError>;
}
