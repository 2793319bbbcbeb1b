//! RecordTransformer trait - transformation collaborator interface
//!
//! Invoked once per target, after routing and before packing.

use crate::{ContractError, EventRecord, TargetDefinition};

/// Payload transformation between source and destination formats
#[trait_variant::make(RecordTransformer: Send)]
pub trait LocalRecordTransformer {
    /// Transform a target's routed records.
    ///
    /// # Errors
    /// A failure here is fatal for that target, not for its siblings.
    async fn transform(
        &self,
        records: Vec<EventRecord>,
        target: &TargetDefinition,
    ) -> Result<Vec<EventRecord>, ContractError>;
}

/// Pass-through transformer: destination format equals source format
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransformer;

impl RecordTransformer for IdentityTransformer {
    async fn transform(
        &self,
        records: Vec<EventRecord>,
        _target: &TargetDefinition,
    ) -> Result<Vec<EventRecord>, ContractError> {
        Ok(records)
    }
}
