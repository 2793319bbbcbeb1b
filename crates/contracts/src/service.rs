//! Capability contract - the interface every destination type implements
//!
//! A `ServiceDefinition` describes one destination *type* (its packing
//! limits and how to acquire a live instance); a `QueueService` is one live
//! instance, owned by a single dispatch scope and disposed exactly once.

use async_trait::async_trait;

use crate::{Block, ContractError, TargetDefinition, TargetKind, TransportLimits};

/// A live transport instance bound to one target.
///
/// `send` must be safe to call concurrently for disjoint blocks on the same
/// instance; `dispose` is called exactly once, after all sends completed.
#[async_trait]
pub trait QueueService: Send + Sync {
    /// Instance name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Deliver one block.
    ///
    /// Receives the source's full resolved target list; destination-specific
    /// behavior (addressing, envelopes, dedup tokens) lives here.
    async fn send(&self, targets: &[TargetDefinition], block: &Block) -> Result<(), ContractError>;

    /// Release transport resources
    async fn dispose(&mut self) -> Result<(), ContractError>;
}

/// Capability descriptor and factory for one destination type
#[async_trait]
pub trait ServiceDefinition: Send + Sync {
    /// The type tag this definition serves
    fn kind(&self) -> TargetKind;

    /// Declared packing constraints
    fn limits(&self) -> TransportLimits;

    /// Acquire a live instance for one target.
    ///
    /// # Errors
    /// Initialization failure is fatal for that target's dispatch only.
    async fn acquire(&self, target: &TargetDefinition)
        -> Result<Box<dyn QueueService>, ContractError>;
}
