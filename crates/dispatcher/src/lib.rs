//! # Dispatcher
//!
//! The fan-out dispatch engine.
//!
//! Responsibilities:
//! - Group a batch of records by source and resolve each source's targets
//! - Route records to targets (first-match-wins event-type filters)
//! - Pack routed records into size-bounded blocks
//! - Deliver blocks through pluggable transports under bounded concurrency
//! - Aggregate partial failures without aborting sibling work

pub mod coordinator;
pub mod engine;
pub mod error;
pub mod packer;
pub mod registry;
pub mod router;
pub mod shard;
pub mod transports;

pub use contracts::{
    Block, ContractError, DispatchReport, EventRecord, QueueService, ServiceDefinition,
    TargetDefinition, TargetStore,
};
pub use coordinator::{CoordinatorConfig, FanoutCoordinator};
pub use engine::{dispatch_blocks, BlockFailure};
pub use error::DispatcherError;
pub use packer::{pack, PackedBatch};
pub use registry::TransportRegistry;
pub use router::{match_target, route_records, RoutedBatch};
pub use shard::shard_for_key;
pub use transports::{
    FifoQueueDefinition, FileQueueDefinition, LogQueueDefinition, MemoryQueueDefinition,
};
