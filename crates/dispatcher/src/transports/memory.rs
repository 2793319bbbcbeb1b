//! Memory transport - in-process destination for tests and dry runs
//!
//! Delivered messages land in a shared store the caller can inspect. The
//! `fail_event_types` target param injects send failures for matching
//! records, for exercising partial-failure paths.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::debug;

use contracts::{
    Block, ContractError, QueueService, ServiceDefinition, TargetDefinition, TargetKind,
    TransportLimits,
};

use crate::router::match_target;
use crate::shard::shard_for_key;
use crate::transports::QueueMessage;

/// Shared delivered-message store, cloned into every acquired instance
pub type SharedDeliveries = Arc<Mutex<Vec<QueueMessage>>>;

/// Service definition for the in-process destination type
#[derive(Debug, Default)]
pub struct MemoryQueueDefinition {
    delivered: SharedDeliveries,
}

impl MemoryQueueDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the shared store for post-run inspection
    pub fn deliveries(&self) -> SharedDeliveries {
        Arc::clone(&self.delivered)
    }
}

#[async_trait]
impl ServiceDefinition for MemoryQueueDefinition {
    fn kind(&self) -> TargetKind {
        TargetKind::Memory
    }

    fn limits(&self) -> TransportLimits {
        TransportLimits {
            max_records: 100,
            max_size: 1024 * 1024,
            max_unit_size: 256 * 1024,
            include_key: false,
            list_overhead: 14,
            record_overhead: 0,
            inter_record_overhead: 1,
        }
    }

    async fn acquire(
        &self,
        target: &TargetDefinition,
    ) -> Result<Box<dyn QueueService>, ContractError> {
        let fail_event_types = target
            .params
            .get("fail_event_types")
            .map(|csv| csv.split(',').map(str::trim).map(String::from).collect())
            .unwrap_or_default();

        Ok(Box::new(MemoryQueueService {
            name: target.id.clone(),
            delivered: Arc::clone(&self.delivered),
            fail_event_types,
        }))
    }
}

/// Live in-process instance for one target
pub struct MemoryQueueService {
    name: String,
    delivered: SharedDeliveries,
    fail_event_types: HashSet<String>,
}

#[async_trait]
impl QueueService for MemoryQueueService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, targets: &[TargetDefinition], block: &Block) -> Result<(), ContractError> {
        for record in &block.records {
            let target = match_target(targets, &record.event_type).ok_or_else(|| {
                ContractError::NoMatchingTarget {
                    event_id: record.event_id.clone(),
                    event_type: record.event_type.clone(),
                }
            })?;

            if self.fail_event_types.contains(&record.event_type) {
                return Err(ContractError::transport_send(
                    &self.name,
                    format!("injected failure for event type '{}'", record.event_type),
                ));
            }

            let shard = shard_for_key(&record.partition_key, target.shards())?;
            let destination = if target.destination_base_name.is_empty() {
                target.id.clone()
            } else {
                format!("{}_{shard}", target.destination_base_name)
            };

            self.delivered.lock().expect("deliveries poisoned").push(QueueMessage {
                queue_url: destination,
                group_id: record.partition_key.clone(),
                dedup_id: record.event_id.clone(),
                body: record.payload.clone(),
            });
        }
        Ok(())
    }

    async fn dispose(&mut self) -> Result<(), ContractError> {
        debug!(service = %self.name, "MemoryQueue disposed");
        Ok(())
    }
}
