//! Log transport - logs deliveries via tracing (debug destination)

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use contracts::{
    Block, ContractError, QueueService, ServiceDefinition, TargetDefinition, TargetKind,
    TransportLimits,
};

/// Service definition for the logging destination type
#[derive(Debug, Default)]
pub struct LogQueueDefinition;

impl LogQueueDefinition {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ServiceDefinition for LogQueueDefinition {
    fn kind(&self) -> TargetKind {
        TargetKind::Log
    }

    fn limits(&self) -> TransportLimits {
        TransportLimits {
            max_records: 100,
            max_size: 1024 * 1024,
            max_unit_size: 1024 * 1024,
            include_key: false,
            list_overhead: 0,
            record_overhead: 0,
            inter_record_overhead: 0,
        }
    }

    async fn acquire(
        &self,
        target: &TargetDefinition,
    ) -> Result<Box<dyn QueueService>, ContractError> {
        Ok(Box::new(LogQueueService {
            name: target.id.clone(),
        }))
    }
}

/// Terminal destination that logs each delivered record
pub struct LogQueueService {
    name: String,
}

#[async_trait]
impl QueueService for LogQueueService {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_queue_send",
        skip(self, _targets, block),
        fields(service = %self.name, records = block.len())
    )]
    async fn send(&self, _targets: &[TargetDefinition], block: &Block) -> Result<(), ContractError> {
        for record in &block.records {
            info!(
                service = %self.name,
                event_id = %record.event_id,
                event_type = %record.event_type,
                group = %record.partition_key,
                bytes = record.size(),
                "Record delivered"
            );
        }
        Ok(())
    }

    #[instrument(name = "log_queue_dispose", skip(self))]
    async fn dispose(&mut self) -> Result<(), ContractError> {
        debug!(service = %self.name, "LogQueue closed");
        Ok(())
    }
}
