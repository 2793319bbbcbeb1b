//! File transport - append-only NDJSON delivery journal
//!
//! Writes one journal line per delivered record into a per-shard file under
//! the configured base path. Useful for auditing and offline replay of what
//! would have been sent.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, instrument};

use contracts::{
    Block, ContractError, EventRecord, QueueService, ServiceDefinition, TargetDefinition,
    TargetKind, TransportLimits,
};

use crate::router::match_target;
use crate::shard::shard_for_key;

/// Configuration for the file destination
#[derive(Debug, Clone)]
pub struct FileQueueConfig {
    /// Base output directory
    pub base_path: PathBuf,
}

impl FileQueueConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let base_path = params
            .get("base_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./deliveries"));

        Self { base_path }
    }
}

/// One journal line
#[derive(Debug, Serialize)]
struct JournalEntry<'a> {
    delivered_at: String,
    destination: &'a str,
    group_id: &'a str,
    dedup_id: &'a str,
    body: String,
}

/// Service definition for the file journal destination type
#[derive(Debug, Default)]
pub struct FileQueueDefinition;

impl FileQueueDefinition {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ServiceDefinition for FileQueueDefinition {
    fn kind(&self) -> TargetKind {
        TargetKind::File
    }

    fn limits(&self) -> TransportLimits {
        TransportLimits {
            max_records: 500,
            max_size: 4 * 1024 * 1024,
            max_unit_size: 1024 * 1024,
            include_key: false,
            list_overhead: 0,
            record_overhead: 0,
            // newline separated
            inter_record_overhead: 1,
        }
    }

    async fn acquire(
        &self,
        target: &TargetDefinition,
    ) -> Result<Box<dyn QueueService>, ContractError> {
        let config = FileQueueConfig::from_params(&target.params);
        std::fs::create_dir_all(&config.base_path)
            .map_err(|e| ContractError::transport_connection(&target.id, e.to_string()))?;

        Ok(Box::new(FileQueueService {
            name: target.id.clone(),
            config,
        }))
    }
}

/// Live file journal instance for one target
pub struct FileQueueService {
    name: String,
    config: FileQueueConfig,
}

impl FileQueueService {
    fn journal_path(&self, target: &TargetDefinition, shard: u32) -> PathBuf {
        let base_name = if target.destination_base_name.is_empty() {
            target.id.as_str()
        } else {
            target.destination_base_name.as_str()
        };
        self.config.base_path.join(format!("{base_name}_{shard}.ndjson"))
    }

    fn append_record(
        &self,
        target: &TargetDefinition,
        record: &EventRecord,
    ) -> Result<(), ContractError> {
        let shard = shard_for_key(&record.partition_key, target.shards())?;
        let path = self.journal_path(target, shard);

        let entry = JournalEntry {
            delivered_at: chrono::Utc::now().to_rfc3339(),
            destination: path.file_stem().and_then(|s| s.to_str()).unwrap_or(&target.id),
            group_id: &record.partition_key,
            dedup_id: &record.event_id,
            body: String::from_utf8_lossy(&record.payload).into_owned(),
        };
        let line = serde_json::to_string(&entry)
            .map_err(|e| ContractError::transport_send(&self.name, e.to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| ContractError::transport_send(&self.name, e.to_string()))?;
        writeln!(file, "{line}")
            .map_err(|e| ContractError::transport_send(&self.name, e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl QueueService for FileQueueService {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_queue_send",
        skip(self, targets, block),
        fields(service = %self.name, records = block.len())
    )]
    async fn send(&self, targets: &[TargetDefinition], block: &Block) -> Result<(), ContractError> {
        for record in &block.records {
            let target = match_target(targets, &record.event_type).ok_or_else(|| {
                ContractError::NoMatchingTarget {
                    event_id: record.event_id.clone(),
                    event_type: record.event_type.clone(),
                }
            })?;
            self.append_record(target, record)?;
        }
        Ok(())
    }

    #[instrument(name = "file_queue_dispose", skip(self))]
    async fn dispose(&mut self) -> Result<(), ContractError> {
        debug!(service = %self.name, "FileQueue journal closed");
        Ok(())
    }
}
