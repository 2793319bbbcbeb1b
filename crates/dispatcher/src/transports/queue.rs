//! FifoQueue transport - sharded ordered queue destination (reference)
//!
//! Delivers each record as one message to a queue-gateway endpoint over UDP.
//! The queue address combines the target's addressing fields with the shard
//! of the record's partition key; ordering-group and deduplication tokens
//! are intrinsic to the record so caller-level retries stay deduplicable.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::{debug, instrument};

use contracts::{
    Block, CollapseMode, ContractError, QueueService, ServiceDefinition, TargetDefinition,
    TargetKind, TransportLimits,
};

use crate::router::match_target;
use crate::shard::shard_for_key;

/// Default address template; `{region}` is substituted per target
const DEFAULT_ADDRESS_TEMPLATE: &str = "https://queue.{region}.example.com";

/// Gateway envelope carried by each datagram
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueMessage {
    /// Fully resolved destination queue address
    pub queue_url: String,

    /// Ordering-group token (the record's partition key)
    pub group_id: String,

    /// Deduplication token (the record's intrinsic event id)
    pub dedup_id: String,

    /// Message body
    pub body: Bytes,
}

/// Envelope serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    /// JSON (human-readable, larger)
    #[default]
    Json,
    /// Bincode (binary, compact)
    Bincode,
}

impl WireFormat {
    fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        match params.get("format").map(String::as_str) {
            Some("bincode") => Ok(Self::Bincode),
            Some("json") | None => Ok(Self::Json),
            Some(other) => Err(format!("unknown format '{other}'")),
        }
    }
}

/// Service definition for the sharded FIFO queue destination type
#[derive(Debug, Default)]
pub struct FifoQueueDefinition;

impl FifoQueueDefinition {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ServiceDefinition for FifoQueueDefinition {
    fn kind(&self) -> TargetKind {
        TargetKind::FifoQueue
    }

    fn limits(&self) -> TransportLimits {
        TransportLimits {
            max_records: usize::MAX,
            max_size: 256 * 1024,
            max_unit_size: 256 * 1024,
            include_key: false,
            // collapsed bodies are wrapped in {"Records":[...]}
            list_overhead: 14,
            record_overhead: 0,
            // records are comma separated
            inter_record_overhead: 1,
        }
    }

    #[instrument(name = "fifo_queue_acquire", skip(self, target), fields(target = %target.id))]
    async fn acquire(
        &self,
        target: &TargetDefinition,
    ) -> Result<Box<dyn QueueService>, ContractError> {
        let addr: SocketAddr = target
            .params
            .get("gateway_addr")
            .ok_or_else(|| {
                ContractError::transport_connection(&target.id, "missing 'gateway_addr' parameter")
            })?
            .parse()
            .map_err(|e| {
                ContractError::transport_connection(&target.id, format!("invalid gateway_addr: {e}"))
            })?;

        let format = WireFormat::from_params(&target.params)
            .map_err(|e| ContractError::transport_connection(&target.id, e))?;

        let address_template = target
            .params
            .get("address_template")
            .cloned()
            .unwrap_or_else(|| DEFAULT_ADDRESS_TEMPLATE.to_string());

        // Bind to any available port
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| ContractError::transport_connection(&target.id, e.to_string()))?;
        socket
            .connect(addr)
            .await
            .map_err(|e| ContractError::transport_connection(&target.id, e.to_string()))?;

        debug!(target = %target.id, gateway = %addr, "FifoQueue gateway connected");

        Ok(Box::new(FifoQueueService {
            name: target.id.clone(),
            socket: Some(socket),
            format,
            address_template,
        }))
    }
}

/// Live FIFO queue instance, bound to one target's gateway endpoint
pub struct FifoQueueService {
    name: String,
    socket: Option<UdpSocket>,
    format: WireFormat,
    address_template: String,
}

impl FifoQueueService {
    fn socket(&self) -> Result<&UdpSocket, ContractError> {
        self.socket
            .as_ref()
            .ok_or_else(|| ContractError::transport_send(&self.name, "gateway not connected"))
    }

    /// Resolved queue address for one shard of a target
    fn queue_url(&self, target: &TargetDefinition, shard: u32) -> String {
        let base = self.address_template.replace("{region}", &target.region);
        format!(
            "{base}/{}/{}_{shard}.fifo",
            target.external_id, target.destination_base_name
        )
    }

    fn serialize(&self, message: &QueueMessage) -> Result<Vec<u8>, ContractError> {
        match self.format {
            WireFormat::Json => serde_json::to_vec(message)
                .map_err(|e| ContractError::transport_send(&self.name, format!("json error: {e}"))),
            WireFormat::Bincode => bincode::serialize(message).map_err(|e| {
                ContractError::transport_send(&self.name, format!("bincode error: {e}"))
            }),
        }
    }

    async fn transmit(&self, message: &QueueMessage) -> Result<(), ContractError> {
        let data = self.serialize(message)?;
        self.socket()?
            .send(&data)
            .await
            .map_err(|e| ContractError::transport_send(&self.name, e.to_string()))?;
        debug!(
            service = %self.name,
            queue = %message.queue_url,
            group = %message.group_id,
            bytes = data.len(),
            "Sent"
        );
        Ok(())
    }

    /// Collapse a block's payloads into a single `{"Records":[...]}` body.
    /// The packer's overhead model guarantees the result stays within
    /// `max_size`.
    fn collapsed_body(block: &Block) -> Bytes {
        let mut body = Vec::with_capacity(block.packed_size);
        body.extend_from_slice(b"{\"Records\":[");
        for (i, record) in block.records.iter().enumerate() {
            if i > 0 {
                body.push(b',');
            }
            body.extend_from_slice(&record.payload);
        }
        body.extend_from_slice(b"]}");
        Bytes::from(body)
    }
}

#[async_trait]
impl QueueService for FifoQueueService {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "fifo_queue_send",
        skip(self, targets, block),
        fields(service = %self.name, records = block.len())
    )]
    async fn send(&self, targets: &[TargetDefinition], block: &Block) -> Result<(), ContractError> {
        let first = block
            .records
            .first()
            .ok_or_else(|| ContractError::transport_send(&self.name, "empty block"))?;
        let target =
            match_target(targets, &first.event_type).ok_or_else(|| ContractError::NoMatchingTarget {
                event_id: first.event_id.clone(),
                event_type: first.event_type.clone(),
            })?;

        match target.collapse {
            CollapseMode::Json => {
                let shard = shard_for_key(&first.partition_key, target.shards())?;
                self.transmit(&QueueMessage {
                    queue_url: self.queue_url(target, shard),
                    group_id: first.partition_key.clone(),
                    dedup_id: first.event_id.clone(),
                    body: Self::collapsed_body(block),
                })
                .await
            }
            CollapseMode::None => {
                // one message per record
                for record in &block.records {
                    let shard = shard_for_key(&record.partition_key, target.shards())?;
                    self.transmit(&QueueMessage {
                        queue_url: self.queue_url(target, shard),
                        group_id: record.partition_key.clone(),
                        dedup_id: record.event_id.clone(),
                        body: record.payload.clone(),
                    })
                    .await?;
                }
                Ok(())
            }
        }
    }

    #[instrument(name = "fifo_queue_dispose", skip(self))]
    async fn dispose(&mut self) -> Result<(), ContractError> {
        self.socket = None;
        debug!(service = %self.name, "FifoQueue gateway disconnected");
        Ok(())
    }
}
