//! TransportLimits - declared packing constraints of a destination type

use serde::{Deserialize, Serialize};

use crate::{CollapseMode, EventRecord};

/// Packing constraints a destination type declares for its `send` calls
///
/// The batch packer guarantees every emitted block satisfies these; the
/// engine never hands a transport an over-limit block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransportLimits {
    /// Maximum records per block
    pub max_records: usize,

    /// Maximum packed block size in bytes
    pub max_size: usize,

    /// Maximum footprint of a single record; larger records are dropped
    pub max_unit_size: usize,

    /// Whether the partition key is transmitted with each record
    pub include_key: bool,

    /// Fixed per-block envelope overhead in bytes
    pub list_overhead: usize,

    /// Per-record envelope overhead in bytes
    pub record_overhead: usize,

    /// Separator overhead between consecutive records in a block
    pub inter_record_overhead: usize,
}

impl TransportLimits {
    /// Transmitted size of a record: payload plus key when the transport
    /// carries it.
    pub fn record_size(&self, record: &EventRecord) -> usize {
        record.size() + if self.include_key { record.partition_key.len() } else { 0 }
    }

    /// Standalone footprint used for the oversize filter.
    pub fn unit_footprint(&self, record: &EventRecord) -> usize {
        self.record_size(record) + self.list_overhead + self.record_overhead
    }

    /// Incremental footprint of appending a record to a block.
    pub fn increment(&self, record: &EventRecord, block_is_empty: bool) -> usize {
        self.record_size(record)
            + self.record_overhead
            + if block_is_empty { 0 } else { self.inter_record_overhead }
    }

    /// Limits with `max_records` clamped for the target's collapse mode:
    /// one record per block unless records are collapsed into one message.
    pub fn for_collapse(mut self, collapse: CollapseMode) -> Self {
        if collapse == CollapseMode::None {
            self.max_records = 1;
        }
        self
    }
}
