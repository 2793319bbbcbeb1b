//! EventRecord - one unit pulled from an ordered stream source

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A single record pulled from an event-stream source.
///
/// Immutable once ingested; the engine never mutates payloads, only the
/// transformation collaborator may replace records wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Identifier of the stream source this record was pulled from
    pub source_id: String,

    /// Partition/ordering key within the source
    pub partition_key: String,

    /// Intrinsic event identifier (used as deduplication token downstream)
    pub event_id: String,

    /// Event type, matched against target filters
    pub event_type: String,

    /// Opaque payload bytes
    pub payload: Bytes,
}

impl EventRecord {
    /// Payload size in bytes
    pub fn size(&self) -> usize {
        self.payload.len()
    }
}
