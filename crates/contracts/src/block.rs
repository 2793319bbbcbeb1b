//! Block - a size-bounded group of records sent in one transport call

use serde::{Deserialize, Serialize};

use crate::EventRecord;

/// Ordered subsequence of one target's records, delivered by one `send`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Block {
    /// Records in original stream order
    pub records: Vec<EventRecord>,

    /// Cumulative packed size including envelope overheads
    pub packed_size: usize,
}

impl Block {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
