//! Batch packer - first-fit linear bin packing under transport limits

use contracts::{Block, ContractError, EventRecord, TargetDefinition, TransportLimits};
use tracing::warn;

/// Packer output: emitted blocks plus records dropped by the unit filter
#[derive(Debug, Default)]
pub struct PackedBatch {
    /// Blocks, each independently within the target's limits
    pub blocks: Vec<Block>,

    /// Oversized records with their `RecordTooLarge` errors, input order
    pub dropped: Vec<(EventRecord, ContractError)>,
}

/// Pack a target's records into delivery blocks.
///
/// Single pass, order-preserving: a block closes when the next record would
/// exceed `max_size` or the block already holds `max_records`. Records whose
/// standalone footprint exceeds `max_unit_size` are dropped up front, one
/// error each, never silently lost.
pub fn pack(
    records: Vec<EventRecord>,
    limits: &TransportLimits,
    target: &TargetDefinition,
) -> PackedBatch {
    let mut packed = PackedBatch::default();
    let mut block = Block {
        records: Vec::new(),
        packed_size: limits.list_overhead,
    };

    for record in records {
        if limits.unit_footprint(&record) > limits.max_unit_size {
            warn!(
                target_id = %target.id,
                event_id = %record.event_id,
                size = limits.unit_footprint(&record),
                max = limits.max_unit_size,
                "Record too large, dropped"
            );
            let error = ContractError::RecordTooLarge {
                event_id: record.event_id.clone(),
                target_id: target.id.clone(),
                size: limits.unit_footprint(&record),
                max_unit_size: limits.max_unit_size,
            };
            packed.dropped.push((record, error));
            continue;
        }

        let increment = limits.increment(&record, block.is_empty());
        if !block.is_empty()
            && (block.packed_size + increment > limits.max_size || block.len() >= limits.max_records)
        {
            packed.blocks.push(std::mem::replace(
                &mut block,
                Block {
                    records: Vec::new(),
                    packed_size: limits.list_overhead,
                },
            ));
        }

        // recompute: the increment differs if the block was just closed
        block.packed_size += limits.increment(&record, block.is_empty());
        block.records.push(record);
    }

    if !block.is_empty() {
        packed.blocks.push(block);
    }

    packed
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use contracts::{CollapseMode, TargetKind};
    use std::collections::HashMap;

    fn target() -> TargetDefinition {
        TargetDefinition {
            id: "tgt".into(),
            kind: TargetKind::Memory,
            event_types: ["x".to_string()].into_iter().collect(),
            shard_count: None,
            region: String::new(),
            external_id: String::new(),
            destination_base_name: String::new(),
            collapse: CollapseMode::Json,
            parallel: false,
            params: HashMap::new(),
        }
    }

    fn record(event_id: &str, payload_len: usize) -> EventRecord {
        EventRecord {
            source_id: "src".into(),
            partition_key: "pk".into(),
            event_id: event_id.into(),
            event_type: "x".into(),
            payload: Bytes::from(vec![b'a'; payload_len]),
        }
    }

    fn limits(max_records: usize, max_size: usize, max_unit_size: usize) -> TransportLimits {
        TransportLimits {
            max_records,
            max_size,
            max_unit_size,
            include_key: false,
            list_overhead: 10,
            record_overhead: 0,
            inter_record_overhead: 5,
        }
    }

    #[test]
    fn test_pack_worked_example() {
        // sizes [100, 100, 50]: first two fill to 215 <= 220, third overflows
        let records = vec![record("1", 100), record("2", 100), record("3", 50)];
        let packed = pack(records, &limits(100, 220, 1000), &target());
        assert!(packed.dropped.is_empty());
        assert_eq!(packed.blocks.len(), 2);
        assert_eq!(packed.blocks[0].len(), 2);
        assert_eq!(packed.blocks[0].packed_size, 215);
        assert_eq!(packed.blocks[1].len(), 1);
        assert_eq!(packed.blocks[1].packed_size, 60);
    }

    #[test]
    fn test_pack_respects_max_records() {
        let records = (0..5).map(|i| record(&i.to_string(), 1)).collect();
        let packed = pack(records, &limits(2, 10_000, 1000), &target());
        let sizes: Vec<_> = packed.blocks.iter().map(Block::len).collect();
        assert_eq!(sizes, [2, 2, 1]);
    }

    #[test]
    fn test_oversized_record_dropped_not_packed() {
        let records = vec![record("big", 500), record("ok", 10)];
        let packed = pack(records, &limits(10, 1000, 100), &target());
        assert_eq!(packed.dropped.len(), 1);
        assert_eq!(packed.dropped[0].0.event_id, "big");
        assert!(matches!(
            packed.dropped[0].1,
            ContractError::RecordTooLarge { .. }
        ));
        assert_eq!(packed.blocks.len(), 1);
        assert_eq!(packed.blocks[0].records[0].event_id, "ok");
    }

    #[test]
    fn test_pack_reconstructs_input() {
        let records: Vec<_> = (0..20).map(|i| record(&i.to_string(), 30)).collect();
        let packed = pack(records.clone(), &limits(3, 100, 1000), &target());
        let repacked: Vec<_> = packed
            .blocks
            .iter()
            .flat_map(|b| b.records.iter())
            .chain(packed.dropped.iter().map(|(r, _)| r))
            .map(|r| r.event_id.clone())
            .collect();
        let original: Vec<_> = records.iter().map(|r| r.event_id.clone()).collect();
        assert_eq!(repacked, original);
    }

    #[test]
    fn test_every_block_within_limits() {
        let l = limits(4, 120, 1000);
        let records: Vec<_> = (0..30).map(|i| record(&i.to_string(), 25)).collect();
        let packed = pack(records, &l, &target());
        for block in &packed.blocks {
            assert!(block.len() <= l.max_records);
            assert!(block.packed_size <= l.max_size);
        }
    }

    #[test]
    fn test_include_key_counts_toward_footprint() {
        let mut l = limits(10, 1000, 40);
        l.include_key = true;
        // payload 25 + key 2 + list 10 + record 0 = 37 <= 40 passes
        // payload 30 + key 2 + overheads = 42 > 40 drops
        let mut small = record("small", 25);
        small.partition_key = "pk".into();
        let mut big = record("big", 30);
        big.partition_key = "pk".into();
        let packed = pack(vec![small, big], &l, &target());
        assert_eq!(packed.blocks.len(), 1);
        assert_eq!(packed.dropped.len(), 1);
    }

    #[test]
    fn test_empty_input_no_blocks() {
        let packed = pack(Vec::new(), &limits(10, 100, 100), &target());
        assert!(packed.blocks.is_empty());
        assert!(packed.dropped.is_empty());
    }

    #[test]
    fn test_single_record_per_block_when_collapse_none() {
        let l = limits(10, 10_000, 1000).for_collapse(CollapseMode::None);
        let records = (0..3).map(|i| record(&i.to_string(), 10)).collect();
        let packed = pack(records, &l, &target());
        assert_eq!(packed.blocks.len(), 3);
        assert!(packed.blocks.iter().all(|b| b.len() == 1));
    }
}
