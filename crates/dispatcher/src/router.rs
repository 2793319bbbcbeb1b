//! Target router - event-type based record-to-target assignment

use contracts::{EventRecord, TargetDefinition};

/// First target whose event-type filter contains `event_type`, else `None`.
///
/// Two targets of one source matching the same event type is a
/// configuration error caught at load time; the router never arbitrates.
pub fn match_target<'a>(
    targets: &'a [TargetDefinition],
    event_type: &str,
) -> Option<&'a TargetDefinition> {
    targets.iter().find(|target| target.matches(event_type))
}

/// One source's records partitioned across its targets
#[derive(Debug, Default)]
pub struct RoutedBatch {
    /// Per-target record lists, in target-list order, matched targets only.
    /// Record order within each list follows the input batch.
    pub per_target: Vec<(TargetDefinition, Vec<EventRecord>)>,

    /// Records that matched no target filter (skipped, counted upstream)
    pub skipped: Vec<EventRecord>,
}

/// Assign each record to at most one target, first-match-wins.
pub fn route_records(targets: &[TargetDefinition], records: Vec<EventRecord>) -> RoutedBatch {
    let mut buckets: Vec<Vec<EventRecord>> = targets.iter().map(|_| Vec::new()).collect();
    let mut skipped = Vec::new();

    for record in records {
        match targets.iter().position(|t| t.matches(&record.event_type)) {
            Some(index) => buckets[index].push(record),
            None => skipped.push(record),
        }
    }

    let per_target = targets
        .iter()
        .zip(buckets)
        .filter(|(_, bucket)| !bucket.is_empty())
        .map(|(target, bucket)| (target.clone(), bucket))
        .collect();

    RoutedBatch { per_target, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use contracts::{CollapseMode, TargetKind};
    use std::collections::HashMap;

    fn target(id: &str, event_types: &[&str]) -> TargetDefinition {
        TargetDefinition {
            id: id.into(),
            kind: TargetKind::Memory,
            event_types: event_types.iter().map(|s| s.to_string()).collect(),
            shard_count: None,
            region: String::new(),
            external_id: String::new(),
            destination_base_name: String::new(),
            collapse: CollapseMode::None,
            parallel: false,
            params: HashMap::new(),
        }
    }

    fn record(event_id: &str, event_type: &str) -> EventRecord {
        EventRecord {
            source_id: "src".into(),
            partition_key: "pk".into(),
            event_id: event_id.into(),
            event_type: event_type.into(),
            payload: Bytes::from_static(b"{}"),
        }
    }

    #[test]
    fn test_match_first_wins() {
        let targets = vec![target("a", &["x"]), target("b", &["y"])];
        assert_eq!(match_target(&targets, "y").unwrap().id, "b");
        assert!(match_target(&targets, "z").is_none());
    }

    #[test]
    fn test_route_exclusive_assignment() {
        // overlapping filters: first target claims the shared type
        let targets = vec![target("a", &["x", "y"]), target("b", &["y"])];
        let records = vec![record("1", "y"), record("2", "y")];
        let routed = route_records(&targets, records);
        assert_eq!(routed.per_target.len(), 1);
        assert_eq!(routed.per_target[0].0.id, "a");
        assert_eq!(routed.per_target[0].1.len(), 2);
        assert!(routed.skipped.is_empty());
    }

    #[test]
    fn test_route_preserves_order_per_target() {
        let targets = vec![target("a", &["x"]), target("b", &["y"])];
        let records = vec![
            record("1", "x"),
            record("2", "y"),
            record("3", "x"),
            record("4", "y"),
        ];
        let routed = route_records(&targets, records);
        let ids: Vec<_> = routed.per_target[0].1.iter().map(|r| r.event_id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
        let ids: Vec<_> = routed.per_target[1].1.iter().map(|r| r.event_id.as_str()).collect();
        assert_eq!(ids, ["2", "4"]);
    }

    #[test]
    fn test_unmatched_records_skipped() {
        let targets = vec![target("a", &["x"])];
        let routed = route_records(&targets, vec![record("1", "z"), record("2", "x")]);
        assert_eq!(routed.skipped.len(), 1);
        assert_eq!(routed.skipped[0].event_id, "1");
        assert_eq!(routed.per_target.len(), 1);
    }

    #[test]
    fn test_route_with_no_targets() {
        let routed = route_records(&[], vec![record("1", "x")]);
        assert!(routed.per_target.is_empty());
        assert_eq!(routed.skipped.len(), 1);
    }
}
