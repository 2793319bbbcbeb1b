//! # Integration Tests
//!
//! End-to-end tests over the full fan-out pipeline:
//! - routing config -> store -> coordinator -> transports
//! - partial failure isolation
//! - end-to-end ordering and sharding

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use config_loader::{ConfigFormat, ConfigLoader, StaticTargetStore};
    use contracts::{EventRecord, IdentityTransformer, NoopStats};
    use dispatcher::{
        CoordinatorConfig, FanoutCoordinator, MemoryQueueDefinition, TransportRegistry,
    };
    use observability::DispatchStatsAggregator;

    const ROUTING_TOML: &str = r#"
[[sources]]
source_id = "orders-stream"

[[sources.targets]]
id = "orders-mem"
kind = "memory"
event_types = ["order_created", "order_updated"]
shard_count = 2
destination_base_name = "orders"

[[sources]]
source_id = "audit-stream"

[[sources.targets]]
id = "audit-mem"
kind = "memory"
event_types = ["audit"]
"#;

    fn record(source: &str, partition_key: &str, event_id: &str, event_type: &str) -> EventRecord {
        EventRecord {
            source_id: source.into(),
            partition_key: partition_key.into(),
            event_id: event_id.into(),
            event_type: event_type.into(),
            payload: Bytes::from_static(b"{\"amount\":10}"),
        }
    }

    fn build_coordinator(
        toml: &str,
    ) -> (
        FanoutCoordinator<IdentityTransformer>,
        dispatcher::transports::SharedDeliveries,
    ) {
        let table = ConfigLoader::load_from_str(toml, ConfigFormat::Toml).unwrap();
        let store = Arc::new(StaticTargetStore::new(&table));

        let memory = MemoryQueueDefinition::new();
        let deliveries = memory.deliveries();
        let mut registry = TransportRegistry::builtin();
        registry.register(Arc::new(memory));

        let coordinator = FanoutCoordinator::new(
            Arc::new(registry),
            store,
            IdentityTransformer,
            Arc::new(NoopStats),
            CoordinatorConfig::default(),
        );
        (coordinator, deliveries)
    }

    /// End-to-end: routing config -> store -> coordinator -> memory transport
    #[tokio::test]
    async fn test_e2e_fan_out_two_sources() {
        let (coordinator, deliveries) = build_coordinator(ROUTING_TOML);

        let batch = vec![
            record("orders-stream", "user-1001", "evt-1", "order_created"),
            record("audit-stream", "user-1001", "evt-2", "audit"),
            record("orders-stream", "user-1002", "evt-3", "order_updated"),
            // unknown event type: skipped, not an error
            record("orders-stream", "user-1003", "evt-4", "order_archived"),
            // unknown source: no-op success
            record("ghost-stream", "user-1004", "evt-5", "order_created"),
        ];

        let report = coordinator.handle(batch).await.unwrap();
        assert!(report.is_success());
        assert_eq!(report.record_count(), 5);
        assert_eq!(report.records_delivered(), 3);
        assert_eq!(report.records_skipped(), 1);

        let delivered = deliveries.lock().unwrap();
        assert_eq!(delivered.len(), 3);
        // sharded destination names come from the base name + shard
        assert!(delivered
            .iter()
            .any(|message| message.queue_url.starts_with("orders_")));
        // dedup tokens are the intrinsic event ids
        let mut dedup_ids: Vec<_> = delivered.iter().map(|m| m.dedup_id.clone()).collect();
        dedup_ids.sort();
        assert_eq!(dedup_ids, ["evt-1", "evt-2", "evt-3"]);
    }

    /// A failing target leaves sibling targets and sources untouched
    #[tokio::test]
    async fn test_e2e_partial_failure_isolation() {
        const FLAKY_TOML: &str = r#"
[[sources]]
source_id = "orders-stream"

[[sources.targets]]
id = "flaky-mem"
kind = "memory"
event_types = ["order_created"]

[sources.targets.params]
fail_event_types = "order_created"

[[sources.targets]]
id = "steady-mem"
kind = "memory"
event_types = ["order_updated"]

[[sources]]
source_id = "audit-stream"

[[sources.targets]]
id = "audit-mem"
kind = "memory"
event_types = ["audit"]
"#;
        let (coordinator, deliveries) = build_coordinator(FLAKY_TOML);

        let batch = vec![
            record("orders-stream", "user-1", "evt-1", "order_created"),
            record("orders-stream", "user-2", "evt-2", "order_updated"),
            record("audit-stream", "user-3", "evt-3", "audit"),
        ];

        let err = coordinator.handle(batch).await.unwrap_err();
        let report = err.report().unwrap();

        // exactly one failure, everything else delivered
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.records_delivered(), 2);
        assert_eq!(deliveries.lock().unwrap().len(), 2);

        let mut aggregator = DispatchStatsAggregator::new();
        aggregator.update(report);
        let summary = aggregator.summary();
        assert_eq!(summary.failed_batches, 1);
        assert_eq!(summary.delivered, 2);
    }

    /// With serial posting, one ordering group's records arrive in order
    #[tokio::test]
    async fn test_e2e_ordering_preserved() {
        let (coordinator, deliveries) = build_coordinator(ROUTING_TOML);

        let batch: Vec<_> = (0..25)
            .map(|i| {
                record(
                    "orders-stream",
                    "user-42",
                    &format!("evt-{i:03}"),
                    "order_created",
                )
            })
            .collect();

        let report = coordinator.handle(batch).await.unwrap();
        assert!(report.is_success());

        let delivered = deliveries.lock().unwrap();
        let ids: Vec<_> = delivered.iter().map(|m| m.dedup_id.clone()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted, "records completed out of order");
    }
}

#[cfg(test)]
mod file_transport_tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use config_loader::{ConfigFormat, ConfigLoader, StaticTargetStore};
    use contracts::{EventRecord, IdentityTransformer, NoopStats};
    use dispatcher::{CoordinatorConfig, FanoutCoordinator, TransportRegistry};
    use tempfile::tempdir;

    /// End-to-end through the file transport: per-shard journals on disk
    #[tokio::test]
    async fn test_e2e_file_journal_sharding() {
        let dir = tempdir().unwrap();
        let toml = format!(
            r#"
[[sources]]
source_id = "orders-stream"

[[sources.targets]]
id = "orders-journal"
kind = "file"
event_types = ["order_created"]
shard_count = 2
destination_base_name = "orders"

[sources.targets.params]
base_path = "{}"
"#,
            dir.path().display()
        );

        let table = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        let coordinator = FanoutCoordinator::new(
            Arc::new(TransportRegistry::builtin()),
            Arc::new(StaticTargetStore::new(&table)),
            IdentityTransformer,
            Arc::new(NoopStats),
            CoordinatorConfig::default(),
        );

        let batch = vec![
            // person-3422 -> shard 0, person-3423 -> shard 1
            EventRecord {
                source_id: "orders-stream".into(),
                partition_key: "person-3422".into(),
                event_id: "evt-1".into(),
                event_type: "order_created".into(),
                payload: Bytes::from_static(b"{\"n\":1}"),
            },
            EventRecord {
                source_id: "orders-stream".into(),
                partition_key: "person-3423".into(),
                event_id: "evt-2".into(),
                event_type: "order_created".into(),
                payload: Bytes::from_static(b"{\"n\":2}"),
            },
        ];

        let report = coordinator.handle(batch).await.unwrap();
        assert!(report.is_success());
        assert_eq!(report.blocks_sent(), 2);

        let shard0 = std::fs::read_to_string(dir.path().join("orders_0.ndjson")).unwrap();
        let shard1 = std::fs::read_to_string(dir.path().join("orders_1.ndjson")).unwrap();
        assert!(shard0.contains("evt-1"));
        assert!(shard1.contains("evt-2"));
    }
}
