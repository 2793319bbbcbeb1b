//! Fan-out coordinator - top-level batch orchestration
//!
//! Groups the input batch by source, resolves each source's targets through
//! the configuration collaborator, and drives per-target dispatch under
//! bounded concurrency. Failures scope to the smallest unit (record, block,
//! target, source) and never abort sibling work.

use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use contracts::{
    DispatchReport, EventRecord, RecordTransformer, SourceOutcome, StatsSink, TargetDefinition,
    TargetOutcome, TargetStore,
};

use crate::engine::dispatch_blocks;
use crate::error::DispatcherError;
use crate::packer::pack;
use crate::registry::TransportRegistry;
use crate::router::route_records;

/// Coordinator concurrency bounds
#[derive(Debug, Clone, Copy)]
pub struct CoordinatorConfig {
    /// Sources/targets processed simultaneously
    pub target_concurrency: usize,

    /// Blocks posted simultaneously within one target marked `parallel`;
    /// non-parallel targets always post serially
    pub poster_concurrency: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            target_concurrency: 2,
            poster_concurrency: 1,
        }
    }
}

/// The fan-out coordinator
pub struct FanoutCoordinator<T: RecordTransformer + Sync> {
    registry: Arc<TransportRegistry>,
    store: Arc<dyn TargetStore>,
    transformer: T,
    stats: Arc<dyn StatsSink>,
    config: CoordinatorConfig,
}

impl<T: RecordTransformer + Sync> FanoutCoordinator<T> {
    /// Create a coordinator over explicit collaborators; no process-wide
    /// configuration is consulted.
    pub fn new(
        registry: Arc<TransportRegistry>,
        store: Arc<dyn TargetStore>,
        transformer: T,
        stats: Arc<dyn StatsSink>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            registry,
            store,
            transformer,
            stats,
            config,
        }
    }

    /// Fan out one batch of records.
    ///
    /// Returns `Ok` only when every constituent succeeded; otherwise an
    /// aggregate error carrying the full report. Delivery is never
    /// re-attempted either way.
    #[instrument(name = "coordinator_handle", skip(self, batch), fields(records = batch.len()))]
    pub async fn handle(&self, batch: Vec<EventRecord>) -> Result<DispatchReport, DispatcherError> {
        if batch.is_empty() {
            debug!("Empty batch, nothing to dispatch");
            return Ok(DispatchReport::default());
        }

        let groups = self.group_by_source(batch);
        info!(sources = groups.len(), "Batch grouped");

        let mut outcomes: Vec<(usize, SourceOutcome)> =
            stream::iter(groups.into_iter().enumerate())
                .map(|(index, (source_id, records))| async move {
                    (index, self.process_source(source_id, records).await)
                })
                .buffer_unordered(self.config.target_concurrency.max(1))
                .collect()
                .await;

        // report in input batch order regardless of completion order
        outcomes.sort_by_key(|(index, _)| *index);
        let report = DispatchReport {
            sources: outcomes.into_iter().map(|(_, outcome)| outcome).collect(),
        };

        if report.is_success() {
            info!(
                records = report.record_count(),
                delivered = report.records_delivered(),
                blocks = report.blocks_sent(),
                "Dispatch succeeded"
            );
            Ok(report)
        } else {
            warn!(
                failures = report.error_count(),
                "Dispatch finished with failures"
            );
            Err(DispatcherError::Aggregate { report })
        }
    }

    /// Group records by source id, first-seen source order, record order
    /// preserved within each source.
    fn group_by_source(&self, batch: Vec<EventRecord>) -> Vec<(String, Vec<EventRecord>)> {
        let mut groups: Vec<(String, Vec<EventRecord>)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for record in batch {
            self.stats.record_seen(&record.source_id);
            match positions.get(&record.source_id) {
                Some(&position) => groups[position].1.push(record),
                None => {
                    self.stats.source_seen(&record.source_id);
                    positions.insert(record.source_id.clone(), groups.len());
                    groups.push((record.source_id.clone(), vec![record]));
                }
            }
        }

        groups
    }

    #[instrument(
        name = "coordinator_process_source",
        skip(self, source_id, records),
        fields(source = %source_id, records = records.len())
    )]
    async fn process_source(
        &self,
        source_id: String,
        records: Vec<EventRecord>,
    ) -> SourceOutcome {
        let record_count = records.len();
        let mut outcome = SourceOutcome {
            source_id: source_id.clone(),
            records: record_count,
            ..Default::default()
        };

        let targets = match self.store.lookup_targets(&source_id).await {
            Ok(targets) => targets,
            Err(error) => {
                warn!(source = %source_id, error = %error, "Target lookup failed");
                outcome.error = Some(error);
                return outcome;
            }
        };

        if targets.is_empty() {
            info!(source = %source_id, "No subscribers for this source");
            return outcome;
        }

        let routed = route_records(&targets, records);
        outcome.records_skipped = routed.skipped.len();
        for record in &routed.skipped {
            self.stats.record_skipped(&source_id);
            debug!(
                source = %source_id,
                event_id = %record.event_id,
                event_type = %record.event_type,
                "No matching target, record skipped"
            );
        }

        let targets_ref = targets.as_slice();
        let mut target_outcomes: Vec<(usize, TargetOutcome)> =
            stream::iter(routed.per_target.into_iter().enumerate())
                .map(|(index, (target, routed_records))| async move {
                    (index, self.process_target(targets_ref, target, routed_records).await)
                })
                .buffer_unordered(self.config.target_concurrency.max(1))
                .collect()
                .await;

        target_outcomes.sort_by_key(|(index, _)| *index);
        outcome.targets = target_outcomes
            .into_iter()
            .map(|(_, target_outcome)| target_outcome)
            .collect();
        outcome
    }

    #[instrument(
        name = "coordinator_process_target",
        skip(self, all_targets, target, records),
        fields(target = %target.id, records = records.len())
    )]
    async fn process_target(
        &self,
        all_targets: &[TargetDefinition],
        target: TargetDefinition,
        records: Vec<EventRecord>,
    ) -> TargetOutcome {
        let definition = match self.registry.resolve(target.kind) {
            Ok(definition) => definition,
            Err(error) => {
                warn!(target = %target.id, error = %error, "Unusable destination kind");
                return TargetOutcome::fatal(&target.id, error);
            }
        };

        let transformed = match self.transformer.transform(records, &target).await {
            Ok(transformed) => transformed,
            Err(error) => {
                warn!(target = %target.id, error = %error, "Transformation failed");
                return TargetOutcome::fatal(&target.id, error);
            }
        };

        let limits = definition.limits().for_collapse(target.collapse);
        let packed = pack(transformed, &limits, &target);

        let mut outcome = TargetOutcome::new(&target.id);
        outcome.records_dropped = packed.dropped.len();
        for (_, error) in packed.dropped {
            self.stats.record_dropped(&target.id);
            outcome.errors.push(error);
        }

        if packed.blocks.is_empty() {
            return outcome;
        }

        let service = match definition.acquire(&target).await {
            Ok(service) => service,
            Err(error) => {
                warn!(target = %target.id, error = %error, "Transport acquire failed");
                outcome.errors.push(error);
                return outcome;
            }
        };

        let poster_concurrency = if target.parallel {
            self.config.poster_concurrency
        } else {
            1
        };
        let block_sizes: Vec<usize> = packed.blocks.iter().map(|block| block.len()).collect();

        let failures = dispatch_blocks(service, all_targets, packed.blocks, poster_concurrency).await;

        let failed_indexes: Vec<usize> = failures.iter().map(|failure| failure.index).collect();
        for (index, block_records) in block_sizes.iter().enumerate() {
            if !failed_indexes.contains(&index) {
                self.stats.block_sent(&target.id, *block_records);
                outcome.blocks_sent += 1;
                outcome.records_delivered += *block_records;
            }
        }
        outcome.blocks_failed = failures.len();
        for failure in failures {
            self.stats.send_failed(&target.id);
            outcome.errors.push(failure.error);
        }

        outcome
    }
}
