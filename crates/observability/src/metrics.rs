//! Dispatch metrics collection
//!
//! Counter functions over the `metrics` facade, the `StatsSink`
//! implementation the coordinator ticks, and a cross-invocation aggregator
//! for run summaries.

use contracts::{DispatchReport, StatsSink};
use metrics::counter;

/// A distinct source appeared in a batch
pub fn record_source_seen(source_id: &str) {
    counter!(
        "streamfan_sources_total",
        "source" => source_id.to_string()
    )
    .increment(1);
}

/// One record ingested
pub fn record_record_seen(source_id: &str) {
    counter!(
        "streamfan_records_total",
        "source" => source_id.to_string()
    )
    .increment(1);
}

/// One record matched no target filter
pub fn record_record_skipped(source_id: &str) {
    counter!(
        "streamfan_records_skipped_total",
        "source" => source_id.to_string()
    )
    .increment(1);
}

/// One record dropped for exceeding the unit size limit
pub fn record_record_dropped(target_id: &str) {
    counter!(
        "streamfan_records_dropped_total",
        "target" => target_id.to_string()
    )
    .increment(1);
}

/// One block delivered
pub fn record_block_sent(target_id: &str, records: usize) {
    counter!(
        "streamfan_blocks_sent_total",
        "target" => target_id.to_string()
    )
    .increment(1);
    counter!(
        "streamfan_records_delivered_total",
        "target" => target_id.to_string()
    )
    .increment(records as u64);
}

/// One block failed to deliver
pub fn record_send_failure(target_id: &str) {
    counter!(
        "streamfan_send_failures_total",
        "target" => target_id.to_string()
    )
    .increment(1);
}

/// `StatsSink` backed by the `metrics` facade.
///
/// Every tick is a fire-and-forget counter increment; a missing recorder
/// makes them no-ops, so statistics can never fail dispatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsStatsSink;

impl StatsSink for MetricsStatsSink {
    fn source_seen(&self, source_id: &str) {
        record_source_seen(source_id);
    }

    fn record_seen(&self, source_id: &str) {
        record_record_seen(source_id);
    }

    fn record_skipped(&self, source_id: &str) {
        record_record_skipped(source_id);
    }

    fn record_dropped(&self, target_id: &str) {
        record_record_dropped(target_id);
    }

    fn block_sent(&self, target_id: &str, records: usize) {
        record_block_sent(target_id, records);
    }

    fn send_failed(&self, target_id: &str) {
        record_send_failure(target_id);
    }
}

/// Accumulates dispatch reports across invocations (one CLI run may split
/// its input into several batches).
#[derive(Debug, Clone, Default)]
pub struct DispatchStatsAggregator {
    batches: u64,
    failed_batches: u64,
    records: u64,
    delivered: u64,
    skipped: u64,
    dropped: u64,
    blocks: u64,
    errors: u64,
    sources: u64,
}

impl DispatchStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one invocation's report into the running totals
    pub fn update(&mut self, report: &DispatchReport) {
        self.batches += 1;
        if !report.is_success() {
            self.failed_batches += 1;
        }
        self.records += report.record_count() as u64;
        self.delivered += report.records_delivered() as u64;
        self.skipped += report.records_skipped() as u64;
        self.dropped += report.records_dropped() as u64;
        self.blocks += report.blocks_sent() as u64;
        self.errors += report.error_count() as u64;
        self.sources += report.sources.len() as u64;
    }

    /// Snapshot of the totals
    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            batches: self.batches,
            failed_batches: self.failed_batches,
            records: self.records,
            delivered: self.delivered,
            skipped: self.skipped,
            dropped: self.dropped,
            blocks: self.blocks,
            errors: self.errors,
            sources: self.sources,
        }
    }
}

/// Aggregated run totals
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsSummary {
    pub batches: u64,
    pub failed_batches: u64,
    pub records: u64,
    pub delivered: u64,
    pub skipped: u64,
    pub dropped: u64,
    pub blocks: u64,
    pub errors: u64,
    pub sources: u64,
}

impl StatsSummary {
    /// Delivered share of all ingested records, as a percentage
    pub fn delivery_rate(&self) -> f64 {
        if self.records > 0 {
            (self.delivered as f64 / self.records as f64) * 100.0
        } else {
            0.0
        }
    }
}
