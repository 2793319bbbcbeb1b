//! StatsSink trait - statistics collaborator interface
//!
//! Fire-and-forget counters; infallible by construction so statistics can
//! never sit on the failure-critical path.

/// Dispatch counters, ticked by the engine as work flows through
pub trait StatsSink: Send + Sync {
    /// A distinct source appeared in the input batch
    fn source_seen(&self, source_id: &str);

    /// One record ingested for a source
    fn record_seen(&self, source_id: &str);

    /// One record matched no target filter and was skipped
    fn record_skipped(&self, source_id: &str);

    /// One record exceeded the unit size limit and was dropped
    fn record_dropped(&self, target_id: &str);

    /// One block delivered to a target
    fn block_sent(&self, target_id: &str, records: usize);

    /// One block failed to deliver
    fn send_failed(&self, target_id: &str);
}

/// StatsSink that discards every tick
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStats;

impl StatsSink for NoopStats {
    fn source_seen(&self, _source_id: &str) {}
    fn record_seen(&self, _source_id: &str) {}
    fn record_skipped(&self, _source_id: &str) {}
    fn record_dropped(&self, _target_id: &str) {}
    fn block_sent(&self, _target_id: &str, _records: usize) {}
    fn send_failed(&self, _target_id: &str) {}
}
