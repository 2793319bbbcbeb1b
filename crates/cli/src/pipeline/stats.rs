//! Pipeline statistics and run summary.

use std::time::Duration;

use observability::StatsSummary;

/// Statistics from one pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Aggregated dispatch totals across all sub-batches
    pub dispatch: StatsSummary,

    /// Total duration of the run
    pub duration: Duration,
}

impl PipelineStats {
    /// Whether any sub-batch finished with failures
    pub fn has_failures(&self) -> bool {
        self.dispatch.failed_batches > 0
    }

    /// Records processed per second
    pub fn records_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.dispatch.records as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        let s = &self.dispatch;

        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                     Dispatch Statistics                      ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Batches: {} ({} failed)", s.batches, s.failed_batches);
        println!("   ├─ Sources: {}", s.sources);
        println!("   ├─ Records: {}", s.records);
        println!("   └─ Throughput: {:.0} records/s", self.records_per_sec());

        println!("\nDelivery");
        println!("   ├─ Delivered: {} ({:.1}%)", s.delivered, s.delivery_rate());
        println!("   ├─ Blocks sent: {}", s.blocks);
        println!("   ├─ Skipped (no matching target): {}", s.skipped);
        println!("   ├─ Dropped (too large): {}", s.dropped);
        println!("   └─ Errors: {}", s.errors);

        println!();
    }
}
