//! Pipeline orchestrator - wires collaborators and drives the coordinator.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{IdentityTransformer, RoutingTable};
use config_loader::StaticTargetStore;
use dispatcher::{CoordinatorConfig, DispatcherError, FanoutCoordinator, TransportRegistry};
use observability::{DispatchStatsAggregator, MetricsStatsSink};
use tracing::{info, warn};

use super::{read_batch, PipelineStats};

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The validated routing table
    pub table: RoutingTable,

    /// Input batch file path
    pub input: PathBuf,

    /// Sub-batch size (None = dispatch the whole input as one batch)
    pub batch_size: Option<usize>,

    /// Sources/targets processed concurrently
    pub target_concurrency: usize,

    /// Blocks posted concurrently within a parallel target
    pub poster_concurrency: usize,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main dispatch pipeline
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Read the input batch
        info!(input = %self.config.input.display(), "Reading batch file");
        let records = read_batch(&self.config.input).context("Failed to read input batch")?;
        info!(records = records.len(), "Batch loaded");

        // Wire collaborators
        let store = Arc::new(StaticTargetStore::new(&self.config.table));
        let registry = Arc::new(TransportRegistry::builtin());
        let coordinator = FanoutCoordinator::new(
            registry,
            store,
            IdentityTransformer,
            Arc::new(MetricsStatsSink),
            CoordinatorConfig {
                target_concurrency: self.config.target_concurrency,
                poster_concurrency: self.config.poster_concurrency,
            },
        );

        // Dispatch, optionally in fixed-size sub-batches
        let chunk_size = match self.config.batch_size {
            Some(size) if size > 0 => size,
            _ => records.len().max(1),
        };

        let mut aggregator = DispatchStatsAggregator::new();
        let mut chunk_index = 0usize;
        let mut chunks = records.into_iter().peekable();
        while chunks.peek().is_some() {
            let chunk: Vec<_> = chunks.by_ref().take(chunk_size).collect();
            chunk_index += 1;
            info!(batch = chunk_index, records = chunk.len(), "Dispatching batch");

            match coordinator.handle(chunk).await {
                Ok(report) => aggregator.update(&report),
                Err(DispatcherError::Aggregate { report }) => {
                    for (source, target, error) in report.iter_errors() {
                        warn!(
                            batch = chunk_index,
                            source = %source,
                            target = target.unwrap_or("-"),
                            error = %error,
                            "Dispatch failure"
                        );
                    }
                    aggregator.update(&report);
                }
                Err(error) => return Err(error).context("Dispatch failed"),
            }
        }

        Ok(PipelineStats {
            dispatch: aggregator.summary(),
            duration: start_time.elapsed(),
        })
    }
}
