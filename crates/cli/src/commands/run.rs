//! `run` command implementation.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_dispatch(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading routing configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let table = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    info!(
        sources = table.sources.len(),
        targets = table.target_count(),
        "Routing configuration loaded"
    );

    // Dry run - validate config and input, then exit
    if args.dry_run {
        let records = crate::pipeline::read_batch(&args.input)
            .with_context(|| format!("Failed to read input from {}", args.input.display()))?;
        info!("Dry run mode - configuration and input are valid, exiting");
        print_run_summary(&table, records.len());
        return Ok(());
    }

    // Build pipeline configuration
    let pipeline_config = PipelineConfig {
        table,
        input: args.input.clone(),
        batch_size: if args.batch_size == 0 {
            None
        } else {
            Some(args.batch_size)
        },
        target_concurrency: args.target_concurrency,
        poster_concurrency: args.poster_concurrency,
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    // Create and run pipeline
    let pipeline = Pipeline::new(pipeline_config);

    // Setup graceful shutdown handler
    let shutdown_signal = setup_shutdown_signal();

    info!("Starting dispatch...");

    tokio::select! {
        result = pipeline.run() => {
            let stats = result.context("Pipeline execution failed")?;

            info!(
                records = stats.dispatch.records,
                delivered = stats.dispatch.delivered,
                errors = stats.dispatch.errors,
                duration_secs = stats.duration.as_secs_f64(),
                "Dispatch finished"
            );

            // Print detailed statistics
            stats.print_summary();

            if stats.has_failures() {
                anyhow::bail!(
                    "{} of {} batch(es) finished with failures, check the logs",
                    stats.dispatch.failed_batches,
                    stats.dispatch.batches
                );
            }
        }
        _ = shutdown_signal => {
            warn!("Received shutdown signal, stopping dispatch...");
        }
    }

    info!("streamfan finished");
    Ok(())
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_run_summary(table: &contracts::RoutingTable, records: usize) {
    println!("\n=== Dry Run Summary ===\n");
    println!("Input records: {records}");
    println!("\nSources ({}):", table.sources.len());
    for route in &table.sources {
        println!("  - {} - {} targets", route.source_id, route.targets.len());
        for target in &route.targets {
            let event_types: Vec<_> = target.event_types.iter().cloned().collect();
            println!(
                "      {} ({:?}) events={:?} shards={}",
                target.id,
                target.kind,
                event_types,
                target.shards()
            );
        }
    }
    println!();
}
