//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::{RoutingTable, TargetKind};

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    source_count: usize,
    target_count: usize,
    sharded_target_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating routing configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(table) => {
            let warnings = collect_warnings(&table);
            let sharded_target_count = table
                .sources
                .iter()
                .flat_map(|route| route.targets.iter())
                .filter(|target| target.shard_count.is_some())
                .count();

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", table.version),
                    source_count: table.sources.len(),
                    target_count: table.target_count(),
                    sharded_target_count,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(table: &RoutingTable) -> Vec<String> {
    let mut warnings = Vec::new();

    if table.sources.is_empty() {
        warnings.push("No sources configured - every record will be a no-op".to_string());
    }

    for route in &table.sources {
        if route.targets.is_empty() {
            warnings.push(format!(
                "Source '{}' has no targets - its records complete as no-ops",
                route.source_id
            ));
        }

        for target in &route.targets {
            if target.kind == TargetKind::FifoQueue && target.shard_count.is_none() {
                warnings.push(format!(
                    "Target '{}' has no shard_count - defaulting to a single shard",
                    target.id
                ));
            }
            if target.parallel {
                warnings.push(format!(
                    "Target '{}' posts blocks in parallel - cross-block ordering is not guaranteed",
                    target.id
                ));
            }
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Sources: {}", summary.source_count);
            println!("  Targets: {}", summary.target_count);
            println!("  Sharded targets: {}", summary.sharded_target_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
