//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::{RoutingTable, ServiceDefinition};
use dispatcher::TransportRegistry;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    sources: Vec<SourceInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    transports: Vec<TransportInfo>,
}

#[derive(Serialize)]
struct SourceInfo {
    source_id: String,
    targets: Vec<TargetInfo>,
}

#[derive(Serialize)]
struct TargetInfo {
    id: String,
    kind: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    event_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shard_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<String>,
}

#[derive(Serialize)]
struct TransportInfo {
    kind: String,
    max_records: String,
    max_size: usize,
    max_unit_size: usize,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading routing configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let table = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&table, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&table, args);
    }

    Ok(())
}

fn build_config_info(table: &RoutingTable, args: &InfoArgs) -> ConfigInfo {
    let sources = table
        .sources
        .iter()
        .map(|route| SourceInfo {
            source_id: route.source_id.clone(),
            targets: route
                .targets
                .iter()
                .map(|target| TargetInfo {
                    id: target.id.clone(),
                    kind: format!("{:?}", target.kind),
                    event_types: if args.targets {
                        let mut event_types: Vec<_> =
                            target.event_types.iter().cloned().collect();
                        event_types.sort();
                        event_types
                    } else {
                        Vec::new()
                    },
                    shard_count: target.shard_count,
                    destination: if target.destination_base_name.is_empty() {
                        None
                    } else {
                        Some(target.destination_base_name.clone())
                    },
                })
                .collect(),
        })
        .collect();

    let transports = if args.transports {
        let registry = TransportRegistry::builtin();
        let mut kinds = registry.kinds();
        kinds.sort_by_key(|kind| format!("{kind:?}"));
        kinds
            .into_iter()
            .filter_map(|kind| registry.resolve(kind).ok())
            .map(|definition| transport_info(definition.as_ref()))
            .collect()
    } else {
        Vec::new()
    };

    ConfigInfo {
        version: format!("{:?}", table.version),
        sources,
        transports,
    }
}

fn transport_info(definition: &dyn ServiceDefinition) -> TransportInfo {
    let limits = definition.limits();
    TransportInfo {
        kind: format!("{:?}", definition.kind()),
        max_records: if limits.max_records == usize::MAX {
            "unlimited".to_string()
        } else {
            limits.max_records.to_string()
        },
        max_size: limits.max_size,
        max_unit_size: limits.max_unit_size,
    }
}

fn print_config_info(table: &RoutingTable, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  streamfan Routing Table                     ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Sources ({})", table.sources.len());
    for (i, route) in table.sources.iter().enumerate() {
        let is_last = i == table.sources.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        println!("   {} {} ({} targets)", prefix, route.source_id, route.targets.len());

        for (j, target) in route.targets.iter().enumerate() {
            let target_is_last = j == route.targets.len() - 1;
            let target_prefix = if target_is_last { "└─" } else { "├─" };

            if args.targets {
                let mut event_types: Vec<_> = target.event_types.iter().cloned().collect();
                event_types.sort();
                println!(
                    "   {}  {} {} ({:?}, events={:?}, shards={}, collapse={:?})",
                    child_prefix,
                    target_prefix,
                    target.id,
                    target.kind,
                    event_types,
                    target.shards(),
                    target.collapse,
                );
            } else {
                println!(
                    "   {}  {} {} ({:?})",
                    child_prefix, target_prefix, target.id, target.kind
                );
            }
        }
    }

    if args.transports {
        let registry = TransportRegistry::builtin();
        let mut kinds = registry.kinds();
        kinds.sort_by_key(|kind| format!("{kind:?}"));

        println!("\nRegistered Transports ({})", kinds.len());
        for (i, kind) in kinds.iter().enumerate() {
            let Ok(definition) = registry.resolve(*kind) else {
                continue;
            };
            let limits = definition.limits();
            let is_last = i == kinds.len() - 1;
            let prefix = if is_last { "└─" } else { "├─" };
            let max_records = if limits.max_records == usize::MAX {
                "unlimited".to_string()
            } else {
                limits.max_records.to_string()
            };
            println!(
                "   {} {:?}: max_records={}, max_size={}, max_unit_size={}",
                prefix, kind, max_records, limits.max_size, limits.max_unit_size
            );
        }
    }

    println!();
}
