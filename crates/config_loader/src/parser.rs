//! Configuration parsing
//!
//! Supports TOML (primary) and JSON formats.

use contracts::{ContractError, RoutingTable};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format (recommended)
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Infer format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse a TOML routing table
pub fn parse_toml(content: &str) -> Result<RoutingTable, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse a JSON routing table
pub fn parse_json(content: &str) -> Result<RoutingTable, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse according to format
pub fn parse(content: &str, format: ConfigFormat) -> Result<RoutingTable, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::TargetKind;

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"
[[sources]]
source_id = "orders-stream"

[[sources.targets]]
id = "orders-fifo"
kind = "fifo_queue"
event_types = ["order_created"]
shard_count = 2
region = "eu-west-1"
external_id = "123456789012"
destination_base_name = "orders"
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let table = result.unwrap();
        assert_eq!(table.sources.len(), 1);
        let target = &table.sources[0].targets[0];
        assert_eq!(target.kind, TargetKind::FifoQueue);
        assert!(target.matches("order_created"));
        assert!(!target.parallel);
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "sources": [{
                "source_id": "orders-stream",
                "targets": [{
                    "id": "orders-fifo",
                    "kind": "fifo_queue",
                    "event_types": ["order_created"],
                    "shard_count": 2,
                    "region": "eu-west-1",
                    "external_id": "123456789012",
                    "destination_base_name": "orders"
                }]
            }]
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_parse_defaults() {
        let content = r#"
[[sources]]
source_id = "bare"

[[sources.targets]]
id = "log-only"
kind = "log"
event_types = ["ping"]
"#;
        let table = parse_toml(content).unwrap();
        let target = &table.sources[0].targets[0];
        assert_eq!(target.shard_count, None);
        assert_eq!(target.collapse, contracts::CollapseMode::None);
        assert!(target.params.is_empty());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_extension("toml"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("TOML"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
