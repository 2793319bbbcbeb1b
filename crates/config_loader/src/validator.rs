//! Routing-table validation
//!
//! Rules:
//! - source_id unique
//! - target id unique within a source
//! - event-type filters unambiguous within a source
//! - shard_count > 0 where present
//! - event_types non-empty (an empty filter can never match)
//! - fifo_queue targets carry addressing fields and a gateway_addr param

use std::collections::HashSet;

use contracts::{ContractError, RoutingTable, SourceRoute, TargetDefinition, TargetKind};

/// Validate a routing table
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(table: &RoutingTable) -> Result<(), ContractError> {
    validate_source_ids(table)?;
    for route in &table.sources {
        validate_target_ids(route)?;
        validate_event_type_ambiguity(route)?;
        for target in &route.targets {
            validate_target(route, target)?;
        }
    }
    Ok(())
}

/// source_id uniqueness
fn validate_source_ids(table: &RoutingTable) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for route in &table.sources {
        if !seen.insert(&route.source_id) {
            return Err(ContractError::config_validation(
                format!("sources[source_id={}]", route.source_id),
                "duplicate source_id",
            ));
        }
    }
    Ok(())
}

/// target id uniqueness within one source
fn validate_target_ids(route: &SourceRoute) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for target in &route.targets {
        if !seen.insert(&target.id) {
            return Err(ContractError::config_validation(
                format!("sources[{}].targets[id={}]", route.source_id, target.id),
                "duplicate target id",
            ));
        }
    }
    Ok(())
}

/// Two targets of one source subscribing to the same event type would make
/// first-match-wins routing configuration-order dependent; reject it.
fn validate_event_type_ambiguity(route: &SourceRoute) -> Result<(), ContractError> {
    let mut claimed: HashSet<&str> = HashSet::new();
    for target in &route.targets {
        for event_type in &target.event_types {
            if !claimed.insert(event_type.as_str()) {
                return Err(ContractError::config_validation(
                    format!("sources[{}].targets[id={}]", route.source_id, target.id),
                    format!("ambiguous routing: event type '{event_type}' already claimed by an earlier target"),
                ));
            }
        }
    }
    Ok(())
}

/// Per-target field checks
fn validate_target(route: &SourceRoute, target: &TargetDefinition) -> Result<(), ContractError> {
    let field = |name: &str| format!("sources[{}].targets[{}].{name}", route.source_id, target.id);

    if target.id.is_empty() {
        return Err(ContractError::config_validation(
            format!("sources[{}].targets", route.source_id),
            "target id cannot be empty",
        ));
    }

    if target.event_types.is_empty() {
        return Err(ContractError::config_validation(
            field("event_types"),
            "must declare at least one event type",
        ));
    }

    if let Some(0) = target.shard_count {
        return Err(ContractError::config_validation(
            field("shard_count"),
            "shard_count must be > 0",
        ));
    }

    if target.kind == TargetKind::FifoQueue {
        if target.destination_base_name.is_empty() {
            return Err(ContractError::config_validation(
                field("destination_base_name"),
                "fifo_queue targets need a destination base name",
            ));
        }
        if target.region.is_empty() {
            return Err(ContractError::config_validation(
                field("region"),
                "fifo_queue targets need a region",
            ));
        }
        if target
            .params
            .get("gateway_addr")
            .is_none_or(|addr| addr.is_empty())
        {
            return Err(ContractError::config_validation(
                field("params.gateway_addr"),
                "fifo_queue targets need a gateway_addr param",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::CollapseMode;
    use std::collections::HashMap;

    fn fifo_target(id: &str, event_types: &[&str]) -> TargetDefinition {
        TargetDefinition {
            id: id.into(),
            kind: TargetKind::FifoQueue,
            event_types: event_types.iter().map(|s| s.to_string()).collect(),
            shard_count: Some(2),
            region: "eu-west-1".into(),
            external_id: "123456789012".into(),
            destination_base_name: "orders".into(),
            collapse: CollapseMode::None,
            parallel: false,
            params: HashMap::from([("gateway_addr".to_string(), "127.0.0.1:9750".to_string())]),
        }
    }

    fn table(targets: Vec<TargetDefinition>) -> RoutingTable {
        RoutingTable {
            version: Default::default(),
            sources: vec![SourceRoute {
                source_id: "orders-stream".into(),
                targets,
            }],
        }
    }

    #[test]
    fn test_valid_config() {
        let t = table(vec![fifo_target("a", &["x"]), fifo_target("b", &["y"])]);
        assert!(validate(&t).is_ok());
    }

    #[test]
    fn test_duplicate_source_id() {
        let mut t = table(vec![fifo_target("a", &["x"])]);
        t.sources.push(t.sources[0].clone());
        let err = validate(&t).unwrap_err().to_string();
        assert!(err.contains("duplicate source_id"), "got: {err}");
    }

    #[test]
    fn test_duplicate_target_id() {
        let t = table(vec![fifo_target("a", &["x"]), fifo_target("a", &["y"])]);
        let err = validate(&t).unwrap_err().to_string();
        assert!(err.contains("duplicate target id"), "got: {err}");
    }

    #[test]
    fn test_ambiguous_event_type() {
        let t = table(vec![fifo_target("a", &["x", "y"]), fifo_target("b", &["y"])]);
        let err = validate(&t).unwrap_err().to_string();
        assert!(err.contains("ambiguous"), "got: {err}");
    }

    #[test]
    fn test_zero_shard_count() {
        let mut target = fifo_target("a", &["x"]);
        target.shard_count = Some(0);
        let err = validate(&table(vec![target])).unwrap_err().to_string();
        assert!(err.contains("shard_count"), "got: {err}");
    }

    #[test]
    fn test_empty_event_types() {
        let mut target = fifo_target("a", &["x"]);
        target.event_types.clear();
        let err = validate(&table(vec![target])).unwrap_err().to_string();
        assert!(err.contains("event type"), "got: {err}");
    }

    #[test]
    fn test_fifo_requires_gateway_addr() {
        let mut target = fifo_target("a", &["x"]);
        target.params.clear();
        let err = validate(&table(vec![target])).unwrap_err().to_string();
        assert!(err.contains("gateway_addr"), "got: {err}");
    }

    #[test]
    fn test_fifo_requires_base_name() {
        let mut target = fifo_target("a", &["x"]);
        target.destination_base_name.clear();
        let err = validate(&table(vec![target])).unwrap_err().to_string();
        assert!(err.contains("base name"), "got: {err}");
    }

    #[test]
    fn test_log_target_needs_no_addressing() {
        let target = TargetDefinition {
            id: "log".into(),
            kind: TargetKind::Log,
            event_types: ["x".to_string()].into_iter().collect(),
            shard_count: None,
            region: String::new(),
            external_id: String::new(),
            destination_base_name: String::new(),
            collapse: CollapseMode::None,
            parallel: false,
            params: HashMap::new(),
        };
        assert!(validate(&table(vec![target])).is_ok());
    }
}
