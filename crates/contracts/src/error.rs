//! Layered error definitions
//!
//! Categorized by source: config / routing / packing / transport

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Target lookup failed for a source (fatal for that source only)
    #[error("target lookup failed for source '{source_id}': {message}")]
    ConfigLookup { source_id: String, message: String },

    // ===== Routing / Packing Errors =====
    /// Record exceeds the destination's maximum unit size; dropped
    #[error("record '{event_id}' too large for target '{target_id}': {size} > {max_unit_size}")]
    RecordTooLarge {
        event_id: String,
        target_id: String,
        size: usize,
        max_unit_size: usize,
    },

    /// Record matched no target filter; skipped, not fatal
    #[error("no matching target for record '{event_id}' with event type '{event_type}'")]
    NoMatchingTarget { event_id: String, event_type: String },

    /// Shard count must be positive
    #[error("invalid shard count: {got}")]
    InvalidShardCount { got: u32 },

    // ===== Transport Errors =====
    /// Destination kind does not satisfy the capability contract
    #[error("no service registered for destination kind '{kind}'")]
    InvalidServiceModule { kind: String },

    /// Transport initialization error (fatal for that target)
    #[error("transport '{target_id}' connection error: {message}")]
    TransportConnection { target_id: String, message: String },

    /// One block's send failed (non-fatal to sibling blocks)
    #[error("transport '{target_id}' send error: {message}")]
    TransportSend { target_id: String, message: String },

    /// Transformation collaborator failed (fatal for that target)
    #[error("transformation failed for target '{target_id}': {message}")]
    Transformation { target_id: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create target lookup error
    pub fn config_lookup(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigLookup {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    /// Create transport connection error
    pub fn transport_connection(target_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TransportConnection {
            target_id: target_id.into(),
            message: message.into(),
        }
    }

    /// Create transport send error
    pub fn transport_send(target_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TransportSend {
            target_id: target_id.into(),
            message: message.into(),
        }
    }

    /// Create transformation error
    pub fn transformation(target_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transformation {
            target_id: target_id.into(),
            message: message.into(),
        }
    }
}
